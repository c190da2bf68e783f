//! Source controls: the drop-down menus that trigger actions.

/// Neutral selection a menu is reset to after it fires.
pub const NONE_VALUE: &str = "none";

/// A control an action was triggered from.
///
/// Menu-driven actions read the selected value and reset the control so the
/// same menu can fire again.
pub trait SourceControl {
    /// Currently selected value, if any.
    fn value(&self) -> Option<&str>;

    /// Puts the control back into its neutral selection.
    fn reset(&mut self);
}

/// An owned menu selection, used by headless hosts and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSelection {
    value: String,
    resets: usize,
}

impl MenuSelection {
    /// Creates a menu with the given value selected.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            resets: 0,
        }
    }

    /// Creates a menu in its neutral selection.
    pub fn none() -> Self {
        Self::new(NONE_VALUE)
    }

    /// Selects a new value.
    pub fn select(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Whether the menu shows the neutral selection.
    pub fn is_none(&self) -> bool {
        self.value == NONE_VALUE
    }

    /// How many times the menu has been reset.
    pub fn reset_count(&self) -> usize {
        self.resets
    }
}

impl SourceControl for MenuSelection {
    fn value(&self) -> Option<&str> {
        if self.value.is_empty() {
            None
        } else {
            Some(&self.value)
        }
    }

    fn reset(&mut self) {
        self.value = NONE_VALUE.to_string();
        self.resets += 1;
    }
}

/// Plain string values act as read-only sources; resetting them is a no-op.
impl SourceControl for &str {
    fn value(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            Some(*self)
        }
    }

    fn reset(&mut self) {}
}
