//! Keyboard shortcut table.
//!
//! Shortcuts are derived from action definitions when the action is
//! registered. The table is append-only and consulted in registration order:
//! the first binding that matches a key press wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shortcut chord as given in an action definition.
///
/// An empty `key` means the action has no shortcut.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    /// Ctrl (or meta on platforms that use it) must be held.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt must be held.
    #[serde(default)]
    pub alt: bool,
    /// Shift must be held.
    #[serde(default)]
    pub shift: bool,
    /// Key character, case-insensitive. Only the first character counts.
    #[serde(default)]
    pub key: String,
}

impl Chord {
    /// Creates a chord from modifier flags and a key.
    pub fn new(ctrl: bool, alt: bool, shift: bool, key: impl Into<String>) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            key: key.into(),
        }
    }

    /// Ctrl + key.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(true, false, false, key)
    }

    /// Ctrl + Shift + key.
    pub fn ctrl_shift(key: impl Into<String>) -> Self {
        Self::new(true, false, true, key)
    }

    /// Whether this chord binds anything.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Upper-cased code of the key's first character.
    ///
    /// Case folding is ASCII-only.
    pub fn char_code(&self) -> Option<u32> {
        self.key
            .chars()
            .next()
            .map(|c| u32::from(c.to_ascii_uppercase()))
    }
}

/// A shortcut bound to an action name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutBinding {
    /// Ctrl flag.
    pub ctrl: bool,
    /// Alt flag.
    pub alt: bool,
    /// Shift flag.
    pub shift: bool,
    /// Upper-cased character code.
    pub char_code: u32,
    /// Name of the action this binding fires.
    pub action: String,
}

impl ShortcutBinding {
    /// Derives a binding from a chord, or `None` when the chord is empty.
    pub fn from_chord(chord: &Chord, action: impl Into<String>) -> Option<Self> {
        let char_code = chord.char_code()?;
        Some(Self {
            ctrl: chord.ctrl,
            alt: chord.alt,
            shift: chord.shift,
            char_code,
            action: action.into(),
        })
    }

    /// Checks whether a key press triggers this binding.
    ///
    /// Ctrl matches when the ctrl state agrees, or, if `platform_meta` is set,
    /// when the meta state agrees with the ctrl flag. An unknown alt state
    /// matches either way. Shift must agree exactly.
    pub fn matches(&self, press: &KeyPress, platform_meta: bool) -> bool {
        let Some(code) = press.char_code() else {
            return false;
        };

        (press.ctrl == self.ctrl || (platform_meta && press.meta == self.ctrl))
            && press.alt.map_or(true, |alt| alt == self.alt)
            && press.shift == self.shift
            && code == self.char_code
    }

    /// Whether two bindings fire on exactly the same chord.
    pub fn same_chord(&self, other: &Self) -> bool {
        self.ctrl == other.ctrl
            && self.alt == other.alt
            && self.shift == other.shift
            && self.char_code == other.char_code
    }

    /// Human-readable chord, e.g. "Ctrl+Shift+B".
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(
            char::from_u32(self.char_code)
                .map_or_else(|| format!("U+{:04X}", self.char_code), |c| c.to_string()),
        );
        parts.join("+")
    }
}

/// A host-neutral key-press event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyPress {
    /// Ctrl held.
    pub ctrl: bool,
    /// Alt held, if the host reports it.
    pub alt: Option<bool>,
    /// Shift held.
    pub shift: bool,
    /// Meta (command) held.
    pub meta: bool,
    /// Character produced, if any.
    pub character: Option<char>,
}

impl KeyPress {
    /// A plain character with no modifiers.
    pub fn char(c: char) -> Self {
        Self {
            alt: Some(false),
            character: Some(c),
            ..Self::default()
        }
    }

    /// Adds ctrl.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Adds shift.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Adds alt.
    pub fn with_alt(mut self) -> Self {
        self.alt = Some(true);
        self
    }

    /// Adds meta.
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Marks the alt state as unknown.
    pub fn with_unknown_alt(mut self) -> Self {
        self.alt = None;
        self
    }

    /// Upper-cased code of the produced character.
    pub fn char_code(&self) -> Option<u32> {
        self.character.map(|c| u32::from(c.to_ascii_uppercase()))
    }
}

#[cfg(feature = "crossterm")]
impl From<crossterm::event::KeyEvent> for KeyPress {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::{KeyCode, KeyModifiers};

        let character = match event.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };

        Self {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: Some(event.modifiers.contains(KeyModifiers::ALT)),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            meta: event
                .modifiers
                .intersects(KeyModifiers::SUPER | KeyModifiers::META),
            character,
        }
    }
}

/// Ordered list of shortcut bindings.
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    bindings: Vec<ShortcutBinding>,
    platform_meta: bool,
}

impl ShortcutTable {
    /// Creates an empty table.
    pub fn new(platform_meta: bool) -> Self {
        Self {
            bindings: Vec::new(),
            platform_meta,
        }
    }

    /// Appends a binding. Existing bindings are never replaced.
    pub fn push(&mut self, binding: ShortcutBinding) {
        debug!("Bound {} to '{}'", binding.display(), binding.action);
        self.bindings.push(binding);
    }

    /// All bindings in registration order.
    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether meta stands in for ctrl.
    pub fn platform_meta(&self) -> bool {
        self.platform_meta
    }

    /// Finds the first binding matching a key press.
    pub fn find(&self, press: &KeyPress) -> Option<&ShortcutBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.matches(press, self.platform_meta))
    }

    /// Pairs of bindings that fire on the same chord, by index.
    pub fn collisions(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.bindings.iter().enumerate() {
            for (j, b) in self.bindings.iter().enumerate().skip(i + 1) {
                if a.same_chord(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
