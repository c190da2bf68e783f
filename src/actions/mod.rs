//! Action registry.
//!
//! Actions are named, parameterized operations with an execution handler, a
//! visibility predicate and an optional shortcut. The registry is generic over
//! the context handlers run against, so it can be owned by the editor that
//! handlers operate on.
//!
//! Registering a name twice replaces the definition reachable by name, but
//! the shortcut bound by the earlier registration stays in the shortcut table
//! and keeps pointing at the same action name.

pub mod builtins;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, error};

use crate::config::DEFAULT_PREFIX;
use crate::error::ActionError;
use crate::shortcuts::{Chord, KeyPress, ShortcutBinding, ShortcutTable};
use crate::source::SourceControl;

/// Execution handler.
///
/// Menu-driven handlers return `Some(completed)`; shortcut-driven handlers
/// usually return `None`.
pub type ExecFn<C> = Rc<dyn Fn(&mut C, Option<&mut dyn SourceControl>) -> Option<bool>>;

/// Visibility predicate, evaluated by the toolbar.
pub type VisibleFn<C> = Rc<dyn Fn(&C) -> bool>;

/// Partial action definition passed to [`ActionRegistry::register`].
///
/// Anything left unset falls back to the defaults: a no-op handler, an
/// always-true visibility predicate and no shortcut.
pub struct ActionOptions<C> {
    exec: Option<ExecFn<C>>,
    visible: Option<VisibleFn<C>>,
    shortcut: Chord,
}

impl<C> Default for ActionOptions<C> {
    fn default() -> Self {
        Self {
            exec: None,
            visible: None,
            shortcut: Chord::default(),
        }
    }
}

impl<C: 'static> ActionOptions<C> {
    /// Starts an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the execution handler.
    pub fn exec<F>(mut self, exec: F) -> Self
    where
        F: Fn(&mut C, Option<&mut dyn SourceControl>) -> Option<bool> + 'static,
    {
        self.exec = Some(Rc::new(exec));
        self
    }

    /// Sets the visibility predicate.
    pub fn visible<F>(mut self, visible: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.visible = Some(Rc::new(visible));
        self
    }

    /// Sets the shortcut chord.
    pub fn shortcut(mut self, chord: Chord) -> Self {
        self.shortcut = chord;
        self
    }
}

/// A registered action.
pub struct ActionDefinition<C> {
    name: String,
    exec: ExecFn<C>,
    visible: VisibleFn<C>,
    shortcut: Chord,
}

impl<C> ActionDefinition<C> {
    /// Action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shortcut chord the action was registered with (may be empty).
    pub fn shortcut(&self) -> &Chord {
        &self.shortcut
    }

    /// Handle to the execution handler.
    pub fn exec_fn(&self) -> ExecFn<C> {
        Rc::clone(&self.exec)
    }

    /// Evaluates the visibility predicate.
    pub fn is_visible(&self, ctx: &C) -> bool {
        (self.visible)(ctx)
    }
}

impl<C> std::fmt::Debug for ActionDefinition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("name", &self.name)
            .field("shortcut", &self.shortcut)
            .finish_non_exhaustive()
    }
}

/// Registry of actions and their shortcuts.
pub struct ActionRegistry<C> {
    actions: HashMap<String, ActionDefinition<C>>,
    /// Names in first-registration order
    order: Vec<String>,
    shortcuts: ShortcutTable,
    prefix: String,
}

impl<C: 'static> ActionRegistry<C> {
    /// Creates an empty registry with the default class-name prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX, false)
    }

    /// Creates an empty registry.
    ///
    /// `platform_meta` makes the meta key stand in for ctrl when matching
    /// shortcuts.
    pub fn with_prefix(prefix: impl Into<String>, platform_meta: bool) -> Self {
        Self {
            actions: HashMap::new(),
            order: Vec::new(),
            shortcuts: ShortcutTable::new(platform_meta),
            prefix: prefix.into(),
        }
    }

    /// Registers an action, replacing any earlier definition with that name.
    ///
    /// A non-empty shortcut is turned into a binding right away and appended
    /// to the shortcut table.
    pub fn register(&mut self, name: impl Into<String>, options: ActionOptions<C>) {
        let name = name.into();

        let exec: ExecFn<C> = match options.exec {
            Some(exec) => exec,
            None => Rc::new(noop::<C>),
        };
        let visible: VisibleFn<C> = match options.visible {
            Some(visible) => visible,
            None => Rc::new(always_visible::<C>),
        };

        if let Some(binding) = ShortcutBinding::from_chord(&options.shortcut, name.as_str()) {
            self.shortcuts.push(binding);
        }

        let definition = ActionDefinition {
            name: name.clone(),
            exec,
            visible,
            shortcut: options.shortcut,
        };

        if self.actions.insert(name.clone(), definition).is_some() {
            debug!("Action '{}' re-registered, previous definition replaced", name);
        } else {
            self.order.push(name);
        }
    }

    /// Looks up an action by name.
    pub fn get(&self, name: &str) -> Option<&ActionDefinition<C>> {
        self.actions.get(name)
    }

    /// Whether an action with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of reachable actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registered actions in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition<C>> {
        self.order.iter().filter_map(|name| self.actions.get(name))
    }

    /// The shortcut table.
    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    /// First shortcut binding matching a key press.
    pub fn find_shortcut(&self, press: &KeyPress) -> Option<&ShortcutBinding> {
        self.shortcuts.find(press)
    }

    /// Handle to the handler of a named action.
    ///
    /// An unknown name is logged and reported as an error.
    pub fn handler(&self, name: &str) -> Result<ExecFn<C>, ActionError> {
        self.actions.get(name).map(ActionDefinition::exec_fn).ok_or_else(|| {
            let known: Vec<&str> = self.order.iter().map(String::as_str).collect();
            error!("Action '{}' not in [{}]", name, known.join(", "));
            ActionError::UnknownAction(name.to_string())
        })
    }

    /// Runs a named action against a context that does not own this registry.
    ///
    /// Unknown names are logged and yield `None`.
    pub fn execute(
        &self,
        ctx: &mut C,
        name: &str,
        source: Option<&mut dyn SourceControl>,
    ) -> Option<bool> {
        let exec = self.handler(name).ok()?;
        exec(ctx, source)
    }

    /// Class-name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Applies the class-name convention with this registry's prefix.
    pub fn prefixed_class_name(&self, name: &str) -> String {
        prefixed_class_name(&self.prefix, name)
    }
}

impl<C: 'static> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn noop<C>(_: &mut C, _: Option<&mut dyn SourceControl>) -> Option<bool> {
    None
}

fn always_visible<C>(_: &C) -> bool {
    true
}

/// Builds the host class name for a format name.
///
/// Hyphenated names are kebab-joined (`align-right` becomes
/// `mosaic-align-right`). Anything else is camel-joined with the first
/// character upper-cased (`properties` becomes `mosaicProperties`). Case
/// folding is ASCII-only and touches the first character of `name` only.
pub fn prefixed_class_name(prefix: &str, name: &str) -> String {
    if name.contains('-') {
        return format!("{}-{}", prefix, name);
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_ascii_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}
