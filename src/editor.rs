//! The editor component that owns the action registry.
//!
//! One [`Editor`] exists per edited document. It owns the registry, the
//! deferred-operation queue and every in-flight insertion request, and it
//! drives its host through the capability traits in [`crate::host`].

use std::collections::HashMap;

use tracing::{debug, info};

use crate::actions::{builtins, ActionDefinition, ActionOptions, ActionRegistry};
use crate::config::EditorOptions;
use crate::host::{Host, RequestId};
use crate::queue::OperationQueue;
use crate::shortcuts::{KeyPress, ShortcutTable};
use crate::source::SourceControl;
use crate::workflow::InsertionRequest;

/// What the host should do with a key event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No shortcut matched; let the event through.
    Continue,
    /// A shortcut fired; prevent the default and stop propagation.
    Stop,
}

impl Propagation {
    /// Whether the event was consumed.
    pub fn is_handled(self) -> bool {
        self == Self::Stop
    }
}

/// An editor instance bound to a host.
pub struct Editor<H: Host + 'static> {
    pub(crate) host: H,
    pub(crate) options: EditorOptions,
    pub(crate) registry: ActionRegistry<Editor<H>>,
    pub(crate) queue: OperationQueue<Editor<H>>,
    pub(crate) insertions: HashMap<RequestId, InsertionRequest>,
    /// Request the open modal belongs to
    pub(crate) modal_owner: Option<RequestId>,
    initialized: bool,
    saving: bool,
}

impl<H: Host + 'static> Editor<H> {
    /// Creates an editor. Built-in actions are registered by [`Self::init_actions`].
    pub fn new(host: H, options: EditorOptions) -> Self {
        let registry = ActionRegistry::with_prefix(options.prefix.clone(), options.platform_meta);
        Self {
            host,
            options,
            registry,
            queue: OperationQueue::new(),
            insertions: HashMap::new(),
            modal_owner: None,
            initialized: false,
            saving: false,
        }
    }

    /// Registers the built-in actions and starts accepting key events.
    ///
    /// Calling it again does nothing.
    pub fn init_actions(&mut self) {
        if self.initialized {
            debug!("Actions already initialized");
            return;
        }

        builtins::register(&mut self.registry);
        self.initialized = true;
        info!(
            "Initialized {} actions with {} shortcuts",
            self.registry.len(),
            self.registry.shortcuts().len()
        );
    }

    /// Whether [`Self::init_actions`] has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registers (or replaces) an action.
    pub fn register_action(&mut self, name: impl Into<String>, options: ActionOptions<Self>) {
        self.registry.register(name, options);
    }

    /// Runs a named action with an optional source control.
    ///
    /// Unknown names are logged and yield `None` without touching the
    /// document.
    pub fn exec_action(
        &mut self,
        name: &str,
        source: Option<&mut dyn SourceControl>,
    ) -> Option<bool> {
        let exec = self.registry.handler(name).ok()?;
        exec(self, source)
    }

    /// Page-level key handler.
    ///
    /// The first binding matching the press runs its action with no source and
    /// the event is consumed. Before initialization nothing is bound.
    pub fn handle_keypress(&mut self, press: &KeyPress) -> Propagation {
        if !self.initialized {
            return Propagation::Continue;
        }

        let Some(action) = self
            .registry
            .find_shortcut(press)
            .map(|binding| binding.action.clone())
        else {
            return Propagation::Continue;
        };

        debug!("Shortcut matched action '{}'", action);
        self.exec_action(&action, None);
        Propagation::Stop
    }

    /// Shortcut bindings, for toolbar introspection.
    pub fn shortcuts(&self) -> &ShortcutTable {
        self.registry.shortcuts()
    }

    /// Registered actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition<Self>> {
        self.registry.iter()
    }

    /// Evaluates an action's visibility predicate. Unknown actions are hidden.
    pub fn is_visible(&self, name: &str) -> bool {
        self.registry
            .get(name)
            .is_some_and(|action| action.is_visible(self))
    }

    /// Class name for a format name under this editor's prefix.
    pub fn prefixed_class_name(&self, name: &str) -> String {
        self.registry.prefixed_class_name(name)
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the editor, returning its host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Editor options.
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Whether a save is waiting in the queue.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub(crate) fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Defers an operation until the host drains the queue.
    pub fn enqueue(&mut self, op: impl FnOnce(&mut Self) + 'static) {
        self.queue.push(Box::new(op));
    }

    /// Number of deferred operations waiting.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Runs deferred operations in enqueue order, including any they enqueue.
    /// Returns how many ran.
    pub fn run_queued(&mut self) -> usize {
        let mut ran = 0;
        while let Some(op) = self.queue.pop() {
            op(self);
            ran += 1;
        }
        ran
    }

    /// Deselects the active tile and refreshes the toolbar.
    pub fn blur_selected_tile(&mut self) {
        self.host.blur_selected();
        self.host.refresh_actions();
    }
}

impl<H: Host + 'static> std::fmt::Debug for Editor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("actions", &self.registry.len())
            .field("queued", &self.queue.len())
            .field("insertions", &self.insertions.len())
            .field("initialized", &self.initialized)
            .field("saving", &self.saving)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Chrome, HeadlessHost, HostCall, LayoutModel};
    use crate::shortcuts::Chord;

    fn editor() -> Editor<HeadlessHost> {
        let mut editor = Editor::new(HeadlessHost::new(), EditorOptions::new("http://localhost/page"));
        editor.init_actions();
        editor
    }

    #[test]
    fn test_init_actions_is_idempotent() {
        let mut editor = editor();
        let actions = editor.actions().count();
        let shortcuts = editor.shortcuts().len();

        editor.init_actions();
        assert_eq!(editor.actions().count(), actions);
        assert_eq!(editor.shortcuts().len(), shortcuts);
    }

    #[test]
    fn test_keypress_before_init_propagates() {
        let mut editor = Editor::new(HeadlessHost::new(), EditorOptions::default());
        let press = KeyPress::char('s').with_ctrl();
        assert_eq!(editor.handle_keypress(&press), Propagation::Continue);
        assert!(editor.host().calls().is_empty());
    }

    #[test]
    fn test_unmatched_keypress_propagates() {
        let mut editor = editor();
        assert_eq!(editor.handle_keypress(&KeyPress::char('b')), Propagation::Continue);
        assert!(editor.host().calls().is_empty());
    }

    #[test]
    fn test_custom_action_reaches_editor() {
        let mut editor = editor();
        editor.register_action(
            "mark",
            ActionOptions::new()
                .exec(|editor: &mut Editor<HeadlessHost>, _| {
                    editor.host_mut().open_properties();
                    Some(true)
                })
                .shortcut(Chord::new(false, true, false, "m")),
        );

        let press = KeyPress::char('m').with_alt();
        assert!(editor.handle_keypress(&press).is_handled());
        assert_eq!(editor.host().calls().len(), 1);
    }

    #[test]
    fn test_queue_runs_nested_operations_in_order() {
        let mut editor = editor();
        editor.enqueue(|editor| {
            editor.host_mut().select_layout();
            editor.enqueue(|editor| editor.host_mut().save_layout());
        });
        editor.enqueue(|editor| editor.host_mut().make_tiles_movable());

        assert_eq!(editor.run_queued(), 3);
        assert_eq!(
            editor.host().calls(),
            &[
                HostCall::SelectLayout,
                HostCall::MakeTilesMovable,
                HostCall::SaveLayout,
            ]
        );
    }

    #[test]
    fn test_unknown_action_is_hidden() {
        assert!(!editor().is_visible("nonexistent"));
    }
}
