//! Insertion request states and their transition table.

use serde::Serialize;

use crate::models::TileStrategy;

/// Where an insertion request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionState {
    /// Created, nothing done yet.
    Idle,
    /// Looking the selected name up in the catalog.
    ResolvingConfig,
    /// Waiting for the add form.
    AwaitingFormFetch,
    /// Waiting for the auto-filled add form to be accepted.
    AwaitingDirectSubmit,
    /// Waiting for the user to complete the add form in the modal.
    AwaitingModalSubmit,
    /// A tile was committed. Terminal.
    Committed,
    /// Gave up without committing. Terminal.
    Aborted,
}

impl InsertionState {
    /// Whether no further events are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }
}

impl std::fmt::Display for InsertionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ResolvingConfig => write!(f, "resolving_config"),
            Self::AwaitingFormFetch => write!(f, "awaiting_form_fetch"),
            Self::AwaitingDirectSubmit => write!(f, "awaiting_direct_submit"),
            Self::AwaitingModalSubmit => write!(f, "awaiting_modal_submit"),
            Self::Committed => write!(f, "committed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Inputs that move a request between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionEvent {
    /// The insert action fired.
    Start,
    /// The selected name was found in the catalog.
    ConfigResolved(TileStrategy),
    /// The selected name is not in the catalog.
    ConfigMissing,
    /// The add form arrived and needs user input (or cannot be auto-submitted).
    FormNeedsInput,
    /// The add form arrived complete and was auto-submitted.
    FormSubmitted,
    /// A request failed.
    RequestFailed,
    /// The auto-submitted form was answered.
    DirectSubmitAnswered {
        /// Whether the answer carried the new tile's address.
        has_address: bool,
    },
    /// The modal rendered (initially or after a failed submission).
    ModalRendered,
    /// The modal's form was accepted.
    ModalSubmitted {
        /// Whether the answer carried the new tile's address.
        has_address: bool,
    },
    /// The user cancelled the modal.
    ModalCancelled,
}

/// Transition table. `None` means the event is not accepted in `state`.
pub fn transition(state: InsertionState, event: InsertionEvent) -> Option<InsertionState> {
    use InsertionEvent as E;
    use InsertionState as S;

    let next = match (state, event) {
        (S::Idle, E::Start) => S::ResolvingConfig,

        (S::ResolvingConfig, E::ConfigMissing) => S::Aborted,
        (S::ResolvingConfig, E::ConfigResolved(TileStrategy::Static | TileStrategy::TemplatedApp)) => {
            S::Committed
        }
        (S::ResolvingConfig, E::ConfigResolved(TileStrategy::FormApp)) => S::AwaitingFormFetch,

        (S::AwaitingFormFetch, E::FormNeedsInput) => S::AwaitingModalSubmit,
        (S::AwaitingFormFetch, E::FormSubmitted) => S::AwaitingDirectSubmit,
        (S::AwaitingFormFetch, E::RequestFailed) => S::Aborted,

        (S::AwaitingDirectSubmit, E::DirectSubmitAnswered { has_address: true }) => S::Committed,
        (S::AwaitingDirectSubmit, E::DirectSubmitAnswered { has_address: false }) => {
            S::AwaitingModalSubmit
        }
        (S::AwaitingDirectSubmit, E::RequestFailed) => S::Aborted,

        (S::AwaitingModalSubmit, E::ModalRendered) => S::AwaitingModalSubmit,
        (S::AwaitingModalSubmit, E::ModalSubmitted { has_address: true }) => S::Committed,
        (S::AwaitingModalSubmit, E::ModalSubmitted { has_address: false }) => {
            S::AwaitingModalSubmit
        }
        (S::AwaitingModalSubmit, E::ModalCancelled) => S::Aborted,

        _ => return None,
    };

    Some(next)
}
