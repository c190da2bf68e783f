//! Tile insertion workflow.
//!
//! The `insert` action turns a selected block-type name into a committed
//! tile. Static and templated types commit synchronously. Form types fetch the
//! server's add form and then either auto-submit it or hand it to the user in
//! a modal, resuming whenever the host reports a completion through one of the
//! `on_*` methods below.
//!
//! Every request carries its own [`InsertionState`] and `initial` flag. Late
//! events for requests that already finished are logged and ignored.

pub mod forms;
pub mod state;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::editor::Editor;
use crate::error::{ActionError, Result};
use crate::host::{Host, HttpResponse, HttpResult, ModalContent, RequestId};
use crate::models::{BlockTypeConfig, TileStrategy};
use crate::source::{SourceControl, NONE_VALUE};

pub use forms::AddForm;
pub use state::{transition, InsertionEvent, InsertionState};

/// One user-initiated insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionRequest {
    id: RequestId,
    tile_type: String,
    config: Option<BlockTypeConfig>,
    state: InsertionState,
    initial: bool,
}

impl InsertionRequest {
    /// Starts a request for the selected block-type name.
    pub fn new(tile_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tile_type: tile_type.into(),
            config: None,
            state: InsertionState::Idle,
            initial: true,
        }
    }

    /// Request id; also addresses templated tiles before they are persisted.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Selected block-type name.
    pub fn tile_type(&self) -> &str {
        &self.tile_type
    }

    /// Resolved catalog entry.
    pub fn config(&self) -> Option<&BlockTypeConfig> {
        self.config.as_ref()
    }

    /// Current state.
    pub fn state(&self) -> InsertionState {
        self.state
    }

    /// Whether stale field errors still need clearing.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Applies an event, failing if the current state does not accept it.
    pub fn advance(&mut self, event: InsertionEvent) -> Result<InsertionState> {
        let next = transition(self.state, event).ok_or(ActionError::StaleRequest(self.id))?;
        debug!(
            "Insertion {} ({}): {} -> {} on {:?}",
            self.id, self.tile_type, self.state, next, event
        );
        self.state = next;
        Ok(next)
    }
}

/// Add-form address for a block type.
pub fn add_form_url(context_url: &str, tile_type: &str) -> String {
    format!(
        "{}/@@add-tile?tiletype={}&form.button.Create=Create",
        context_url, tile_type
    )
}

/// Address of a templated tile that has not been persisted yet.
pub fn templated_tile_url(context_url: &str, tile_type: &str, id: RequestId) -> String {
    format!("{}/@@{}/{}", context_url, tile_type, id)
}

/// Document body wrapping a templated tile's default content.
pub fn templated_tile_html(default_value: &str) -> String {
    format!("<html><body>{}</body></html>", default_value)
}

impl<H: Host + 'static> Editor<H> {
    /// Runs the insert action against a source control.
    ///
    /// Returns `Ok(false)` when nothing is selected and `Ok(true)` once the
    /// request has committed or is waiting on the host. The source is reset
    /// whenever a selection was consumed.
    pub fn insert(&mut self, source: Option<&mut dyn SourceControl>) -> Result<bool> {
        let Some(source) = source else {
            return Ok(false);
        };
        let selected = match source.value() {
            Some(value) if value != NONE_VALUE => value.to_string(),
            _ => return Ok(false),
        };

        self.blur_selected_tile();
        let started = self.start_insertion(&selected);
        source.reset();
        started.map(|_| true)
    }

    /// Resolves a block type and runs its creation strategy.
    ///
    /// Returns the request, which is already terminal for static and templated
    /// types and still pending for form types.
    pub fn start_insertion(&mut self, tile_type: &str) -> Result<InsertionRequest> {
        let mut request = InsertionRequest::new(tile_type);
        request.advance(InsertionEvent::Start)?;

        let Some(config) = self.options.resolve_block_type(tile_type).cloned() else {
            request.advance(InsertionEvent::ConfigMissing)?;
            error!("Block type '{}' not found in the tile catalog", tile_type);
            return Err(ActionError::UnresolvedBlockType(tile_type.to_string()));
        };

        let strategy = config.tile_type;
        request.config = Some(config);
        request.advance(InsertionEvent::ConfigResolved(strategy))?;

        match strategy {
            TileStrategy::Static => {
                let content = self.default_value(&request);
                self.host.add_tile(request.tile_type(), &content);
                info!("Committed static tile '{}'", request.tile_type());
            }
            TileStrategy::TemplatedApp => {
                let html = templated_tile_html(&self.default_value(&request));
                let url = templated_tile_url(&self.options.context_url, request.tile_type(), request.id());
                self.host.add_app_tile(request.tile_type(), &html, &url);
                info!("Committed templated tile '{}' at {}", request.tile_type(), url);
            }
            TileStrategy::FormApp => {
                let url = add_form_url(&self.options.context_url, request.tile_type());
                self.insertions.insert(request.id(), request.clone());
                self.host.set_loading(true);
                self.host.get(request.id(), &url);
            }
        }

        Ok(request)
    }

    /// The add form arrived (or failed to).
    pub fn on_form_fetched(&mut self, id: RequestId, result: HttpResult) -> Result<InsertionState> {
        self.expect_state(id, InsertionState::AwaitingFormFetch)?;
        self.hide_loading_unless_fetching(id);

        let response = match checked(result) {
            Ok(response) => response,
            Err(message) => return self.fail(id, message),
        };

        let form = AddForm::parse(&response.body);
        match form.action_url.as_deref() {
            Some(action_url) if !form.has_empty_required() => {
                let state = self.advance(id, InsertionEvent::FormSubmitted)?;
                let fields = form.submission_fields();
                self.host.post_form(id, action_url, &fields);
                Ok(state)
            }
            _ => {
                if form.has_empty_required() {
                    debug!("Add form needs input for: {}", form.empty_required.join(", "));
                } else {
                    warn!("Add form for insertion {} has no action address", id);
                }
                let state = self.advance(id, InsertionEvent::FormNeedsInput)?;
                self.present_in_modal(id, response.body);
                Ok(state)
            }
        }
    }

    /// The auto-submitted add form was answered (or failed).
    ///
    /// An answer without a tile address is shown in the modal instead.
    pub fn on_direct_submit(&mut self, id: RequestId, result: HttpResult) -> Result<InsertionState> {
        self.expect_state(id, InsertionState::AwaitingDirectSubmit)?;

        let response = match checked(result) {
            Ok(response) => response,
            Err(message) => return self.fail(id, message),
        };

        let tile_url = response.tile_url().map(str::to_string);
        let state = self.advance(
            id,
            InsertionEvent::DirectSubmitAnswered {
                has_address: tile_url.is_some(),
            },
        )?;

        match tile_url {
            Some(url) => self.commit(id, &response.body, &url),
            None => self.present_in_modal(id, response.body),
        }
        Ok(state)
    }

    /// The modal finished rendering, initially or after a failed submission.
    ///
    /// Field errors are cleared on the first render of each request only. The
    /// cancel control is re-bound every time.
    pub fn on_modal_rendered(&mut self, id: RequestId) -> Result<InsertionState> {
        self.expect_modal(id)?;
        let state = self.advance(id, InsertionEvent::ModalRendered)?;

        let clear = self
            .insertions
            .get_mut(&id)
            .is_some_and(|request| std::mem::replace(&mut request.initial, false));
        if clear {
            self.host.clear_field_errors();
        }
        self.host.bind_cancel(id);
        Ok(state)
    }

    /// The modal's form was accepted by the server.
    ///
    /// Without a tile address the modal stays open.
    pub fn on_modal_submitted(&mut self, id: RequestId, response: HttpResponse) -> Result<InsertionState> {
        self.expect_modal(id)?;

        let tile_url = response.tile_url().map(str::to_string);
        let state = self.advance(
            id,
            InsertionEvent::ModalSubmitted {
                has_address: tile_url.is_some(),
            },
        )?;

        if let Some(url) = tile_url {
            self.commit(id, &response.body, &url);
            self.close_modal();
        } else {
            debug!("Modal answer for insertion {} carried no tile address", id);
        }
        Ok(state)
    }

    /// The user cancelled the modal.
    pub fn on_modal_cancelled(&mut self, id: RequestId) -> Result<InsertionState> {
        self.expect_modal(id)?;
        let state = self.advance(id, InsertionEvent::ModalCancelled)?;
        self.insertions.remove(&id);
        self.close_modal();
        info!("Insertion {} cancelled", id);
        Ok(state)
    }

    /// Insertions waiting on the host.
    pub fn pending_insertions(&self) -> impl Iterator<Item = &InsertionRequest> {
        self.insertions.values()
    }

    /// A pending insertion by id.
    pub fn insertion(&self, id: RequestId) -> Option<&InsertionRequest> {
        self.insertions.get(&id)
    }

    /// Request the open modal belongs to.
    pub fn modal_owner(&self) -> Option<RequestId> {
        self.modal_owner
    }

    fn default_value(&self, request: &InsertionRequest) -> String {
        request
            .config()
            .map(|config| self.host.default_value(config))
            .unwrap_or_default()
    }

    fn advance(&mut self, id: RequestId, event: InsertionEvent) -> Result<InsertionState> {
        self.insertions
            .get_mut(&id)
            .ok_or(ActionError::StaleRequest(id))?
            .advance(event)
    }

    fn expect_state(&self, id: RequestId, expected: InsertionState) -> Result<()> {
        match self.insertions.get(&id) {
            Some(request) if request.state() == expected => Ok(()),
            Some(request) => {
                warn!(
                    "Ignoring event for insertion {} in state {} (expected {})",
                    id,
                    request.state(),
                    expected
                );
                Err(ActionError::StaleRequest(id))
            }
            None => {
                warn!("Ignoring late event for finished insertion {}", id);
                Err(ActionError::StaleRequest(id))
            }
        }
    }

    fn expect_modal(&self, id: RequestId) -> Result<()> {
        if self.modal_owner != Some(id) {
            warn!("Ignoring modal event for insertion {} that does not own the modal", id);
            return Err(ActionError::StaleRequest(id));
        }
        self.expect_state(id, InsertionState::AwaitingModalSubmit)
    }

    /// Opens a dialog no insertion waits on, such as the add-tile picker.
    ///
    /// The request that owned the replaced dialog is aborted, so its late
    /// events are ignored.
    pub fn open_modal(&mut self, content: ModalContent) {
        self.claim_modal(None);
        self.host.open_modal(None, content);
    }

    fn present_in_modal(&mut self, id: RequestId, markup: String) {
        self.claim_modal(Some(id));
        self.host.open_modal(Some(id), ModalContent::Inline(markup));
    }

    /// Hands the modal to `owner`, aborting whichever request held it.
    fn claim_modal(&mut self, owner: Option<RequestId>) {
        let previous = std::mem::replace(&mut self.modal_owner, owner);
        let Some(previous) = previous.filter(|previous| Some(*previous) != owner) else {
            return;
        };
        let Some(mut request) = self.insertions.remove(&previous) else {
            return;
        };
        match request.advance(InsertionEvent::ModalCancelled) {
            Ok(_) => debug!("Insertion {} lost the modal", previous),
            Err(err) => debug!("Dropped insertion {} without a transition: {}", previous, err),
        }
    }

    /// Hides the loading indicator once no other add form is being fetched.
    fn hide_loading_unless_fetching(&mut self, done: RequestId) {
        let fetching = self.insertions.values().any(|request| {
            request.id() != done && request.state() == InsertionState::AwaitingFormFetch
        });
        if !fetching {
            self.host.set_loading(false);
        }
    }

    fn commit(&mut self, id: RequestId, html: &str, url: &str) {
        let Some(request) = self.insertions.remove(&id) else {
            return;
        };
        self.host.add_app_tile(request.tile_type(), html, url);
        info!("Committed app tile '{}' at {}", request.tile_type(), url);
    }

    fn close_modal(&mut self) {
        self.host.close_modal();
        self.modal_owner = None;
    }

    fn fail(&mut self, id: RequestId, message: String) -> Result<InsertionState> {
        let state = self.advance(id, InsertionEvent::RequestFailed)?;
        self.insertions.remove(&id);
        self.hide_loading_unless_fetching(id);

        let err = ActionError::Network { request: id, message };
        warn!("{}", err);
        self.host.notify_error(&err.user_message());
        debug!("Insertion {} ended in state {}", id, state);
        Err(err)
    }
}

/// Turns transport failures and non-2xx answers into a message.
fn checked(result: HttpResult) -> std::result::Result<HttpResponse, String> {
    match result {
        Ok(response) if response.is_success() => Ok(response),
        Ok(response) => Err(format!("server answered with status {}", response.status)),
        Err(err) => Err(err.to_string()),
    }
}
