//! Headless host that records every capability call.
//!
//! Used by the CLI to dry-run actions and by tests as a mock host. It keeps
//! just enough state (classes, modal, committed tiles) to make the recorded
//! calls inspectable.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::models::{BlockTypeConfig, Scope};

use super::{Chrome, FormButton, HttpClient, LayoutModel, ModalContent, ModalHost, RequestId, Selection};

/// A recorded capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `Selection::toggle_class`
    ToggleClass(Scope, String),
    /// `Selection::add_class`
    AddClass(Scope, String),
    /// `Selection::remove_class`
    RemoveClass(Scope, String),
    /// `Selection::blur_selected`
    BlurSelected,
    /// `Selection::edit_selected_as_html`
    EditAsHtml,
    /// `LayoutModel::add_tile`
    AddTile {
        /// Block type.
        tile_type: String,
        /// Content.
        content: String,
    },
    /// `LayoutModel::add_app_tile`
    AddAppTile {
        /// Block type.
        tile_type: String,
        /// Content.
        html: String,
        /// Address.
        url: String,
    },
    /// `LayoutModel::save_layout_to_form`
    SaveLayoutToForm,
    /// `LayoutModel::select_layout`
    SelectLayout,
    /// `LayoutModel::save_layout`
    SaveLayout,
    /// `LayoutModel::set_selected_content_layout`
    SetSelectedContentLayout(String),
    /// `LayoutModel::make_tiles_movable`
    MakeTilesMovable,
    /// `Chrome::refresh_actions`
    RefreshActions,
    /// `Chrome::click_form_button`
    ClickFormButton(FormButton),
    /// `Chrome::sync_layout_field`
    SyncLayoutField,
    /// `Chrome::open_window_after`
    OpenWindow {
        /// Address.
        url: String,
        /// Delay before opening.
        delay: Duration,
    },
    /// `Chrome::open_properties`
    OpenProperties,
    /// `Chrome::toggle_layout_menu`
    ToggleLayoutMenu,
    /// `Chrome::close_layout_menu`
    CloseLayoutMenu,
    /// `Chrome::show_layout_editing`
    ShowLayoutEditing,
    /// `Chrome::confirm`
    Confirm(String),
    /// `Chrome::set_loading`
    SetLoading(bool),
    /// `Chrome::notify_error`
    NotifyError(String),
    /// `ModalHost::open_modal`
    OpenModal(Option<RequestId>, ModalContent),
    /// `ModalHost::clear_field_errors`
    ClearFieldErrors,
    /// `ModalHost::bind_cancel`
    BindCancel(RequestId),
    /// `ModalHost::close_modal`
    CloseModal,
    /// `HttpClient::get`
    Get(RequestId, String),
    /// `HttpClient::post_form`
    PostForm(RequestId, String, Vec<(String, String)>),
}

/// A tile committed to the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTile {
    /// Block type.
    pub tile_type: String,
    /// Content.
    pub content: String,
    /// Address, for app tiles.
    pub url: Option<String>,
}

/// Recording host.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    calls: Vec<HostCall>,
    selected: bool,
    html_mode: bool,
    has_content_layout: bool,
    confirm_answer: bool,
    loading: bool,
    modal: Option<ModalContent>,
    element_classes: BTreeSet<String>,
    row_classes: BTreeSet<String>,
    committed: Vec<CommittedTile>,
}

impl HeadlessHost {
    /// A host with a selected tile and no custom layout.
    pub fn new() -> Self {
        Self {
            selected: true,
            ..Self::default()
        }
    }

    /// Sets whether the document already has a content layout.
    pub fn with_content_layout(mut self, has_content_layout: bool) -> Self {
        self.has_content_layout = has_content_layout;
        self
    }

    /// Sets the answer to confirmation prompts.
    pub fn with_confirm_answer(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    /// Sets whether a tile is selected.
    pub fn with_selection(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Every call in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forgets recorded calls, keeping state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of calls matching a predicate.
    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Committed tiles in commit order.
    pub fn committed(&self) -> &[CommittedTile] {
        &self.committed
    }

    /// Classes on the selected tile or its row.
    pub fn classes(&self, scope: Scope) -> &BTreeSet<String> {
        match scope {
            Scope::Element => &self.element_classes,
            Scope::Row => &self.row_classes,
        }
    }

    /// Content of the open modal, if any.
    pub fn modal(&self) -> Option<&ModalContent> {
        self.modal.as_ref()
    }

    /// Whether the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the selected tile is in raw HTML mode.
    pub fn is_html_mode(&self) -> bool {
        self.html_mode
    }

    /// HTTP requests issued, as (request, method, url).
    pub fn http_requests(&self) -> Vec<(RequestId, &'static str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Get(id, url) => Some((*id, "GET", url.as_str())),
                HostCall::PostForm(id, url, _) => Some((*id, "POST", url.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Error messages shown to the user.
    pub fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::NotifyError(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn classes_mut(&mut self, scope: Scope) -> &mut BTreeSet<String> {
        match scope {
            Scope::Element => &mut self.element_classes,
            Scope::Row => &mut self.row_classes,
        }
    }
}

impl Selection for HeadlessHost {
    fn has_selection(&self) -> bool {
        self.selected
    }

    fn toggle_class(&mut self, scope: Scope, class: &str) {
        self.calls.push(HostCall::ToggleClass(scope, class.to_string()));
        if !self.selected {
            return;
        }
        let classes = self.classes_mut(scope);
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn add_class(&mut self, scope: Scope, class: &str) {
        self.calls.push(HostCall::AddClass(scope, class.to_string()));
        if self.selected {
            self.classes_mut(scope).insert(class.to_string());
        }
    }

    fn remove_class(&mut self, scope: Scope, class: &str) {
        self.calls.push(HostCall::RemoveClass(scope, class.to_string()));
        self.classes_mut(scope).remove(class);
    }

    fn blur_selected(&mut self) {
        self.calls.push(HostCall::BlurSelected);
        self.selected = false;
    }

    fn edit_selected_as_html(&mut self) {
        self.calls.push(HostCall::EditAsHtml);
        if self.selected {
            self.html_mode = true;
        }
    }
}

impl LayoutModel for HeadlessHost {
    fn default_value(&self, config: &BlockTypeConfig) -> String {
        config.default_value.clone().unwrap_or_default()
    }

    fn add_tile(&mut self, tile_type: &str, content: &str) {
        self.calls.push(HostCall::AddTile {
            tile_type: tile_type.to_string(),
            content: content.to_string(),
        });
        self.committed.push(CommittedTile {
            tile_type: tile_type.to_string(),
            content: content.to_string(),
            url: None,
        });
    }

    fn add_app_tile(&mut self, tile_type: &str, html: &str, url: &str) {
        self.calls.push(HostCall::AddAppTile {
            tile_type: tile_type.to_string(),
            html: html.to_string(),
            url: url.to_string(),
        });
        self.committed.push(CommittedTile {
            tile_type: tile_type.to_string(),
            content: html.to_string(),
            url: Some(url.to_string()),
        });
    }

    fn has_content_layout(&self) -> bool {
        self.has_content_layout
    }

    fn save_layout_to_form(&mut self) {
        self.calls.push(HostCall::SaveLayoutToForm);
    }

    fn select_layout(&mut self) {
        self.calls.push(HostCall::SelectLayout);
    }

    fn save_layout(&mut self) {
        self.calls.push(HostCall::SaveLayout);
    }

    fn set_selected_content_layout(&mut self, layout: &str) {
        self.calls
            .push(HostCall::SetSelectedContentLayout(layout.to_string()));
    }

    fn make_tiles_movable(&mut self) {
        self.calls.push(HostCall::MakeTilesMovable);
    }
}

impl Chrome for HeadlessHost {
    fn refresh_actions(&mut self) {
        self.calls.push(HostCall::RefreshActions);
    }

    fn click_form_button(&mut self, button: FormButton) {
        self.calls.push(HostCall::ClickFormButton(button));
    }

    fn sync_layout_field(&mut self) {
        self.calls.push(HostCall::SyncLayoutField);
    }

    fn open_window_after(&mut self, url: &str, delay: Duration) {
        self.calls.push(HostCall::OpenWindow {
            url: url.to_string(),
            delay,
        });
    }

    fn open_properties(&mut self) {
        self.calls.push(HostCall::OpenProperties);
    }

    fn toggle_layout_menu(&mut self) {
        self.calls.push(HostCall::ToggleLayoutMenu);
    }

    fn close_layout_menu(&mut self) {
        self.calls.push(HostCall::CloseLayoutMenu);
    }

    fn show_layout_editing(&mut self) {
        self.calls.push(HostCall::ShowLayoutEditing);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.calls.push(HostCall::Confirm(message.to_string()));
        self.confirm_answer
    }

    fn set_loading(&mut self, loading: bool) {
        self.calls.push(HostCall::SetLoading(loading));
        self.loading = loading;
    }

    fn notify_error(&mut self, message: &str) {
        self.calls.push(HostCall::NotifyError(message.to_string()));
    }
}

impl ModalHost for HeadlessHost {
    fn open_modal(&mut self, request: Option<RequestId>, content: ModalContent) {
        self.calls.push(HostCall::OpenModal(request, content.clone()));
        self.modal = Some(content);
    }

    fn clear_field_errors(&mut self) {
        self.calls.push(HostCall::ClearFieldErrors);
    }

    fn bind_cancel(&mut self, request: RequestId) {
        self.calls.push(HostCall::BindCancel(request));
    }

    fn close_modal(&mut self) {
        self.calls.push(HostCall::CloseModal);
        self.modal = None;
    }
}

impl HttpClient for HeadlessHost {
    fn get(&mut self, request: RequestId, url: &str) {
        self.calls.push(HostCall::Get(request, url.to_string()));
    }

    fn post_form(&mut self, request: RequestId, url: &str, fields: &[(String, String)]) {
        self.calls
            .push(HostCall::PostForm(request, url.to_string(), fields.to_vec()));
    }
}
