//! Capabilities the editor consumes from the host page.
//!
//! The editor never touches the DOM, the network or dialogs directly. Each
//! concern is a small trait; a host implements all of them and gets [`Host`]
//! through the blanket impl. [`HeadlessHost`] records every call and is used
//! by the CLI and by tests.
//!
//! Asynchronous capabilities (HTTP, modal events) are fire-and-forget: the
//! host reports completion later by calling back into the editor with the
//! request id it was handed.

pub mod headless;

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{BlockTypeConfig, Scope};

pub use headless::{CommittedTile, HeadlessHost, HostCall};

/// Identifier of one insertion request.
pub type RequestId = Uuid;

/// Response header carrying the address of a newly created tile.
pub const TILE_URL_HEADER: &str = "X-Tile-Url";

/// Transport-level failure reported by the host's HTTP client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Response from the host's HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body (markup).
    pub body: String,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Non-empty address of the created tile, if the server sent one.
    pub fn tile_url(&self) -> Option<&str> {
        self.header(TILE_URL_HEADER).filter(|url| !url.is_empty())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outcome of an HTTP call as delivered back to the editor.
pub type HttpResult = Result<HttpResponse, TransportError>;

/// What a modal dialog shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    /// Load the dialog body from an address.
    Remote(String),
    /// Render the given markup.
    Inline(String),
}

/// Buttons on the host's edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormButton {
    /// The form's save button.
    Save,
    /// The form's cancel button.
    Cancel,
}

/// Access to the currently selected tile.
pub trait Selection {
    /// Whether a tile is selected.
    fn has_selection(&self) -> bool;

    /// Toggles a class on the selected tile or its enclosing row.
    fn toggle_class(&mut self, scope: Scope, class: &str);

    /// Adds a class on the selected tile or its enclosing row.
    fn add_class(&mut self, scope: Scope, class: &str);

    /// Removes a class from the selected tile or its enclosing row.
    fn remove_class(&mut self, scope: Scope, class: &str);

    /// Blurs (deselects) the selected tile.
    fn blur_selected(&mut self);

    /// Switches the selected tile to raw HTML editing, unless it already is.
    fn edit_selected_as_html(&mut self);
}

/// The layout document model.
pub trait LayoutModel {
    /// Default content for a new tile of the given type.
    fn default_value(&self, config: &BlockTypeConfig) -> String;

    /// Commits a static tile.
    fn add_tile(&mut self, tile_type: &str, content: &str);

    /// Commits an app tile addressed by `url`.
    fn add_app_tile(&mut self, tile_type: &str, html: &str, url: &str);

    /// Whether the document already carries a custom content layout.
    fn has_content_layout(&self) -> bool;

    /// Serializes the layout into the edit form.
    fn save_layout_to_form(&mut self);

    /// Opens the layout chooser.
    fn select_layout(&mut self);

    /// Saves the current layout as a reusable layout.
    fn save_layout(&mut self);

    /// Sets the selected content layout; empty means "use the stored one".
    fn set_selected_content_layout(&mut self, layout: &str);

    /// Makes every tile in the layout draggable.
    fn make_tiles_movable(&mut self);
}

/// Toolbar and page chrome.
pub trait Chrome {
    /// Re-evaluates which toolbar actions are shown.
    fn refresh_actions(&mut self);

    /// Clicks a button on the host's edit form.
    fn click_form_button(&mut self, button: FormButton);

    /// Focuses and blurs the layout field so its draft gets synced.
    fn sync_layout_field(&mut self);

    /// Opens `url` in a new window after `delay`.
    fn open_window_after(&mut self, url: &str, delay: Duration);

    /// Opens the page properties overlay.
    fn open_properties(&mut self);

    /// Toggles the layout drop-down.
    fn toggle_layout_menu(&mut self);

    /// Closes the layout drop-down.
    fn close_layout_menu(&mut self);

    /// Reveals the layout-editing controls.
    fn show_layout_editing(&mut self);

    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;

    /// Shows or hides the loading indicator.
    fn set_loading(&mut self, loading: bool);

    /// Shows an error message to the user.
    fn notify_error(&mut self, message: &str);
}

/// Modal dialog.
///
/// The host reports dialog events back through the editor's `on_modal_*`
/// methods, passing the request id the dialog was opened for.
pub trait ModalHost {
    /// Opens the dialog, replacing any dialog already open.
    fn open_modal(&mut self, request: Option<RequestId>, content: ModalContent);

    /// Removes field-error markers and status messages from the dialog.
    fn clear_field_errors(&mut self);

    /// Routes clicks on the dialog's cancel control to the given request.
    fn bind_cancel(&mut self, request: RequestId);

    /// Closes and discards the dialog.
    fn close_modal(&mut self);
}

/// Non-blocking HTTP client.
///
/// Results come back through the editor's `on_form_fetched` and
/// `on_direct_submit` methods.
pub trait HttpClient {
    /// Issues a GET.
    fn get(&mut self, request: RequestId, url: &str);

    /// Issues a form-encoded POST.
    fn post_form(&mut self, request: RequestId, url: &str, fields: &[(String, String)]);
}

/// Everything the editor needs from its host.
pub trait Host: Selection + LayoutModel + Chrome + ModalHost + HttpClient {}

impl<T: Selection + LayoutModel + Chrome + ModalHost + HttpClient> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::ok("<div>ok</div>").with_header("x-tile-url", "/page/tile");
        assert_eq!(response.header("X-Tile-Url"), Some("/page/tile"));
        assert_eq!(response.tile_url(), Some("/page/tile"));
        assert_eq!(response.header("Content-Type"), None);
    }

    #[test]
    fn test_empty_tile_url_is_absent() {
        let response = HttpResponse::ok("").with_header(TILE_URL_HEADER, "");
        assert_eq!(response.tile_url(), None);
    }

    #[test]
    fn test_is_success() {
        assert!(HttpResponse::ok("").is_success());
        assert!(!HttpResponse::ok("").with_status(500).is_success());
    }
}
