//! End-to-end tests for the tile insertion workflow.

mod fixtures;
use fixtures::*;

use mosaic_actions::actions::builtins::names;
use mosaic_actions::host::{
    HostCall, HttpResponse, ModalContent, Selection, TransportError, TILE_URL_HEADER,
};
use mosaic_actions::{ActionError, InsertionState, MenuSelection, RequestId};

const IMAGE: &str = "plone.app.standardtiles.image";
const NAVIGATION: &str = "plone.app.standardtiles.navigation";

fn pick(editor: &mut mosaic_actions::Editor<mosaic_actions::HeadlessHost>, tile: &str) -> Option<bool> {
    let mut menu = MenuSelection::new(tile);
    let result = editor.exec_action(names::INSERT, Some(&mut menu));
    assert!(menu.is_none(), "menu should be reset after picking {}", tile);
    result
}

fn only_pending(editor: &mosaic_actions::Editor<mosaic_actions::HeadlessHost>) -> RequestId {
    let pending: Vec<RequestId> = editor.pending_insertions().map(|request| request.id()).collect();
    assert_eq!(pending.len(), 1);
    pending[0]
}

#[test]
fn test_none_selection_is_a_noop() {
    let mut editor = sample_editor();
    let mut menu = MenuSelection::none();

    assert_eq!(editor.exec_action(names::INSERT, Some(&mut menu)), Some(false));
    assert!(editor.host().calls().is_empty());
}

#[test]
fn test_static_insert() {
    let mut editor = sample_editor();
    assert_eq!(pick(&mut editor, "text"), Some(true));

    let host = editor.host();
    assert_eq!(host.committed().len(), 1);
    assert_eq!(host.committed()[0].content, "<p>x</p>");
    assert!(host.http_requests().is_empty());
    assert!(!host.has_selection());
}

#[test]
fn test_templated_insert_commits_without_network() {
    let mut editor = sample_editor();
    assert_eq!(pick(&mut editor, "plone.app.standardtiles.rawhtml"), Some(true));

    let host = editor.host();
    assert!(host.http_requests().is_empty());
    let tile = &host.committed()[0];
    assert_eq!(tile.content, "<html><body><p>raw</p></body></html>");
    let url = tile.url.as_deref().expect("templated tiles are addressed");
    let uid = url
        .strip_prefix("http://localhost/plone/page/@@plone.app.standardtiles.rawhtml/")
        .expect("address is built from the context url and type");
    assert_eq!(uid.len(), 36);
    assert_eq!(uid.matches('-').count(), 4);
}

#[test]
fn test_two_templated_inserts_get_distinct_addresses() {
    let mut editor = sample_editor();
    pick(&mut editor, "plone.app.standardtiles.rawhtml");
    pick(&mut editor, "plone.app.standardtiles.rawhtml");

    let committed = editor.host().committed();
    assert_eq!(committed.len(), 2);
    assert_ne!(committed[0].url, committed[1].url);
}

#[test]
fn test_unresolved_type_creates_nothing() {
    let mut editor = sample_editor();
    assert_eq!(pick(&mut editor, "plone.app.unknown"), Some(false));
    assert!(editor.host().committed().is_empty());
    assert!(editor.host().http_requests().is_empty());
    assert_eq!(editor.pending_insertions().count(), 0);
}

#[test]
fn test_form_insert_with_empty_required_uses_modal() {
    let mut editor = sample_editor();
    assert_eq!(pick(&mut editor, IMAGE), Some(true));
    let id = only_pending(&editor);

    let state = editor
        .on_form_fetched(id, Ok(HttpResponse::ok(FORM_WITH_EMPTY_REQUIRED)))
        .expect("fetch accepted");
    assert_eq!(state, InsertionState::AwaitingModalSubmit);
    assert_eq!(
        editor.host().modal(),
        Some(&ModalContent::Inline(FORM_WITH_EMPTY_REQUIRED.to_string()))
    );
    assert_eq!(editor.host().count(|call| matches!(call, HostCall::PostForm(..))), 0);

    // First render clears stale errors, a re-render after a failed submit does not
    editor.on_modal_rendered(id).expect("first render");
    editor
        .on_modal_submitted(id, HttpResponse::ok("<form>still invalid</form>"))
        .expect("answer without address");
    editor.on_modal_rendered(id).expect("second render");
    assert_eq!(editor.host().count(|call| *call == HostCall::ClearFieldErrors), 1);

    let answer = HttpResponse::ok("<div>ok</div>").with_header(TILE_URL_HEADER, "/page/my-block");
    assert_eq!(
        editor.on_modal_submitted(id, answer).expect("success"),
        InsertionState::Committed
    );

    let committed = editor.host().committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].tile_type, IMAGE);
    assert_eq!(committed[0].content, "<div>ok</div>");
    assert_eq!(committed[0].url.as_deref(), Some("/page/my-block"));
    assert_eq!(editor.host().modal(), None);
    assert_eq!(editor.modal_owner(), None);
}

#[test]
fn test_form_insert_auto_submits_complete_form() {
    let mut editor = sample_editor();
    pick(&mut editor, NAVIGATION);
    let id = only_pending(&editor);

    editor
        .on_form_fetched(id, Ok(HttpResponse::ok(FORM_COMPLETE)))
        .expect("fetch accepted");

    let (url, fields) = editor
        .host()
        .calls()
        .iter()
        .find_map(|call| match call {
            HostCall::PostForm(request, url, fields) if *request == id => {
                Some((url.clone(), fields.clone()))
            }
            _ => None,
        })
        .expect("form was posted");

    assert_eq!(
        url,
        "http://localhost/plone/page/@@add-tile/plone.app.standardtiles.navigation"
    );
    let field = |name: &str| {
        fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    assert_eq!(field("title"), Some("Navigation"));
    assert_eq!(field("depth"), Some("3"));
    assert_eq!(field("show_root"), Some("on"));
    assert_eq!(field("buttons.save"), Some("Save"));
    assert_eq!(field("_authenticator"), Some("abc123"));

    let answer = HttpResponse::ok("<nav/>").with_header("x-tile-url", "/page/nav-1");
    editor.on_direct_submit(id, Ok(answer)).expect("answer accepted");
    assert_eq!(editor.host().committed().len(), 1);
    assert_eq!(editor.host().committed()[0].url.as_deref(), Some("/page/nav-1"));
    assert_eq!(editor.host().count(|call| matches!(call, HostCall::OpenModal(..))), 0);
}

#[test]
fn test_loading_indicator_hidden_on_every_path() {
    let mut editor = sample_editor();
    pick(&mut editor, IMAGE);
    let ok = only_pending(&editor);
    assert!(editor.host().is_loading());
    let _ = editor.on_form_fetched(ok, Ok(HttpResponse::ok(FORM_WITH_EMPTY_REQUIRED)));
    assert!(!editor.host().is_loading());

    let mut editor = sample_editor();
    pick(&mut editor, IMAGE);
    let failed = only_pending(&editor);
    let _ = editor.on_form_fetched(failed, Err(TransportError("timeout".to_string())));
    assert!(!editor.host().is_loading());
}

#[test]
fn test_fetch_failure_surfaces_message() {
    let mut editor = sample_editor();
    pick(&mut editor, IMAGE);
    let id = only_pending(&editor);

    let err = editor
        .on_form_fetched(id, Ok(HttpResponse::ok("").with_status(503)))
        .expect_err("503 fails the request");
    assert!(matches!(err, ActionError::Network { .. }));
    assert_eq!(
        editor.host().errors(),
        vec!["Could not add the tile: server answered with status 503"]
    );
    assert_eq!(editor.pending_insertions().count(), 0);
}

#[test]
fn test_late_response_after_cancel_is_ignored() {
    let mut editor = sample_editor();
    pick(&mut editor, IMAGE);
    let id = only_pending(&editor);
    let _ = editor.on_form_fetched(id, Ok(HttpResponse::ok(FORM_WITH_EMPTY_REQUIRED)));
    let _ = editor.on_modal_rendered(id);

    assert_eq!(editor.on_modal_cancelled(id).ok(), Some(InsertionState::Aborted));
    assert_eq!(editor.host().modal(), None);

    let late = HttpResponse::ok("<div>late</div>").with_header(TILE_URL_HEADER, "/page/late");
    assert!(matches!(
        editor.on_modal_submitted(id, late.clone()),
        Err(ActionError::StaleRequest(_))
    ));
    assert!(matches!(
        editor.on_direct_submit(id, Ok(late)),
        Err(ActionError::StaleRequest(_))
    ));
    assert!(editor.host().committed().is_empty());
}

#[test]
fn test_add_tile_dialog_takes_modal_from_pending_insert() {
    let mut editor = sample_editor();
    pick(&mut editor, IMAGE);
    let id = only_pending(&editor);
    let _ = editor.on_form_fetched(id, Ok(HttpResponse::ok(FORM_WITH_EMPTY_REQUIRED)));
    assert_eq!(editor.modal_owner(), Some(id));

    editor.exec_action(names::ADD_TILE, None);
    assert_eq!(editor.modal_owner(), None);
    assert_eq!(editor.pending_insertions().count(), 0);

    let late = HttpResponse::ok("<div>late</div>").with_header(TILE_URL_HEADER, "/page/late");
    assert!(matches!(
        editor.on_modal_submitted(id, late),
        Err(ActionError::StaleRequest(_))
    ));
    assert!(editor.host().committed().is_empty());
    assert_eq!(
        editor.host().modal(),
        Some(&ModalContent::Remote(
            "http://localhost/plone/page/@@add-tile?form.button.Create=Create".to_string()
        ))
    );
}

#[test]
fn test_direct_and_modal_paths_are_exclusive() {
    let mut editor = sample_editor();
    pick(&mut editor, NAVIGATION);
    let id = only_pending(&editor);
    let _ = editor.on_form_fetched(id, Ok(HttpResponse::ok(FORM_COMPLETE)));

    // Modal events are rejected while the direct submit is in flight
    let answer = HttpResponse::ok("<div/>").with_header(TILE_URL_HEADER, "/page/x");
    assert!(editor.on_modal_submitted(id, answer.clone()).is_err());

    editor.on_direct_submit(id, Ok(answer.clone())).expect("commit");
    assert!(editor.on_direct_submit(id, Ok(answer)).is_err());
    assert_eq!(editor.host().committed().len(), 1);
}

#[test]
fn test_insert_blurs_selection_first() {
    let mut editor = sample_editor();
    pick(&mut editor, "text");

    let calls = editor.host().calls();
    assert_eq!(calls[0], HostCall::BlurSelected);
    assert_eq!(calls[1], HostCall::RefreshActions);
}
