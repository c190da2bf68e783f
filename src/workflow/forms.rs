//! Add-form markup inspection.
//!
//! The server answers an add-form request with an HTML page. Before deciding
//! between auto-submitting and showing the form to the user, the workflow
//! needs three things from that markup: the form's action address, the
//! anti-forgery token, and whether any required field is still empty.
//!
//! Fields follow the host's widget convention: a container whose class list
//! includes `field`, a `required` marker somewhere inside it, and the field's
//! value held by the last non-hidden input, select or textarea in the
//! container.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Id of the add form in the server's markup.
pub const ADD_FORM_ID: &str = "add_tile";

/// Name of the anti-forgery token field.
pub const AUTHENTICATOR_FIELD: &str = "_authenticator";

/// Button field sent when auto-submitting.
pub const SAVE_BUTTON_FIELD: (&str, &str) = ("buttons.save", "Save");

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9:-]*)([^>]*)>").expect("static pattern")
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([^\s=/"'>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("static pattern")
    })
}

/// A successful control found in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    /// Control name.
    pub name: String,
    /// Current value; `None` when a select has no options.
    pub value: Option<String>,
    /// Input type (`text`, `hidden`, ...), or the tag name for selects and textareas.
    pub kind: String,
}

impl FormControl {
    fn is_hidden(&self) -> bool {
        self.kind == "hidden"
    }

    fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// What the workflow needs to know about an add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    /// Submission address of the add form.
    pub action_url: Option<String>,
    /// Anti-forgery token.
    pub authenticator: Option<String>,
    /// Controls that would be submitted, in document order.
    pub controls: Vec<FormControl>,
    /// Names of required fields that are empty.
    pub empty_required: Vec<String>,
}

impl AddForm {
    /// Inspects add-form markup.
    pub fn parse(markup: &str) -> Self {
        let lower = markup.to_ascii_lowercase();
        let tags = scan_tags(markup);

        let authenticator = tags
            .iter()
            .find(|tag| tag.attr("name") == Some(AUTHENTICATOR_FIELD))
            .and_then(|tag| tag.attr("value"))
            .map(str::to_string);

        let add_form = tags
            .iter()
            .find(|tag| tag.opens("form") && tag.attr("id") == Some(ADD_FORM_ID));
        let form = add_form.or_else(|| tags.iter().find(|tag| tag.opens("form")));

        let Some(form) = form else {
            return Self {
                authenticator,
                ..Self::default()
            };
        };

        let action_url = add_form
            .and_then(|tag| tag.attr("action"))
            .filter(|action| !action.is_empty())
            .map(str::to_string);

        let region_end = lower[form.end..]
            .find("</form")
            .map_or(markup.len(), |offset| form.end + offset);

        let mut controls = Vec::new();
        // Field containers still open, innermost last
        let mut open: Vec<FieldBlock> = Vec::new();
        let mut blocks: Vec<FieldBlock> = Vec::new();
        let mut skip_until = 0;

        for tag in tags
            .iter()
            .filter(|tag| tag.start >= form.end && tag.start < region_end)
        {
            if tag.start < skip_until {
                continue;
            }

            if tag.closing {
                close_element(&mut open, &mut blocks, &tag.name);
                continue;
            }

            if !tag.is_empty_element() {
                for block in open.iter_mut().filter(|block| block.element == tag.name) {
                    block.depth += 1;
                }
                if tag.has_class("field") {
                    open.push(FieldBlock::new(&tag.name));
                }
            }

            if tag.has_class("required") || tag.attrs.contains_key("required") {
                if let Some(block) = open.last_mut() {
                    block.required = true;
                }
            }

            let control = match tag.name.as_str() {
                "input" => Some(input_control(tag)),
                "textarea" | "select" => {
                    let close = format!("</{}", tag.name);
                    let inner_end = lower[tag.end..]
                        .find(&close)
                        .map_or(region_end, |offset| tag.end + offset)
                        .max(tag.end);
                    skip_until = inner_end;
                    let inner = &markup[tag.end..inner_end];
                    Some(if tag.name == "textarea" {
                        FormControl {
                            name: tag.attr("name").unwrap_or_default().to_string(),
                            value: Some(decode_entities(inner)),
                            kind: "textarea".to_string(),
                        }
                    } else {
                        FormControl {
                            name: tag.attr("name").unwrap_or_default().to_string(),
                            value: selected_option(inner),
                            kind: "select".to_string(),
                        }
                    })
                }
                _ => None,
            };

            let Some(control) = control else {
                continue;
            };

            if !control.is_hidden() {
                if let Some(block) = open.last_mut() {
                    block.last_visible = Some(control.clone());
                }
            }

            if is_successful(tag, &control) {
                controls.push(control);
            }
        }

        // Blocks left open run to the end of the form
        blocks.extend(open);

        let empty_required = blocks
            .into_iter()
            .filter(|block| block.required)
            .filter_map(|block| block.last_visible)
            .filter(FormControl::is_empty)
            .map(|control| control.name)
            .collect();

        Self {
            action_url,
            authenticator,
            controls,
            empty_required,
        }
    }

    /// Whether a required field still needs user input.
    pub fn has_empty_required(&self) -> bool {
        !self.empty_required.is_empty()
    }

    /// Fields for auto-submission: the form's own controls plus the save
    /// button and the anti-forgery token.
    pub fn submission_fields(&self) -> Vec<(String, String)> {
        let (button, label) = SAVE_BUTTON_FIELD;
        let mut fields: Vec<(String, String)> = self
            .controls
            .iter()
            .filter(|control| control.name != button && control.name != AUTHENTICATOR_FIELD)
            .map(|control| {
                (
                    control.name.clone(),
                    control.value.clone().unwrap_or_default(),
                )
            })
            .collect();

        fields.push((button.to_string(), label.to_string()));
        fields.push((
            AUTHENTICATOR_FIELD.to_string(),
            self.authenticator.clone().unwrap_or_default(),
        ));
        fields
    }
}

/// A `field` container and what was seen inside it.
#[derive(Debug)]
struct FieldBlock {
    element: String,
    /// Open elements named `element`, the container included
    depth: usize,
    required: bool,
    last_visible: Option<FormControl>,
}

impl FieldBlock {
    fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            depth: 1,
            required: false,
            last_visible: None,
        }
    }
}

/// Applies an end tag, moving every container it closes to `closed`.
fn close_element(open: &mut Vec<FieldBlock>, closed: &mut Vec<FieldBlock>, name: &str) {
    for block in open.iter_mut().filter(|block| block.element == name) {
        block.depth = block.depth.saturating_sub(1);
    }
    while let Some(index) = open.iter().position(|block| block.depth == 0) {
        closed.push(open.remove(index));
    }
}

#[derive(Debug)]
struct Tag {
    name: String,
    attrs: HashMap<String, String>,
    closing: bool,
    self_closing: bool,
    start: usize,
    end: usize,
}

impl Tag {
    fn opens(&self, name: &str) -> bool {
        !self.closing && self.name == name
    }

    /// Whether the tag has no matching end tag.
    fn is_empty_element(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

fn scan_tags(markup: &str) -> Vec<Tag> {
    tag_regex()
        .captures_iter(markup)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let name = caps.get(2)?.as_str().to_ascii_lowercase();
            let raw = caps.get(3).map_or("", |m| m.as_str());
            Some(Tag {
                name,
                attrs: if closing { HashMap::new() } else { parse_attrs(raw) },
                closing,
                self_closing: raw.trim_end().ends_with('/'),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn parse_attrs(raw: &str) -> HashMap<String, String> {
    attr_regex()
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or_else(String::new, |m| decode_entities(m.as_str()));
            Some((name, value))
        })
        .collect()
}

fn input_control(tag: &Tag) -> FormControl {
    let kind = tag.attr("type").unwrap_or("text").to_ascii_lowercase();
    // Checkboxes and radios without a value submit "on"
    let fallback = if kind == "checkbox" || kind == "radio" { "on" } else { "" };
    FormControl {
        name: tag.attr("name").unwrap_or_default().to_string(),
        value: Some(tag.attr("value").unwrap_or(fallback).to_string()),
        kind,
    }
}

/// Value of the selected option, or of the first option if none is marked.
fn selected_option(inner: &str) -> Option<String> {
    let options: Vec<Tag> = scan_tags(inner)
        .into_iter()
        .filter(|tag| tag.opens("option"))
        .collect();

    let option = options
        .iter()
        .find(|tag| tag.attrs.contains_key("selected"))
        .or_else(|| options.first())?;

    if let Some(value) = option.attr("value") {
        return Some(value.to_string());
    }

    // No value attribute: the option's text is its value
    let rest = &inner[option.end..];
    let text_end = rest.find('<').unwrap_or(rest.len());
    Some(decode_entities(rest[..text_end].trim()))
}

/// Whether a control takes part in a form submission.
fn is_successful(tag: &Tag, control: &FormControl) -> bool {
    if control.name.is_empty() || tag.attrs.contains_key("disabled") {
        return false;
    }
    match control.kind.as_str() {
        "submit" | "button" | "image" | "reset" | "file" => false,
        "checkbox" | "radio" => tag.attrs.contains_key("checked"),
        _ => true,
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
