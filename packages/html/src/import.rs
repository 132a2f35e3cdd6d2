//! DOM subtree → node import
//!
//! Attribute-driven pattern matching: a tag is claimed by a node kind only
//! when it carries that kind's marker attribute (or, for files, a natural
//! media tag with a source). Conversion parses the JSON-stringified
//! attributes back into subtrees and constructs the node through the same
//! registry dispatch used by JSON import, so both paths share one
//! constructor.
//!
//! Malformed JSON in an attribute is logged and yields "no match" (`None`),
//! so one corrupt node never aborts import of the surrounding document.

use crate::dom::DomElement;
use crate::export::{
    IMAGE_FILE_ID, MATCH_CONCEPTS_ITEMS, MATCH_CONCEPTS_TITLE, PAGE_BREAK_MARKER,
    TAP_TO_REVEAL_BACK, TAP_TO_REVEAL_FRONT, TRUE_OR_FALSE_CORRECT, TRUE_OR_FALSE_EXPLANATION,
    TRUE_OR_FALSE_HINT, TRUE_OR_FALSE_QUESTION,
};
use lessonform_nodes::{DocumentIntegrity, LessonNode, NodeRegistry};
use serde_json::{json, Map, Value};
use tracing::warn;

/// Try to claim a DOM element as a lesson node.
///
/// Returns `None` when no kind claims the tag, or when a claimed tag's
/// payload attributes are corrupt. A fresh `uuid` is assigned; the DOM
/// carries payload fidelity, not engine identity.
pub fn import_dom(registry: &NodeRegistry, el: &DomElement) -> Option<LessonNode> {
    let value = claim(el)?;

    let mut integrity = DocumentIntegrity::default();
    match registry.import_json(&value, &mut integrity) {
        Ok(node) => Some(node),
        Err(err) => {
            warn!(error = %err, tag = %el.tag, "claimed tag failed reconstruction");
            None
        }
    }
}

/// Map a DOM element to the persisted JSON shape of the kind that claims it
fn claim(el: &DomElement) -> Option<Value> {
    if el.has_attr(TRUE_OR_FALSE_QUESTION) {
        return claim_true_or_false(el);
    }
    if el.has_attr(TAP_TO_REVEAL_FRONT) {
        return claim_tap_to_reveal(el);
    }
    if el.has_attr(MATCH_CONCEPTS_TITLE) {
        return claim_match_concepts(el);
    }
    if el.has_attr(PAGE_BREAK_MARKER) {
        return Some(json!({ "type": "page-break", "version": 1 }));
    }
    if el.has_attr(IMAGE_FILE_ID) {
        return claim_image(el);
    }
    claim_file(el)
}

fn claim_true_or_false(el: &DomElement) -> Option<Value> {
    let question = parse_json_attr(el, TRUE_OR_FALSE_QUESTION)?;
    let correct = el.attr(TRUE_OR_FALSE_CORRECT) == Some("true");

    let mut obj = Map::new();
    obj.insert("type".into(), json!("true-or-false"));
    obj.insert("questionState".into(), question);
    obj.insert("correctAnswer".into(), json!(correct));
    // The marker alone claims the tag; a present-but-corrupt side attribute
    // still voids the match
    if el.has_attr(TRUE_OR_FALSE_EXPLANATION) {
        obj.insert(
            "explanationState".into(),
            parse_json_attr(el, TRUE_OR_FALSE_EXPLANATION)?,
        );
    }
    if let Some(hint) = el.attr(TRUE_OR_FALSE_HINT) {
        obj.insert("hint".into(), json!(hint));
    }
    Some(Value::Object(obj))
}

fn claim_tap_to_reveal(el: &DomElement) -> Option<Value> {
    let front = parse_json_attr(el, TAP_TO_REVEAL_FRONT)?;
    let back = match el.attr(TAP_TO_REVEAL_BACK) {
        Some(_) => parse_json_attr(el, TAP_TO_REVEAL_BACK)?,
        None => serde_json::to_value(lessonform_nodes::RichTextState::empty_root()).ok()?,
    };
    Some(json!({
        "type": "tap-to-reveal",
        "frontSideState": front,
        "backSideState": back,
    }))
}

fn claim_match_concepts(el: &DomElement) -> Option<Value> {
    let title = parse_json_attr(el, MATCH_CONCEPTS_TITLE)?;
    // Items tolerate per-item damage downstream; the attribute itself must
    // still be valid JSON to claim the tag
    let items = match el.attr(MATCH_CONCEPTS_ITEMS) {
        Some(_) => parse_json_attr(el, MATCH_CONCEPTS_ITEMS)?,
        None => json!([]),
    };
    Some(json!({
        "type": "match-concepts",
        "title": title,
        "items": items,
    }))
}

fn claim_image(el: &DomElement) -> Option<Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), json!("image"));
    obj.insert("fileId".into(), json!(el.attr(IMAGE_FILE_ID)?));
    if let Some(alt) = el.attr("data-alt-text") {
        obj.insert("altText".into(), json!(alt));
    }
    for (attr, field) in [
        ("data-width", "width"),
        ("data-height", "height"),
        ("data-max-width", "maxWidth"),
    ] {
        if let Some(parsed) = numeric_attr(el, attr) {
            obj.insert(field.into(), json!(parsed));
        }
    }
    for (attr, field) in [
        ("data-blur-hash", "blurHash"),
        ("data-object-fit", "objectFit"),
        ("data-aspect-ratio", "aspectRatio"),
    ] {
        if let Some(value) = el.attr(attr) {
            obj.insert(field.into(), json!(value));
        }
    }
    Some(Value::Object(obj))
}

/// Natural media tags become file embeds
fn claim_file(el: &DomElement) -> Option<Value> {
    let (src, file_type, file_name) = match el.tag.as_str() {
        "img" => (el.attr("src")?, Some("image"), None),
        "audio" => (el.attr("src")?, Some("audio"), None),
        "video" => (el.attr("src")?, Some("video"), None),
        // Only download links are file embeds; plain anchors stay prose
        "a" => (el.attr("href")?, None, el.attr("download")),
        _ => return None,
    };

    let mut metadata = Map::new();
    if let Some(file_type) = file_type {
        metadata.insert("fileType".into(), json!(file_type));
    }
    if let Some(file_name) = file_name {
        metadata.insert("fileName".into(), json!(file_name));
    }
    for (attr, field) in [("width", "width"), ("height", "height")] {
        if let Some(parsed) = numeric_attr(el, attr) {
            metadata.insert(field.into(), json!(parsed));
        }
    }

    let mut obj = Map::new();
    obj.insert("type".into(), json!("file"));
    obj.insert("src".into(), json!(src));
    if let Some(alt) = el.attr("alt") {
        obj.insert("altText".into(), json!(alt));
    }
    obj.insert("metadata".into(), Value::Object(metadata));
    Some(Value::Object(obj))
}

fn parse_json_attr(el: &DomElement, name: &str) -> Option<Value> {
    let raw = el.attr(name)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(attribute = name, error = %err, "malformed JSON attribute; no match");
            None
        }
    }
}

fn numeric_attr(el: &DomElement, name: &str) -> Option<u32> {
    el.attr(name).and_then(|raw| raw.parse().ok())
}
