//! Node → DOM subtree export
//!
//! Attribute names are normative for interop; see the crate docs.

use crate::dom::DomElement;
use crate::error::DomError;
use lessonform_nodes::{FileKind, FilePayload, ImagePayload, LessonNode};

pub(crate) const TRUE_OR_FALSE_QUESTION: &str = "data-lexical-true-or-false-question";
pub(crate) const TRUE_OR_FALSE_CORRECT: &str = "data-lexical-true-or-false-correct-answer";
pub(crate) const TRUE_OR_FALSE_HINT: &str = "data-lexical-true-or-false-hint";
pub(crate) const TRUE_OR_FALSE_EXPLANATION: &str = "data-lexical-true-or-false-explanation";

pub(crate) const TAP_TO_REVEAL_FRONT: &str = "data-lexical-tap-to-reveal-front";
pub(crate) const TAP_TO_REVEAL_BACK: &str = "data-lexical-tap-to-reveal-back";

pub(crate) const MATCH_CONCEPTS_TITLE: &str = "data-lexical-match-concepts-title";
pub(crate) const MATCH_CONCEPTS_ITEMS: &str = "data-lexical-match-concepts-items";

pub(crate) const PAGE_BREAK_MARKER: &str = "data-lexical-page-break";

pub(crate) const IMAGE_FILE_ID: &str = "data-file-id";

/// Export a node to its DOM shape
pub fn export_dom(node: &LessonNode) -> Result<DomElement, DomError> {
    match node {
        LessonNode::TrueOrFalse { payload, .. } => {
            let mut el = DomElement::new("div")
                .with_attr(TRUE_OR_FALSE_QUESTION, serde_json::to_string(&payload.question_state)?)
                .with_attr(TRUE_OR_FALSE_CORRECT, payload.correct_answer.to_string());
            if let Some(hint) = &payload.hint {
                el.set_attr(TRUE_OR_FALSE_HINT, hint.clone());
            }
            el.set_attr(
                TRUE_OR_FALSE_EXPLANATION,
                serde_json::to_string(&payload.explanation_state)?,
            );
            Ok(el)
        }

        LessonNode::TapToReveal { payload, .. } => Ok(DomElement::new("div")
            .with_attr(TAP_TO_REVEAL_FRONT, serde_json::to_string(&payload.front_side_state)?)
            .with_attr(TAP_TO_REVEAL_BACK, serde_json::to_string(&payload.back_side_state)?)),

        LessonNode::MatchConcepts { payload, .. } => Ok(DomElement::new("div")
            .with_attr(MATCH_CONCEPTS_TITLE, serde_json::to_string(&payload.title)?)
            .with_attr(MATCH_CONCEPTS_ITEMS, serde_json::to_string(&payload.items)?)),

        LessonNode::File { payload, .. } => Ok(export_file(payload)),

        LessonNode::Image { payload, .. } => Ok(export_image(payload)),

        LessonNode::PageBreak { .. } => {
            Ok(DomElement::new("div").with_attr(PAGE_BREAK_MARKER, "true"))
        }

        // Host prose: natural block tag with plain text
        LessonNode::RichText { state, .. } => {
            let tag = match state.kind.as_str() {
                "paragraph" | "root" => "p",
                "heading" => "h2",
                "quote" => "blockquote",
                _ => "div",
            };
            Ok(DomElement::new(tag).with_text(state.plain_text()))
        }
    }
}

/// Files keep natural HTML so pasted content is meaningful outside the
/// editor: `<img>`, `<audio>`, `<video>`, or a download link fallback
fn export_file(payload: &FilePayload) -> DomElement {
    let meta = &payload.metadata;
    match meta.file_type {
        FileKind::Image => {
            let mut el = DomElement::new("img")
                .with_attr("src", payload.src.clone())
                .with_attr("alt", payload.alt_text.clone());
            if let Some(width) = meta.width {
                el.set_attr("width", width.to_string());
            }
            if let Some(height) = meta.height {
                el.set_attr("height", height.to_string());
            }
            el
        }
        FileKind::Audio => DomElement::new("audio")
            .with_attr("controls", "controls")
            .with_attr("src", payload.src.clone()),
        FileKind::Video => {
            let mut el = DomElement::new("video")
                .with_attr("controls", "controls")
                .with_attr("src", payload.src.clone());
            if let Some(width) = meta.width {
                el.set_attr("width", width.to_string());
            }
            if let Some(height) = meta.height {
                el.set_attr("height", height.to_string());
            }
            el
        }
        FileKind::Model3d | FileKind::Document | FileKind::Other => DomElement::new("a")
            .with_attr("href", payload.src.clone())
            .with_attr("download", meta.file_name.clone())
            .with_text(meta.file_name.clone()),
    }
}

/// Course-asset images never embed bytes; the wrapper carries the lookup
/// reference and layout hints as data attributes
fn export_image(payload: &ImagePayload) -> DomElement {
    let mut el = DomElement::new("div").with_attr(IMAGE_FILE_ID, payload.file_id.clone());
    if !payload.alt_text.is_empty() {
        el.set_attr("data-alt-text", payload.alt_text.clone());
    }
    if let Some(width) = payload.width {
        el.set_attr("data-width", width.to_string());
    }
    if let Some(height) = payload.height {
        el.set_attr("data-height", height.to_string());
    }
    if let Some(max_width) = payload.max_width {
        el.set_attr("data-max-width", max_width.to_string());
    }
    if let Some(blur_hash) = &payload.blur_hash {
        el.set_attr("data-blur-hash", blur_hash.clone());
    }
    if let Some(object_fit) = &payload.object_fit {
        el.set_attr("data-object-fit", object_fit.clone());
    }
    if let Some(aspect_ratio) = &payload.aspect_ratio {
        el.set_attr("data-aspect-ratio", aspect_ratio.clone());
    }
    el
}
