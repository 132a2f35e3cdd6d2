//! # Lessonform HTML
//!
//! HTML/DOM serialization boundary for lesson nodes.
//!
//! Each node kind defines its own DOM shape carrying
//! `data-lexical-<type>[-<field>]` attributes whose values are
//! JSON-stringified payload fragments. The attribute contract is normative
//! for copy/paste and externally-authored HTML interop: presence of a
//! kind's base marker attribute is both necessary and sufficient for the
//! importer to claim a tag.
//!
//! The host editing framework owns real DOM parsing and reconciliation;
//! this crate works on a lightweight element tree ([`DomElement`]) and a
//! string renderer for persistence and clipboard payloads.

mod dom;
mod error;
mod export;
mod import;

pub use dom::{render_html, DomElement, DomNode, RenderOptions};
pub use error::DomError;
pub use export::export_dom;
pub use import::import_dom;
