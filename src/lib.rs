//! # Folio
//!
//! A multi-template paginated layout engine.
//!
//! A document is a flat, ordered stream of content blocks (headings,
//! paragraphs, lists, preformatted code) and a set of named page templates,
//! each an ordered list of frames. Folio flows the stream into frames in
//! order, overflowing from column to column and page to page, and lets the
//! stream switch the template used for the *next* page: a title page, then
//! two-column body pages, then a single-column appendix.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    : Content blocks, templates, page sizes
//!       ↓
//!   [style]    : Named styles, resolved only by the measurer
//!       ↓
//!   [layout]   : Frames, templates and the pagination state machine
//!       ↓
//!   PageSink   : One call per finished page
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod style;
pub mod text;

pub use error::FlowError;

use layout::{Document, PageSink, RenderedPage, TextMeasurer};
use model::DocumentInput;

/// A two-column paper: title page, body pages and a single-column appendix.
pub const EXAMPLE_DOCUMENT: &str = include_str!("example.json");

/// Lay out a document, handing each finished page to `sink`.
///
/// Returns the number of pages emitted.
pub fn layout_into(input: &DocumentInput, sink: &mut dyn PageSink) -> Result<usize, FlowError> {
    let mut document = Document::with_templates(input.page_templates())?;
    if let Some(name) = &input.default_template {
        document.set_default_template(name.clone())?;
    }
    let measurer = TextMeasurer::new(input.style_sheet());
    document.build(input.blocks.iter().cloned(), &measurer, sink)
}

/// Lay out a document and collect its pages.
pub fn layout(input: &DocumentInput) -> Result<Vec<RenderedPage>, FlowError> {
    let mut pages = Vec::new();
    layout_into(input, &mut pages)?;
    Ok(pages)
}

/// Lay out a document described as JSON.
pub fn layout_json(json: &str) -> Result<Vec<RenderedPage>, FlowError> {
    let input: DocumentInput = serde_json::from_str(json)?;
    layout(&input)
}
