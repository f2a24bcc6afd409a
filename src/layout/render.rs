//! # Render Boundary
//!
//! Finished pages leave the engine as [`RenderedPage`] values handed to a
//! [`PageSink`], one call per page, in page order. Turning them into a
//! persisted document is the sink's business.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::model::ContentBlock;
use crate::style::{StyleRef, TextAlign};

use super::template::PageContext;

/// An abstract drawing instruction produced by page decoration.
///
/// Coordinates are in points from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DrawDirective {
    /// A single line of text anchored at `(x, y)` according to `align`.
    /// `{page}` and `{template}` in static decorations are replaced per page.
    Text {
        x: f64,
        y: f64,
        text: String,
        #[serde(default)]
        style: StyleRef,
        #[serde(default)]
        align: TextAlign,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default = "default_line_width")]
        line_width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

fn default_line_width() -> f64 {
    1.0
}

impl DrawDirective {
    /// Substitute page placeholders in text directives.
    pub fn for_page(&self, ctx: &PageContext) -> DrawDirective {
        match self {
            DrawDirective::Text {
                x,
                y,
                text,
                style,
                align,
            } => DrawDirective::Text {
                x: *x,
                y: *y,
                text: text
                    .replace("{page}", &ctx.page_number.to_string())
                    .replace("{template}", &ctx.template),
                style: style.clone(),
                align: *align,
            },
            other => other.clone(),
        }
    }

    /// The same directive shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> DrawDirective {
        match self.clone() {
            DrawDirective::Text {
                x,
                y,
                text,
                style,
                align,
            } => DrawDirective::Text {
                x: x + dx,
                y: y + dy,
                text,
                style,
                align,
            },
            DrawDirective::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
            } => DrawDirective::Line {
                x1: x1 + dx,
                y1: y1 + dy,
                x2: x2 + dx,
                y2: y2 + dy,
                line_width,
            },
            DrawDirective::Rect {
                x,
                y,
                width,
                height,
            } => DrawDirective::Rect {
                x: x + dx,
                y: y + dy,
                width,
                height,
            },
        }
    }
}

/// A block (or a fragment of one) positioned inside a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    /// Index of the originating block in the input stream.
    pub source: usize,
    pub block: ContentBlock,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// True when this is a continuation of a block split in an earlier frame.
    pub continued: bool,
    /// List item markers, in page coordinates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<DrawDirective>,
}

/// The content placed in one frame of a finished page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContent {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub blocks: Vec<PlacedBlock>,
}

/// A finished page, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    pub template: String,
    pub width: f64,
    pub height: f64,
    pub decorations: Vec<DrawDirective>,
    /// Frames in template order, including empty ones.
    pub frames: Vec<FrameContent>,
}

impl RenderedPage {
    /// All placed blocks in reading order (frame by frame).
    pub fn blocks(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.frames.iter().flat_map(|f| f.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.frames.iter().map(|f| f.blocks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.block_count() == 0
    }

    pub fn frame(&self, id: &str) -> Option<&FrameContent> {
        self.frames.iter().find(|f| f.id == id)
    }
}

/// Receives each finished page exactly once, in order.
pub trait PageSink {
    fn emit(&mut self, page: RenderedPage) -> Result<(), FlowError>;
}

impl PageSink for Vec<RenderedPage> {
    fn emit(&mut self, page: RenderedPage) -> Result<(), FlowError> {
        self.push(page);
        Ok(())
    }
}

/// Streams pages as newline-delimited JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    pages: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer, pages: 0 }
    }

    pub fn pages_written(&self) -> usize {
        self.pages
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PageSink for JsonLinesSink<W> {
    fn emit(&mut self, page: RenderedPage) -> Result<(), FlowError> {
        serde_json::to_writer(&mut self.writer, &page)
            .map_err(|e| FlowError::Sink(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.pages += 1;
        Ok(())
    }
}
