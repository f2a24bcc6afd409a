//! # Measurement
//!
//! The engine never measures content itself. It asks a [`Measure`]
//! implementation how tall a block is at a given width and, for splittable
//! blocks, how to cut it to fit a given height. Implementations must be pure:
//! the same question always gets the same answer.
//!
//! [`TextMeasurer`] is the reference implementation, built on the standard
//! font metrics and UAX#14 line breaking.

use crate::error::FlowError;
use crate::font::FontContext;
use crate::model::ContentBlock;
use crate::style::{BlockStyle, StyleSheet, TextAlign};
use crate::text::{LineSpan, TextLayout};

use super::page_break::{decide_break, BreakDecision};
use super::render::DrawDirective;

/// A splittable block cut in two.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitBlock {
    /// The part that fits.
    pub head: ContentBlock,
    /// Everything else, to continue in the next frame.
    pub tail: ContentBlock,
    pub head_height: f64,
}

/// Measures content blocks against frame geometry.
pub trait Measure {
    /// Vertical extent of `block` laid out at `available_width`.
    fn height(&self, block: &ContentBlock, available_width: f64) -> Result<f64, FlowError>;

    /// Cut a splittable block so that the head fits in `available_height`.
    ///
    /// Returns `None` when the block is atomic or when nothing fits.
    fn split(
        &self,
        block: &ContentBlock,
        available_width: f64,
        available_height: f64,
    ) -> Result<Option<SplitBlock>, FlowError>;

    /// Item markers of a list block, positioned relative to the block's
    /// top-left corner. Blocks without markers return nothing.
    fn markers(
        &self,
        _block: &ContentBlock,
        _available_width: f64,
    ) -> Result<Vec<DrawDirective>, FlowError> {
        Ok(Vec::new())
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn height(&self, block: &ContentBlock, available_width: f64) -> Result<f64, FlowError> {
        (**self).height(block, available_width)
    }

    fn split(
        &self,
        block: &ContentBlock,
        available_width: f64,
        available_height: f64,
    ) -> Result<Option<SplitBlock>, FlowError> {
        (**self).split(block, available_width, available_height)
    }

    fn markers(
        &self,
        block: &ContentBlock,
        available_width: f64,
    ) -> Result<Vec<DrawDirective>, FlowError> {
        (**self).markers(block, available_width)
    }
}

/// Measures text with standard font metrics and a style sheet.
#[derive(Debug, Clone, Default)]
pub struct TextMeasurer {
    styles: StyleSheet,
    fonts: FontContext,
    text_layout: TextLayout,
}

impl TextMeasurer {
    pub fn new(styles: StyleSheet) -> Self {
        TextMeasurer {
            styles,
            fonts: FontContext::new(),
            text_layout: TextLayout::new(),
        }
    }

    /// Line spans and style of a text-bearing block.
    fn lines<'a>(
        &'a self,
        block: &ContentBlock,
        available_width: f64,
    ) -> Result<Option<(Vec<LineSpan>, &'a BlockStyle)>, FlowError> {
        let (text, style, wrap) = match block {
            ContentBlock::Heading { text, style, .. }
            | ContentBlock::Paragraph { text, style } => (text, style, true),
            ContentBlock::Preformatted { text, style } => (text, style, false),
            _ => return Ok(None),
        };
        let style = self.styles.get(style)?;
        let lines = if wrap {
            self.text_layout.break_into_lines(
                &self.fonts,
                text,
                (available_width - style.left_indent).max(0.0),
                style.font_size,
                &style.font_family,
            )
        } else {
            self.text_layout.preformatted_lines(
                &self.fonts,
                text,
                style.font_size,
                &style.font_family,
            )
        };
        Ok(Some((lines, style)))
    }
}

impl Measure for TextMeasurer {
    fn height(&self, block: &ContentBlock, available_width: f64) -> Result<f64, FlowError> {
        if let Some((lines, style)) = self.lines(block, available_width)? {
            return Ok(style.text_height(lines.len()));
        }
        match block {
            ContentBlock::List { items, style, .. } => {
                let style = self.styles.get(style)?;
                let item_width = (available_width - style.left_indent).max(0.0);
                let mut height = style.space_before + style.space_after;
                for item in items {
                    height += self.height(item, item_width)?;
                }
                Ok(height)
            }
            ContentBlock::Spacer { height } => Ok(height.max(0.0)),
            _ => Ok(0.0),
        }
    }

    fn split(
        &self,
        block: &ContentBlock,
        available_width: f64,
        available_height: f64,
    ) -> Result<Option<SplitBlock>, FlowError> {
        if !matches!(
            block,
            ContentBlock::Paragraph { .. } | ContentBlock::Preformatted { .. }
        ) {
            return Ok(None);
        }
        let Some((lines, style)) = self.lines(block, available_width)? else {
            return Ok(None);
        };
        let Some(text) = block.text() else {
            return Ok(None);
        };

        let mut heights = vec![style.leading(); lines.len()];
        if let Some(last) = heights.last_mut() {
            *last += style.space_after;
        }
        match decide_break(available_height, style.space_before, &heights, true) {
            BreakDecision::Split {
                lines_in_current_frame: k,
            } => {
                let cut = lines[k].start;
                let (Some(head), Some(tail)) =
                    (block.with_text(&text[..cut]), block.with_text(&text[cut..]))
                else {
                    return Ok(None);
                };
                Ok(Some(SplitBlock {
                    head,
                    tail,
                    head_height: style.space_before + k as f64 * style.leading(),
                }))
            }
            BreakDecision::Place | BreakDecision::MoveToNextFrame => Ok(None),
        }
    }

    /// One right-aligned marker per item, `bullet_dedent` left of the item
    /// text and level with its top.
    fn markers(
        &self,
        block: &ContentBlock,
        available_width: f64,
    ) -> Result<Vec<DrawDirective>, FlowError> {
        let ContentBlock::List {
            ordered,
            items,
            style: style_ref,
        } = block
        else {
            return Ok(Vec::new());
        };
        let style = self.styles.get(style_ref)?;
        let item_width = (available_width - style.left_indent).max(0.0);
        let mut y = style.space_before;
        let mut markers = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            markers.push(DrawDirective::Text {
                x: style.left_indent - style.bullet_dedent,
                y,
                text: style.list_marker(*ordered, i + 1),
                style: style_ref.clone(),
                align: TextAlign::Right,
            });
            y += self.height(item, item_width)?;
        }
        Ok(markers)
    }
}
