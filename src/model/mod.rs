//! # Document Model
//!
//! The input representation for the layout engine: a flat, ordered stream of
//! content blocks plus the page templates and styles they flow into. This is
//! what a content producer (a script, a markdown converter, a JSON file)
//! hands to the engine.
//!
//! Besides content, the stream carries two directives: an explicit page
//! break, and a switch of the template used for the *next* page.

use serde::{Deserialize, Serialize};

use crate::layout::frame::FrameSpec;
use crate::layout::render::DrawDirective;
use crate::layout::template::PageTemplate;
use crate::style::{StyleRef, StyleSheet};

/// Points per inch.
pub const INCH: f64 = 72.0;

/// A single unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    Heading {
        #[serde(default = "default_level")]
        level: u8,
        text: String,
        #[serde(default)]
        style: StyleRef,
    },
    Paragraph {
        text: String,
        #[serde(default)]
        style: StyleRef,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<ContentBlock>,
        #[serde(default)]
        style: StyleRef,
    },
    Preformatted {
        text: String,
        #[serde(default)]
        style: StyleRef,
    },
    Spacer {
        height: f64,
    },
    PageBreak,
    /// Use the named template for the next page that starts.
    NextTemplate {
        name: String,
    },
}

fn default_level() -> u8 {
    1
}

/// How the flow engine treats a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Placed whole or moved whole to the next frame.
    Atomic,
    /// May be split between frames, carrying a remainder forward.
    Splittable,
    /// Changes pagination state; takes no space.
    Directive,
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>, style: impl Into<StyleRef>) -> Self {
        ContentBlock::Heading {
            level,
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>, style: impl Into<StyleRef>) -> Self {
        ContentBlock::Paragraph {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn list(ordered: bool, items: Vec<ContentBlock>, style: impl Into<StyleRef>) -> Self {
        ContentBlock::List {
            ordered,
            items,
            style: style.into(),
        }
    }

    pub fn preformatted(text: impl Into<String>, style: impl Into<StyleRef>) -> Self {
        ContentBlock::Preformatted {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn spacer(height: f64) -> Self {
        ContentBlock::Spacer { height }
    }

    pub fn page_break() -> Self {
        ContentBlock::PageBreak
    }

    pub fn next_template(name: impl Into<String>) -> Self {
        ContentBlock::NextTemplate { name: name.into() }
    }

    pub fn flow_kind(&self) -> FlowKind {
        match self {
            ContentBlock::Heading { .. }
            | ContentBlock::List { .. }
            | ContentBlock::Spacer { .. } => FlowKind::Atomic,
            ContentBlock::Paragraph { .. } | ContentBlock::Preformatted { .. } => {
                FlowKind::Splittable
            }
            ContentBlock::PageBreak | ContentBlock::NextTemplate { .. } => FlowKind::Directive,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::List { .. } => "list",
            ContentBlock::Preformatted { .. } => "preformatted",
            ContentBlock::Spacer { .. } => "spacer",
            ContentBlock::PageBreak => "page-break",
            ContentBlock::NextTemplate { .. } => "next-template",
        }
    }

    pub fn style(&self) -> Option<&StyleRef> {
        match self {
            ContentBlock::Heading { style, .. }
            | ContentBlock::Paragraph { style, .. }
            | ContentBlock::List { style, .. }
            | ContentBlock::Preformatted { style, .. } => Some(style),
            ContentBlock::Spacer { .. }
            | ContentBlock::PageBreak
            | ContentBlock::NextTemplate { .. } => None,
        }
    }

    /// The text of a heading, paragraph or preformatted block.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph { text, .. }
            | ContentBlock::Preformatted { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The first page break or template switch found among a list's items,
    /// at any depth.
    pub fn nested_directive(&self) -> Option<&ContentBlock> {
        let ContentBlock::List { items, .. } = self else {
            return None;
        };
        items.iter().find_map(|item| match item.flow_kind() {
            FlowKind::Directive => Some(item),
            _ => item.nested_directive(),
        })
    }

    /// A copy of a splittable block carrying different text in the same style.
    pub fn with_text(&self, text: impl Into<String>) -> Option<Self> {
        match self {
            ContentBlock::Paragraph { style, .. } => Some(ContentBlock::Paragraph {
                text: text.into(),
                style: style.clone(),
            }),
            ContentBlock::Preformatted { style, .. } => Some(ContentBlock::Preformatted {
                text: text.into(),
                style: style.clone(),
            }),
            _ => None,
        }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Letter,
    Legal,
    A4,
    A5,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// A page template as described in an input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: String,
    /// Overrides the document page size for this template.
    #[serde(default)]
    pub page_size: Option<PageSize>,
    pub frames: Vec<FrameSpec>,
    /// Page furniture drawn once per page, before content.
    #[serde(default)]
    pub decorations: Vec<DrawDirective>,
}

impl TemplateInput {
    pub fn to_template(&self, document_size: PageSize) -> PageTemplate {
        let template = self.frames.iter().cloned().fold(
            PageTemplate::new(&self.name, self.page_size.unwrap_or(document_size)),
            PageTemplate::with_frame,
        );
        if self.decorations.is_empty() {
            template
        } else {
            template.with_decorations(self.decorations.clone())
        }
    }
}

/// A complete document ready for layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(default)]
    pub page_size: PageSize,
    /// Template of the first page. Defaults to the first template listed.
    #[serde(default)]
    pub default_template: Option<String>,
    pub templates: Vec<TemplateInput>,
    /// Styles layered over the built-in sample sheet.
    #[serde(default = "StyleSheet::empty")]
    pub styles: StyleSheet,
    pub blocks: Vec<ContentBlock>,
}

impl DocumentInput {
    pub fn page_templates(&self) -> Vec<PageTemplate> {
        self.templates
            .iter()
            .map(|t| t.to_template(self.page_size))
            .collect()
    }

    /// The sample style sheet with this document's styles layered on top.
    pub fn style_sheet(&self) -> StyleSheet {
        let mut sheet = StyleSheet::sample();
        sheet.extend(self.styles.clone());
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_classified() {
        let blocks = vec![
            ContentBlock::heading(1, "Title", "Heading1"),
            ContentBlock::paragraph("Body", "Normal"),
            ContentBlock::list(false, vec![], "List"),
            ContentBlock::preformatted("code", "Code"),
            ContentBlock::spacer(12.0),
            ContentBlock::page_break(),
            ContentBlock::next_template("Body"),
        ];
        let kinds: Vec<FlowKind> = blocks.iter().map(ContentBlock::flow_kind).collect();
        assert_eq!(
            kinds,
            vec![
                FlowKind::Atomic,
                FlowKind::Splittable,
                FlowKind::Atomic,
                FlowKind::Splittable,
                FlowKind::Atomic,
                FlowKind::Directive,
                FlowKind::Directive,
            ]
        );
    }

    #[test]
    fn with_text_keeps_style() {
        let block = ContentBlock::preformatted("a\nb", "Code");
        let tail = block.with_text("b").unwrap();
        assert_eq!(tail, ContentBlock::preformatted("b", "Code"));
        assert!(ContentBlock::spacer(1.0).with_text("x").is_none());
    }

    #[test]
    fn blocks_deserialize_from_tagged_json() {
        let json = r#"[
            { "type": "Heading", "text": "1. Introduction", "style": "Heading1" },
            { "type": "Paragraph", "text": "Body text" },
            { "type": "List", "ordered": true, "items": [
                { "type": "Paragraph", "text": "one" }
            ], "style": "List" },
            { "type": "Spacer", "height": 12 },
            { "type": "NextTemplate", "name": "ContentPage" },
            { "type": "PageBreak" }
        ]"#;
        let blocks: Vec<ContentBlock> = serde_json::from_str(json).unwrap();
        assert_eq!(blocks.len(), 6);
        assert_eq!(
            blocks[0],
            ContentBlock::heading(1, "1. Introduction", "Heading1")
        );
        assert_eq!(blocks[1].style(), Some(&StyleRef::default()));
        assert!(matches!(&blocks[2], ContentBlock::List { ordered: true, items, .. } if items.len() == 1));
        assert_eq!(blocks[4], ContentBlock::next_template("ContentPage"));
        assert_eq!(blocks[5], ContentBlock::PageBreak);
    }

    #[test]
    fn nested_directive_is_found_at_any_depth() {
        let inner = ContentBlock::list(
            true,
            vec![
                ContentBlock::paragraph("a", "Normal"),
                ContentBlock::next_template("Appendix"),
            ],
            "List",
        );
        let outer = ContentBlock::list(false, vec![inner], "List");
        assert_eq!(
            outer.nested_directive(),
            Some(&ContentBlock::next_template("Appendix"))
        );

        let plain = ContentBlock::list(false, vec![ContentBlock::spacer(3.0)], "List");
        assert_eq!(plain.nested_directive(), None);
        assert_eq!(ContentBlock::page_break().nested_directive(), None);
    }

    #[test]
    fn page_sizes_in_points() {
        assert_eq!(PageSize::Letter.dimensions(), (8.5 * INCH, 11.0 * INCH));
        assert_eq!(
            PageSize::Custom {
                width: 100.0,
                height: 200.0
            }
            .dimensions(),
            (100.0, 200.0)
        );
    }

    #[test]
    fn template_input_uses_document_size_by_default() {
        let input = TemplateInput {
            name: "Appendix".to_string(),
            page_size: None,
            frames: vec![FrameSpec::new("appendix", INCH, INCH, 6.5 * INCH, 9.0 * INCH)],
            decorations: vec![],
        };
        let template = input.to_template(PageSize::A4);
        assert_eq!(template.name(), "Appendix");
        assert_eq!(template.page_size(), PageSize::A4);
        assert_eq!(template.frames().len(), 1);
    }
}
