//! # Style Registry
//!
//! Named visual styles for content blocks. The flow engine never looks
//! inside a style: blocks carry a [`StyleRef`] and only the measurer and the
//! renderer resolve it. The attributes here are the ones that change how much
//! vertical space a block takes (font size, leading, spacing, indent) plus a
//! few pass-through properties for the renderer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// A reference to a named style in a [`StyleSheet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRef(pub String);

impl StyleRef {
    pub fn new(name: impl Into<String>) -> Self {
        StyleRef(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StyleRef {
    fn default() -> Self {
        StyleRef("Normal".to_string())
    }
}

impl From<&str> for StyleRef {
    fn from(name: &str) -> Self {
        StyleRef(name.to_string())
    }
}

impl std::fmt::Display for StyleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal text alignment. Opaque to layout; passed through to rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// How list items are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletType {
    #[serde(rename = "bullet")]
    Bullet,
    #[serde(rename = "1")]
    Decimal,
}

/// Visual attributes of a block style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStyle {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    /// Baseline-to-baseline distance. `None` means 1.2 × font size.
    pub leading: Option<f64>,
    pub space_before: f64,
    pub space_after: f64,
    /// Indent applied to the whole block (list items for list styles).
    pub left_indent: f64,
    pub alignment: TextAlign,
    /// Marker kind for list styles. `None` follows the list's `ordered` flag.
    pub bullet_type: Option<BulletType>,
    /// Marker template for numbered lists; `%s` is replaced by the number.
    pub bullet_format: Option<String>,
    /// Gap between the right edge of a marker and the item text.
    pub bullet_dedent: f64,
}

impl Default for BlockStyle {
    fn default() -> Self {
        BlockStyle {
            font_family: "Helvetica".to_string(),
            font_size: 10.0,
            bold: false,
            leading: None,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            alignment: TextAlign::Left,
            bullet_type: None,
            bullet_format: None,
            bullet_dedent: 0.0,
        }
    }
}

impl BlockStyle {
    pub fn leading(&self) -> f64 {
        self.leading.unwrap_or(self.font_size * 1.2)
    }

    /// Marker text for the `number`th (1-based) item of a list in this style.
    pub fn list_marker(&self, ordered: bool, number: usize) -> String {
        let kind = self.bullet_type.unwrap_or(if ordered {
            BulletType::Decimal
        } else {
            BulletType::Bullet
        });
        match kind {
            BulletType::Bullet => "\u{2022}".to_string(),
            BulletType::Decimal => {
                let number = number.to_string();
                match &self.bullet_format {
                    Some(format) => format.replace("%s", &number),
                    None => number,
                }
            }
        }
    }

    /// Vertical space taken by `lines` lines of text in this style.
    pub fn text_height(&self, lines: usize) -> f64 {
        self.space_before + lines as f64 * self.leading() + self.space_after
    }
}

/// A mapping from style name to [`BlockStyle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    styles: HashMap<String, BlockStyle>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::sample()
    }
}

impl StyleSheet {
    /// An empty sheet with no styles at all.
    pub fn empty() -> Self {
        StyleSheet {
            styles: HashMap::new(),
        }
    }

    /// A small starter sheet: `Normal`, `Heading1`, `Heading2`, `Code`, `List`.
    pub fn sample() -> Self {
        let mut sheet = Self::empty();
        sheet.insert(
            "Normal",
            BlockStyle {
                leading: Some(12.0),
                ..Default::default()
            },
        );
        sheet.insert(
            "Heading1",
            BlockStyle {
                font_family: "Helvetica".to_string(),
                font_size: 18.0,
                bold: true,
                leading: Some(22.0),
                space_before: 12.0,
                space_after: 6.0,
                ..Default::default()
            },
        );
        sheet.insert(
            "Heading2",
            BlockStyle {
                font_size: 14.0,
                bold: true,
                leading: Some(18.0),
                space_before: 12.0,
                space_after: 6.0,
                ..Default::default()
            },
        );
        sheet.insert(
            "Code",
            BlockStyle {
                font_family: "Courier".to_string(),
                font_size: 8.0,
                leading: Some(8.8),
                left_indent: 36.0,
                ..Default::default()
            },
        );
        sheet.insert(
            "List",
            BlockStyle {
                left_indent: 18.0,
                ..Default::default()
            },
        );
        sheet
    }

    pub fn insert(&mut self, name: impl Into<String>, style: BlockStyle) {
        self.styles.insert(name.into(), style);
    }

    /// Overlay `other` on top of this sheet; styles with the same name are replaced.
    pub fn extend(&mut self, other: StyleSheet) {
        self.styles.extend(other.styles);
    }

    pub fn get(&self, style: &StyleRef) -> Result<&BlockStyle, FlowError> {
        self.styles
            .get(style.as_str())
            .ok_or_else(|| FlowError::UnknownStyle(style.0.clone()))
    }
}
