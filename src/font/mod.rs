//! # Font Metrics
//!
//! Advance widths for the standard PDF font families (Helvetica, Times,
//! Courier), used by the reference measurer to break text into lines.
//!
//! Only the printable ASCII range carries per-glyph widths; anything else
//! falls back to a typical lowercase advance for the family. Bold and italic
//! faces share the regular advance tables.

/// Helvetica advance widths for U+0020..=U+007E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Times-Roman advance widths for U+0020..=U+007E, in 1/1000 em.
const TIMES_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // ' '..'/'
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // '0'..'9'
    278, 278, 564, 564, 564, 444, 921, // ':'..'@'
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // 'A'..'M'
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // 'N'..'Z'
    333, 278, 333, 469, 500, 333, // '['..'`'
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // 'a'..'m'
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // 'n'..'z'
    480, 200, 480, 541, // '{'..'~'
];

const COURIER_WIDTH: u16 = 600;

/// The standard font families with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    Times,
    Courier,
}

impl StandardFont {
    /// Resolve a family name such as `"Times-Roman"` or `"Courier"`,
    /// falling back to Helvetica for anything unknown.
    pub fn from_family(family: &str) -> Self {
        let family = family.to_ascii_lowercase();
        if family.starts_with("times") {
            StandardFont::Times
        } else if family.starts_with("courier") {
            StandardFont::Courier
        } else {
            StandardFont::Helvetica
        }
    }

    /// Advance width of `ch` in 1/1000 em.
    fn advance(&self, ch: char) -> u16 {
        let code = ch as u32;
        match self {
            StandardFont::Courier => COURIER_WIDTH,
            StandardFont::Helvetica | StandardFont::Times => {
                let table = if *self == StandardFont::Times {
                    &TIMES_WIDTHS
                } else {
                    &HELVETICA_WIDTHS
                };
                if (0x20..=0x7E).contains(&code) {
                    table[(code - 0x20) as usize]
                } else if ch == '\t' {
                    table[0] * 4
                } else {
                    // Width of 'n', a reasonable average for Latin text.
                    table[('n' as u32 - 0x20) as usize]
                }
            }
        }
    }

    /// Width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }
}

/// Text measurement over the standard font families.
#[derive(Debug, Clone, Default)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        FontContext
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, family: &str, font_size: f64) -> f64 {
        StandardFont::from_family(family).char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, family: &str, font_size: f64) -> f64 {
        let font = StandardFont::from_family(family);
        text.chars().map(|ch| font.char_width(ch, font_size)).sum()
    }
}
