//! # Text Layout
//!
//! Greedy line breaking over UAX#14 break opportunities.
//!
//! Lines are reported as byte spans into the source string. The spans tile
//! the text exactly (trailing spaces and newlines stay with the line they
//! end), so a paragraph split after any line yields a prefix and a suffix
//! that concatenate back to the original.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpan {
    /// Byte offset of the first character of the line.
    pub start: usize,
    /// Byte offset one past the last character of the line.
    pub end: usize,
    /// Width of the line in points, trailing whitespace included.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields the byte offset where the next segment starts.
    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx > 0 && char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        TextLayout
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Whitespace never forces a break (it hangs past the margin). A word
    /// wider than the whole line is broken at the character that overflows.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font_size: f64,
        font_family: &str,
    ) -> Vec<LineSpan> {
        if text.is_empty() {
            return vec![LineSpan {
                start: 0,
                end: 0,
                width: 0.0,
            }];
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&(_, ch)| {
                if is_newline(ch) {
                    0.0
                } else {
                    font_context.char_width(ch, font_family, font_size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);
        let byte_at = |i: usize| chars.get(i).map(|&(b, _)| b).unwrap_or(text.len());

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break: Option<usize> = None;
        let mut width_at_break = 0.0;

        for (i, &(_, ch)) in chars.iter().enumerate() {
            if i > line_start {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(LineSpan {
                            start: byte_at(line_start),
                            end: byte_at(i),
                            width: line_width,
                        });
                        line_start = i;
                        line_width = 0.0;
                        last_break = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        last_break = Some(i);
                        width_at_break = line_width;
                    }
                    None => {}
                }
            }

            let char_width = widths[i];
            if ch.is_whitespace() {
                line_width += char_width;
                continue;
            }

            if line_width + char_width > max_width && i > line_start {
                match last_break {
                    Some(bp) if bp > line_start => {
                        lines.push(LineSpan {
                            start: byte_at(line_start),
                            end: byte_at(bp),
                            width: width_at_break,
                        });
                        line_width = widths[bp..i].iter().sum();
                        line_start = bp;
                    }
                    _ => {
                        // No break point: force a break before this character.
                        lines.push(LineSpan {
                            start: byte_at(line_start),
                            end: byte_at(i),
                            width: line_width,
                        });
                        line_width = 0.0;
                        line_start = i;
                    }
                }
                last_break = None;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            lines.push(LineSpan {
                start: byte_at(line_start),
                end: text.len(),
                width: line_width,
            });
        }

        lines
    }

    /// Split preformatted text into its source lines without wrapping.
    pub fn preformatted_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        font_size: f64,
        font_family: &str,
    ) -> Vec<LineSpan> {
        if text.is_empty() {
            return vec![LineSpan {
                start: 0,
                end: 0,
                width: 0.0,
            }];
        }
        let mut start = 0;
        text.split_inclusive('\n')
            .map(|line| {
                let end = start + line.len();
                let span = LineSpan {
                    start,
                    end,
                    width: font_context.measure_string(
                        line.trim_end_matches(['\n', '\r']),
                        font_family,
                        font_size,
                    ),
                };
                start = end;
                span
            })
            .collect()
    }
}
