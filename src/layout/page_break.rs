//! # Break Decisions
//!
//! Decide how much of a line-based block goes into the current frame.

use super::FIT_TOLERANCE;

/// What to do with a block given the space left in a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire block in the current frame (it fits).
    Place,
    /// Move the entire block to the next frame (unbreakable, or not one line fits).
    MoveToNextFrame,
    /// Split the block: the first lines stay here, the rest continue in the next frame.
    Split { lines_in_current_frame: usize },
}

/// Given the remaining height of a frame, the fixed space above the first line
/// and the height of every line, decide how to break.
pub fn decide_break(
    remaining_height: f64,
    leading_space: f64,
    line_heights: &[f64],
    is_breakable: bool,
) -> BreakDecision {
    let limit = remaining_height + FIT_TOLERANCE;
    let total: f64 = leading_space + line_heights.iter().sum::<f64>();

    if total <= limit {
        return BreakDecision::Place;
    }

    if !is_breakable {
        return BreakDecision::MoveToNextFrame;
    }

    let mut running = leading_space;
    let mut fit_count = 0;
    for &h in line_heights {
        if running + h > limit {
            break;
        }
        running += h;
        fit_count += 1;
    }

    if fit_count == 0 {
        return BreakDecision::MoveToNextFrame;
    }

    BreakDecision::Split {
        lines_in_current_frame: fit_count,
    }
}
