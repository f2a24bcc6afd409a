//! # Multi-Template Layout Engine
//!
//! Content arrives as a flat stream of blocks and is bound to page geometry
//! only here, one block at a time, with no lookahead:
//!
//! 1. Open a page from a template: fresh frames, decoration produced once
//! 2. Offer the block to the current frame. Does it fit?
//! 3. If it fits: place it, reduce the frame's remaining height
//! 4. If it is splittable and part of it fits: place the head, carry the tail
//! 5. Otherwise move to the next frame of the template, in declared order
//! 6. Out of frames: emit the page, open the next one (switching template if
//!    one was requested) and try again
//!
//! A block that will not go into any frame of a freshly opened page is an
//! error, never an endless loop and never silently dropped.

pub mod flow;
pub mod frame;
pub mod measure;
pub mod page_break;
pub mod render;
pub mod template;

pub use flow::Document;
pub use frame::{Frame, FrameSpec};
pub use measure::{Measure, SplitBlock, TextMeasurer};
pub use render::{DrawDirective, JsonLinesSink, PageSink, PlacedBlock, RenderedPage};
pub use template::{PageContext, PageTemplate};

/// Slack allowed when comparing heights, so blocks that fill a frame exactly
/// are not rejected over floating point noise.
pub(crate) const FIT_TOLERANCE: f64 = 1e-6;
