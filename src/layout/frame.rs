use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::model::{ContentBlock, FlowKind};

use super::measure::Measure;
use super::render::{DrawDirective, FrameContent, PlacedBlock};
use super::FIT_TOLERANCE;

/// Geometry of a frame: top-left corner and size, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSpec {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameSpec {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        FrameSpec {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }
}

/// A block on its way through the flow, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Index of the originating block in the input stream.
    pub source: usize,
    pub block: ContentBlock,
    /// True for the remainder of a split block.
    pub continued: bool,
}

impl Fragment {
    pub fn new(source: usize, block: ContentBlock) -> Self {
        Fragment {
            source,
            block,
            continued: false,
        }
    }
}

pub enum AddResult {
    Placed,
    /// The head was placed; the tail still needs a frame.
    Split(Fragment),
    /// Nothing was placed; the fragment is handed back untouched.
    Overflow(Fragment),
}

/// A live frame on the current page.
#[derive(Debug, Clone)]
pub struct Frame {
    spec: FrameSpec,
    used: f64,
    blocks: Vec<PlacedBlock>,
}

impl Frame {
    pub fn new(spec: FrameSpec) -> Self {
        Self {
            spec,
            used: 0.0,
            blocks: Vec::new(),
        }
    }

    pub fn spec(&self) -> &FrameSpec {
        &self.spec
    }

    pub fn remaining_height(&self) -> f64 {
        (self.spec.height - self.used).max(0.0)
    }

    pub fn add(
        &mut self,
        fragment: Fragment,
        measure: &dyn Measure,
    ) -> Result<AddResult, FlowError> {
        let avail_width = self.spec.width;
        let avail_height = self.remaining_height();

        let height = measure.height(&fragment.block, avail_width)?;
        if height <= avail_height + FIT_TOLERANCE {
            let markers = measure.markers(&fragment.block, avail_width)?;
            self.place(fragment, height, markers);
            return Ok(AddResult::Placed);
        }

        if fragment.block.flow_kind() == FlowKind::Splittable {
            if let Some(split) = measure.split(&fragment.block, avail_width, avail_height)? {
                if split.head_height > 0.0 && split.head_height <= avail_height + FIT_TOLERANCE {
                    let Fragment {
                        source, continued, ..
                    } = fragment;
                    self.place(
                        Fragment {
                            source,
                            block: split.head,
                            continued,
                        },
                        split.head_height,
                        Vec::new(),
                    );
                    return Ok(AddResult::Split(Fragment {
                        source,
                        block: split.tail,
                        continued: true,
                    }));
                }
            }
        }

        Ok(AddResult::Overflow(fragment))
    }

    /// Record a placement. `markers` are relative to the block's top-left.
    fn place(&mut self, fragment: Fragment, height: f64, markers: Vec<DrawDirective>) {
        let (x, y) = (self.spec.x, self.spec.y + self.used);
        self.blocks.push(PlacedBlock {
            source: fragment.source,
            block: fragment.block,
            x,
            y,
            width: self.spec.width,
            height,
            continued: fragment.continued,
            markers: markers.iter().map(|m| m.translate(x, y)).collect(),
        });
        self.used = (self.used + height).min(self.spec.height);
    }

    pub fn into_content(self) -> FrameContent {
        FrameContent {
            id: self.spec.id,
            x: self.spec.x,
            y: self.spec.y,
            width: self.spec.width,
            height: self.spec.height,
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::SplitBlock;

    /// Every text line is 10pt tall; lines are separated by '\n'.
    struct Lines;

    impl Measure for Lines {
        fn height(&self, block: &ContentBlock, _w: f64) -> Result<f64, FlowError> {
            Ok(match block {
                ContentBlock::Spacer { height } => *height,
                other => other.text().map_or(0.0, |t| t.lines().count() as f64 * 10.0),
            })
        }

        fn split(
            &self,
            block: &ContentBlock,
            _w: f64,
            h: f64,
        ) -> Result<Option<SplitBlock>, FlowError> {
            let text = block.text().unwrap_or_default();
            let k = (h / 10.0).floor() as usize;
            if k == 0 {
                return Ok(None);
            }
            let cut: usize = text.split_inclusive('\n').take(k).map(str::len).sum();
            Ok(Some(SplitBlock {
                head: block.with_text(&text[..cut]).unwrap(),
                tail: block.with_text(&text[cut..]).unwrap(),
                head_height: k as f64 * 10.0,
            }))
        }
    }

    fn frame(height: f64) -> Frame {
        Frame::new(FrameSpec::new("f", 10.0, 20.0, 100.0, height))
    }

    #[test]
    fn exact_fit_is_placed() {
        let mut f = frame(30.0);
        let frag = Fragment::new(0, ContentBlock::paragraph("a\nb\nc", "Normal"));
        assert!(matches!(f.add(frag, &Lines).unwrap(), AddResult::Placed));
        assert_eq!(f.remaining_height(), 0.0);
    }

    #[test]
    fn placements_stack_downwards() {
        let mut f = frame(100.0);
        f.add(Fragment::new(0, ContentBlock::spacer(15.0)), &Lines)
            .unwrap();
        f.add(Fragment::new(1, ContentBlock::paragraph("x", "Normal")), &Lines)
            .unwrap();
        let content = f.into_content();
        assert_eq!(content.blocks[0].y, 20.0);
        assert_eq!(content.blocks[1].y, 35.0);
        assert_eq!(content.blocks[1].source, 1);
    }

    #[test]
    fn atomic_overflow_leaves_frame_untouched() {
        let mut f = frame(25.0);
        let heading = ContentBlock::heading(1, "a\nb\nc", "Heading1");
        match f.add(Fragment::new(4, heading.clone()), &Lines).unwrap() {
            AddResult::Overflow(back) => {
                assert_eq!(back.block, heading);
                assert_eq!(back.source, 4);
            }
            _ => panic!("heading must not be split"),
        }
        assert_eq!(f.remaining_height(), 25.0);
        assert!(f.into_content().blocks.is_empty());
    }

    #[test]
    fn splittable_places_head_and_returns_tail() {
        let mut f = frame(25.0);
        let para = ContentBlock::paragraph("a\nb\nc", "Normal");
        match f.add(Fragment::new(2, para), &Lines).unwrap() {
            AddResult::Split(tail) => {
                assert_eq!(tail.block.text(), Some("c"));
                assert!(tail.continued);
                assert_eq!(tail.source, 2);
            }
            _ => panic!("expected a split"),
        }
        let content = f.into_content();
        assert_eq!(content.blocks.len(), 1);
        assert_eq!(content.blocks[0].block.text(), Some("a\nb\n"));
        assert!(!content.blocks[0].continued);
    }

    #[test]
    fn full_frame_rejects_content() {
        let mut f = frame(10.0);
        f.add(Fragment::new(0, ContentBlock::spacer(10.0)), &Lines)
            .unwrap();
        let result = f
            .add(Fragment::new(1, ContentBlock::paragraph("x", "Normal")), &Lines)
            .unwrap();
        assert!(matches!(result, AddResult::Overflow(_)));
    }

    #[test]
    fn full_frame_still_takes_zero_height_block() {
        let mut f = frame(10.0);
        f.add(Fragment::new(0, ContentBlock::spacer(10.0)), &Lines)
            .unwrap();
        let result = f
            .add(Fragment::new(1, ContentBlock::spacer(0.0)), &Lines)
            .unwrap();
        assert!(matches!(result, AddResult::Placed));
        let content = f.into_content();
        assert_eq!(content.blocks.len(), 2);
        assert_eq!(content.blocks[1].y, 30.0);
    }
}
