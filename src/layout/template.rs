use std::fmt;
use std::sync::Arc;

use crate::error::FlowError;
use crate::model::PageSize;

use super::frame::{Frame, FrameSpec};
use super::render::DrawDirective;

/// What a decoration gets to know about the page it decorates.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub page_number: usize,
    pub template: String,
    pub width: f64,
    pub height: f64,
}

pub type DecorateFn = Arc<dyn Fn(&PageContext) -> Vec<DrawDirective> + Send + Sync>;

/// Page furniture produced once per page, before any content is placed.
#[derive(Clone)]
pub enum Decoration {
    /// Fixed directives with `{page}` / `{template}` substituted per page.
    Static(Vec<DrawDirective>),
    Callback(DecorateFn),
}

impl Decoration {
    fn produce(&self, ctx: &PageContext) -> Vec<DrawDirective> {
        match self {
            Decoration::Static(directives) => {
                directives.iter().map(|d| d.for_page(ctx)).collect()
            }
            Decoration::Callback(callback) => callback(ctx),
        }
    }
}

/// A fresh page: empty frames in fill order plus its decoration.
pub struct PageStart {
    pub context: PageContext,
    pub frames: Vec<Frame>,
    pub decorations: Vec<DrawDirective>,
}

/// A named, reusable arrangement of frames on a page.
#[derive(Clone)]
pub struct PageTemplate {
    name: String,
    page_size: PageSize,
    frames: Vec<FrameSpec>,
    decoration: Option<Decoration>,
}

impl fmt::Debug for PageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTemplate")
            .field("name", &self.name)
            .field("page_size", &self.page_size)
            .field("frames", &self.frames)
            .field("decorated", &self.decoration.is_some())
            .finish()
    }
}

impl PageTemplate {
    pub fn new(name: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            name: name.into(),
            page_size,
            frames: Vec::new(),
            decoration: None,
        }
    }

    pub fn with_frame(mut self, spec: FrameSpec) -> Self {
        self.frames.push(spec);
        self
    }

    pub fn with_decorations(mut self, directives: Vec<DrawDirective>) -> Self {
        self.decoration = Some(Decoration::Static(directives));
        self
    }

    pub fn set_on_page<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PageContext) -> Vec<DrawDirective> + Send + Sync + 'static,
    {
        self.decoration = Some(Decoration::Callback(Arc::new(callback)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn frames(&self) -> &[FrameSpec] {
        &self.frames
    }

    /// Tallest frame of the template.
    pub fn max_frame_height(&self) -> f64 {
        self.frames.iter().map(|f| f.height).fold(0.0, f64::max)
    }

    /// Check the template can hold content at all.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.frames.is_empty() {
            return Err(FlowError::EmptyTemplate(self.name.clone()));
        }
        if let Some(bad) = self
            .frames
            .iter()
            .find(|f| !(f.width > 0.0 && f.height > 0.0))
        {
            return Err(FlowError::InvalidFrame {
                template: self.name.clone(),
                frame: bad.id.clone(),
            });
        }
        Ok(())
    }

    pub fn start_page(&self, page_number: usize) -> PageStart {
        let (width, height) = self.page_size.dimensions();
        let context = PageContext {
            page_number,
            template: self.name.clone(),
            width,
            height,
        };
        let decorations = self
            .decoration
            .as_ref()
            .map(|d| d.produce(&context))
            .unwrap_or_default();
        PageStart {
            frames: self.frames.iter().cloned().map(Frame::new).collect(),
            decorations,
            context,
        }
    }
}
