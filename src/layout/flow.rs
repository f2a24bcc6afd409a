//! # Document Flow
//!
//! The pagination state machine. Blocks are consumed strictly in order and
//! placed into the frames of the current page strictly in template order.
//! When a block does not fit, the flow advances to the next frame, and when
//! the page runs out of frames the page is emitted and a fresh one started.
//!
//! A template switch is only ever recorded: it takes effect when the next
//! page starts, so a page is never rendered with a half-applied template.

use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::FlowError;
use crate::model::ContentBlock;

use super::frame::{AddResult, Frame, Fragment};
use super::measure::Measure;
use super::render::{DrawDirective, PageSink, RenderedPage};
use super::template::{PageContext, PageTemplate};

/// The page currently being filled.
struct PageState {
    template: usize,
    context: PageContext,
    frames: Vec<Frame>,
    frame_index: usize,
    decorations: Vec<DrawDirective>,
    /// Whether any content (or content fragment) landed on this page.
    placed: bool,
}

impl PageState {
    fn into_rendered(self) -> RenderedPage {
        RenderedPage {
            number: self.context.page_number,
            template: self.context.template,
            width: self.context.width,
            height: self.context.height,
            decorations: self.decorations,
            frames: self.frames.into_iter().map(Frame::into_content).collect(),
        }
    }
}

enum FlowState {
    NoPageStarted,
    InPage(PageState),
    /// Finalized, or aborted by an error.
    Finished,
}

impl FlowState {
    fn name(&self) -> &'static str {
        match self {
            FlowState::NoPageStarted => "no-page-started",
            FlowState::InPage(_) => "in-page",
            FlowState::Finished => "finished",
        }
    }
}

/// The root aggregate: registered templates plus the flow state.
pub struct Document {
    templates: Vec<PageTemplate>,
    default_template: Option<String>,
    /// Template for the next page start, set by a `NextTemplate` directive.
    next_template: Option<String>,
    state: FlowState,
    pages_emitted: usize,
    blocks_seen: usize,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("templates", &self.templates)
            .field("default_template", &self.default_template)
            .field("next_template", &self.next_template)
            .field("state", &self.state.name())
            .field("pages_emitted", &self.pages_emitted)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            templates: Vec::new(),
            default_template: None,
            next_template: None,
            state: FlowState::NoPageStarted,
            pages_emitted: 0,
            blocks_seen: 0,
        }
    }

    pub fn with_templates(
        templates: impl IntoIterator<Item = PageTemplate>,
    ) -> Result<Self, FlowError> {
        let mut document = Document::new();
        for template in templates {
            document.add_template(template)?;
        }
        Ok(document)
    }

    /// Register a template. The first one registered is the default.
    pub fn add_template(&mut self, template: PageTemplate) -> Result<(), FlowError> {
        template.validate()?;
        if self.template_index(template.name()).is_some() {
            return Err(FlowError::DuplicateTemplate(template.name().to_string()));
        }
        self.templates.push(template);
        Ok(())
    }

    pub fn set_default_template(&mut self, name: impl Into<String>) -> Result<(), FlowError> {
        let name = name.into();
        self.lookup(&name)?;
        self.default_template = Some(name);
        Ok(())
    }

    pub fn templates(&self) -> &[PageTemplate] {
        &self.templates
    }

    /// The template recorded for the next page start, if any.
    pub fn pending_template(&self) -> Option<&str> {
        self.next_template.as_deref()
    }

    /// Name of the template governing the page being filled.
    pub fn current_template(&self) -> Option<&str> {
        match &self.state {
            FlowState::InPage(page) => Some(self.templates[page.template].name()),
            _ => None,
        }
    }

    /// Index of the frame currently being filled.
    pub fn current_frame_index(&self) -> Option<usize> {
        match &self.state {
            FlowState::InPage(page) => Some(page.frame_index),
            _ => None,
        }
    }

    pub fn pages_emitted(&self) -> usize {
        self.pages_emitted
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, FlowState::Finished)
    }

    fn template_index(&self, name: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.name() == name)
    }

    fn lookup(&self, name: &str) -> Result<usize, FlowError> {
        self.template_index(name)
            .ok_or_else(|| FlowError::UnknownTemplate(name.to_string()))
    }

    fn default_index(&self) -> Result<usize, FlowError> {
        match &self.default_template {
            Some(name) => self.lookup(name),
            None if self.templates.is_empty() => Err(FlowError::NoTemplates),
            None => Ok(0),
        }
    }

    fn open_page(&mut self, template: usize) {
        let number = self.pages_emitted + 1;
        let start = self.templates[template].start_page(number);
        debug!(page = number, template = %start.context.template, "page started");
        self.state = FlowState::InPage(PageState {
            template,
            context: start.context,
            frames: start.frames,
            frame_index: 0,
            decorations: start.decorations,
            placed: false,
        });
    }

    fn ensure_page(&mut self) -> Result<(), FlowError> {
        if let FlowState::NoPageStarted = self.state {
            let template = match self.next_template.take() {
                Some(name) => self.lookup(&name)?,
                None => self.default_index()?,
            };
            self.open_page(template);
        }
        Ok(())
    }

    fn emit_page(&mut self, page: PageState, sink: &mut dyn PageSink) -> Result<(), FlowError> {
        let rendered = page.into_rendered();
        debug!(
            page = rendered.number,
            template = %rendered.template,
            blocks = rendered.block_count(),
            "page finished"
        );
        self.pages_emitted += 1;
        sink.emit(rendered)
    }

    /// Emit the current page and start the next one, applying a pending
    /// template switch.
    fn turn_page(
        &mut self,
        sink: &mut dyn PageSink,
        reason: &'static str,
        block: &'static str,
    ) -> Result<(), FlowError> {
        let FlowState::InPage(page) = mem::replace(&mut self.state, FlowState::NoPageStarted)
        else {
            return Ok(());
        };
        debug!(
            from_page = page.context.page_number,
            frame_index = page.frame_index,
            reason,
            block,
            "page break"
        );
        let current = page.template;
        self.emit_page(page, sink)?;

        let next = match self.next_template.take() {
            Some(name) => {
                debug!(template = %name, "switching page template");
                self.lookup(&name)?
            }
            None => current,
        };
        self.open_page(next);
        Ok(())
    }

    /// Feed the next block of the stream.
    ///
    /// Any error aborts the flow: later `push` and `finish` calls fail with
    /// `AlreadyFinished` instead of carrying on past the failed block.
    pub fn push(
        &mut self,
        block: ContentBlock,
        measure: &dyn Measure,
        sink: &mut dyn PageSink,
    ) -> Result<(), FlowError> {
        if self.is_finished() {
            return Err(FlowError::AlreadyFinished);
        }
        let index = self.blocks_seen;
        self.blocks_seen += 1;

        let result = self.push_block(index, block, measure, sink);
        if let Err(e) = &result {
            debug!(block = index, error = %e, "flow aborted");
            self.state = FlowState::Finished;
            self.next_template = None;
        }
        result
    }

    fn push_block(
        &mut self,
        index: usize,
        block: ContentBlock,
        measure: &dyn Measure,
        sink: &mut dyn PageSink,
    ) -> Result<(), FlowError> {
        if let Some(directive) = block.nested_directive() {
            return Err(FlowError::DirectiveInList {
                index,
                kind: directive.kind_name(),
            });
        }

        match block {
            ContentBlock::NextTemplate { name } => {
                self.lookup(&name)?;
                if let Some(previous) = self.next_template.replace(name) {
                    debug!(previous = %previous, "pending template switch replaced");
                }
                Ok(())
            }
            ContentBlock::PageBreak => {
                self.ensure_page()?;
                self.turn_page(sink, "page_break", "page-break")
            }
            block => self.flow(Fragment::new(index, block), measure, sink),
        }
    }

    fn flow(
        &mut self,
        fragment: Fragment,
        measure: &dyn Measure,
        sink: &mut dyn PageSink,
    ) -> Result<(), FlowError> {
        self.ensure_page()?;
        let mut current = fragment;
        loop {
            let FlowState::InPage(page) = &mut self.state else {
                return Err(FlowError::AlreadyFinished);
            };
            if page.frame_index >= page.frames.len() {
                self.turn_page(sink, "frame_exhausted", current.block.kind_name())?;
                continue;
            }

            let frame_index = page.frame_index;
            let is_last_frame = frame_index + 1 >= page.frames.len();
            match page.frames[frame_index].add(current, measure)? {
                AddResult::Placed => {
                    page.placed = true;
                    return Ok(());
                }
                AddResult::Split(tail) => {
                    page.placed = true;
                    trace!(
                        page = page.context.page_number,
                        frame_index,
                        source = tail.source,
                        reason = "flowable_split",
                        "frame advance"
                    );
                    page.frame_index += 1;
                    current = tail;
                }
                AddResult::Overflow(back) => {
                    if !page.placed && is_last_frame {
                        // Every frame of a fresh page rejected it; another
                        // page of the same template would too.
                        let frame_height = self.templates[page.template].max_frame_height();
                        let width = page.frames[frame_index].spec().width;
                        let height = measure.height(&back.block, width)?;
                        return Err(FlowError::BlockTooLarge {
                            index: back.source,
                            kind: back.block.kind_name(),
                            height,
                            frame_height,
                        });
                    }
                    trace!(
                        page = page.context.page_number,
                        frame_index,
                        source = back.source,
                        reason = "frame_overflow",
                        "frame advance"
                    );
                    page.frame_index += 1;
                    current = back;
                }
            }
        }
    }

    /// Flush the page in progress. Returns the number of pages emitted.
    ///
    /// A trailing page left empty by a final page break is dropped.
    pub fn finish(&mut self, sink: &mut dyn PageSink) -> Result<usize, FlowError> {
        match mem::replace(&mut self.state, FlowState::Finished) {
            FlowState::Finished => return Err(FlowError::AlreadyFinished),
            FlowState::InPage(page) if page.placed => self.emit_page(page, sink)?,
            FlowState::InPage(page) => {
                debug!(page = page.context.page_number, "dropping empty trailing page");
            }
            FlowState::NoPageStarted => {}
        }
        if let Some(name) = self.next_template.take() {
            debug!(template = %name, "template switch pending at end of document");
        }
        Ok(self.pages_emitted)
    }

    /// Flow a whole block stream and finish the document.
    pub fn build<I>(
        &mut self,
        blocks: I,
        measure: &dyn Measure,
        sink: &mut dyn PageSink,
    ) -> Result<usize, FlowError>
    where
        I: IntoIterator<Item = ContentBlock>,
    {
        for block in blocks {
            self.push(block, measure, sink)?;
        }
        self.finish(sink)
    }
}
