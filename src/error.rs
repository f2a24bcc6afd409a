//! Structured error types for the Folio layout engine.
//!
//! Registration errors surface before any content flows; flow errors abort
//! the whole document. Nothing is skipped or retried silently.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A template switch or the default template names an unregistered template.
    #[error("unknown page template '{0}'")]
    UnknownTemplate(String),

    /// A block does not fit even in the frames of a freshly started page.
    #[error(
        "{kind} block #{index} needs {height:.2}pt but the largest frame it was tried in holds {frame_height:.2}pt"
    )]
    BlockTooLarge {
        index: usize,
        kind: &'static str,
        height: f64,
        frame_height: f64,
    },

    /// A page break or template switch nested inside a list.
    #[error("{kind} directive inside list block #{index}")]
    DirectiveInList { index: usize, kind: &'static str },

    /// A page template was registered without any frames.
    #[error("page template '{0}' has no frames")]
    EmptyTemplate(String),

    /// Two page templates share a name.
    #[error("page template '{0}' is already registered")]
    DuplicateTemplate(String),

    /// A frame with a non-positive width or height.
    #[error("frame '{frame}' of page template '{template}' has no usable area")]
    InvalidFrame { template: String, frame: String },

    /// Content was pushed before any page template was registered.
    #[error("no page template registered")]
    NoTemplates,

    /// The measurer could not resolve a block's style reference.
    #[error("unknown style '{0}'")]
    UnknownStyle(String),

    /// The document was already finalized.
    #[error("document flow already finished")]
    AlreadyFinished,

    /// The page sink rejected a finished page.
    #[error("page sink failed: {0}")]
    Sink(String),

    /// JSON input failed to parse as a valid Folio document.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<std::io::Error> for FlowError {
    fn from(e: std::io::Error) -> Self {
        FlowError::Sink(e.to_string())
    }
}
