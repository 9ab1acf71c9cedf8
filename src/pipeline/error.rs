//! Pipeline configuration and processing errors.

use thiserror::Error;

use crate::message::error::RepositoryError;

/// Infrastructure errors raised by pipeline configuration or processing.
///
/// Business failures never appear here; they are captured onto the message
/// and reported through its status and failure fields.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A middleware with this id is already present in the chain.
    ///
    /// Raised at configuration time by the insert operations; the existing
    /// chain is left unchanged.
    #[error("middleware with id '{id}' already exists in the pipeline")]
    DuplicateMiddlewareId {
        /// The offending middleware id.
        id: String,
    },

    /// The named insertion anchor is not present in the chain.
    #[error("middleware with id '{id}' not found in the pipeline")]
    MiddlewareNotFound {
        /// The id that was searched for.
        id: String,
    },

    /// The handler locator was constructed without any handler sources.
    #[error("handler sources to scan were not specified")]
    NoHandlerSources,

    /// Persisting a message failed.
    ///
    /// Propagates out of `process`: a store that cannot write is an
    /// operational problem, not a business failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
