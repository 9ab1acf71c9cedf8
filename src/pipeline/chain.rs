//! The ordered middleware chain.

use std::sync::Arc;

use crate::message::domain::Message;

use super::middleware::Middleware;
use super::PipelineError;

/// An ordered, caller-configured chain of middlewares.
///
/// Order is significant and wholly caller-controlled: `append` adds to the
/// end, the insert operations place a middleware relative to an existing
/// one by id. Middlewares are shared (`Arc`) so a caller can keep a handle
/// to one — the locator, say — and reconfigure it after installation.
///
/// `process` drives each middleware in chain order on the calling thread.
/// There is no early termination: a middleware that marks the message
/// failed simply leaves it failed, and every later middleware still runs.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use courier::message::domain::Message;
/// use courier::pipeline::{Middleware, MessagePipeline, PipelineError};
///
/// struct Noop;
///
/// impl Middleware for Noop {
///     fn id(&self) -> &str {
///         "noop"
///     }
///
///     fn handle(&self, _message: &mut Message) -> Result<(), PipelineError> {
///         Ok(())
///     }
/// }
///
/// let mut pipeline = MessagePipeline::new();
/// pipeline.append(Arc::new(Noop));
/// assert_eq!(pipeline.middleware_ids(), ["noop"]);
/// ```
#[derive(Default)]
pub struct MessagePipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MessagePipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware at the end of the chain.
    ///
    /// Call order is preserved; no uniqueness check is performed here.
    pub fn append(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Inserts a middleware immediately after the middleware with the given
    /// id, or at position 1 (right after the head) when no id is given.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateMiddlewareId`] when a middleware
    /// with the same id is already present, and
    /// [`PipelineError::MiddlewareNotFound`] when the anchor id is unknown.
    /// The chain is unchanged on error.
    pub fn insert_after(
        &mut self,
        middleware: Arc<dyn Middleware>,
        after_id: Option<&str>,
    ) -> Result<(), PipelineError> {
        let position = match after_id {
            Some(id) => self.position_of(id)?.saturating_add(1),
            None => self.middlewares.len().min(1),
        };
        self.insert_unique(middleware, position)
    }

    /// Inserts a middleware immediately before the middleware with the
    /// given id, or at position 0 when no id is given.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateMiddlewareId`] when a middleware
    /// with the same id is already present, and
    /// [`PipelineError::MiddlewareNotFound`] when the anchor id is unknown.
    /// The chain is unchanged on error.
    pub fn insert_before(
        &mut self,
        middleware: Arc<dyn Middleware>,
        before_id: Option<&str>,
    ) -> Result<(), PipelineError> {
        let position = match before_id {
            Some(id) => self.position_of(id)?,
            None => 0,
        };
        self.insert_unique(middleware, position)
    }

    /// Returns the current chain in order.
    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Returns the ids of the current chain in order.
    #[must_use]
    pub fn middleware_ids(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.id()).collect()
    }

    /// Drives the message through every middleware in chain order,
    /// synchronously, on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] a middleware raises. Business
    /// failures do not surface here; inspect the message's status and
    /// failure fields instead.
    pub fn process(&self, message: &mut Message) -> Result<(), PipelineError> {
        for middleware in &self.middlewares {
            middleware.handle(message)?;
        }
        Ok(())
    }

    fn position_of(&self, id: &str) -> Result<usize, PipelineError> {
        self.middlewares
            .iter()
            .position(|m| m.id() == id)
            .ok_or_else(|| PipelineError::MiddlewareNotFound { id: id.to_owned() })
    }

    fn insert_unique(
        &mut self,
        middleware: Arc<dyn Middleware>,
        position: usize,
    ) -> Result<(), PipelineError> {
        if self.middlewares.iter().any(|m| m.id() == middleware.id()) {
            return Err(PipelineError::DuplicateMiddlewareId {
                id: middleware.id().to_owned(),
            });
        }
        self.middlewares.insert(position, middleware);
        Ok(())
    }
}

impl std::fmt::Debug for MessagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagePipeline")
            .field("middlewares", &self.middleware_ids())
            .finish()
    }
}
