//! Persistence middleware.
//!
//! Saves the finished execution context through an injected repository,
//! subject to an optional acceptance filter. Runs for every message it
//! observes — completed, failed, and rejected alike — so the store sees the
//! whole dispatch history.

use std::sync::Arc;

use crate::message::domain::Message;
use crate::message::ports::repository::MessageRepository;
use crate::message::query::MessageQuery;
use crate::pipeline::{Middleware, PipelineError};

/// Persists messages through a [`MessageRepository`].
///
/// With no filter, every message is persisted. The filter decision is
/// evaluated exactly once per message, with no retry. A repository failure
/// is not swallowed here: it propagates out of `process`, since persistence
/// failures are operational problems rather than business failures.
pub struct RepositoryMiddleware {
    id: String,
    repository: Arc<dyn MessageRepository>,
    filter: Option<MessageQuery>,
}

impl RepositoryMiddleware {
    /// Creates the middleware around a repository, persisting every
    /// message.
    #[must_use]
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self {
            id: "repository".to_owned(),
            repository,
            filter: None,
        }
    }

    /// Restricts persistence to messages the filter accepts.
    #[must_use]
    pub fn with_filter(mut self, filter: MessageQuery) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Overrides the middleware id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Middleware for RepositoryMiddleware {
    fn id(&self) -> &str {
        &self.id
    }

    fn handle(&self, message: &mut Message) -> Result<(), PipelineError> {
        if let Some(filter) = &self.filter
            && !filter.matches(message)
        {
            return Ok(());
        }
        self.repository.add(message)?;
        Ok(())
    }
}

impl std::fmt::Debug for RepositoryMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryMiddleware")
            .field("id", &self.id)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}
