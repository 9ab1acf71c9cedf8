//! In-memory implementation of the `MessageRepository` port.
//!
//! Keeps full message clones in insertion order, so it supports complete
//! [`MessageQuery`] retrieval including pagination. Thread-safe via an
//! internal [`RwLock`]; suited to tests and short-lived diagnostics, not
//! durable storage.

use std::sync::{Arc, RwLock};

use crate::message::domain::Message;
use crate::message::error::RepositoryError;
use crate::message::ports::repository::{MessageRepository, RepositoryResult};
use crate::message::query::MessageQuery;

/// In-memory implementation of [`MessageRepository`].
///
/// # Example
///
/// ```
/// use courier::message::adapters::memory::InMemoryMessageRepository;
///
/// let repo = InMemoryMessageRepository::new();
/// assert!(repo.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty repository. For error-propagating access, use
    /// [`InMemoryMessageRepository::query`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored messages accepted by the query, in insertion
    /// order, windowed by the query's skip/take range.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Connection`] when the internal lock is
    /// poisoned.
    pub fn query(&self, query: &MessageQuery) -> RepositoryResult<Vec<Message>> {
        let guard = self
            .messages
            .read()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        Ok(guard
            .iter()
            .filter(|message| query.matches(message))
            .skip(query.skip())
            .take(query.take())
            .cloned()
            .collect())
    }
}

impl MessageRepository for InMemoryMessageRepository {
    fn add(&self, message: &Message) -> RepositoryResult<()> {
        let mut guard = self
            .messages
            .write()
            .map_err(|e| RepositoryError::connection(format!("lock poisoned: {e}")))?;

        guard.push(message.clone());
        Ok(())
    }
}
