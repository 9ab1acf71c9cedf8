//! Repository port for message persistence.
//!
//! Defines the abstract interface the repository middleware persists
//! through. Retrieval is not part of the port: it is an external capability
//! built atop the same storage, consuming
//! [`crate::message::query::MessageQuery::matches`] as its row-acceptance
//! predicate.

use crate::message::domain::Message;
use crate::message::error::RepositoryError;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Port for persisting finished execution contexts.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - `add` is safe to call concurrently from multiple dispatching threads
/// - failed and rejected messages are stored exactly like completed ones
/// - a storage failure is reported, never swallowed; the pipeline treats it
///   as an infrastructure error and propagates it to the caller
pub trait MessageRepository: Send + Sync {
    /// Stores one message.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the underlying store rejects the
    /// write or cannot be reached.
    fn add(&self, message: &Message) -> RepositoryResult<()>;
}
