//! Query parameters for selecting persisted messages.
//!
//! A [`MessageQuery`] is a set of optional predicates combined with AND
//! semantics. The repository middleware consumes it as its acceptance
//! filter; retrieval APIs built atop a store consume [`MessageQuery::matches`]
//! as their row-acceptance predicate together with the skip/take window.

use crate::message::domain::{Message, MessageId, MessageKind, ProcessingStatus};
use crate::message::error::MessageQueryError;
use chrono::{DateTime, Utc};

/// Default number of records a query returns.
pub const DEFAULT_TAKE: usize = 1000;

/// AND-combined predicate set over persisted messages.
///
/// Builder-style: each `with_*` call sets exactly one predicate. Predicates
/// that can be inconsistent validate at construction time rather than
/// silently producing an empty result set later.
///
/// # Examples
///
/// ```
/// use courier::message::domain::ProcessingStatus;
/// use courier::message::query::MessageQuery;
///
/// let query = MessageQuery::new()
///     .with_status(ProcessingStatus::Failed)
///     .with_execution_duration_above(100)
///     .expect("consistent bounds");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    id: Option<MessageId>,
    created_start: Option<DateTime<Utc>>,
    created_end: Option<DateTime<Utc>>,
    content_type: Option<String>,
    error_type: Option<String>,
    status: Option<ProcessingStatus>,
    kind: Option<MessageKind>,
    duration_above: Option<u64>,
    duration_below: Option<u64>,
    skip: usize,
    take: Option<usize>,
}

impl MessageQuery {
    /// Creates an empty query matching every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the message with the given identifier.
    #[must_use]
    pub const fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Filters messages created at or after the given instant.
    #[must_use]
    pub const fn with_created_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.created_start = Some(start);
        self
    }

    /// Filters messages created at or before the given instant.
    #[must_use]
    pub const fn with_created_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.created_end = Some(end);
        self
    }

    /// Filters messages whose payload type name equals `content_type`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageQueryError::BlankContentType`] when the name is
    /// empty or whitespace.
    pub fn with_content_type(
        mut self,
        content_type: impl Into<String>,
    ) -> Result<Self, MessageQueryError> {
        let content_type = content_type.into();
        if content_type.trim().is_empty() {
            return Err(MessageQueryError::BlankContentType);
        }
        self.content_type = Some(content_type);
        Ok(self)
    }

    /// Filters messages whose captured error type name equals `error_type`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageQueryError::BlankErrorType`] when the name is empty
    /// or whitespace.
    pub fn with_error_type(
        mut self,
        error_type: impl Into<String>,
    ) -> Result<Self, MessageQueryError> {
        let error_type = error_type.into();
        if error_type.trim().is_empty() {
            return Err(MessageQueryError::BlankErrorType);
        }
        self.error_type = Some(error_type);
        Ok(self)
    }

    /// Filters messages with the given dispatch status.
    #[must_use]
    pub const fn with_status(mut self, status: ProcessingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters messages of the given kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filters messages whose execution duration is at or above the given
    /// number of milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`MessageQueryError::DurationRange`] when an already-set
    /// upper bound is below `duration`.
    pub fn with_execution_duration_above(mut self, duration: u64) -> Result<Self, MessageQueryError> {
        if let Some(below) = self.duration_below
            && duration > below
        {
            return Err(MessageQueryError::DurationRange {
                lower: duration,
                upper: below,
            });
        }
        self.duration_above = Some(duration);
        Ok(self)
    }

    /// Filters messages whose execution duration is at or below the given
    /// number of milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`MessageQueryError::DurationRange`] when an already-set
    /// lower bound exceeds `duration`.
    pub fn with_execution_duration_below(mut self, duration: u64) -> Result<Self, MessageQueryError> {
        if let Some(above) = self.duration_above
            && duration < above
        {
            return Err(MessageQueryError::DurationRange {
                lower: above,
                upper: duration,
            });
        }
        self.duration_below = Some(duration);
        Ok(self)
    }

    /// Restricts the output window.
    ///
    /// `skip` records are passed over before `take` records are returned.
    #[must_use]
    pub const fn with_range(mut self, skip: usize, take: usize) -> Self {
        self.skip = skip;
        self.take = Some(take);
        self
    }

    /// Returns how many records to pass over.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.skip
    }

    /// Returns how many records to return, defaulting to [`DEFAULT_TAKE`].
    #[must_use]
    pub fn take(&self) -> usize {
        self.take.unwrap_or(DEFAULT_TAKE)
    }

    /// Evaluates all set predicates against a message with AND semantics,
    /// short-circuiting on the first miss.
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        if self.id.is_some_and(|id| message.id() != id) {
            return false;
        }
        if self
            .created_start
            .is_some_and(|start| message.created_at() < start)
        {
            return false;
        }
        if self.created_end.is_some_and(|end| message.created_at() > end) {
            return false;
        }
        if self
            .content_type
            .as_deref()
            .is_some_and(|content_type| message.content_type() != content_type)
        {
            return false;
        }
        if self
            .error_type
            .as_deref()
            .is_some_and(|error_type| message.error_type() != error_type)
        {
            return false;
        }
        if self.status.is_some_and(|status| message.status() != status) {
            return false;
        }
        if self.kind.is_some_and(|kind| message.kind() != kind) {
            return false;
        }
        let duration = message.execution_duration_ms().unwrap_or_default();
        if self.duration_above.is_some_and(|above| duration < above) {
            return false;
        }
        if self.duration_below.is_some_and(|below| duration > below) {
            return false;
        }
        true
    }
}
