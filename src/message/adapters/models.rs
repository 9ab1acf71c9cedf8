//! Serialisable row model for persisted messages.
//!
//! The payload envelope is type-erased and carries no serde obligation, so
//! stores persist this projection of the execution context instead: every
//! common field survives, the payload body does not.

use crate::message::domain::{Message, MessageId, MessageKind, ProcessingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistable projection of a finished [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// The message identifier.
    pub id: MessageId,
    /// Command or query.
    pub kind: MessageKind,
    /// The dispatch status at persistence time.
    pub status: ProcessingStatus,
    /// The payload's captured type name.
    pub content_type: String,
    /// When the message was constructed.
    pub created_at: DateTime<Utc>,
    /// When handler execution began, if it did.
    pub executed_at: Option<DateTime<Utc>>,
    /// Handler execution time in whole milliseconds, if it ran.
    pub execution_duration_ms: Option<u64>,
    /// The captured failure's error type name, if dispatch failed.
    pub error_type: Option<String>,
    /// The captured failure's display message, if dispatch failed.
    pub error_message: Option<String>,
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id(),
            kind: message.kind(),
            status: message.status(),
            content_type: message.content_type().to_owned(),
            created_at: message.created_at(),
            executed_at: message.executed_at(),
            execution_duration_ms: message.execution_duration_ms(),
            error_type: message.failure().map(|f| f.type_name().to_owned()),
            error_message: message.failure().map(|f| f.message().to_owned()),
        }
    }
}
