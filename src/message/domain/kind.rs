//! Discriminator between command and query execution contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a message carries.
///
/// Commands change state and, by convention, produce no return value;
/// queries are read-only and produce a result the caller downcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// A state-changing operation with no return value.
    Command,
    /// A read-only operation producing a result.
    Query,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Query => write!(f, "query"),
        }
    }
}
