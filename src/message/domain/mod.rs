//! Domain types for the message subsystem.
//!
//! This module contains pure execution-context types with no infrastructure
//! dependencies. Identity, payload, and creation time are immutable after
//! construction; status, timing, and failure state advance only through
//! pipeline-internal transitions.

mod command;
mod failure;
mod ids;
mod kind;
mod message;
mod payload;
mod query;
mod status;

pub use command::{Command, CommandInvoker};
pub use failure::ExecutionFailure;
pub use ids::MessageId;
pub use kind::MessageKind;
pub use message::Message;
pub use payload::Payload;
pub use query::{Query, QueryInvoker};
pub use status::ProcessingStatus;
