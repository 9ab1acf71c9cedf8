//! Execution-context record and persistence boundary for courier.
//!
//! A [`domain::Message`] wraps a single command or query payload together
//! with its dispatch status, timing, and captured failure state. Middlewares
//! mutate the record as it moves through the pipeline; once dispatch
//! finishes, the record is the caller's single source of truth about what
//! happened.
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure execution-context types ([`domain::Message`],
//!   [`domain::ProcessingStatus`], [`domain::Payload`])
//! - **Ports**: Abstract trait interfaces
//!   ([`ports::repository::MessageRepository`])
//! - **Adapters**: Concrete implementations
//!   ([`adapters::memory::InMemoryMessageRepository`],
//!   [`adapters::file::JsonFileMessageRepository`])
//! - **Services**: Dispatch orchestration
//!   ([`services::dispatcher::MessageDispatcher`])
//!
//! Retrieval of persisted messages goes through [`query::MessageQuery`], an
//! AND-combined predicate set that doubles as the repository middleware's
//! acceptance filter.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
