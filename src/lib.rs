//! Courier: an in-process command/query message pipeline.
//!
//! Callers wrap an application payload in a typed [`message::domain::Message`],
//! run it through a configured [`pipeline::MessagePipeline`], and inspect the
//! returned execution context. Handler resolution, execution, and filtered
//! persistence are middleware concerns; the chain itself only drives them in
//! order.
//!
//! # Architecture
//!
//! Courier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure execution-context types with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, file)
//!
//! # Modules
//!
//! - [`message`]: Execution-context record, retrieval filter, repositories
//! - [`pipeline`]: Middleware chain and the built-in middlewares
//! - [`registry`]: Handler discovery sources and the resolution index

pub mod message;
pub mod pipeline;
pub mod registry;
