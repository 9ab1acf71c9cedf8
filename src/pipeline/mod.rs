//! The middleware chain and the built-in middlewares.
//!
//! A [`MessagePipeline`] is an ordered, caller-configured sequence of
//! [`Middleware`]s driven synchronously over one message per dispatch.
//! The chain never short-circuits: a middleware that fails a message leaves
//! its status terminal and later middlewares decide for themselves whether
//! to act, so cross-cutting concerns (persistence, auditing) observe every
//! message regardless of upstream failure.
//!
//! Configure the chain once, then dispatch; mutating the chain while
//! `process` calls are in flight on other threads is a caller error.

mod chain;
mod error;
mod middleware;
pub mod middlewares;

pub use chain::MessagePipeline;
pub use error::PipelineError;
pub use middleware::Middleware;

#[cfg(test)]
mod tests;
