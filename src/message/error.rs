//! Domain error types for message dispatch and persistence.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants that
//! can be inspected by callers. Business failures (handler not found, a
//! handler erred) are captured onto the message rather than returned;
//! infrastructure failures (repository, configuration) are returned.

use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// No handler could be resolved for a payload's runtime type.
///
/// Captured onto the message as its terminal failure; never thrown to the
/// pipeline caller.
#[derive(Debug, Clone, Error)]
#[error(
    "no handler found for payload type {payload_type}; make sure a matching handler \
     is registered in one of the pipeline's handler sources"
)]
pub struct HandlerNotFoundError {
    payload_type: String,
}

impl HandlerNotFoundError {
    /// Creates the error for the given payload type name.
    #[must_use]
    pub fn new(payload_type: impl Into<String>) -> Self {
        Self {
            payload_type: payload_type.into(),
        }
    }

    /// Returns the payload type name that failed to resolve.
    #[must_use]
    pub fn payload_type(&self) -> &str {
        &self.payload_type
    }
}

/// A handler invoker received a payload of the wrong runtime type.
///
/// Unreachable through the public API: the locator only invokes a handler
/// after its registered payload type matched.
#[derive(Debug, Clone, Error)]
#[error("handler registered for {expected} received payload of type {actual}")]
pub struct PayloadTypeMismatchError {
    expected: &'static str,
    actual: &'static str,
}

impl PayloadTypeMismatchError {
    /// Creates the error for a handler expecting payload type `T`.
    #[must_use]
    pub fn for_handler<T>(actual: &'static str) -> Self {
        Self {
            expected: std::any::type_name::<T>(),
            actual,
        }
    }
}

/// A service-bound query handler was invoked without a query object.
///
/// Unreachable through the public API: the locator synthesises a query
/// object before invoking a service-bound handler.
#[derive(Debug, Clone, Error)]
#[error("query handler bound to service {service} was invoked without a query object")]
pub struct QueryObjectMissingError {
    service: &'static str,
}

impl QueryObjectMissingError {
    /// Creates the error for a handler bound to service type `S`.
    #[must_use]
    pub fn for_service<S>() -> Self {
        Self {
            service: std::any::type_name::<S>(),
        }
    }
}

/// Errors raised while building a [`crate::message::query::MessageQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageQueryError {
    /// The duration bounds contradict each other.
    #[error("execution duration lower bound {lower}ms exceeds upper bound {upper}ms")]
    DurationRange {
        /// The requested lower bound in milliseconds.
        lower: u64,
        /// The requested upper bound in milliseconds.
        upper: u64,
    },

    /// The content-type predicate was blank.
    #[error("content type filter cannot be blank")]
    BlankContentType,

    /// The error-type predicate was blank.
    #[error("error type filter cannot be blank")]
    BlankErrorType,
}

/// Errors that can occur during message persistence.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(Arc<dyn Error + Send + Sync>),

    /// A record could not be serialised or deserialised.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store could not be reached or its state was unusable.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RepositoryError {
    /// Creates a storage error from any error type.
    #[must_use]
    pub fn storage(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
