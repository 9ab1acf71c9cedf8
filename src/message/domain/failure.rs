//! Captured handler-failure state.

use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Failure information captured when a handler (or resolution) fails.
///
/// The error is recorded as data on the message rather than re-thrown: the
/// display message, the concrete error type's name, a backtrace snapshot
/// taken at capture time (the dispatch context of the original failure
/// site), and the source error itself for callers that need to inspect it.
#[derive(Debug, Clone)]
pub struct ExecutionFailure {
    message: String,
    type_name: &'static str,
    trace: Option<String>,
    source: Option<Arc<dyn Error + Send + Sync>>,
}

impl ExecutionFailure {
    /// Captures a failure from a concrete error value.
    ///
    /// The backtrace is snapshotted here, so capture as close to the failure
    /// site as possible.
    #[must_use]
    pub fn capture<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self {
            message: error.to_string(),
            type_name: std::any::type_name::<E>(),
            trace: Some(Backtrace::force_capture().to_string()),
            source: Some(Arc::new(error)),
        }
    }

    /// Returns the failure's display message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the concrete error type's name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the backtrace snapshot taken at capture time.
    #[must_use]
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Returns the captured source error.
    #[must_use]
    pub fn source(&self) -> Option<&(dyn Error + Send + Sync)> {
        self.source.as_deref()
    }
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}
