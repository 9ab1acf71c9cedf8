//! The middleware contract.

use crate::message::domain::Message;

use super::PipelineError;

/// One named step in the pipeline.
///
/// A middleware observes and may mutate the message: set its status, attach
/// a failure, record timing, persist it. Business failures belong on the
/// message; only infrastructure failures (a repository that cannot write, a
/// broken configuration) are returned, and those propagate to the
/// `process` caller.
///
/// The `id` must be unique within a pipeline; insertion enforces this.
/// A middleware may hold its own internal state across invocations (the
/// handler locator keeps its scanned index) but must be safe to call from
/// multiple dispatching threads.
pub trait Middleware: Send + Sync {
    /// Returns the middleware's identifier within the chain.
    fn id(&self) -> &str;

    /// Processes one message.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for infrastructure failures; these
    /// abort the `process` call.
    fn handle(&self, message: &mut Message) -> Result<(), PipelineError>;
}
