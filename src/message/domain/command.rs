//! Command payload capability and the command-specific message state.

use super::{ExecutionFailure, Payload};
use crate::message::error::PayloadTypeMismatchError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Erased handler invocation for a command payload.
pub type CommandInvoker = Arc<dyn Fn(&Payload) -> Result<(), ExecutionFailure> + Send + Sync>;

/// Capability trait for command payloads.
///
/// Most commands are plain data and need only the empty impl:
///
/// ```
/// use courier::message::domain::Command;
///
/// struct CreateWidget {
///     name: String,
/// }
///
/// impl Command for CreateWidget {}
/// ```
///
/// A payload type may opt into the self-handling fallback by overriding both
/// methods; the handler locator consults it only after the registry lookup
/// misses.
pub trait Command: Any + Send + Sync {
    /// Returns `true` when this payload executes itself if no registered
    /// handler matches.
    fn handles_self(&self) -> bool {
        false
    }

    /// Self-execution entry point, invoked only when [`Command::handles_self`]
    /// returns `true`.
    fn handle_self(&self) -> Result<(), ExecutionFailure> {
        Ok(())
    }
}

/// Command-specific execution state.
///
/// Resolution fields are written by the handler locator; the self-handling
/// invoker is captured at construction while the payload's concrete type is
/// still known.
#[derive(Clone, Default)]
pub(crate) struct CommandBody {
    pub(crate) handler_container: Option<String>,
    pub(crate) handler_method: Option<String>,
    pub(crate) handler: Option<CommandInvoker>,
    pub(crate) self_invoker: Option<CommandInvoker>,
}

impl CommandBody {
    pub(crate) fn for_payload<C: Command>(payload: &C) -> Self {
        let self_invoker: Option<CommandInvoker> = payload.handles_self().then(|| {
            Arc::new(|content: &Payload| {
                content.downcast_ref::<C>().map_or_else(
                    || {
                        Err(ExecutionFailure::capture(
                            PayloadTypeMismatchError::for_handler::<C>(content.type_name()),
                        ))
                    },
                    Command::handle_self,
                )
            }) as CommandInvoker
        });
        Self {
            self_invoker,
            ..Self::default()
        }
    }
}

impl fmt::Debug for CommandBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBody")
            .field("handler_container", &self.handler_container)
            .field("handler_method", &self.handler_method)
            .field("self_handling", &self.self_invoker.is_some())
            .finish_non_exhaustive()
    }
}
