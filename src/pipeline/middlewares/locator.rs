//! Handler resolution and execution middleware.
//!
//! Given a command or query message, find the handler responsible for its
//! payload type in the prescanned index, record the resolution on the
//! message, and execute it. Resolution misses fall back to the payload's
//! self-handling capability (commands only) and finally to a terminal
//! rejected state — still returned through the message, so downstream
//! middlewares observe the failure.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use mockable::{Clock, DefaultClock};

use crate::message::domain::{ExecutionFailure, Message, Payload};
use crate::message::error::HandlerNotFoundError;
use crate::pipeline::{Middleware, PipelineError};
use crate::registry::HandlerInvoker;
use crate::registry::{HandlerIndex, HandlerSearchMethod, HandlerSource};

/// Method name recorded for the self-handling fallback.
const SELF_HANDLER_METHOD: &str = "handle_self";

struct LocatorState {
    search_method: HandlerSearchMethod,
    index: Arc<HandlerIndex>,
}

/// Resolves and executes the handler for each message's payload type.
///
/// The index over the supplied sources is built once at construction and
/// rebuilt when the search method changes; dispatches read an atomically
/// swapped snapshot, so a rebuild never races an in-flight resolution.
///
/// Handler failures are captured onto the message (`Failed`); a payload
/// with no handler anywhere ends `Rejected`. Neither aborts the chain.
pub struct HandlerLocatorMiddleware<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    id: String,
    sources: Vec<Arc<dyn HandlerSource>>,
    state: RwLock<LocatorState>,
    clock: C,
}

impl HandlerLocatorMiddleware<DefaultClock> {
    /// Creates a locator over the given handler sources with the default
    /// search method and system clock.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoHandlerSources`] when `sources` is empty.
    pub fn new(sources: Vec<Arc<dyn HandlerSource>>) -> Result<Self, PipelineError> {
        Self::with_clock(sources, DefaultClock)
    }
}

impl<C> HandlerLocatorMiddleware<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a locator with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoHandlerSources`] when `sources` is empty.
    pub fn with_clock(sources: Vec<Arc<dyn HandlerSource>>, clock: C) -> Result<Self, PipelineError> {
        if sources.is_empty() {
            return Err(PipelineError::NoHandlerSources);
        }
        let search_method = HandlerSearchMethod::default();
        let index = Arc::new(HandlerIndex::build(&sources, search_method));
        Ok(Self {
            id: "handler-locator".to_owned(),
            sources,
            state: RwLock::new(LocatorState {
                search_method,
                index,
            }),
            clock,
        })
    }

    /// Overrides the middleware id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the active search method.
    #[must_use]
    pub fn search_method(&self) -> HandlerSearchMethod {
        self.read_state().search_method
    }

    /// Switches the search method, rebuilding the index when it actually
    /// changes.
    ///
    /// Concurrent dispatches keep reading the previous index until the
    /// rebuilt one is swapped in.
    pub fn set_search_method(&self, search_method: HandlerSearchMethod) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if state.search_method != search_method {
            state.search_method = search_method;
            state.index = Arc::new(HandlerIndex::build(&self.sources, search_method));
        }
    }

    /// Returns a snapshot of the current index.
    #[must_use]
    pub fn index(&self) -> Arc<HandlerIndex> {
        Arc::clone(&self.read_state().index)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, LocatorState> {
        // A poisoned lock still holds a fully built index.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_command(&self, message: &mut Message) {
        let Some(invoker) = message.command_invoker() else {
            return;
        };
        message.begin_execution(self.clock.utc());
        let started = Instant::now();
        let outcome = invoker(message.content());
        let duration = elapsed_ms(started);
        match outcome {
            Ok(()) => message.complete(duration),
            Err(failure) => message.fail(failure, Some(duration)),
        }
    }

    fn run_query(&self, message: &mut Message) {
        let Some(invoker) = message.query_invoker() else {
            return;
        };
        message.begin_execution(self.clock.utc());
        let started = Instant::now();
        let outcome = invoker(message.query_object(), message.content());
        let duration = elapsed_ms(started);
        match outcome {
            Ok(result) => {
                message.set_query_result(result);
                message.complete(duration);
            }
            Err(failure) => message.fail(failure, Some(duration)),
        }
    }

    fn reject(&self, message: &mut Message, index: &HandlerIndex) {
        tracing::warn!(
            payload = message.content_type(),
            sources = %index.sources().join(","),
            "no handler found for payload"
        );
        message.reject(ExecutionFailure::capture(HandlerNotFoundError::new(
            message.content_type(),
        )));
    }
}

impl<C> Middleware for HandlerLocatorMiddleware<C>
where
    C: Clock + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn handle(&self, message: &mut Message) -> Result<(), PipelineError> {
        if message.status().is_terminal() {
            return Ok(());
        }

        let index = self.index();
        tracing::debug!(payload = message.content_type(), "resolving handler");

        let Some(indexed) = index.resolve(message.content().type_id(), message.kind()) else {
            match message.command_self_invoker() {
                Some(invoker) => {
                    message.resolve_command(
                        message.content_type().to_owned(),
                        SELF_HANDLER_METHOD.to_owned(),
                        invoker,
                    );
                    self.run_command(message);
                }
                None => self.reject(message, &index),
            }
            return Ok(());
        };

        tracing::debug!(
            payload = message.content_type(),
            container = indexed.container.as_str(),
            method = indexed.entry.name(),
            "handler resolved"
        );

        match indexed.entry.invoker() {
            HandlerInvoker::Command(invoker) => {
                message.resolve_command(
                    indexed.container.clone(),
                    indexed.entry.name().to_owned(),
                    Arc::clone(invoker),
                );
                self.run_command(message);
            }
            HandlerInvoker::Query { service, invoke } => {
                message.resolve_query(
                    indexed.container.clone(),
                    indexed.entry.name().to_owned(),
                    Arc::clone(invoke),
                );
                if let Some(spec) = service {
                    let supplied_matches = message
                        .query_object()
                        .is_some_and(|object| object.type_id() == spec.type_id);
                    if !supplied_matches {
                        let object: Payload = (spec.synthesize)();
                        message.set_query_object(object, true);
                    }
                }
                self.run_query(message);
            }
        }
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl<C> std::fmt::Debug for HandlerLocatorMiddleware<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerLocatorMiddleware")
            .field("id", &self.id)
            .field("search_method", &self.search_method())
            .field("indexed_handlers", &self.index().len())
            .finish_non_exhaustive()
    }
}
