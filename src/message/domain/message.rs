//! The execution-context record driven through the pipeline.
//!
//! A message is created per dispatch call and discarded after the pipeline
//! returns; only instances persisted by the repository middleware outlive
//! the call.

use super::command::CommandBody;
use super::query::QueryBody;
use super::{
    Command, CommandInvoker, ExecutionFailure, MessageId, MessageKind, Payload, ProcessingStatus,
    Query, QueryInvoker,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::any::Any;
use std::fmt;

/// Execution context for one command or query dispatch.
///
/// Identity, payload, and creation time are fixed at construction. Status,
/// timing, resolution, and failure state are written by middlewares as the
/// message moves through the chain; callers read them back after
/// [`crate::pipeline::MessagePipeline::process`] returns.
///
/// # Invariants
///
/// - `id` is generated once and never reused
/// - `status` moves strictly forward and never leaves a terminal state
/// - after a terminal state, exactly one of {query result, failure} is
///   populated: `Completed` implies no failure, `Failed`/`Rejected` imply a
///   captured failure
///
/// # Examples
///
/// ```
/// use courier::message::domain::{Command, Message, MessageKind, ProcessingStatus};
/// use mockable::DefaultClock;
///
/// struct CreateWidget {
///     name: String,
/// }
///
/// impl Command for CreateWidget {}
///
/// let clock = DefaultClock;
/// let message = Message::command(CreateWidget { name: "x".into() }, &clock);
/// assert_eq!(message.kind(), MessageKind::Command);
/// assert_eq!(message.status(), ProcessingStatus::NotRun);
/// assert_eq!(message.error_message(), "");
/// ```
#[derive(Clone)]
pub struct Message {
    id: MessageId,
    content: Payload,
    status: ProcessingStatus,
    created_at: DateTime<Utc>,
    executed_at: Option<DateTime<Utc>>,
    execution_duration_ms: Option<u64>,
    failure: Option<ExecutionFailure>,
    body: MessageBody,
}

/// Variant-specific execution state.
#[derive(Clone, Debug)]
pub(crate) enum MessageBody {
    Command(CommandBody),
    Query(QueryBody),
}

impl Message {
    /// Wraps a command payload in a fresh execution context.
    #[must_use]
    pub fn command<C: Command>(payload: C, clock: &impl Clock) -> Self {
        let body = CommandBody::for_payload(&payload);
        Self::new(Payload::new(payload), MessageBody::Command(body), clock)
    }

    /// Wraps a query payload in a fresh execution context.
    #[must_use]
    pub fn query<Q: Query>(payload: Q, clock: &impl Clock) -> Self {
        Self::new(
            Payload::new(payload),
            MessageBody::Query(QueryBody::default()),
            clock,
        )
    }

    /// Wraps a query payload together with the query object the handler
    /// should run against.
    ///
    /// Service-bound handlers use the supplied object when its type matches
    /// the registration; otherwise the locator synthesises one and flags it.
    #[must_use]
    pub fn query_with_object<Q: Query, S: Any + Send + Sync>(
        payload: Q,
        object: S,
        clock: &impl Clock,
    ) -> Self {
        let body = QueryBody {
            query_object: Some(Payload::new(object)),
            ..QueryBody::default()
        };
        Self::new(Payload::new(payload), MessageBody::Query(body), clock)
    }

    fn new(content: Payload, body: MessageBody, clock: &impl Clock) -> Self {
        Self {
            id: MessageId::new(),
            content,
            status: ProcessingStatus::NotRun,
            created_at: clock.utc(),
            executed_at: None,
            execution_duration_ms: None,
            failure: None,
            body,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the payload envelope.
    #[must_use]
    pub const fn content(&self) -> &Payload {
        &self.content
    }

    /// Returns the payload's captured type name.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content.type_name()
    }

    /// Returns whether this is a command or a query context.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self.body {
            MessageBody::Command(_) => MessageKind::Command,
            MessageBody::Query(_) => MessageKind::Query,
        }
    }

    /// Returns the current dispatch status.
    #[must_use]
    pub const fn status(&self) -> ProcessingStatus {
        self.status
    }

    /// Returns when the message was constructed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when handler execution began, once it has.
    #[must_use]
    pub const fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    /// Returns the handler's elapsed execution time in whole milliseconds.
    #[must_use]
    pub const fn execution_duration_ms(&self) -> Option<u64> {
        self.execution_duration_ms
    }

    /// Returns the captured failure, if dispatch failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&ExecutionFailure> {
        self.failure.as_ref()
    }

    /// Returns the failure's display message, or an empty string when
    /// dispatch has not failed.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.failure.as_ref().map_or("", ExecutionFailure::message)
    }

    /// Returns the failure's concrete error type name, or an empty string
    /// when dispatch has not failed.
    #[must_use]
    pub fn error_type(&self) -> &str {
        self.failure
            .as_ref()
            .map_or("", |failure| failure.type_name())
    }

    /// Returns the resolved handler container's name, once resolution ran.
    #[must_use]
    pub fn handler_container(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Command(body) => body.handler_container.as_deref(),
            MessageBody::Query(body) => body.handler_container.as_deref(),
        }
    }

    /// Returns the resolved handler method's name, once resolution ran.
    #[must_use]
    pub fn handler_method(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Command(body) => body.handler_method.as_deref(),
            MessageBody::Query(body) => body.handler_method.as_deref(),
        }
    }

    /// Returns the query object the handler ran (or will run) against.
    ///
    /// Always `None` for commands.
    #[must_use]
    pub const fn query_object(&self) -> Option<&Payload> {
        match &self.body {
            MessageBody::Command(_) => None,
            MessageBody::Query(body) => body.query_object.as_ref(),
        }
    }

    /// Returns `true` when the locator synthesised the query object because
    /// the caller supplied none.
    #[must_use]
    pub const fn has_synthesized_query_object(&self) -> bool {
        match &self.body {
            MessageBody::Command(_) => false,
            MessageBody::Query(body) => body.synthesized_query_object,
        }
    }

    /// Returns the query's execution result for the caller to downcast.
    ///
    /// Always `None` for commands and for unsuccessful dispatches.
    #[must_use]
    pub const fn query_result(&self) -> Option<&Payload> {
        match &self.body {
            MessageBody::Command(_) => None,
            MessageBody::Query(body) => body.result.as_ref(),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline-internal mutation
    // ------------------------------------------------------------------

    pub(crate) fn resolve_command(
        &mut self,
        container: String,
        method: String,
        handler: CommandInvoker,
    ) {
        if let MessageBody::Command(body) = &mut self.body {
            body.handler_container = Some(container);
            body.handler_method = Some(method);
            body.handler = Some(handler);
        }
    }

    pub(crate) fn resolve_query(
        &mut self,
        container: String,
        method: String,
        handler: QueryInvoker,
    ) {
        if let MessageBody::Query(body) = &mut self.body {
            body.handler_container = Some(container);
            body.handler_method = Some(method);
            body.handler = Some(handler);
        }
    }

    pub(crate) fn command_invoker(&self) -> Option<CommandInvoker> {
        match &self.body {
            MessageBody::Command(body) => body.handler.clone(),
            MessageBody::Query(_) => None,
        }
    }

    pub(crate) fn command_self_invoker(&self) -> Option<CommandInvoker> {
        match &self.body {
            MessageBody::Command(body) => body.self_invoker.clone(),
            MessageBody::Query(_) => None,
        }
    }

    pub(crate) fn query_invoker(&self) -> Option<QueryInvoker> {
        match &self.body {
            MessageBody::Command(_) => None,
            MessageBody::Query(body) => body.handler.clone(),
        }
    }

    pub(crate) fn set_query_object(&mut self, object: Payload, synthesized: bool) {
        if let MessageBody::Query(body) = &mut self.body {
            body.query_object = Some(object);
            body.synthesized_query_object = synthesized;
        }
    }

    pub(crate) fn set_query_result(&mut self, result: Payload) {
        if let MessageBody::Query(body) = &mut self.body {
            body.result = Some(result);
        }
    }

    pub(crate) fn begin_execution(&mut self, started_at: DateTime<Utc>) {
        if self.status.can_advance_to(ProcessingStatus::Running) {
            self.status = ProcessingStatus::Running;
            self.executed_at = Some(started_at);
        }
    }

    pub(crate) fn complete(&mut self, duration_ms: u64) {
        if self.status.can_advance_to(ProcessingStatus::Completed) {
            debug_assert!(self.failure.is_none(), "completing a failed message");
            self.status = ProcessingStatus::Completed;
            self.execution_duration_ms = Some(duration_ms);
        }
    }

    pub(crate) fn fail(&mut self, failure: ExecutionFailure, duration_ms: Option<u64>) {
        if self.status.can_advance_to(ProcessingStatus::Failed) {
            self.status = ProcessingStatus::Failed;
            self.failure = Some(failure);
            self.execution_duration_ms = duration_ms;
        }
    }

    pub(crate) fn reject(&mut self, failure: ExecutionFailure) {
        if self.status.can_advance_to(ProcessingStatus::Rejected) {
            self.status = ProcessingStatus::Rejected;
            self.failure = Some(failure);
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("content_type", &self.content_type())
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("executed_at", &self.executed_at)
            .field("execution_duration_ms", &self.execution_duration_ms)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}
