//! Dispatch facade over a configured pipeline.
//!
//! Construction of the typed message and the `process` call are always the
//! same two steps; the dispatcher folds them into one so callers hand in a
//! payload and get back the finished execution context.

use std::any::Any;

use mockable::{Clock, DefaultClock};

use crate::message::domain::{Command, Message, Query};
use crate::pipeline::{MessagePipeline, PipelineError};

/// Wraps a pipeline and a clock into a one-call dispatch surface.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use std::sync::Arc;
/// use courier::message::domain::{Command, ProcessingStatus};
/// use courier::message::services::dispatcher::MessageDispatcher;
/// use courier::pipeline::middlewares::HandlerLocatorMiddleware;
/// use courier::pipeline::MessagePipeline;
/// use courier::registry::{HandlerContainer, HandlerModule, HandlerSource};
///
/// struct CreateWidget {
///     name: String,
/// }
///
/// impl Command for CreateWidget {}
///
/// let module: Arc<dyn HandlerSource> = Arc::new(
///     HandlerModule::new("widgets").with_container(
///         HandlerContainer::marked("WidgetHandlers").command(
///             "handle_create_widget",
///             |_cmd: &CreateWidget| -> Result<(), Infallible> { Ok(()) },
///         ),
///     ),
/// );
///
/// let locator = HandlerLocatorMiddleware::new(vec![module]).expect("sources supplied");
/// let mut pipeline = MessagePipeline::new();
/// pipeline.append(Arc::new(locator));
///
/// let dispatcher = MessageDispatcher::new(pipeline);
/// let message = dispatcher
///     .dispatch_command(CreateWidget { name: "x".into() })
///     .expect("pipeline infrastructure is healthy");
/// assert_eq!(message.status(), ProcessingStatus::Completed);
/// ```
#[derive(Debug)]
pub struct MessageDispatcher<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    pipeline: MessagePipeline,
    clock: C,
}

impl MessageDispatcher<DefaultClock> {
    /// Creates a dispatcher over the pipeline with the system clock.
    #[must_use]
    pub fn new(pipeline: MessagePipeline) -> Self {
        Self::with_clock(pipeline, DefaultClock)
    }
}

impl<C> MessageDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher with an explicit clock.
    #[must_use]
    pub const fn with_clock(pipeline: MessagePipeline, clock: C) -> Self {
        Self { pipeline, clock }
    }

    /// Returns the underlying pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &MessagePipeline {
        &self.pipeline
    }

    /// Dispatches a command payload and returns its finished execution
    /// context.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for infrastructure failures; business
    /// failures are reported through the returned message's status and
    /// failure fields.
    pub fn dispatch_command<T: Command>(&self, payload: T) -> Result<Message, PipelineError> {
        let mut message = Message::command(payload, &self.clock);
        self.pipeline.process(&mut message)?;
        Ok(message)
    }

    /// Dispatches a query payload and returns its finished execution
    /// context; downcast the result from
    /// [`Message::query_result`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for infrastructure failures.
    pub fn dispatch_query<T: Query>(&self, payload: T) -> Result<Message, PipelineError> {
        let mut message = Message::query(payload, &self.clock);
        self.pipeline.process(&mut message)?;
        Ok(message)
    }

    /// Dispatches a query payload against a caller-supplied query object.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for infrastructure failures.
    pub fn dispatch_query_with_object<T: Query, S: Any + Send + Sync>(
        &self,
        payload: T,
        object: S,
    ) -> Result<Message, PipelineError> {
        let mut message = Message::query_with_object(payload, object, &self.clock);
        self.pipeline.process(&mut message)?;
        Ok(message)
    }
}
