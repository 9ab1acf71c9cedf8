//! Handler discovery sources and typed registration.
//!
//! A source enumerates named handler containers; each container entry binds
//! a payload type to a handler closure, erased behind the payload-envelope
//! invoker so the index stores one shape regardless of the concrete types.

use std::any::{Any, TypeId};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::message::domain::{
    CommandInvoker, ExecutionFailure, MessageKind, Payload, QueryInvoker,
};
use crate::message::error::{PayloadTypeMismatchError, QueryObjectMissingError};

/// A handler source could not be enumerated.
///
/// The locator logs this at error level during an index build and continues
/// with the remaining sources; a partially loadable source set must not
/// crash the host.
#[derive(Debug, Clone, Error)]
#[error("handler source {source_name} could not be enumerated: {reason}")]
pub struct ScanError {
    source_name: String,
    reason: String,
}

impl ScanError {
    /// Creates a scan error for the named source.
    #[must_use]
    pub fn new(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the source that failed to enumerate.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// An enumerable supply of handler containers.
///
/// The host decides what backs a source: the in-crate [`HandlerModule`] is
/// a plain bundle assembled at startup, but anything that can enumerate
/// containers qualifies (a plugin boundary, a lazily loaded module set).
pub trait HandlerSource: Send + Sync {
    /// Returns the source's name, used in diagnostics.
    fn name(&self) -> &str;

    /// Enumerates the source's handler containers.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the source cannot be enumerated.
    fn containers(&self) -> Result<Vec<HandlerContainer>, ScanError>;
}

/// Erased invocation stored behind a handler entry.
#[derive(Clone)]
pub(crate) enum HandlerInvoker {
    Command(CommandInvoker),
    Query {
        service: Option<ServiceSpec>,
        invoke: QueryInvoker,
    },
}

/// Service binding for a query handler registered against a service type.
#[derive(Clone)]
pub(crate) struct ServiceSpec {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) synthesize: Arc<dyn Fn() -> Payload + Send + Sync>,
}

/// One registered handler: a payload type bound to an erased invocation.
#[derive(Clone)]
pub struct HandlerEntry {
    name: String,
    payload_type: TypeId,
    payload_type_name: &'static str,
    invoker: HandlerInvoker,
}

impl HandlerEntry {
    /// Returns the handler method's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the [`TypeId`] of the payload type this entry accepts.
    #[must_use]
    pub const fn payload_type(&self) -> TypeId {
        self.payload_type
    }

    /// Returns the name of the payload type this entry accepts.
    #[must_use]
    pub const fn payload_type_name(&self) -> &'static str {
        self.payload_type_name
    }

    /// Returns whether the entry handles commands or queries.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self.invoker {
            HandlerInvoker::Command(_) => MessageKind::Command,
            HandlerInvoker::Query { .. } => MessageKind::Query,
        }
    }

    pub(crate) const fn invoker(&self) -> &HandlerInvoker {
        &self.invoker
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("payload_type_name", &self.payload_type_name)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// A named group of handler entries, analogous to a handler class.
///
/// Containers qualify for the index under the locator's active search
/// method: explicitly marked containers, or containers whose name carries
/// the conventional suffix.
///
/// # Examples
///
/// ```
/// use courier::registry::HandlerContainer;
///
/// struct CreateWidget {
///     name: String,
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("widget rejected")]
/// struct WidgetError;
///
/// let container = HandlerContainer::marked("WidgetHandlers")
///     .command("handle_create_widget", |_cmd: &CreateWidget| -> Result<(), WidgetError> {
///         Ok(())
///     });
/// assert_eq!(container.entries().len(), 1);
/// ```
#[derive(Clone)]
pub struct HandlerContainer {
    name: String,
    marked: bool,
    entries: Vec<HandlerEntry>,
}

impl HandlerContainer {
    /// Creates an unmarked container.
    ///
    /// Unmarked containers only qualify under the name-suffix search
    /// method.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marked: false,
            entries: Vec::new(),
        }
    }

    /// Creates a container carrying the handler-container marker.
    #[must_use]
    pub fn marked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marked: true,
            entries: Vec::new(),
        }
    }

    /// Returns the container's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when the container carries the marker.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked
    }

    /// Returns the registered entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[HandlerEntry] {
        &self.entries
    }

    /// Registers a command handler.
    ///
    /// The handler's error is captured onto the message as an
    /// [`ExecutionFailure`]; it is never rethrown.
    #[must_use]
    pub fn command<C, E, F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        C: Any + Send + Sync,
        E: Error + Send + Sync + 'static,
        F: Fn(&C) -> Result<(), E> + Send + Sync + 'static,
    {
        let invoker: CommandInvoker = Arc::new(move |payload: &Payload| {
            payload.downcast_ref::<C>().map_or_else(
                || {
                    Err(ExecutionFailure::capture(
                        PayloadTypeMismatchError::for_handler::<C>(payload.type_name()),
                    ))
                },
                |command| handler(command).map_err(ExecutionFailure::capture),
            )
        });
        self.entries.push(HandlerEntry {
            name: name.into(),
            payload_type: TypeId::of::<C>(),
            payload_type_name: std::any::type_name::<C>(),
            invoker: HandlerInvoker::Command(invoker),
        });
        self
    }

    /// Registers a free-function query handler.
    ///
    /// The result is stored type-erased on the message for the caller to
    /// downcast.
    #[must_use]
    pub fn query<Q, R, E, F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        Q: Any + Send + Sync,
        R: Any + Send + Sync,
        E: Error + Send + Sync + 'static,
        F: Fn(&Q) -> Result<R, E> + Send + Sync + 'static,
    {
        let invoke: QueryInvoker = Arc::new(move |_object: Option<&Payload>, payload: &Payload| {
            payload.downcast_ref::<Q>().map_or_else(
                || {
                    Err(ExecutionFailure::capture(
                        PayloadTypeMismatchError::for_handler::<Q>(payload.type_name()),
                    ))
                },
                |query| {
                    handler(query)
                        .map(Payload::new)
                        .map_err(ExecutionFailure::capture)
                },
            )
        });
        self.entries.push(HandlerEntry {
            name: name.into(),
            payload_type: TypeId::of::<Q>(),
            payload_type_name: std::any::type_name::<Q>(),
            invoker: HandlerInvoker::Query {
                service: None,
                invoke,
            },
        });
        self
    }

    /// Registers a query handler bound to a service type.
    ///
    /// At dispatch the locator passes the caller-supplied query object when
    /// its type matches `S`; otherwise it synthesises `S::default()` and
    /// flags the message accordingly.
    #[must_use]
    pub fn query_on<S, Q, R, E, F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        S: Any + Send + Sync + Default,
        Q: Any + Send + Sync,
        R: Any + Send + Sync,
        E: Error + Send + Sync + 'static,
        F: Fn(&S, &Q) -> Result<R, E> + Send + Sync + 'static,
    {
        let invoke: QueryInvoker = Arc::new(move |object: Option<&Payload>, payload: &Payload| {
            let Some(object) = object else {
                return Err(ExecutionFailure::capture(
                    QueryObjectMissingError::for_service::<S>(),
                ));
            };
            let Some(service) = object.downcast_ref::<S>() else {
                return Err(ExecutionFailure::capture(
                    PayloadTypeMismatchError::for_handler::<S>(object.type_name()),
                ));
            };
            let Some(query) = payload.downcast_ref::<Q>() else {
                return Err(ExecutionFailure::capture(
                    PayloadTypeMismatchError::for_handler::<Q>(payload.type_name()),
                ));
            };
            handler(service, query)
                .map(Payload::new)
                .map_err(ExecutionFailure::capture)
        });
        self.entries.push(HandlerEntry {
            name: name.into(),
            payload_type: TypeId::of::<Q>(),
            payload_type_name: std::any::type_name::<Q>(),
            invoker: HandlerInvoker::Query {
                service: Some(ServiceSpec {
                    type_id: TypeId::of::<S>(),
                    type_name: std::any::type_name::<S>(),
                    synthesize: Arc::new(|| Payload::new(S::default())),
                }),
                invoke,
            },
        });
        self
    }
}

impl fmt::Debug for HandlerContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContainer")
            .field("name", &self.name)
            .field("marked", &self.marked)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// A named bundle of handler containers assembled by the host at startup.
///
/// The in-crate [`HandlerSource`]: enumeration never fails.
#[derive(Debug, Clone)]
pub struct HandlerModule {
    name: String,
    containers: Vec<HandlerContainer>,
}

impl HandlerModule {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containers: Vec::new(),
        }
    }

    /// Adds a container to the module.
    #[must_use]
    pub fn with_container(mut self, container: HandlerContainer) -> Self {
        self.containers.push(container);
        self
    }
}

impl HandlerSource for HandlerModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn containers(&self) -> Result<Vec<HandlerContainer>, ScanError> {
        Ok(self.containers.clone())
    }
}
