//! Query payload capability and the query-specific message state.

use super::Payload;
use crate::message::domain::ExecutionFailure;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Erased handler invocation for a query payload.
///
/// The first argument is the query object the handler runs against, when the
/// registered handler is bound to a service type; free-function handlers
/// ignore it. The second argument is the query payload, which carries the
/// handler's input parameters.
pub type QueryInvoker =
    Arc<dyn Fn(Option<&Payload>, &Payload) -> Result<Payload, ExecutionFailure> + Send + Sync>;

/// Capability trait marking query payloads.
///
/// ```
/// use courier::message::domain::Query;
///
/// struct FindWidgets {
///     name_prefix: String,
/// }
///
/// impl Query for FindWidgets {}
/// ```
pub trait Query: Any + Send + Sync {}

/// Query-specific execution state.
///
/// The query object is the service instance a service-bound handler runs
/// against: caller-supplied (real) or synthesised by the locator when the
/// caller supplied none. The result is stored type-erased for the caller to
/// downcast.
#[derive(Clone, Default)]
pub(crate) struct QueryBody {
    pub(crate) handler_container: Option<String>,
    pub(crate) handler_method: Option<String>,
    pub(crate) handler: Option<QueryInvoker>,
    pub(crate) query_object: Option<Payload>,
    pub(crate) synthesized_query_object: bool,
    pub(crate) result: Option<Payload>,
}

impl fmt::Debug for QueryBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBody")
            .field("handler_container", &self.handler_container)
            .field("handler_method", &self.handler_method)
            .field("query_object", &self.query_object)
            .field("synthesized_query_object", &self.synthesized_query_object)
            .field("has_result", &self.result.is_some())
            .finish_non_exhaustive()
    }
}
