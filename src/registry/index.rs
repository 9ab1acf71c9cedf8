//! The scanned handler index and its qualification rules.

use std::any::TypeId;
use std::sync::Arc;

use crate::message::domain::MessageKind;

use super::source::{HandlerContainer, HandlerEntry, HandlerSource};

/// Prefix a registered entry name must carry to be indexed.
const HANDLER_PREFIX: &str = "handle";

/// Suffix a container name must carry under
/// [`HandlerSearchMethod::NameSuffix`].
const CONTAINER_SUFFIX: &str = "Handlers";

/// How containers qualify as handler containers during a scan.
///
/// The two methods are interchangeable; switching the locator's method
/// re-runs the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandlerSearchMethod {
    /// Only containers carrying the explicit marker qualify.
    #[default]
    MarkedContainers,
    /// Only containers whose name ends in `"Handlers"` qualify.
    NameSuffix,
}

impl HandlerSearchMethod {
    fn qualifies(self, container: &HandlerContainer) -> bool {
        match self {
            Self::MarkedContainers => container.is_marked(),
            Self::NameSuffix => container.name().ends_with(CONTAINER_SUFFIX),
        }
    }
}

/// One indexed handler with the container it came from.
#[derive(Debug, Clone)]
pub(crate) struct IndexedHandler {
    pub(crate) container: String,
    pub(crate) entry: HandlerEntry,
}

/// The prebuilt, read-only resolution index.
///
/// Built once per scan over the supplied sources, preserving scan order:
/// sources in the order given, containers in enumeration order, entries in
/// registration order. Resolution is first match wins, which makes scan
/// order the tie-break when several entries accept the same payload type.
#[derive(Debug, Default)]
pub struct HandlerIndex {
    handlers: Vec<IndexedHandler>,
    sources: Vec<String>,
}

impl HandlerIndex {
    /// Scans the sources under the given search method.
    ///
    /// A source whose enumeration fails is logged at error level and
    /// skipped; an empty result is logged as a warning naming the scanned
    /// sources. Neither aborts the build.
    pub(crate) fn build(
        sources: &[Arc<dyn HandlerSource>],
        method: HandlerSearchMethod,
    ) -> Self {
        let mut handlers = Vec::new();
        let mut source_names = Vec::with_capacity(sources.len());

        for source in sources {
            source_names.push(source.name().to_owned());
            let containers = match source.containers() {
                Ok(containers) => containers,
                Err(err) => {
                    tracing::error!(source = source.name(), error = %err, "handler source scan failed");
                    continue;
                }
            };
            for container in containers {
                if !method.qualifies(&container) {
                    continue;
                }
                for entry in container.entries() {
                    if !entry.name().starts_with(HANDLER_PREFIX) {
                        continue;
                    }
                    handlers.push(IndexedHandler {
                        container: container.name().to_owned(),
                        entry: entry.clone(),
                    });
                }
            }
        }

        if handlers.is_empty() {
            tracing::warn!(
                sources = %source_names.join(","),
                "no handler methods found in the scanned sources"
            );
        }

        Self {
            handlers,
            sources: source_names,
        }
    }

    /// Returns the first entry (scan order) accepting the payload type for
    /// the given message kind.
    pub(crate) fn resolve(&self, payload_type: TypeId, kind: MessageKind) -> Option<&IndexedHandler> {
        self.handlers
            .iter()
            .find(|indexed| {
                indexed.entry.payload_type() == payload_type && indexed.entry.kind() == kind
            })
    }

    /// Returns the number of indexed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when the scan yielded no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the names of the scanned sources, in scan order.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}
