//! Shared fixtures and helpers for message tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mockable::DefaultClock;
use rstest::fixture;

use crate::message::domain::{Command, ExecutionFailure, Query};
use crate::registry::{HandlerContainer, HandlerModule, HandlerSource};

/// A routable command payload.
#[derive(Debug, Clone)]
pub struct CreateWidget {
    pub name: String,
}

impl Command for CreateWidget {}

/// A command payload no handler is ever registered for.
#[derive(Debug)]
pub struct UnroutedCommand;

impl Command for UnroutedCommand {}

/// A self-handling command payload counting its own executions.
pub struct TouchLedger {
    pub touches: Arc<AtomicUsize>,
}

impl Command for TouchLedger {
    fn handles_self(&self) -> bool {
        true
    }

    fn handle_self(&self) -> Result<(), ExecutionFailure> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A query payload carrying its input parameters.
#[derive(Debug)]
pub struct FindWidgets {
    pub name_prefix: String,
}

impl Query for FindWidgets {}

/// The service type the widget query handler runs against.
#[derive(Debug, Default)]
pub struct WidgetDirectory {
    pub widgets: Vec<String>,
}

/// Domain error produced by the widget handlers.
#[derive(Debug, thiserror::Error)]
#[error("widget rejected: {0}")]
pub struct WidgetError(pub String);

#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Builds the standard widget handler module: a marked `WidgetHandlers`
/// container with one command handler (recording created names, rejecting
/// empty ones) and one service-bound query handler.
pub fn widget_module(created: Arc<Mutex<Vec<String>>>) -> Arc<dyn HandlerSource> {
    Arc::new(
        HandlerModule::new("widgets").with_container(
            HandlerContainer::marked("WidgetHandlers")
                .command(
                    "handle_create_widget",
                    move |cmd: &CreateWidget| -> Result<(), WidgetError> {
                        if cmd.name.is_empty() {
                            return Err(WidgetError("name must not be empty".into()));
                        }
                        created
                            .lock()
                            .expect("created-names lock should not be poisoned")
                            .push(cmd.name.clone());
                        Ok(())
                    },
                )
                .query_on(
                    "handle_find_widgets",
                    |directory: &WidgetDirectory, query: &FindWidgets| -> Result<Vec<String>, WidgetError> {
                        Ok(directory
                            .widgets
                            .iter()
                            .filter(|widget| widget.starts_with(&query.name_prefix))
                            .cloned()
                            .collect())
                    },
                ),
        ),
    )
}
