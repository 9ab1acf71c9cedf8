//! Tests for the handler locator: construction, search-method switching,
//! and its treatment of already-terminal messages.

use std::convert::Infallible;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;

use crate::message::domain::{ExecutionFailure, Message, ProcessingStatus};
use crate::message::tests::fixtures::{clock, CreateWidget, WidgetError};
use crate::pipeline::middlewares::HandlerLocatorMiddleware;
use crate::pipeline::{Middleware, PipelineError};
use crate::registry::{HandlerContainer, HandlerModule, HandlerSearchMethod, HandlerSource};

/// A module with the same payload handled by a marked container and by a
/// conventionally named one, so the active search method is observable
/// through the recorded container name.
fn split_module() -> Arc<dyn HandlerSource> {
    Arc::new(
        HandlerModule::new("split")
            .with_container(HandlerContainer::marked("Ops").command(
                "handle_create_widget",
                |_: &CreateWidget| -> Result<(), Infallible> { Ok(()) },
            ))
            .with_container(HandlerContainer::new("WidgetHandlers").command(
                "handle_create_widget",
                |_: &CreateWidget| -> Result<(), Infallible> { Ok(()) },
            )),
    )
}

#[test]
fn construction_requires_handler_sources() {
    assert!(matches!(
        HandlerLocatorMiddleware::new(Vec::new()),
        Err(PipelineError::NoHandlerSources)
    ));
}

#[test]
fn default_search_method_is_marked_containers() {
    let locator =
        HandlerLocatorMiddleware::new(vec![split_module()]).expect("sources supplied");

    assert_eq!(locator.search_method(), HandlerSearchMethod::MarkedContainers);
}

#[rstest]
fn search_method_switch_rebuilds_the_index(clock: DefaultClock) {
    let locator =
        HandlerLocatorMiddleware::new(vec![split_module()]).expect("sources supplied");

    let mut marked = Message::command(CreateWidget { name: "x".into() }, &clock);
    locator.handle(&mut marked).expect("no infrastructure errors");
    assert_eq!(marked.handler_container(), Some("Ops"));

    locator.set_search_method(HandlerSearchMethod::NameSuffix);

    let mut suffixed = Message::command(CreateWidget { name: "x".into() }, &clock);
    locator.handle(&mut suffixed).expect("no infrastructure errors");
    assert_eq!(suffixed.handler_container(), Some("WidgetHandlers"));
}

#[rstest]
fn terminal_message_is_left_untouched(clock: DefaultClock) {
    let locator =
        HandlerLocatorMiddleware::new(vec![split_module()]).expect("sources supplied");

    let mut message = Message::command(CreateWidget { name: "x".into() }, &clock);
    message.reject(ExecutionFailure::capture(WidgetError("upstream".into())));

    locator.handle(&mut message).expect("no infrastructure errors");

    assert_eq!(message.status(), ProcessingStatus::Rejected);
    assert!(message.error_type().ends_with("WidgetError"));
    assert!(message.handler_container().is_none());
}

#[rstest]
fn empty_index_rejects_instead_of_crashing(clock: DefaultClock) {
    let bare: Arc<dyn HandlerSource> = Arc::new(HandlerModule::new("bare"));
    let locator = HandlerLocatorMiddleware::new(vec![bare]).expect("sources supplied");
    assert!(locator.index().is_empty());

    let mut message = Message::command(CreateWidget { name: "x".into() }, &clock);
    locator.handle(&mut message).expect("no infrastructure errors");

    assert_eq!(message.status(), ProcessingStatus::Rejected);
    assert!(message.error_type().ends_with("HandlerNotFoundError"));
}

#[test]
fn locator_id_is_overridable() {
    let locator = HandlerLocatorMiddleware::new(vec![split_module()])
        .expect("sources supplied")
        .with_id("command-locator");

    assert_eq!(locator.id(), "command-locator");
}
