//! Tests for the retrieval query: construction-time validation and
//! predicate matching.

use chrono::Duration;
use mockable::{Clock, DefaultClock};
use rstest::rstest;

use crate::message::domain::{ExecutionFailure, Message, MessageKind, ProcessingStatus};
use crate::message::error::MessageQueryError;
use crate::message::query::{MessageQuery, DEFAULT_TAKE};
use crate::message::tests::fixtures::{clock, CreateWidget, FindWidgets, WidgetError};

fn completed_command(clock: &DefaultClock, duration_ms: u64) -> Message {
    let mut message = Message::command(CreateWidget { name: "x".into() }, clock);
    message.begin_execution(clock.utc());
    message.complete(duration_ms);
    message
}

fn failed_command(clock: &DefaultClock) -> Message {
    let mut message = Message::command(CreateWidget { name: "x".into() }, clock);
    message.begin_execution(clock.utc());
    message.fail(
        ExecutionFailure::capture(WidgetError("broken".into())),
        Some(3),
    );
    message
}

#[test]
fn empty_query_uses_default_window() {
    let query = MessageQuery::new();

    assert_eq!(query.skip(), 0);
    assert_eq!(query.take(), DEFAULT_TAKE);
}

#[test]
fn duration_lower_bound_above_upper_bound_is_rejected() {
    let result = MessageQuery::new()
        .with_execution_duration_above(100)
        .and_then(|query| query.with_execution_duration_below(50));

    assert!(matches!(
        result,
        Err(MessageQueryError::DurationRange {
            lower: 100,
            upper: 50
        })
    ));
}

#[test]
fn duration_upper_bound_below_lower_bound_is_rejected() {
    let result = MessageQuery::new()
        .with_execution_duration_below(50)
        .and_then(|query| query.with_execution_duration_above(100));

    assert!(matches!(
        result,
        Err(MessageQueryError::DurationRange {
            lower: 100,
            upper: 50
        })
    ));
}

#[test]
fn equal_duration_bounds_are_consistent() {
    let result = MessageQuery::new()
        .with_execution_duration_above(50)
        .and_then(|query| query.with_execution_duration_below(50));

    assert!(result.is_ok());
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_content_type_is_rejected(#[case] blank: &str) {
    assert!(matches!(
        MessageQuery::new().with_content_type(blank),
        Err(MessageQueryError::BlankContentType)
    ));
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_error_type_is_rejected(#[case] blank: &str) {
    assert!(matches!(
        MessageQuery::new().with_error_type(blank),
        Err(MessageQueryError::BlankErrorType)
    ));
}

#[rstest]
fn id_predicate_selects_one_message(clock: DefaultClock) {
    let target = completed_command(&clock, 1);
    let other = completed_command(&clock, 1);

    let query = MessageQuery::new().with_id(target.id());

    assert!(query.matches(&target));
    assert!(!query.matches(&other));
}

#[rstest]
fn created_range_is_inclusive(clock: DefaultClock) {
    let message = completed_command(&clock, 1);
    let window_start = message.created_at() - Duration::seconds(1);
    let window_end = message.created_at() + Duration::seconds(1);

    let inside = MessageQuery::new()
        .with_created_start_date(window_start)
        .with_created_end_date(window_end);
    let before = MessageQuery::new().with_created_end_date(window_start);
    let after = MessageQuery::new().with_created_start_date(window_end);

    assert!(inside.matches(&message));
    assert!(!before.matches(&message));
    assert!(!after.matches(&message));
}

#[rstest]
fn content_type_predicate_requires_exact_match(
    clock: DefaultClock,
) -> Result<(), MessageQueryError> {
    let message = completed_command(&clock, 1);

    let matching = MessageQuery::new().with_content_type(message.content_type())?;
    let other = MessageQuery::new().with_content_type("somewhere::else::Payload")?;

    assert!(matching.matches(&message));
    assert!(!other.matches(&message));
    Ok(())
}

#[rstest]
fn error_type_predicate_selects_failed_messages(
    clock: DefaultClock,
) -> Result<(), MessageQueryError> {
    let failed = failed_command(&clock);
    let completed = completed_command(&clock, 1);

    let query = MessageQuery::new().with_error_type(failed.error_type())?;

    assert!(query.matches(&failed));
    assert!(!query.matches(&completed));
    Ok(())
}

#[rstest]
fn status_and_kind_predicates_combine_with_and(clock: DefaultClock) {
    let completed = completed_command(&clock, 1);
    let failed = failed_command(&clock);
    let query_message = Message::query(FindWidgets { name_prefix: "a".into() }, &clock);

    let query = MessageQuery::new()
        .with_status(ProcessingStatus::Completed)
        .with_kind(MessageKind::Command);

    assert!(query.matches(&completed));
    assert!(!query.matches(&failed));
    assert!(!query.matches(&query_message));
}

#[rstest]
fn duration_bounds_are_inclusive(clock: DefaultClock) -> Result<(), MessageQueryError> {
    let message = completed_command(&clock, 100);

    let at_lower = MessageQuery::new().with_execution_duration_above(100)?;
    let at_upper = MessageQuery::new().with_execution_duration_below(100)?;
    let too_high = MessageQuery::new().with_execution_duration_above(101)?;
    let too_low = MessageQuery::new().with_execution_duration_below(99)?;

    assert!(at_lower.matches(&message));
    assert!(at_upper.matches(&message));
    assert!(!too_high.matches(&message));
    assert!(!too_low.matches(&message));
    Ok(())
}

#[rstest]
fn unexecuted_message_counts_as_zero_duration(clock: DefaultClock) -> Result<(), MessageQueryError> {
    let message = Message::command(CreateWidget { name: "x".into() }, &clock);

    let above = MessageQuery::new().with_execution_duration_above(1)?;
    let below = MessageQuery::new().with_execution_duration_below(10)?;

    assert!(!above.matches(&message));
    assert!(below.matches(&message));
    Ok(())
}
