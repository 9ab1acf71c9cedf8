//! Tests for the record projection and the repository adapters.

use std::fs;

use camino::Utf8PathBuf;
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use uuid::Uuid;

use crate::message::adapters::file::JsonFileMessageRepository;
use crate::message::adapters::memory::InMemoryMessageRepository;
use crate::message::adapters::models::MessageRecord;
use crate::message::domain::{
    ExecutionFailure, Message, MessageKind, ProcessingStatus,
};
use crate::message::error::RepositoryError;
use crate::message::ports::repository::MessageRepository;
use crate::message::query::MessageQuery;
use crate::message::tests::fixtures::{clock, CreateWidget, WidgetError};

fn completed_command(clock: &DefaultClock, name: &str) -> Message {
    let mut message = Message::command(CreateWidget { name: name.into() }, clock);
    message.begin_execution(clock.utc());
    message.complete(5);
    message
}

fn failed_command(clock: &DefaultClock) -> Message {
    let mut message = Message::command(CreateWidget { name: "x".into() }, clock);
    message.begin_execution(clock.utc());
    message.fail(
        ExecutionFailure::capture(WidgetError("broken".into())),
        Some(9),
    );
    message
}

/// Creates a unique writable directory for file-adapter tests.
fn scratch_dir() -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("courier-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("scratch directory should be creatable");
    Utf8PathBuf::from_path_buf(dir).expect("temp dir path should be valid UTF-8")
}

// ============================================================================
// MessageRecord projection
// ============================================================================

#[rstest]
fn record_projects_completed_message(clock: DefaultClock) {
    let message = completed_command(&clock, "anvil");

    let record = MessageRecord::from(&message);

    assert_eq!(record.id, message.id());
    assert_eq!(record.kind, MessageKind::Command);
    assert_eq!(record.status, ProcessingStatus::Completed);
    assert_eq!(record.content_type, message.content_type());
    assert_eq!(record.created_at, message.created_at());
    assert_eq!(record.executed_at, message.executed_at());
    assert_eq!(record.execution_duration_ms, Some(5));
    assert!(record.error_type.is_none());
    assert!(record.error_message.is_none());
}

#[rstest]
fn record_projects_failure_fields(clock: DefaultClock) {
    let message = failed_command(&clock);

    let record = MessageRecord::from(&message);

    assert_eq!(record.status, ProcessingStatus::Failed);
    assert_eq!(
        record.error_type.as_deref(),
        Some(message.error_type())
    );
    assert_eq!(
        record.error_message.as_deref(),
        Some("widget rejected: broken")
    );
}

// ============================================================================
// In-memory repository
// ============================================================================

#[rstest]
fn memory_repository_stores_in_insertion_order(clock: DefaultClock) {
    let repo = InMemoryMessageRepository::new();
    for name in ["a", "b", "c"] {
        repo.add(&completed_command(&clock, name))
            .expect("in-memory add should succeed");
    }

    assert_eq!(repo.len(), 3);

    let all = repo
        .query(&MessageQuery::new())
        .expect("query should succeed");
    let names: Vec<_> = all
        .iter()
        .filter_map(|message| message.content().downcast_ref::<CreateWidget>())
        .map(|widget| widget.name.clone())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[rstest]
fn memory_repository_filters_and_paginates(clock: DefaultClock) {
    let repo = InMemoryMessageRepository::new();
    for name in ["a", "b", "c", "d"] {
        repo.add(&completed_command(&clock, name))
            .expect("in-memory add should succeed");
    }
    repo.add(&failed_command(&clock))
        .expect("in-memory add should succeed");

    let completed = repo
        .query(&MessageQuery::new().with_status(ProcessingStatus::Completed))
        .expect("query should succeed");
    assert_eq!(completed.len(), 4);

    let window = repo
        .query(
            &MessageQuery::new()
                .with_status(ProcessingStatus::Completed)
                .with_range(1, 2),
        )
        .expect("query should succeed");
    let names: Vec<_> = window
        .iter()
        .filter_map(|message| message.content().downcast_ref::<CreateWidget>())
        .map(|widget| widget.name.clone())
        .collect();
    assert_eq!(names, ["b", "c"]);
}

// ============================================================================
// JSON-lines file repository
// ============================================================================

#[rstest]
fn file_repository_round_trips_records(clock: DefaultClock) {
    let dir = scratch_dir();
    let repo = JsonFileMessageRepository::open(&dir.join("messages.jsonl"))
        .expect("repository should open in scratch dir");

    repo.add(&completed_command(&clock, "anvil"))
        .expect("append should succeed");
    repo.add(&failed_command(&clock))
        .expect("append should succeed");

    let records = repo.records().expect("read-back should succeed");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].status, ProcessingStatus::Completed);
    assert_eq!(records[1].status, ProcessingStatus::Failed);
    assert_eq!(
        records[1].error_message.as_deref(),
        Some("widget rejected: broken")
    );
}

#[test]
fn file_repository_reads_missing_file_as_empty() {
    let dir = scratch_dir();
    let repo = JsonFileMessageRepository::open(&dir.join("never-written.jsonl"))
        .expect("repository should open in scratch dir");

    assert!(repo.records().expect("read-back should succeed").is_empty());
}

#[rstest]
fn file_repository_salvages_partial_lines_as_corrupted(clock: DefaultClock) {
    let dir = scratch_dir();
    let path = dir.join("messages.jsonl");
    let repo =
        JsonFileMessageRepository::open(&path).expect("repository should open in scratch dir");
    repo.add(&completed_command(&clock, "anvil"))
        .expect("append should succeed");

    let partial = format!(
        "{{\"id\":\"{}\",\"kind\":\"Command\",\"created_at\":\"2026-08-05T00:00:00Z\"}}",
        Uuid::new_v4()
    );
    let mut contents = fs::read_to_string(&path).expect("file should exist");
    contents.push_str(&partial);
    contents.push('\n');
    fs::write(&path, contents).expect("rewrite should succeed");

    let records = repo.records().expect("read-back should succeed");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, ProcessingStatus::Corrupted);
    assert!(records[1].error_type.is_none());
}

#[test]
fn file_repository_reports_unreadable_lines() {
    let dir = scratch_dir();
    let path = dir.join("messages.jsonl");
    let repo =
        JsonFileMessageRepository::open(&path).expect("repository should open in scratch dir");

    fs::write(&path, "not json at all\n").expect("write should succeed");

    assert!(matches!(
        repo.records(),
        Err(RepositoryError::Serialization(_))
    ));
}

#[test]
fn file_repository_requires_a_file_name() {
    assert!(matches!(
        JsonFileMessageRepository::open(camino::Utf8Path::new("/")),
        Err(RepositoryError::Connection(_))
    ));
}
