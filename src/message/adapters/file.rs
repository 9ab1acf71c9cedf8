//! JSON-lines file implementation of the `MessageRepository` port.
//!
//! Appends one [`MessageRecord`] per line to a file reached through a
//! directory capability. A diagnostic sink rather than a storage engine:
//! writes are append-only and reads return the raw records.

use std::io::Write;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::message::adapters::models::MessageRecord;
use crate::message::domain::{Message, MessageId, MessageKind, ProcessingStatus};
use crate::message::error::RepositoryError;
use crate::message::ports::repository::{MessageRepository, RepositoryResult};

/// Subset of record fields used to salvage a partially readable line.
#[derive(Debug, Deserialize)]
struct PartialRecord {
    id: MessageId,
    kind: MessageKind,
    #[serde(default)]
    content_type: String,
    created_at: DateTime<Utc>,
}

/// JSON-lines file implementation of [`MessageRepository`].
///
/// The file's parent directory is opened once as a capability; every write
/// appends a single serialised [`MessageRecord`] line.
#[derive(Debug)]
pub struct JsonFileMessageRepository {
    dir: Dir,
    file_name: String,
}

impl JsonFileMessageRepository {
    /// Opens a repository backed by the file at `path`.
    ///
    /// The parent directory must exist; the file itself is created on first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Connection`] when `path` has no file name
    /// and [`RepositoryError::Storage`] when the parent directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> RepositoryResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| RepositoryError::connection("path must include a file name"))?
            .to_owned();
        let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(RepositoryError::storage)?;
        Ok(Self { dir, file_name })
    }

    /// Reads back every stored record in write order.
    ///
    /// A missing file reads as an empty store. A line whose full record no
    /// longer parses is salvaged from its identity fields and surfaces with
    /// [`ProcessingStatus::Corrupted`].
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on read failure and
    /// [`RepositoryError::Serialization`] when a line cannot be salvaged.
    pub fn records(&self) -> RepositoryResult<Vec<MessageRecord>> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(RepositoryError::storage(err)),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> RepositoryResult<MessageRecord> {
        serde_json::from_str::<MessageRecord>(line).or_else(|full_err| {
            serde_json::from_str::<PartialRecord>(line)
                .map(|partial| {
                    tracing::warn!(
                        id = %partial.id,
                        "stored message record only partially readable, marking corrupted"
                    );
                    MessageRecord {
                        id: partial.id,
                        kind: partial.kind,
                        status: ProcessingStatus::Corrupted,
                        content_type: partial.content_type,
                        created_at: partial.created_at,
                        executed_at: None,
                        execution_duration_ms: None,
                        error_type: None,
                        error_message: None,
                    }
                })
                .map_err(|_| RepositoryError::serialization(full_err.to_string()))
        })
    }
}

impl MessageRepository for JsonFileMessageRepository {
    fn add(&self, message: &Message) -> RepositoryResult<()> {
        let record = MessageRecord::from(message);
        let line =
            serde_json::to_string(&record).map_err(|e| RepositoryError::serialization(e.to_string()))?;

        let mut file = self
            .dir
            .open_with(
                &self.file_name,
                OpenOptions::new().create(true).append(true),
            )
            .map_err(RepositoryError::storage)?;
        writeln!(file, "{line}").map_err(RepositoryError::storage)?;
        Ok(())
    }
}
