//! Durable feedback store
//!
//! Persists the full record collection as one JSON container file:
//!
//! ```text
//! { "feedback": [ { "text": ..., "sentiment": ..., ... }, ... ] }
//! ```
//!
//! Every mutation is a full read-modify-write of the container, committed
//! with a temp-write-then-rename so a reader never observes a half-written
//! file. A process-wide mutex serializes the whole read-modify-write-commit
//! sequence of each mutation, closing the lost-update window between
//! concurrent appends. Reads take no lock and may observe state that is
//! stale relative to an in-flight append.
//!
//! An unreadable or structurally wrong backing file is quarantined to a
//! sibling `.corrupt` path and replaced with an empty container; the store
//! never refuses to start over a bad file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::record::{FeedbackDraft, FeedbackRecord, DEFAULT_SOURCE};

/// Conventional backing file name used by the dashboard deployment
pub const DEFAULT_STORE_FILE: &str = "feedback_data.json";

/// Persisted container shape
#[derive(Debug, Default, Serialize, Deserialize)]
struct Container {
    feedback: Vec<FeedbackRecord>,
}

/// What a read-only probe of the backing file found
enum DiskState {
    /// No backing file yet
    Missing,
    /// Canonical `{ "feedback": [...] }` container
    Canonical(Vec<FeedbackRecord>),
    /// Legacy bare-array file; normalized on next commit
    Legacy(Vec<FeedbackRecord>),
    /// Unparseable or structurally wrong content
    Corrupt,
}

/// Durable, self-healing store for feedback records
///
/// Cheap to construct; all I/O happens per operation. Safe to share across
/// request-handling threads: mutations are serialized internally.
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    /// Serializes the full load-mutate-commit sequence of every mutation
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Create a store backed by `path`
    ///
    /// Performs no I/O; the backing file is created lazily by [`init`]
    /// (which every operation guarantees internally).
    ///
    /// [`init`]: FeedbackStore::init
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "opening feedback store");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the backing file exists with a well-formed container
    ///
    /// Idempotent. Creates `{ "feedback": [] }` when the file is absent,
    /// normalizes a legacy bare-array file into the container shape in
    /// place, and on unparseable or structurally wrong content quarantines
    /// the file to a sibling `.corrupt` path before writing an empty
    /// container. Corruption is logged, never surfaced.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] if the file cannot be read or
    /// the healed container cannot be committed.
    pub fn init(&self) -> Result<(), StoreError> {
        if matches!(self.probe()?, DiskState::Canonical(_)) {
            return Ok(());
        }
        let _guard = self.write_lock.lock();
        let container = self.take_snapshot()?;
        self.commit(&container)
    }

    /// Append one feedback record
    ///
    /// Validates that `text` is non-empty before any I/O, stamps the
    /// record with the current UTC time, and commits the updated container
    /// atomically. The draft's source defaults to `"analysis"`.
    ///
    /// # Errors
    /// - [`StoreError::Validation`] for empty text, before any I/O
    /// - [`StoreError::Persistence`] / [`StoreError::Serialization`] if the
    ///   commit fails; prior on-disk state is left intact
    pub fn append(&self, draft: FeedbackDraft) -> Result<FeedbackRecord, StoreError> {
        validate_text(&draft.text)?;

        let preview: String = draft.text.chars().take(50).collect();
        debug!(
            text = %preview,
            sentiment = %draft.sentiment,
            score = ?draft.score,
            "appending feedback"
        );

        let _guard = self.write_lock.lock();
        let mut container = self.take_snapshot()?;

        let record = FeedbackRecord {
            text: draft.text,
            sentiment: draft.sentiment,
            source: draft.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            timestamp: Utc::now(),
            score: draft.score,
        };
        container.feedback.push(record.clone());
        self.commit(&container)?;

        debug!(total = container.feedback.len(), "feedback committed");
        Ok(record)
    }

    /// Append a batch of records under one shared source tag
    ///
    /// Each item gets the same per-item treatment as [`append`] (non-empty
    /// text, fresh timestamp) but the whole batch is committed as a single
    /// atomic update: a crash mid-commit loses the entire batch, never a
    /// partial prefix. Per-draft source tags are overridden by `source`.
    ///
    /// Returns the number of records appended.
    ///
    /// # Errors
    /// - [`StoreError::Validation`] if any item has empty text; nothing is
    ///   written
    /// - [`StoreError::Persistence`] / [`StoreError::Serialization`] if the
    ///   commit fails; prior on-disk state is left intact
    ///
    /// [`append`]: FeedbackStore::append
    pub fn append_batch(
        &self,
        drafts: Vec<FeedbackDraft>,
        source: &str,
    ) -> Result<usize, StoreError> {
        for draft in &drafts {
            validate_text(&draft.text)?;
        }

        let _guard = self.write_lock.lock();
        let mut container = self.take_snapshot()?;

        let count = drafts.len();
        for draft in drafts {
            container.feedback.push(FeedbackRecord {
                text: draft.text,
                sentiment: draft.sentiment,
                source: source.to_string(),
                timestamp: Utc::now(),
                score: draft.score,
            });
        }
        self.commit(&container)?;

        info!(count, source, "batch feedback committed");
        Ok(count)
    }

    /// Read every record in insertion order
    ///
    /// Self-initializing: a missing, legacy, or corrupt backing file is
    /// healed first (see [`init`]). Entries missing fields come back with
    /// defaults rather than errors. Takes no lock on the common path; the
    /// atomic-rename commit guarantees the file is never observed
    /// half-written.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] if the file cannot be read or a
    /// required healing rewrite fails.
    ///
    /// [`init`]: FeedbackStore::init
    pub fn read_all(&self) -> Result<Vec<FeedbackRecord>, StoreError> {
        if let DiskState::Canonical(records) = self.probe()? {
            return Ok(records);
        }
        // Non-canonical file: heal it under the write lock, re-probing in
        // case a writer committed a canonical container in the meantime.
        let _guard = self.write_lock.lock();
        let container = self.take_snapshot()?;
        self.commit(&container)?;
        Ok(container.feedback)
    }

    /// Read-only probe of the backing file; never mutates disk state
    fn probe(&self) -> Result<DiskState, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DiskState::Missing);
            }
            Err(err) => return Err(StoreError::persistence(&self.path, err)),
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(mut map)) => match map.remove("feedback") {
                Some(Value::Array(entries)) => Ok(DiskState::Canonical(collect_entries(entries))),
                _ => Ok(DiskState::Corrupt),
            },
            Ok(Value::Array(entries)) => Ok(DiskState::Legacy(collect_entries(entries))),
            _ => Ok(DiskState::Corrupt),
        }
    }

    /// Current container contents, healing non-canonical disk state
    ///
    /// Caller must hold `write_lock`: corruption quarantine renames the
    /// backing file, and the returned container feeds a commit.
    fn take_snapshot(&self) -> Result<Container, StoreError> {
        let feedback = match self.probe()? {
            DiskState::Canonical(records) => records,
            DiskState::Legacy(records) => {
                info!(path = %self.path.display(), "normalizing legacy bare-array feedback file");
                records
            }
            DiskState::Missing => {
                info!(path = %self.path.display(), "feedback file not found, starting empty");
                Vec::new()
            }
            DiskState::Corrupt => {
                self.quarantine();
                Vec::new()
            }
        };
        Ok(Container { feedback })
    }

    /// Move the unreadable backing file aside so it stays available for
    /// forensic recovery
    ///
    /// Best-effort: if the rename fails, the next commit overwrites the
    /// bad file in place and the forensic copy is lost.
    fn quarantine(&self) {
        let quarantine_path = sibling(&self.path, "corrupt");
        match fs::rename(&self.path, &quarantine_path) {
            Ok(()) => warn!(
                path = %self.path.display(),
                quarantine = %quarantine_path.display(),
                "feedback file corrupt, quarantined and reset to empty container"
            ),
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "feedback file corrupt and quarantine failed, resetting in place"
            ),
        }
    }

    /// Commit the container with a temp-write-then-atomic-rename
    ///
    /// The rename is never attempted when the temp write failed, so the
    /// original file is never left truncated or half-written.
    fn commit(&self, container: &Container) -> Result<(), StoreError> {
        let tmp = sibling(&self.path, "tmp");
        let payload = serde_json::to_vec_pretty(container)?;

        if let Err(err) = fs::write(&tmp, &payload) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::persistence(&tmp, err));
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::persistence(&self.path, err));
        }
        Ok(())
    }
}

/// Reject empty feedback text before any I/O happens
fn validate_text(text: &str) -> Result<(), StoreError> {
    if text.trim().is_empty() {
        return Err(StoreError::Validation(
            "feedback text must be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Deserialize array entries leniently, dropping ones that are not objects
fn collect_entries(entries: Vec<Value>) -> Vec<FeedbackRecord> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "skipping malformed feedback entry");
                None
            }
        })
        .collect()
}

/// `<path>.<suffix>` alongside the backing file
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(suffix);
    PathBuf::from(os)
}
