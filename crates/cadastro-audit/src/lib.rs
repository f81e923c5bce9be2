// crates/cadastro-audit/src/lib.rs
// ============================================================================
// Module: Cadastro Audit
// Description: Append-only activity log of client record mutations.
// Purpose: Record who changed what, with before and after snapshots.
// Dependencies: cadastro-core, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Every mutating operation appends one JSON line to the activity log:
//! timestamp, action, acting user, and the record snapshots before and after
//! the change. The log is the system's only durable trace of operator
//! activity, but writing it is best-effort at the call sites — a failed
//! append is reported, never allowed to fail the operation it describes.
//!
//! Reading tolerates damage: malformed lines are skipped so one truncated
//! write does not hide the rest of the history.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use cadastro_core::ActorId;
use cadastro_core::ClientRecord;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default activity log path, resolved against the working directory.
pub const DEFAULT_LOG_PATH: &str = "logs/user_activity.log";

/// Timestamp layout used in log entries.
const TIMESTAMP_FORMAT: &[FormatItem<'_>] =
    format_description!("[day]-[month]-[year] [hour]:[minute]:[second]");

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Activity log errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Creating, opening, or writing the log file failed.
    #[error("activity log io error: {0}")]
    Io(String),
    /// An entry could not be serialized or its timestamp formatted.
    #[error("activity log serialize error: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Entries
// ============================================================================

/// One activity log entry.
///
/// # Invariants
/// - `timestamp` is formatted `DD-MM-YYYY HH:MM:SS` (UTC).
/// - `data_before`/`data_after` describe the mutation: create is
///   `None -> Some`, update is `Some -> Some`, delete is `Some -> None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action happened.
    pub timestamp: String,
    /// Action name, e.g. `CREATE`, `UPDATE`, `DELETE`, `UPDATE_FAILED`.
    pub action: String,
    /// Acting operator.
    pub user_id: ActorId,
    /// Record snapshot before the action, when one existed.
    pub data_before: Option<ClientRecord>,
    /// Record snapshot after the action, when one remains.
    pub data_after: Option<ClientRecord>,
}

// ============================================================================
// SECTION: Activity Log
// ============================================================================

/// Append-only activity log backed by a newline-delimited JSON file.
///
/// # Invariants
/// - Appends are whole lines; the log never holds a partial entry followed
///   by a valid one on the same line.
/// - The log holds no open file handles between calls.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    /// Path of the log file.
    path: PathBuf,
}

impl ActivityLog {
    /// Creates a log handle for the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Creates a log handle for the default path.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the containing directory when absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the directory or file cannot be written or
    /// the entry cannot be serialized. Call sites treat this as best-effort.
    pub fn record(
        &self,
        action: &str,
        user: &ActorId,
        data_before: Option<&ClientRecord>,
        data_after: Option<&ClientRecord>,
    ) -> Result<(), AuditError> {
        let timestamp = OffsetDateTime::now_utc()
            .format(TIMESTAMP_FORMAT)
            .map_err(|err| AuditError::Serialize(err.to_string()))?;
        let entry = AuditEntry {
            timestamp,
            action: action.to_string(),
            user_id: user.clone(),
            data_before: data_before.cloned(),
            data_after: data_after.cloned(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|err| AuditError::Serialize(err.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| AuditError::Io(err.to_string()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| AuditError::Io(err.to_string()))?;
        writeln!(file, "{line}").map_err(|err| AuditError::Io(err.to_string()))?;
        Ok(())
    }

    /// Reads all parseable entries in file order.
    ///
    /// Malformed lines are skipped; a missing file reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when an existing file cannot be read.
    pub fn read_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|err| AuditError::Io(err.to_string()))?;
        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
