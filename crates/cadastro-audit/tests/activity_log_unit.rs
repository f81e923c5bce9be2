// crates/cadastro-audit/tests/activity_log_unit.rs
// ============================================================================
// Module: Activity Log Unit Tests
// Description: Tests for appending and reading activity log entries.
// Purpose: Validate append ordering, damage tolerance, and directory creation.
// ============================================================================

//! ## Overview
//! Behavior tests for the activity log:
//! - Append then read round trip with snapshots
//! - Malformed and blank lines skipped on read
//! - Missing file reads as empty
//! - Containing directory created on first append

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;

use cadastro_audit::ActivityLog;
use cadastro_core::ActorId;
use cadastro_core::ClientRecord;
use cadastro_core::ColumnName;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_record(name: &str) -> ClientRecord {
    let mut record = ClientRecord::new();
    record.set(ColumnName::parse("XCLIENTES").unwrap(), "7");
    record.set(ColumnName::parse("RAZAO").unwrap(), name);
    record
}

// ============================================================================
// SECTION: Append and Read
// ============================================================================

#[test]
fn appended_entries_read_back_in_order() {
    let dir = TempDir::new().unwrap();
    let log = ActivityLog::new(dir.path().join("activity.log"));
    let actor = ActorId::from("operator-1");
    let created = sample_record("ACME LTDA");
    let updated = sample_record("ACME SA");
    log.record("CREATE", &actor, None, Some(&created)).unwrap();
    log.record("UPDATE", &actor, Some(&created), Some(&updated)).unwrap();
    let entries = log.read_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "CREATE");
    assert_eq!(entries[0].data_before, None);
    assert_eq!(entries[0].data_after.as_ref(), Some(&created));
    assert_eq!(entries[1].action, "UPDATE");
    assert_eq!(entries[1].data_before.as_ref(), Some(&created));
    assert_eq!(entries[1].user_id, actor);
}

#[test]
fn timestamps_use_the_day_first_layout() {
    let dir = TempDir::new().unwrap();
    let log = ActivityLog::new(dir.path().join("activity.log"));
    log.record("DELETE", &ActorId::from("op"), Some(&sample_record("X")), None).unwrap();
    let entries = log.read_all().unwrap();
    let timestamp = &entries[0].timestamp;
    assert_eq!(timestamp.len(), 19);
    assert_eq!(&timestamp[2 ..= 2], "-");
    assert_eq!(&timestamp[5 ..= 5], "-");
    assert_eq!(&timestamp[10 ..= 10], " ");
    assert_eq!(&timestamp[13 ..= 13], ":");
}

// ============================================================================
// SECTION: Damage Tolerance
// ============================================================================

#[test]
fn malformed_lines_are_skipped_on_read() {
    let dir = TempDir::new().unwrap();
    let log = ActivityLog::new(dir.path().join("activity.log"));
    log.record("CREATE", &ActorId::from("op"), None, Some(&sample_record("A"))).unwrap();
    let mut contents = fs::read_to_string(log.path()).unwrap();
    contents.push_str("{truncated entr\n\n");
    fs::write(log.path(), contents).unwrap();
    log.record("DELETE", &ActorId::from("op"), Some(&sample_record("A")), None).unwrap();
    let entries = log.read_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "CREATE");
    assert_eq!(entries[1].action, "DELETE");
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let log = ActivityLog::new(dir.path().join("never_written.log"));
    assert!(log.read_all().unwrap().is_empty());
}

#[test]
fn first_append_creates_the_containing_directory() {
    let dir = TempDir::new().unwrap();
    let log = ActivityLog::new(dir.path().join("logs").join("user_activity.log"));
    log.record("CREATE", &ActorId::from("op"), None, Some(&sample_record("A"))).unwrap();
    assert!(log.path().exists());
    assert_eq!(log.read_all().unwrap().len(), 1);
}
