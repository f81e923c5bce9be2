// crates/cadastro-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Client Store Unit Tests
// Description: Behavior tests for the SQLite-backed client store.
// Purpose: Validate guarded inserts, atomic registration, lookups, and deletes.
// ============================================================================

//! ## Overview
//! Behavior tests for the `SQLite` client store:
//! - Construction guards (table name, strategy columns, substring deletes)
//! - Guarded insert semantics and duplicate preservation
//! - Atomic registration and identifier sequencing
//! - Ordered lookup strategies for find and delete
//! - Update row-count contract

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

use cadastro_core::ClientRecord;
use cadastro_core::ColumnName;
use cadastro_core::FieldDefinition;
use cadastro_core::FieldName;
use cadastro_core::FieldSchema;
use cadastro_core::InsertOutcome;
use cadastro_core::LookupStrategy;
use cadastro_core::OverflowPolicy;
use cadastro_store_sqlite::SqliteClientStore;
use cadastro_store_sqlite::SqliteStoreConfig;
use cadastro_store_sqlite::SqliteStoreError;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn column(name: &str) -> ColumnName {
    ColumnName::parse(name).unwrap()
}

fn field(name: &str, max_length: usize, required: bool, db_column: &str) -> FieldDefinition {
    FieldDefinition {
        name: FieldName::new(name),
        max_length,
        required,
        db_column: column(db_column),
        overflow: OverflowPolicy::Reject,
    }
}

fn schema() -> FieldSchema {
    FieldSchema::derive(
        vec![
            field("CLIENTE", 100, true, "RAZAO"),
            field("CGC", 20, true, "CGC"),
            field("INSCRICAO", 20, false, "INSCRICAO"),
            field("XCLIENTES", 10, true, "XCLIENTES"),
        ],
        &FieldName::new("XCLIENTES"),
    )
    .unwrap()
}

fn find_strategies() -> Vec<LookupStrategy> {
    vec![
        LookupStrategy::exact(column("XCLIENTES")),
        LookupStrategy::exact(column("CGC")),
        LookupStrategy::substring(column("RAZAO")),
        LookupStrategy::exact(column("INSCRICAO")),
    ]
}

fn delete_strategies() -> Vec<LookupStrategy> {
    vec![
        LookupStrategy::exact(column("XCLIENTES")),
        LookupStrategy::exact(column("CGC")),
        LookupStrategy::exact(column("INSCRICAO")),
    ]
}

fn store_in(dir: &TempDir) -> SqliteClientStore {
    let config = SqliteStoreConfig::for_path(dir.path().join("clients.db"));
    SqliteClientStore::new(config, schema(), find_strategies(), delete_strategies()).unwrap()
}

fn record(id: &str, razao: &str, cgc: &str, inscricao: &str) -> ClientRecord {
    let mut record = ClientRecord::new();
    record.set(column("XCLIENTES"), id);
    record.set(column("RAZAO"), razao);
    record.set(column("CGC"), cgc);
    record.set(column("INSCRICAO"), inscricao);
    record
}

// ============================================================================
// SECTION: Construction Guards
// ============================================================================

#[test]
fn construction_rejects_invalid_table_name() {
    let dir = TempDir::new().unwrap();
    let mut config = SqliteStoreConfig::for_path(dir.path().join("clients.db"));
    config.table_name = "FBCLIENTES; DROP TABLE".to_string();
    let result =
        SqliteClientStore::new(config, schema(), find_strategies(), delete_strategies());
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn construction_rejects_substring_delete_strategy() {
    let dir = TempDir::new().unwrap();
    let config = SqliteStoreConfig::for_path(dir.path().join("clients.db"));
    let deletes = vec![LookupStrategy::substring(column("RAZAO"))];
    let result = SqliteClientStore::new(config, schema(), find_strategies(), deletes);
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn construction_rejects_strategy_column_outside_schema() {
    let dir = TempDir::new().unwrap();
    let config = SqliteStoreConfig::for_path(dir.path().join("clients.db"));
    let finds = vec![LookupStrategy::exact(column("UNKNOWN_COL"))];
    let result = SqliteClientStore::new(config, schema(), finds, delete_strategies());
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

// ============================================================================
// SECTION: Insert
// ============================================================================

#[test]
fn insert_then_find_round_trips_the_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let original = record("7", "ACME LTDA", "11222333000181", "ISENTO");
    assert_eq!(store.insert(&original).unwrap(), InsertOutcome::Inserted);
    let found = store.find("7").unwrap().unwrap();
    assert_eq!(found, original);
}

#[test]
fn duplicate_insert_is_reported_and_preserves_the_original() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("7", "ACME LTDA", "111", "")).unwrap();
    let outcome = store.insert(&record("7", "IMPOSTOR SA", "999", "")).unwrap();
    assert_eq!(outcome, InsertOutcome::AlreadyExists);
    let found = store.find("7").unwrap().unwrap();
    assert_eq!(found.get(&column("RAZAO")), Some("ACME LTDA"));
}

#[test]
fn insert_without_identifier_is_invalid() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut no_id = ClientRecord::new();
    no_id.set(column("RAZAO"), "NOBODY");
    assert!(matches!(store.insert(&no_id), Err(SqliteStoreError::Invalid(_))));
}

// ============================================================================
// SECTION: Register and Sequencing
// ============================================================================

#[test]
fn register_on_empty_table_assigns_one() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let id = store.register(&record("", "FIRST SA", "111", "")).unwrap();
    assert_eq!(id.as_str(), "1");
    assert!(store.find("1").unwrap().is_some());
}

#[test]
fn register_continues_from_the_numeric_maximum() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("123", "MAX SA", "111", "")).unwrap();
    let id = store.register(&record("", "NEXT SA", "222", "")).unwrap();
    assert_eq!(id.as_str(), "124");
}

#[test]
fn next_identifier_previews_without_reserving() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.next_identifier().unwrap().as_str(), "1");
    store.insert(&record("41", "A", "1", "")).unwrap();
    assert_eq!(store.next_identifier().unwrap().as_str(), "42");
    assert_eq!(store.next_identifier().unwrap().as_str(), "42");
}

// ============================================================================
// SECTION: Update
// ============================================================================

#[test]
fn update_rewrites_non_identifier_columns() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("7", "OLD NAME", "111", "")).unwrap();
    let changed = store.update(&record("7", "NEW NAME", "111", "ISENTO")).unwrap();
    assert!(changed);
    let found = store.find("7").unwrap().unwrap();
    assert_eq!(found.get(&column("RAZAO")), Some("NEW NAME"));
    assert_eq!(found.get(&column("INSCRICAO")), Some("ISENTO"));
}

#[test]
fn update_of_a_missing_row_reports_false() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(!store.update(&record("99", "GHOST", "0", "")).unwrap());
}

// ============================================================================
// SECTION: Find Precedence
// ============================================================================

#[test]
fn exact_cgc_match_beats_substring_company_name_match() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "COMPANY 555", "999", "")).unwrap();
    store.insert(&record("2", "OTHER SA", "555", "")).unwrap();
    let found = store.find("555").unwrap().unwrap();
    assert_eq!(found.get(&column("XCLIENTES")), Some("2"));
}

#[test]
fn substring_match_resolves_partial_company_names() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "PADARIA DO ZE LTDA", "111", "")).unwrap();
    let found = store.find("DO ZE").unwrap().unwrap();
    assert_eq!(found.get(&column("XCLIENTES")), Some("1"));
}

#[test]
fn ambiguous_substring_match_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("2", "ACME NORTE", "111", "")).unwrap();
    store.insert(&record("1", "ACME SUL", "222", "")).unwrap();
    let found = store.find("ACME").unwrap().unwrap();
    assert_eq!(found.get(&column("XCLIENTES")), Some("1"));
}

#[test]
fn like_wildcards_in_the_input_do_not_match_other_names() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "ACME LTDA", "111", "")).unwrap();
    assert_eq!(store.find("%").unwrap(), None);
    assert_eq!(store.find("AC_E").unwrap(), None);
    assert!(store.find("ACME").unwrap().is_some());
}

#[test]
fn stored_wildcard_characters_are_still_findable_literally() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "100% SUCO SA", "111", "")).unwrap();
    store.insert(&record("2", "OUTRA SA", "222", "")).unwrap();
    let found = store.find("100%").unwrap().unwrap();
    assert_eq!(found.get(&column("XCLIENTES")), Some("1"));
}

#[test]
fn find_miss_is_none_not_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.find("nothing").unwrap(), None);
}

// ============================================================================
// SECTION: Delete
// ============================================================================

#[test]
fn delete_reports_the_removed_row_count() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "A", "555", "")).unwrap();
    store.insert(&record("2", "B", "555", "")).unwrap();
    assert_eq!(store.delete("555").unwrap(), 2);
    assert_eq!(store.find("1").unwrap(), None);
    assert_eq!(store.find("2").unwrap(), None);
}

#[test]
fn delete_prefers_the_identifier_column() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("555", "BY ID", "111", "")).unwrap();
    store.insert(&record("1", "BY CGC", "555", "")).unwrap();
    assert_eq!(store.delete("555").unwrap(), 1);
    assert_eq!(store.find("1").unwrap().map(|r| r.get(&column("RAZAO")).map(String::from)), Some(Some("BY CGC".to_string())));
}

#[test]
fn delete_never_matches_substrings() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "ACME LTDA", "111", "")).unwrap();
    assert_eq!(store.delete("ACME").unwrap(), 0);
    assert!(store.find("1").unwrap().is_some());
}

#[test]
fn find_for_delete_resolves_with_the_exact_delete_strategies() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.insert(&record("1", "ACME LTDA", "111", "")).unwrap();
    store.insert(&record("2", "OTHER SA", "222", "")).unwrap();
    // find would resolve the fragment through the company name.
    assert!(store.find("ACME").unwrap().is_some());
    assert_eq!(store.find_for_delete("ACME").unwrap(), None);
    let by_cgc = store.find_for_delete("222").unwrap().unwrap();
    assert_eq!(by_cgc.get(&column("XCLIENTES")), Some("2"));
}

#[test]
fn delete_miss_reports_zero() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.delete("nothing").unwrap(), 0);
}
