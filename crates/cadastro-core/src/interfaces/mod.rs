// crates/cadastro-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cadastro Interfaces
// Description: Backend-agnostic persistence contract for client records.
// Purpose: Define the store surface the presentation layer consumes.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! The store interface keeps screens independent of the concrete database
//! backend. Errors are typed — "unreachable" is distinguishable from "bad
//! statement" and from "bad input" — while the success side of each operation
//! preserves the simple contract screens rely on: an outcome flag for insert,
//! a bool for update, a row count for delete, an option for find.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ClientId;
use crate::core::identifiers::ColumnName;
use crate::core::record::ClientRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never embed credentials or full connection strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The database is unreachable or refused the connection.
    #[error("client store connection error: {0}")]
    Connection(String),
    /// A statement failed to prepare or execute.
    #[error("client store db error: {0}")]
    Db(String),
    /// The caller supplied data the store cannot act on.
    #[error("client store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a guarded insert.
///
/// # Invariants
/// - Variants are exhaustive: an insert either created the row or found the
///   identifier already present; anything else is a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was created.
    Inserted,
    /// A row with the same identifier already exists; nothing was written.
    AlreadyExists,
}

impl InsertOutcome {
    /// Returns true when the row was created.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

// ============================================================================
// SECTION: Lookup Strategies
// ============================================================================

/// Comparison operator a lookup strategy applies to its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOp {
    /// Exact equality on the column value.
    Exact,
    /// Case-sensitive substring containment on the column value.
    Substring,
}

/// One step of the ordered multi-column identifier resolution.
///
/// # Invariants
/// - Strategies are tried in list order; the first strategy yielding at least
///   one row wins and later strategies are never consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupStrategy {
    /// Column the strategy matches against.
    pub column: ColumnName,
    /// Operator applied to the column.
    pub op: MatchOp,
}

impl LookupStrategy {
    /// Creates an exact-match strategy for a column.
    #[must_use]
    pub fn exact(column: ColumnName) -> Self {
        Self {
            column,
            op: MatchOp::Exact,
        }
    }

    /// Creates a substring-match strategy for a column.
    #[must_use]
    pub fn substring(column: ColumnName) -> Self {
        Self {
            column,
            op: MatchOp::Substring,
        }
    }
}

// ============================================================================
// SECTION: Client Store
// ============================================================================

/// Backend-agnostic client record store.
///
/// Implementations acquire whatever connection they need per call and release
/// it unconditionally before returning; no state spans calls.
pub trait ClientStore {
    /// Inserts a record under its own identifier, guarded against duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record lacks an identifier, the
    /// database is unreachable, or the statement fails.
    fn insert(&self, record: &ClientRecord) -> Result<InsertOutcome, StoreError>;

    /// Generates the next identifier and inserts the record under it, as one
    /// atomic operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database is unreachable or the
    /// transaction fails.
    fn register(&self, record: &ClientRecord) -> Result<ClientId, StoreError>;

    /// Updates the row matching the record's identifier.
    ///
    /// Returns `false` when no such row exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record lacks an identifier, the
    /// database is unreachable, or the statement fails.
    fn update(&self, record: &ClientRecord) -> Result<bool, StoreError>;

    /// Deletes rows resolved through the configured delete strategies.
    ///
    /// Returns the number of rows removed by the first strategy that matched;
    /// zero means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database is unreachable or a statement
    /// fails.
    fn delete(&self, identifier: &str) -> Result<u64, StoreError>;

    /// Finds a record through the configured find strategies.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database is unreachable or a statement
    /// fails.
    fn find(&self, identifier: &str) -> Result<Option<ClientRecord>, StoreError>;

    /// Computes the next client identifier (max + 1; `"1"` on an empty table).
    ///
    /// This is a preview for display purposes only; [`ClientStore::register`]
    /// recomputes the identifier inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database is unreachable or the query
    /// fails.
    fn next_identifier(&self) -> Result<ClientId, StoreError>;
}
