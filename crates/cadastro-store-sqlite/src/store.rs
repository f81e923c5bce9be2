// crates/cadastro-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Client Store
// Description: ClientStore implementation over one configurable SQLite table.
// Purpose: Persist client records with schema-driven statements and typed errors.
// Dependencies: cadastro-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`ClientStore`] over `SQLite`. The table layout is
//! derived from the configured field schema: one TEXT column per field, with
//! the identifier column as primary key. Every operation opens a fresh
//! connection, applies the configured pragmas, and releases the connection
//! before returning, so no state spans calls and a restarted database never
//! strands the process.
//!
//! Statement text only ever interpolates identifiers validated at
//! construction ([`ColumnName`] and the table name); record values always
//! travel as bound parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use cadastro_core::ClientId;
use cadastro_core::ClientRecord;
use cadastro_core::ClientStore;
use cadastro_core::ColumnName;
use cadastro_core::FieldSchema;
use cadastro_core::InsertOutcome;
use cadastro_core::LookupStrategy;
use cadastro_core::MatchOp;
use cadastro_core::StoreError;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default client table name.
const DEFAULT_TABLE_NAME: &str = "FBCLIENTES";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` client store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `table_name` must be a plain SQL identifier; construction rejects
///   anything else.
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Name of the client table.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for the given database path with default settings.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table_name: default_table_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default client table name.
fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` client store errors.
///
/// # Invariants
/// - Error messages avoid embedding record values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// The database file could not be opened.
    #[error("sqlite store connection error: {0}")]
    Connection(String),
    /// A statement failed to prepare or execute.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration or caller data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Connection(message) => Self::Connection(message),
            SqliteStoreError::Db(message) => Self::Db(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` statement error into the store error taxonomy.
fn db_error(error: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(error.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed client store.
///
/// # Invariants
/// - The table name and every strategy column are validated at construction.
/// - Delete strategies are exact-match only; substring deletion is rejected
///   when the store is built, not at delete time.
/// - Each operation uses its own connection; instances hold no open handles.
#[derive(Debug, Clone)]
pub struct SqliteClientStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Field schema driving table layout and statement columns.
    schema: FieldSchema,
    /// Ordered lookup strategies for find.
    find_strategies: Vec<LookupStrategy>,
    /// Ordered lookup strategies for delete (exact-match only).
    delete_strategies: Vec<LookupStrategy>,
}

impl SqliteClientStore {
    /// Builds a store and ensures the client table exists.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the table name is not a plain SQL
    /// identifier, a strategy references a column outside the schema, a
    /// delete strategy uses substring matching, or the database cannot be
    /// opened.
    pub fn new(
        config: SqliteStoreConfig,
        schema: FieldSchema,
        find_strategies: Vec<LookupStrategy>,
        delete_strategies: Vec<LookupStrategy>,
    ) -> Result<Self, SqliteStoreError> {
        if ColumnName::parse(&config.table_name).is_none() {
            return Err(SqliteStoreError::Invalid(format!(
                "table name is not a plain SQL identifier: {}",
                config.table_name
            )));
        }
        validate_strategies(&schema, &find_strategies, "find")?;
        validate_strategies(&schema, &delete_strategies, "delete")?;
        if let Some(strategy) =
            delete_strategies.iter().find(|strategy| strategy.op == MatchOp::Substring)
        {
            return Err(SqliteStoreError::Invalid(format!(
                "delete strategy on column {} uses substring matching; deletes must be exact",
                strategy.column
            )));
        }
        let store = Self {
            config,
            schema,
            find_strategies,
            delete_strategies,
        };
        let connection = store.open_connection()?;
        store.ensure_table(&connection)?;
        Ok(store)
    }

    /// Returns the configured table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    /// Inserts a record under its own identifier, guarded against duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the record lacks an identifier or the
    /// statement fails.
    pub fn insert(&self, record: &ClientRecord) -> Result<InsertOutcome, SqliteStoreError> {
        if record.identifier(&self.schema).is_none() {
            return Err(SqliteStoreError::Invalid(
                "record has no identifier value".to_string(),
            ));
        }
        let connection = self.open_connection()?;
        self.insert_row(&connection, record)
    }

    /// Generates the next identifier and inserts the record under it, inside
    /// one immediate transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database is unreachable or the
    /// transaction fails.
    pub fn register(&self, record: &ClientRecord) -> Result<ClientId, SqliteStoreError> {
        let mut connection = self.open_connection()?;
        let tx = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| db_error(&err))?;
        let id = self.next_identifier_on(&tx)?;
        let mut assigned = record.clone();
        assigned.set(self.schema.identifier_column().clone(), id.as_str());
        let outcome = self.insert_row(&tx, &assigned)?;
        if !outcome.is_inserted() {
            return Err(SqliteStoreError::Db(format!(
                "generated identifier already present: {id}"
            )));
        }
        tx.commit().map_err(|err| db_error(&err))?;
        Ok(id)
    }

    /// Updates the row matching the record's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the record lacks an identifier or the
    /// statement fails.
    pub fn update(&self, record: &ClientRecord) -> Result<bool, SqliteStoreError> {
        let Some(id) = record.identifier(&self.schema) else {
            return Err(SqliteStoreError::Invalid(
                "record has no identifier value".to_string(),
            ));
        };
        let assignments: Vec<String> = self
            .schema
            .columns()
            .iter()
            .filter(|column| *column != &self.schema.identifier_column())
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect();
        let mut values: Vec<String> = self
            .schema
            .columns()
            .iter()
            .filter(|column| *column != &self.schema.identifier_column())
            .map(|column| record.get(column).unwrap_or_default().to_string())
            .collect();
        let id_placeholder = values.len() + 1;
        values.push(id.as_str().to_string());
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{id_placeholder}",
            self.config.table_name,
            assignments.join(", "),
            self.schema.identifier_column()
        );
        let connection = self.open_connection()?;
        let changed = connection
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(|err| db_error(&err))?;
        Ok(changed > 0)
    }

    /// Deletes the rows matched by the first delete strategy that hits.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when a statement fails.
    pub fn delete(&self, identifier: &str) -> Result<u64, SqliteStoreError> {
        let connection = self.open_connection()?;
        for strategy in &self.delete_strategies {
            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1",
                self.config.table_name, strategy.column
            );
            let removed =
                connection.execute(&sql, params![identifier]).map_err(|err| db_error(&err))?;
            if removed > 0 {
                return Ok(removed as u64);
            }
        }
        Ok(0)
    }

    /// Finds a record through the ordered find strategies.
    ///
    /// Substring strategies match the input literally: `%` and `_` in the
    /// identifier are not LIKE wildcards.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when a statement fails.
    pub fn find(&self, identifier: &str) -> Result<Option<ClientRecord>, SqliteStoreError> {
        self.find_with(&self.find_strategies, identifier)
    }

    /// Finds the record a [`SqliteClientStore::delete`] call for the same
    /// identifier would remove, through the delete strategy order.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when a statement fails.
    pub fn find_for_delete(
        &self,
        identifier: &str,
    ) -> Result<Option<ClientRecord>, SqliteStoreError> {
        self.find_with(&self.delete_strategies, identifier)
    }

    /// Runs the ordered lookup over the given strategies.
    fn find_with(
        &self,
        strategies: &[LookupStrategy],
        identifier: &str,
    ) -> Result<Option<ClientRecord>, SqliteStoreError> {
        let connection = self.open_connection()?;
        let columns = self.select_columns();
        for strategy in strategies {
            let (condition, bound) = match strategy.op {
                MatchOp::Exact => {
                    (format!("{} = ?1", strategy.column), identifier.to_string())
                }
                MatchOp::Substring => (
                    format!("{} LIKE '%' || ?1 || '%' ESCAPE '\\'", strategy.column),
                    escape_like_pattern(identifier),
                ),
            };
            let sql = format!(
                "SELECT {columns} FROM {} WHERE {condition} ORDER BY {} LIMIT 1",
                self.config.table_name,
                self.schema.identifier_column()
            );
            let row = connection
                .query_row(&sql, params![bound], |row| self.record_from_row(row))
                .optional()
                .map_err(|err| db_error(&err))?;
            if row.is_some() {
                return Ok(row);
            }
        }
        Ok(None)
    }

    /// Computes the next client identifier without reserving it.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn next_identifier(&self) -> Result<ClientId, SqliteStoreError> {
        let connection = self.open_connection()?;
        self.next_identifier_on(&connection)
    }

    /// Opens a fresh connection with the configured pragmas applied.
    fn open_connection(&self) -> Result<Connection, SqliteStoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(&self.config.path, flags)
            .map_err(|err| SqliteStoreError::Connection(err.to_string()))?;
        connection
            .execute_batch(&format!(
                "PRAGMA journal_mode = {};",
                self.config.journal_mode.pragma_value()
            ))
            .map_err(|err| db_error(&err))?;
        connection
            .execute_batch(&format!(
                "PRAGMA synchronous = {};",
                self.config.sync_mode.pragma_value()
            ))
            .map_err(|err| db_error(&err))?;
        connection
            .busy_timeout(std::time::Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|err| db_error(&err))?;
        Ok(connection)
    }

    /// Creates the client table when absent.
    ///
    /// The identifier column is the primary key; all columns are TEXT. Column
    /// order follows the schema order.
    fn ensure_table(&self, connection: &Connection) -> Result<(), SqliteStoreError> {
        let definitions: Vec<String> = self
            .schema
            .columns()
            .iter()
            .map(|column| {
                if *column == self.schema.identifier_column() {
                    format!("{column} TEXT NOT NULL PRIMARY KEY")
                } else {
                    format!("{column} TEXT NOT NULL DEFAULT ''")
                }
            })
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.config.table_name,
            definitions.join(", ")
        );
        connection.execute_batch(&sql).map_err(|err| db_error(&err))
    }

    /// Runs a guarded insert on an open connection or transaction.
    fn insert_row(
        &self,
        connection: &Connection,
        record: &ClientRecord,
    ) -> Result<InsertOutcome, SqliteStoreError> {
        let columns = self.schema.columns();
        let placeholders: Vec<String> =
            (1 ..= columns.len()).map(|index| format!("?{index}")).collect();
        let values: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).unwrap_or_default().to_string())
            .collect();
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
            self.config.table_name,
            self.select_columns(),
            placeholders.join(", ")
        );
        let inserted = connection
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(|err| db_error(&err))?;
        if inserted == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    /// Computes max + 1 over the numeric interpretation of stored identifiers.
    ///
    /// Non-numeric identifiers cast to zero in `SQLite` and therefore never
    /// drive the sequence backwards. An empty table yields `"1"`.
    fn next_identifier_on(&self, connection: &Connection) -> Result<ClientId, SqliteStoreError> {
        let sql = format!(
            "SELECT MAX(CAST({} AS INTEGER)) FROM {}",
            self.schema.identifier_column(),
            self.config.table_name
        );
        let max: Option<i64> = connection
            .query_row(&sql, params![], |row| row.get(0))
            .map_err(|err| db_error(&err))?;
        let next = max.map_or(1, |value| value.max(0) + 1);
        Ok(ClientId::new(next.to_string()))
    }

    /// Returns the comma-separated column list in schema order.
    fn select_columns(&self) -> String {
        self.schema
            .columns()
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<&str>>()
            .join(", ")
    }

    /// Maps a result row (selected in schema column order) to a record.
    fn record_from_row(&self, row: &Row<'_>) -> Result<ClientRecord, rusqlite::Error> {
        let mut record = ClientRecord::new();
        for (index, column) in self.schema.columns().into_iter().enumerate() {
            let value: Option<String> = row.get(index)?;
            record.set(column.clone(), value.unwrap_or_default());
        }
        Ok(record)
    }
}

/// Escapes `\`, `%`, and `_` so a bound LIKE operand matches literally.
fn escape_like_pattern(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Rejects strategies whose column is not part of the schema.
fn validate_strategies(
    schema: &FieldSchema,
    strategies: &[LookupStrategy],
    kind: &str,
) -> Result<(), SqliteStoreError> {
    let columns = schema.columns();
    for strategy in strategies {
        if !columns.contains(&&strategy.column) {
            return Err(SqliteStoreError::Invalid(format!(
                "{kind} strategy references a column outside the schema: {}",
                strategy.column
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: ClientStore Implementation
// ============================================================================

impl ClientStore for SqliteClientStore {
    fn insert(&self, record: &ClientRecord) -> Result<InsertOutcome, StoreError> {
        Self::insert(self, record).map_err(StoreError::from)
    }

    fn register(&self, record: &ClientRecord) -> Result<ClientId, StoreError> {
        Self::register(self, record).map_err(StoreError::from)
    }

    fn update(&self, record: &ClientRecord) -> Result<bool, StoreError> {
        Self::update(self, record).map_err(StoreError::from)
    }

    fn delete(&self, identifier: &str) -> Result<u64, StoreError> {
        Self::delete(self, identifier).map_err(StoreError::from)
    }

    fn find(&self, identifier: &str) -> Result<Option<ClientRecord>, StoreError> {
        Self::find(self, identifier).map_err(StoreError::from)
    }

    fn next_identifier(&self) -> Result<ClientId, StoreError> {
        Self::next_identifier(self).map_err(StoreError::from)
    }
}
