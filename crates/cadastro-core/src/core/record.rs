// crates/cadastro-core/src/core/record.rs
// ============================================================================
// Module: Cadastro Records
// Description: Form data and client records keyed by the field schema.
// Purpose: Translate logical field values to physical columns exactly once.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Screens collect values keyed by logical field name ([`FormData`]); the
//! persistence layer works with values keyed by physical column
//! ([`ClientRecord`]). The translation between the two happens in one place,
//! [`ClientRecord::from_form`], driven by the derived [`FieldSchema`] — never
//! ad hoc at call sites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::fields::FieldSchema;
use crate::core::identifiers::ClientId;
use crate::core::identifiers::ColumnName;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Form Data
// ============================================================================

/// Values collected from a screen, keyed by logical field name.
///
/// # Invariants
/// - Values are stored as collected; trimming happens during validation.
/// - Treated as an in/out parameter by the validator: truncation policies
///   rewrite values in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    /// Field values keyed by logical name.
    values: BTreeMap<FieldName, String>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    /// Returns a field value, if present.
    #[must_use]
    pub fn get(&self, name: &FieldName) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Applies internal default values, overwriting collected entries.
    ///
    /// Defaults whose keys match no schema field are carried along and dropped
    /// later at the persistence-boundary translation.
    pub fn apply_defaults(&mut self, defaults: &BTreeMap<String, String>) {
        for (name, value) in defaults {
            self.values.insert(FieldName::new(name.clone()), value.clone());
        }
    }

    /// Iterates over all collected entries.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.values.iter().map(|(name, value)| (name, value.as_str()))
    }
}

// ============================================================================
// SECTION: Client Record
// ============================================================================

/// A client row keyed by physical column name.
///
/// # Invariants
/// - Keys are the schema's `db_column` values; entries for unknown columns are
///   never produced by [`ClientRecord::from_form`].
/// - The only durable copy of a record lives in the database; instances are
///   transient per-operation values and audit snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientRecord {
    /// Column values keyed by physical column name.
    values: BTreeMap<ColumnName, String>,
}

impl ClientRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from form data, translating logical names to columns.
    ///
    /// Every schema field produces an entry; fields absent from the form map
    /// to the empty string. Form entries with no schema counterpart are
    /// dropped here, at the persistence boundary.
    #[must_use]
    pub fn from_form(schema: &FieldSchema, form: &FormData) -> Self {
        let mut values = BTreeMap::new();
        for field in schema.fields() {
            let value = form.get(&field.name).unwrap_or_default();
            values.insert(field.db_column.clone(), value.to_string());
        }
        Self {
            values,
        }
    }

    /// Returns a column value, if present.
    #[must_use]
    pub fn get(&self, column: &ColumnName) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Sets a column value, replacing any previous value.
    pub fn set(&mut self, column: ColumnName, value: impl Into<String>) {
        self.values.insert(column, value.into());
    }

    /// Returns the record's client identifier per the schema, if present and
    /// non-empty.
    #[must_use]
    pub fn identifier(&self, schema: &FieldSchema) -> Option<ClientId> {
        self.get(schema.identifier_column())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ClientId::new)
    }

    /// Iterates over all column entries.
    pub fn entries(&self) -> impl Iterator<Item = (&ColumnName, &str)> {
        self.values.iter().map(|(column, value)| (column, value.as_str()))
    }
}
