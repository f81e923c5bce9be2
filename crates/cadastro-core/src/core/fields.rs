// crates/cadastro-core/src/core/fields.rs
// ============================================================================
// Module: Cadastro Field Schema
// Description: Configurable client-field definitions and derived schema views.
// Purpose: Drive form rendering, validation rules, and column mapping from one table.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The field schema is the ordered list of configured client fields. Everything
//! downstream derives from it: which inputs a screen renders, which rules the
//! validator applies, and which columns participate in dynamically built SQL.
//! [`FieldSchema::derive`] is a pure function of the configured list and must
//! be recomputed whenever the configuration changes; holding on to a stale
//! schema is a correctness bug.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ColumnName;
use crate::core::identifiers::FieldName;
use crate::core::validation::FieldRule;
use crate::core::validation::ValidationRules;

// ============================================================================
// SECTION: Field Definitions
// ============================================================================

/// Policy applied when a field value exceeds its configured maximum length.
///
/// # Invariants
/// - [`OverflowPolicy::Reject`] is the default; truncation must be opted into
///   per field so silent data loss stays visible in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Emit a validation error and leave the value untouched.
    #[default]
    Reject,
    /// Truncate the value in place to the maximum length, without an error.
    Truncate,
}

/// One configured client field.
///
/// # Invariants
/// - `max_length` is at least 1 (enforced at schema derivation).
/// - `name` and `db_column` are unique within a schema (enforced at schema
///   derivation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Logical/display key; unique within the schema.
    pub name: FieldName,
    /// Maximum accepted value length in characters.
    pub max_length: usize,
    /// Whether an empty value is rejected.
    pub required: bool,
    /// Physical column the field maps to.
    pub db_column: ColumnName,
    /// Overflow handling for values exceeding `max_length`.
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema derivation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The configured field list is empty.
    #[error("field schema is empty")]
    Empty,
    /// Two fields share the same logical name.
    #[error("duplicate field name: {0}")]
    DuplicateName(String),
    /// Two fields share the same physical column.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    /// The identifier field is not part of the configured list.
    #[error("identifier field missing from schema: {0}")]
    MissingIdentifier(String),
    /// A field declares a zero maximum length.
    #[error("field {0} declares max_length 0")]
    InvalidMaxLength(String),
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Derived view over the ordered client-field configuration.
///
/// # Invariants
/// - Field names and columns are unique; the identifier field is present.
/// - Field order matches the configured order and determines form layout,
///   statement column order, and validation message order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Ordered field definitions, as configured.
    fields: Vec<FieldDefinition>,
    /// Position of the identifier field within `fields`.
    identifier_index: usize,
}

impl FieldSchema {
    /// Derives a schema from a configured field list and the identifier field
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the list is empty, a name or column is
    /// duplicated, a field declares a zero maximum length, or the identifier
    /// field is absent.
    pub fn derive(
        fields: Vec<FieldDefinition>,
        identifier: &FieldName,
    ) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut names = BTreeSet::new();
        let mut columns = BTreeSet::new();
        for field in &fields {
            if field.max_length == 0 {
                return Err(SchemaError::InvalidMaxLength(field.name.to_string()));
            }
            if !names.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateName(field.name.to_string()));
            }
            if !columns.insert(field.db_column.clone()) {
                return Err(SchemaError::DuplicateColumn(field.db_column.to_string()));
            }
        }
        let identifier_index = fields
            .iter()
            .position(|field| field.name == *identifier)
            .ok_or_else(|| SchemaError::MissingIdentifier(identifier.to_string()))?;
        Ok(Self {
            fields,
            identifier_index,
        })
    }

    /// Returns all field definitions in configured order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Returns the identifier field definition.
    #[must_use]
    pub fn identifier_field(&self) -> &FieldDefinition {
        &self.fields[self.identifier_index]
    }

    /// Returns the identifier field's logical name.
    #[must_use]
    pub fn identifier_name(&self) -> &FieldName {
        &self.identifier_field().name
    }

    /// Returns the identifier field's physical column.
    #[must_use]
    pub fn identifier_column(&self) -> &ColumnName {
        &self.identifier_field().db_column
    }

    /// Returns the fields a form renders, in order, excluding the identifier.
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.identifier_index)
            .map(|(_, field)| field)
    }

    /// Returns all physical columns in configured order.
    #[must_use]
    pub fn columns(&self) -> Vec<&ColumnName> {
        self.fields.iter().map(|field| &field.db_column).collect()
    }

    /// Returns the physical column for a logical field name.
    #[must_use]
    pub fn column_of(&self, name: &FieldName) -> Option<&ColumnName> {
        self.definition(name).map(|field| &field.db_column)
    }

    /// Returns the definition for a logical field name.
    #[must_use]
    pub fn definition(&self, name: &FieldName) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == *name)
    }

    /// Builds the ordered validation rules for this schema.
    #[must_use]
    pub fn rules(&self) -> ValidationRules {
        ValidationRules::new(
            self.fields
                .iter()
                .map(|field| {
                    (
                        field.name.clone(),
                        FieldRule {
                            max_length: field.max_length,
                            required: field.required,
                            overflow: field.overflow,
                        },
                    )
                })
                .collect(),
        )
    }
}
