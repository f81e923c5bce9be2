// crates/cadastro-core/src/core/identifiers.rs
// ============================================================================
// Module: Cadastro Identifiers
// Description: Canonical identifiers for client records, fields, and columns.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Cadastro.
//! String identifiers are opaque and serialize transparently. Identifiers that
//! carry structure ([`ClientId`], [`ColumnName`], [`Cep`]) enforce their
//! invariants at construction boundaries so downstream code never re-validates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Client Identifiers
// ============================================================================

/// Primary business key for a client record (the `XCLIENTES` value).
///
/// # Invariants
/// - Stored as text; treated as a monotonically increasing integer for
///   generation purposes only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new client identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric interpretation of the identifier, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Operator identity recorded in activity log entries.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates a new actor identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Schema Identifiers
// ============================================================================

/// Logical/display key of a configured client field.
///
/// # Invariants
/// - Opaque UTF-8 string; uniqueness within a schema is enforced at schema
///   derivation, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a new field name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the field name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Physical column name participating in dynamically built SQL statements.
///
/// # Invariants
/// - Always a valid SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`. Construction
///   rejects anything else, so configured column names can be interpolated
///   into statements without an injection surface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnName(String);

impl ColumnName {
    /// Parses a column name, rejecting values that are not plain SQL identifiers.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    /// Returns the column name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ColumnName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid column name: {value}"))
    }
}

impl From<ColumnName> for String {
    fn from(value: ColumnName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Postal Code
// ============================================================================

/// Normalized 8-digit postal code used for address lookups.
///
/// # Invariants
/// - Always exactly 8 ASCII digits; dashes, dots, and surrounding whitespace
///   are stripped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Parses a postal code, normalizing separators first.
    ///
    /// Returns `None` when the normalized value is not exactly 8 digits, so
    /// callers can show a format warning instead of issuing a network call.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String =
            value.trim().chars().filter(|c| *c != '-' && *c != '.').collect();
        if normalized.len() == 8 && normalized.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    /// Returns the normalized digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Cep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid postal code: {value}"))
    }
}

impl From<Cep> for String {
    fn from(value: Cep) -> Self {
        value.0
    }
}
