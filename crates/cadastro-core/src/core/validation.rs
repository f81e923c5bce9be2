// crates/cadastro-core/src/core/validation.rs
// ============================================================================
// Module: Cadastro Validation Engine
// Description: Field-rule validation for collected form data.
// Purpose: Check values against schema-derived rules before any persistence.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Validation runs over [`FormData`] using the ordered rules derived from the
//! field schema. Errors are accumulated, never short-circuited, so the
//! operator sees every problem at once. Overflow handling is an explicit
//! per-field policy: `Reject` emits an error, `Truncate` rewrites the value in
//! place — callers must treat the form as an in/out parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::fields::OverflowPolicy;
use crate::core::identifiers::FieldName;
use crate::core::record::FormData;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Validation rule for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Maximum accepted value length in characters.
    pub max_length: usize,
    /// Whether an empty value is rejected.
    pub required: bool,
    /// Overflow handling for values exceeding `max_length`.
    pub overflow: OverflowPolicy,
}

/// Ordered validation rules derived from a field schema.
///
/// # Invariants
/// - Rule order matches schema order and determines error-message order only;
///   it never affects which errors are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Rules in schema order.
    rules: Vec<(FieldName, FieldRule)>,
}

impl ValidationRules {
    /// Creates a rule set from ordered entries.
    #[must_use]
    pub fn new(rules: Vec<(FieldName, FieldRule)>) -> Self {
        Self {
            rules,
        }
    }

    /// Iterates over the rules in order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name, rule))
    }

    /// Returns the rule for a field, if configured.
    #[must_use]
    pub fn get(&self, name: &FieldName) -> Option<&FieldRule> {
        self.rules.iter().find(|(rule_name, _)| rule_name == name).map(|(_, rule)| rule)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A single validation failure.
///
/// # Invariants
/// - Messages name the offending field; length failures also name the limit.
///   The message text is part of the operator-facing contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or missing.
    #[error("'{field}' is required.")]
    Required {
        /// The offending field.
        field: FieldName,
    },
    /// A value exceeds the field's maximum length and the policy rejects it.
    #[error("'{field}' o campo passou do maximo de {max_length} characters.")]
    TooLong {
        /// The offending field.
        field: FieldName,
        /// The configured maximum length.
        max_length: usize,
    },
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates form data against the given rules, in rule order.
///
/// Values are trimmed of surrounding whitespace before checks; a missing entry
/// counts as empty. Fields whose policy is [`OverflowPolicy::Truncate`] are
/// rewritten in place when over the limit instead of producing an error.
/// Returns all accumulated errors; an empty vector means the form is valid.
#[must_use]
pub fn validate(data: &mut FormData, rules: &ValidationRules) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (field, rule) in rules.iter() {
        let value = data.get(field).unwrap_or_default().trim().to_string();
        if rule.required && value.is_empty() {
            errors.push(ValidationError::Required {
                field: field.clone(),
            });
            continue;
        }
        if value.chars().count() > rule.max_length {
            match rule.overflow {
                OverflowPolicy::Truncate => {
                    let truncated: String = value.chars().take(rule.max_length).collect();
                    data.set(field.clone(), truncated);
                }
                OverflowPolicy::Reject => {
                    errors.push(ValidationError::TooLong {
                        field: field.clone(),
                        max_length: rule.max_length,
                    });
                }
            }
        }
    }
    errors
}
