// crates/cadastro-core/tests/validation_unit.rs
// ============================================================================
// Module: Validation Engine Unit Tests
// Description: Targeted tests for field-rule validation behavior.
// Purpose: Validate required handling, overflow policies, and message content.
// ============================================================================

//! ## Overview
//! Unit-level tests for the validation engine:
//! - Required-field rejection and message content
//! - Reject-on-overflow errors that leave values untouched
//! - Truncate-on-overflow in/out mutation (the street-type field policy)
//! - Whitespace normalization and missing-value handling

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

use cadastro_core::FieldName;
use cadastro_core::FieldRule;
use cadastro_core::FormData;
use cadastro_core::OverflowPolicy;
use cadastro_core::ValidationError;
use cadastro_core::ValidationRules;
use cadastro_core::validate;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn rule(max_length: usize, required: bool, overflow: OverflowPolicy) -> FieldRule {
    FieldRule {
        max_length,
        required,
        overflow,
    }
}

fn rules_for(entries: Vec<(&str, FieldRule)>) -> ValidationRules {
    ValidationRules::new(
        entries.into_iter().map(|(name, rule)| (FieldName::new(name), rule)).collect(),
    )
}

// ============================================================================
// SECTION: Required Fields
// ============================================================================

#[test]
fn missing_required_field_is_rejected_by_name() {
    let rules = rules_for(vec![("CGC", rule(20, true, OverflowPolicy::Reject))]);
    let mut form = FormData::new();
    let errors = validate(&mut form, &rules);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "'CGC' is required.");
}

#[test]
fn whitespace_only_required_field_is_rejected() {
    let rules = rules_for(vec![("CGC", rule(20, true, OverflowPolicy::Reject))]);
    let mut form = FormData::new();
    form.set(FieldName::new("CGC"), "   ");
    let errors = validate(&mut form, &rules);
    assert_eq!(
        errors,
        vec![ValidationError::Required {
            field: FieldName::new("CGC"),
        }]
    );
}

#[test]
fn optional_empty_field_passes() {
    let rules = rules_for(vec![("BAIRRO", rule(60, false, OverflowPolicy::Reject))]);
    let mut form = FormData::new();
    assert!(validate(&mut form, &rules).is_empty());
}

// ============================================================================
// SECTION: Overflow Policies
// ============================================================================

#[test]
fn truncate_policy_shortens_value_in_place_without_error() {
    let rules = rules_for(vec![("LOGRA", rule(20, false, OverflowPolicy::Truncate))]);
    let mut form = FormData::new();
    form.set(FieldName::new("LOGRA"), "A".repeat(30));
    let errors = validate(&mut form, &rules);
    assert!(errors.is_empty());
    assert_eq!(form.get(&FieldName::new("LOGRA")), Some("A".repeat(20).as_str()));
}

#[test]
fn reject_policy_reports_field_and_limit_and_keeps_value() {
    let rules = rules_for(vec![("BAIRRO", rule(60, false, OverflowPolicy::Reject))]);
    let mut form = FormData::new();
    form.set(FieldName::new("BAIRRO"), "A".repeat(70));
    let errors = validate(&mut form, &rules);
    assert_eq!(errors.len(), 1);
    let message = errors[0].to_string();
    assert!(message.contains("BAIRRO"));
    assert!(message.contains("60"));
    assert_eq!(form.get(&FieldName::new("BAIRRO")), Some("A".repeat(70).as_str()));
}

#[test]
fn value_at_exact_limit_passes_without_mutation() {
    let rules = rules_for(vec![("LOGRA", rule(20, false, OverflowPolicy::Truncate))]);
    let mut form = FormData::new();
    form.set(FieldName::new("LOGRA"), "A".repeat(20));
    assert!(validate(&mut form, &rules).is_empty());
    assert_eq!(form.get(&FieldName::new("LOGRA")), Some("A".repeat(20).as_str()));
}

// ============================================================================
// SECTION: Error Accumulation
// ============================================================================

#[test]
fn all_failures_are_accumulated_in_rule_order() {
    let rules = rules_for(vec![
        ("CLIENTE", rule(100, true, OverflowPolicy::Reject)),
        ("CGC", rule(20, true, OverflowPolicy::Reject)),
        ("BAIRRO", rule(5, false, OverflowPolicy::Reject)),
    ]);
    let mut form = FormData::new();
    form.set(FieldName::new("BAIRRO"), "too long for five");
    let errors = validate(&mut form, &rules);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].to_string(), "'CLIENTE' is required.");
    assert_eq!(errors[1].to_string(), "'CGC' is required.");
    assert_eq!(
        errors[2],
        ValidationError::TooLong {
            field: FieldName::new("BAIRRO"),
            max_length: 5,
        }
    );
}
