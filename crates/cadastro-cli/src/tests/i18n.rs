// crates/cadastro-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: cadastro-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and locale templates preserve placeholder parity with English.

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

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Collects `{name}` placeholder names from a message template.
fn placeholder_names(template: &str) -> BTreeSet<String> {
    let mut placeholders = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1 ..];
        let Some(end) = after.find('}') else {
            panic!("unclosed placeholder in template: {template}");
        };
        let name = &after[.. end];
        assert!(!name.is_empty(), "empty placeholder in template: {template}");
        placeholders.insert(name.to_string());
        rest = &after[end + 1 ..];
    }
    placeholders
}

// ============================================================================
// SECTION: Catalog Parity
// ============================================================================

#[test]
fn catalogs_share_the_same_key_set() {
    let en: BTreeSet<&str> = catalog_entries_for(Locale::En).iter().map(|(key, _)| *key).collect();
    let pt: BTreeSet<&str> = catalog_entries_for(Locale::Pt).iter().map(|(key, _)| *key).collect();
    assert_eq!(en, pt);
}

#[test]
fn catalogs_contain_no_duplicate_keys() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        assert_eq!(entries.len(), catalog_for(*locale).len(), "duplicate key in {locale:?}");
    }
}

#[test]
fn templates_preserve_placeholder_parity_with_english() {
    let en = catalog_for(Locale::En);
    for (key, template) in catalog_entries_for(Locale::Pt) {
        let english = en.get(key).unwrap();
        assert_eq!(
            placeholder_names(template),
            placeholder_names(english),
            "placeholder mismatch for key {key}"
        );
    }
}

// ============================================================================
// SECTION: Locale Parsing
// ============================================================================

#[test]
fn locale_parse_is_tolerant_of_case_and_region_tags() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse(" pt "), Some(Locale::Pt));
    assert_eq!(Locale::parse("pt-BR"), Some(Locale::Pt));
    assert_eq!(Locale::parse("pt_br"), Some(Locale::Pt));
    assert_eq!(Locale::parse("es"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn supported_locales_round_trip_through_parse() {
    for locale in SUPPORTED_LOCALES {
        assert_eq!(Locale::parse(locale.as_str()), Some(*locale));
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

#[test]
fn translate_substitutes_named_placeholders() {
    let message = translate("register.ok", vec![MessageArg::new("id", "7")]);
    assert_eq!(message, "Client 7 registered.");
}

#[test]
fn translate_falls_back_to_the_key_for_unknown_messages() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn translate_macro_formats_display_arguments() {
    let message = crate::t!("delete.ok", count = 2_u64);
    assert_eq!(message, "Removed 2 record(s).");
}
