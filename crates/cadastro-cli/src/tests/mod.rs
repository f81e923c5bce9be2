// crates/cadastro-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Library Tests
// Description: Unit test modules for the CLI library crate.
// Purpose: Group library-level tests beside the code they exercise.
// Dependencies: cadastro-cli library modules
// ============================================================================

//! ## Overview
//! Library-level unit tests; `main_tests` covers the binary's helpers.

mod i18n;
