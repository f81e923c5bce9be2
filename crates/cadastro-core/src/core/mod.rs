// crates/cadastro-core/src/core/mod.rs
// ============================================================================
// Module: Cadastro Core Model
// Description: Identifiers, field schema, records, and validation.
// Purpose: Group the data model shared by every Cadastro crate.
// Dependencies: submodules only
// ============================================================================

//! ## Overview
//! Core data model: strongly typed identifiers, the configurable field schema,
//! the form/record pair, and the validation engine that sits between them.

pub mod fields;
pub mod identifiers;
pub mod record;
pub mod validation;
