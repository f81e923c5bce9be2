// crates/cadastro-cli/src/lib.rs
// ============================================================================
// Module: Cadastro CLI Library
// Description: Shared CLI support code, currently the localization catalog.
// Purpose: Expose the i18n machinery to the binary and its tests.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Library half of the Cadastro CLI. The binary routes every user-facing
//! string through the [`t!`] macro and the message catalog in [`i18n`].

pub mod i18n;

#[cfg(test)]
mod tests;
