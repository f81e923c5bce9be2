// crates/cadastro-store-sqlite/src/lib.rs
// ============================================================================
// Module: Cadastro SQLite Store
// Description: SQLite-backed implementation of the ClientStore contract.
// Purpose: Persist client records in a single configurable table.
// Dependencies: cadastro-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! `cadastro-store-sqlite` implements [`cadastro_core::ClientStore`] over a
//! single `SQLite` table whose columns come from the configured field schema.
//! Statements are assembled from construction-validated identifiers only;
//! every value travels as a bound parameter.

pub mod store;

pub use crate::store::SqliteClientStore;
pub use crate::store::SqliteJournalMode;
pub use crate::store::SqliteStoreConfig;
pub use crate::store::SqliteStoreError;
pub use crate::store::SqliteSyncMode;
