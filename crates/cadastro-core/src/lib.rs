// crates/cadastro-core/src/lib.rs
// ============================================================================
// Module: Cadastro Core
// Description: Shared data model and persistence contract for Cadastro.
// Purpose: Provide the types every other Cadastro crate builds on.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `cadastro-core` holds the field-configuration-driven data model of the
//! client registration system: typed identifiers, the derived field schema,
//! form/record translation, the validation engine, and the backend-agnostic
//! [`ClientStore`] contract with its typed error taxonomy.

pub mod core;
pub mod interfaces;

pub use crate::core::fields::FieldDefinition;
pub use crate::core::fields::FieldSchema;
pub use crate::core::fields::OverflowPolicy;
pub use crate::core::fields::SchemaError;
pub use crate::core::identifiers::ActorId;
pub use crate::core::identifiers::Cep;
pub use crate::core::identifiers::ClientId;
pub use crate::core::identifiers::ColumnName;
pub use crate::core::identifiers::FieldName;
pub use crate::core::record::ClientRecord;
pub use crate::core::record::FormData;
pub use crate::core::validation::FieldRule;
pub use crate::core::validation::ValidationError;
pub use crate::core::validation::ValidationRules;
pub use crate::core::validation::validate;
pub use crate::interfaces::ClientStore;
pub use crate::interfaces::InsertOutcome;
pub use crate::interfaces::LookupStrategy;
pub use crate::interfaces::MatchOp;
pub use crate::interfaces::StoreError;
