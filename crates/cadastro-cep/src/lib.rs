// crates/cadastro-cep/src/lib.rs
// ============================================================================
// Module: Cadastro CEP
// Description: Postal-code address lookup against a ViaCEP-style service.
// Purpose: Resolve CEP codes to addresses and fill form fields from them.
// Dependencies: cadastro-core, reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! `cadastro-cep` resolves normalized postal codes ([`cadastro_core::Cep`])
//! to street addresses through the public ViaCEP JSON endpoint (or any
//! compatible base URL). Lookups are blocking; callers that must stay
//! responsive use [`CepClient::lookup_in_background`], which runs the request
//! on a one-off thread and hands the result back over a channel.

pub mod client;

pub use crate::client::Address;
pub use crate::client::CepClient;
pub use crate::client::CepClientConfig;
pub use crate::client::CepError;
