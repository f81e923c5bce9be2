// crates/cadastro-cep/src/client.rs
// ============================================================================
// Module: CEP Lookup Client
// Description: Blocking HTTP client for the postal-code address service.
// Purpose: Map CEP codes to addresses with distinct, reportable failures.
// Dependencies: cadastro-core, reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The lookup client wraps a blocking `reqwest` client built once with the
//! configured timeout and user agent; redirects are not followed. The service
//! signals an unknown code with an `erro` marker inside a 200 response, so
//! "not found", "timed out", and "unreachable" surface as distinct
//! [`CepError`] variants for the caller to report separately.
//!
//! The client never validates raw user input; callers normalize through
//! [`Cep::parse`] first and skip the network entirely on format failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use cadastro_core::Cep;
use cadastro_core::FieldName;
use cadastro_core::FieldSchema;
use cadastro_core::FormData;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default address service base URL.
const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";
/// Default request timeout (ms).
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Default user agent for outbound requests.
const DEFAULT_USER_AGENT: &str = "cadastro/0.1";

/// Configuration for the lookup client.
///
/// # Invariants
/// - `timeout_ms` applies to the full request lifecycle.
/// - Redirects are never followed regardless of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CepClientConfig {
    /// Base URL of the address service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CepClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Returns the default service base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the default request timeout in milliseconds.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Address lookup errors.
///
/// # Invariants
/// - "Not found", "timed out", and "unreachable" are distinct variants; the
///   presentation layer reports each differently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CepError {
    /// The service does not know the postal code.
    #[error("postal code not found")]
    NotFound,
    /// The request exceeded the configured timeout.
    #[error("address lookup timed out")]
    Timeout,
    /// The service was unreachable or the transport failed.
    #[error("address service unreachable: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("address service returned status {0}")]
    Http(u16),
    /// The response body was not the expected JSON document.
    #[error("address service response invalid: {0}")]
    InvalidResponse(String),
    /// The configured base URL does not form a valid request URL.
    #[error("address service url invalid: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// SECTION: Address
// ============================================================================

/// Address fields returned by the service.
///
/// # Invariants
/// - Empty strings in the response normalize to `None`; absent fields never
///   overwrite operator input when applied to a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street name.
    pub street: Option<String>,
    /// Neighborhood.
    pub neighborhood: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State abbreviation.
    pub state: Option<String>,
}

impl Address {
    /// Copies resolved fields into the form under the fixed destination names.
    ///
    /// Destinations: `ENDERECO` and `LOGRADOURO` from the street, `BAIRRO`
    /// from the neighborhood, `CIDADE` from the city, `ESTADO` from the
    /// state. Only destinations present in the schema are written, and only
    /// for fields the service actually resolved.
    pub fn apply_to(&self, schema: &FieldSchema, form: &mut FormData) {
        let destinations: [(&str, Option<&String>); 5] = [
            ("ENDERECO", self.street.as_ref()),
            ("LOGRADOURO", self.street.as_ref()),
            ("BAIRRO", self.neighborhood.as_ref()),
            ("CIDADE", self.city.as_ref()),
            ("ESTADO", self.state.as_ref()),
        ];
        for (name, value) in destinations {
            let field = FieldName::new(name);
            if let Some(value) = value
                && schema.definition(&field).is_some()
            {
                form.set(field, value.clone());
            }
        }
    }
}

/// Normalizes a JSON string field, mapping empty or missing to `None`.
fn string_field(document: &Value, key: &str) -> Option<String> {
    document
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking lookup client for the address service.
///
/// # Invariants
/// - The underlying HTTP client is built once; clones share its connection
///   pool.
/// - Redirects are not followed.
#[derive(Debug, Clone)]
pub struct CepClient {
    /// Client configuration.
    config: CepClientConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl CepClient {
    /// Creates a lookup client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CepError`] when the HTTP client cannot be built.
    pub fn new(config: CepClientConfig) -> Result<Self, CepError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| CepError::Network(err.to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Resolves a postal code to an address.
    ///
    /// # Errors
    ///
    /// Returns [`CepError::NotFound`] for unknown codes, [`CepError::Timeout`]
    /// on timeout, [`CepError::Network`] on transport failure, and distinct
    /// variants for bad statuses and malformed bodies.
    pub fn lookup(&self, cep: &Cep) -> Result<Address, CepError> {
        let url = self.request_url(cep)?;
        let response = self.client.get(url).send().map_err(|err| {
            if err.is_timeout() {
                CepError::Timeout
            } else {
                CepError::Network(err.to_string())
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CepError::Http(status.as_u16()));
        }
        let body = response.text().map_err(|err| {
            if err.is_timeout() {
                CepError::Timeout
            } else {
                CepError::Network(err.to_string())
            }
        })?;
        let document: Value =
            serde_json::from_str(&body).map_err(|err| CepError::InvalidResponse(err.to_string()))?;
        if document.get("erro").is_some() {
            return Err(CepError::NotFound);
        }
        Ok(Address {
            street: string_field(&document, "logradouro"),
            neighborhood: string_field(&document, "bairro"),
            city: string_field(&document, "localidade"),
            state: string_field(&document, "uf"),
        })
    }

    /// Resolves a postal code on a background thread.
    ///
    /// The result arrives on the returned channel; the calling screen polls
    /// or blocks at its own pace. A dropped receiver simply discards the
    /// result.
    #[must_use]
    pub fn lookup_in_background(&self, cep: Cep) -> Receiver<Result<Address, CepError>> {
        let (sender, receiver) = mpsc::channel();
        let client = self.clone();
        thread::spawn(move || {
            let result = client.lookup(&cep);
            let _ = sender.send(result);
        });
        receiver
    }

    /// Builds the request URL `{base}/{cep}/json/`.
    fn request_url(&self, cep: &Cep) -> Result<Url, CepError> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = format!("{base}/{}/json/", cep.as_str());
        Url::parse(&raw).map_err(|err| CepError::InvalidUrl(err.to_string()))
    }
}
