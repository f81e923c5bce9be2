// crates/cadastro-config/src/lib.rs
// ============================================================================
// Module: Cadastro Config
// Description: Canonical JSON configuration document and its owned store.
// Purpose: Load, merge, persist, and reset the application configuration.
// Dependencies: cadastro-core, cadastro-store-sqlite, serde, serde_json, tempfile, thiserror
// ============================================================================

//! ## Overview
//! The configuration document drives the whole system: the client field table,
//! the database connection settings, the internal default values, and the
//! window geometry all live in one JSON file. [`ConfigStore`] is the single
//! owned handle for that file — readers take immutable [`AppConfig`] snapshots
//! and every mutation goes through the store, which persists atomically via a
//! temp file in the target directory followed by a rename.
//!
//! Loading is forgiving about missing sections (absent top-level keys are
//! filled from the built-in defaults and the merged result is persisted) and
//! strict about everything else: oversized, non-UTF-8, or malformed documents
//! produce a typed [`ConfigError`] so callers can tell "no file yet" apart
//! from "damaged file".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use cadastro_core::ColumnName;
use cadastro_core::FieldDefinition;
use cadastro_core::FieldName;
use cadastro_core::FieldSchema;
use cadastro_core::LookupStrategy;
use cadastro_core::OverflowPolicy;
use cadastro_core::SchemaError;
use cadastro_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "app_config.json";
/// Logical name of the client identifier field.
pub const IDENTIFIER_FIELD: &str = "XCLIENTES";
/// Maximum configuration file size accepted by the store.
pub const MAX_CONFIG_BYTES: usize = 1024 * 1024;
/// Default database file name.
const DEFAULT_DB_PATH: &str = "cadastro.db";

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Main window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Window width in pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Returns the default window width.
const fn default_window_width() -> u32 {
    800
}

/// Returns the default window height.
const fn default_window_height() -> u32 {
    750
}

/// The complete configuration document.
///
/// # Invariants
/// - Serializes to the four stable top-level JSON keys; unknown keys in a
///   loaded document survive neither merge nor save.
/// - `client_fields` is stored as configured; structural guarantees
///   (uniqueness, identifier presence) are enforced by schema derivation, not
///   here, so a damaged field list is diagnosable rather than unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default = "default_db_connection")]
    pub db_connection: SqliteStoreConfig,
    /// Ordered client field table.
    #[serde(default = "default_client_fields")]
    pub client_fields: Vec<FieldDefinition>,
    /// Values applied to every record without operator input.
    #[serde(default = "default_internal_defaults")]
    pub internal_defaults: BTreeMap<String, String>,
    /// Main window geometry.
    #[serde(default)]
    pub window_settings: WindowSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_connection: default_db_connection(),
            client_fields: default_client_fields(),
            internal_defaults: default_internal_defaults(),
            window_settings: WindowSettings::default(),
        }
    }
}

impl AppConfig {
    /// Derives the field schema from the configured field table.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the configured table is structurally
    /// damaged (duplicates, zero limits, missing identifier field).
    pub fn schema(&self) -> Result<FieldSchema, SchemaError> {
        FieldSchema::derive(self.client_fields.clone(), &FieldName::new(IDENTIFIER_FIELD))
    }
}

/// Returns the default database connection settings.
fn default_db_connection() -> SqliteStoreConfig {
    SqliteStoreConfig::for_path(DEFAULT_DB_PATH)
}

/// Returns the default client field table.
///
/// The street field (`LOGRADOURO`) is the one field configured to truncate
/// overlong values instead of rejecting them.
#[must_use]
pub fn default_client_fields() -> Vec<FieldDefinition> {
    let table: [(&str, usize, bool, &str, OverflowPolicy); 18] = [
        ("NRECNO", 10, false, "NRECNO", OverflowPolicy::Reject),
        ("CLIENTE", 100, true, "RAZAO", OverflowPolicy::Reject),
        ("CGC", 20, true, "CGC", OverflowPolicy::Reject),
        ("INSCRICAO", 20, false, "INSCRICAO", OverflowPolicy::Reject),
        ("LOGRADOURO", 20, false, "LOGRA", OverflowPolicy::Truncate),
        ("ENDERECO", 250, false, "ENDERECO", OverflowPolicy::Reject),
        ("NUMERO", 15, false, "NUMERO", OverflowPolicy::Reject),
        ("BAIRRO", 60, false, "BAIRRO", OverflowPolicy::Reject),
        ("CIDADE", 40, false, "CIDADE", OverflowPolicy::Reject),
        ("ESTADO", 10, false, "ESTADO", OverflowPolicy::Reject),
        ("CJ", 250, false, "CJ", OverflowPolicy::Reject),
        ("CEP", 10, false, "CEP", OverflowPolicy::Reject),
        ("FAX", 23, false, "FAX", OverflowPolicy::Reject),
        ("TEL1", 23, false, "TEL1", OverflowPolicy::Reject),
        ("TEL2", 23, false, "TEL2", OverflowPolicy::Reject),
        ("EMAIL", 255, false, "EMAIL", OverflowPolicy::Reject),
        ("ZONA", 20, false, "ZONA", OverflowPolicy::Reject),
        ("XCLIENTES", 10, true, "XCLIENTES", OverflowPolicy::Reject),
    ];
    table
        .into_iter()
        .filter_map(|(name, max_length, required, column, overflow)| {
            ColumnName::parse(column).map(|db_column| FieldDefinition {
                name: FieldName::new(name),
                max_length,
                required,
                db_column,
                overflow,
            })
        })
        .collect()
}

/// Returns the default internal field values.
fn default_internal_defaults() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("WORKFLOW_TYPE".to_string(), "GENERAL".to_string()),
        ("APPROVAL_STATUS".to_string(), "A".to_string()),
        ("ADIMPLENTE".to_string(), "T".to_string()),
    ])
}

// ============================================================================
// SECTION: Lookup Strategy Defaults
// ============================================================================

/// Returns the default ordered find strategies.
///
/// Identifier first, then tax registration, then company-name substring, then
/// state registration.
#[must_use]
pub fn default_find_strategies() -> Vec<LookupStrategy> {
    ["XCLIENTES", "CGC"]
        .into_iter()
        .filter_map(ColumnName::parse)
        .map(LookupStrategy::exact)
        .chain(ColumnName::parse("RAZAO").map(LookupStrategy::substring))
        .chain(ColumnName::parse("INSCRICAO").map(LookupStrategy::exact))
        .collect()
}

/// Returns the default ordered delete strategies (exact-match only).
#[must_use]
pub fn default_delete_strategies() -> Vec<LookupStrategy> {
    ["XCLIENTES", "CGC", "INSCRICAO"]
        .into_iter()
        .filter_map(ColumnName::parse)
        .map(LookupStrategy::exact)
        .collect()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; callers distinguish a
///   damaged document from plain I/O failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading or writing the document failed.
    #[error("config io error: {0}")]
    Io(String),
    /// The document is not valid JSON or does not match the model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The document exceeds the accepted size.
    #[error("config file exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual file size in bytes.
        actual_bytes: usize,
    },
    /// The document is not UTF-8 encoded.
    #[error("config file must be utf-8")]
    NotUtf8,
}

// ============================================================================
// SECTION: Partial Updates
// ============================================================================

/// Replacement values for any subset of the configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    /// Replacement database connection settings.
    pub db_connection: Option<SqliteStoreConfig>,
    /// Replacement client field table.
    pub client_fields: Option<Vec<FieldDefinition>>,
    /// Replacement internal default values.
    pub internal_defaults: Option<BTreeMap<String, String>>,
    /// Replacement window geometry.
    pub window_settings: Option<WindowSettings>,
}

// ============================================================================
// SECTION: Config Store
// ============================================================================

/// Owned handle to the configuration document on disk.
///
/// # Invariants
/// - Saves are atomic: the document is either the previous version or the new
///   one, never a partial write.
/// - The store holds no open file handles between calls.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Path of the configuration document.
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for the given document path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Creates a store for the default document path.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, creating it from the built-in defaults when absent.
    ///
    /// Top-level keys missing from an existing document are filled from the
    /// defaults and the merged result is persisted before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is present but oversized, not
    /// UTF-8, not valid JSON, or does not match the document model.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }
        let bytes = fs::read(&self.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::TooLarge {
                max_bytes: MAX_CONFIG_BYTES,
                actual_bytes: bytes.len(),
            });
        }
        let text = std::str::from_utf8(&bytes).map_err(|_| ConfigError::NotUtf8)?;
        let mut document: serde_json::Value =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let merged = merge_missing_sections(&mut document)?;
        let config: AppConfig = serde_json::from_value(document)
            .map_err(|err| ConfigError::Parse(err.to_string()))?;
        if merged {
            self.save(&config)?;
        }
        Ok(config)
    }

    /// Persists the document atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the containing directory cannot be
    /// created or the temp-file write or rename fails.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Parse(err.to_string()))?;
        let mut file =
            NamedTempFile::new_in(parent).map_err(|err| ConfigError::Io(err.to_string()))?;
        file.write_all(text.as_bytes()).map_err(|err| ConfigError::Io(err.to_string()))?;
        file.write_all(b"\n").map_err(|err| ConfigError::Io(err.to_string()))?;
        file.persist(&self.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        Ok(())
    }

    /// Replaces the given sections and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the current document cannot be loaded or
    /// the updated document cannot be saved.
    pub fn update(&self, update: ConfigUpdate) -> Result<AppConfig, ConfigError> {
        let mut config = self.load()?;
        if let Some(db_connection) = update.db_connection {
            config.db_connection = db_connection;
        }
        if let Some(client_fields) = update.client_fields {
            config.client_fields = client_fields;
        }
        if let Some(internal_defaults) = update.internal_defaults {
            config.internal_defaults = internal_defaults;
        }
        if let Some(window_settings) = update.window_settings {
            config.window_settings = window_settings;
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Restores the built-in defaults and persists them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document cannot be saved.
    pub fn reset_to_defaults(&self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig::default();
        self.save(&config)?;
        Ok(config)
    }
}

/// Fills absent top-level sections from the built-in defaults.
///
/// Returns true when at least one section was filled in.
fn merge_missing_sections(document: &mut serde_json::Value) -> Result<bool, ConfigError> {
    let defaults = serde_json::to_value(AppConfig::default())
        .map_err(|err| ConfigError::Parse(err.to_string()))?;
    let Some(map) = document.as_object_mut() else {
        return Err(ConfigError::Parse("config document must be a JSON object".to_string()));
    };
    let mut merged = false;
    if let Some(default_map) = defaults.as_object() {
        for (key, value) in default_map {
            if !map.contains_key(key) {
                map.insert(key.clone(), value.clone());
                merged = true;
            }
        }
    }
    Ok(merged)
}
