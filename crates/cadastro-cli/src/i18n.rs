// crates/cadastro-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for consistent localized output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Cadastro CLI stores user-facing strings in a small translation catalog
//! so messaging stays consistent across commands and locales. All runtime
//! output should be routed through the [`t!`](crate::t) macro.
//!
//! Validation messages are not in this catalog: they are a fixed contract of
//! the validation engine and are printed verbatim in every locale.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Brazilian Portuguese.
    Pt,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pt => "pt",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Pt];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"error"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "cadastro {version}"),
    ("main.no_command", "No command given. Run with --help to list commands."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    (
        "config.load_failed",
        "Warning: failed to load configuration: {error}. Using built-in defaults.",
    ),
    ("config.schema_invalid", "Configured field table is invalid: {error}"),
    ("config.json_failed", "Failed to render configuration: {error}"),
    ("config.save_failed", "Failed to save configuration: {error}"),
    ("config.reset.ok", "Configuration reset to built-in defaults."),
    ("config.window.ok", "Window size set to {width}x{height}."),
    ("config.window.invalid", "Window dimensions must be greater than zero."),
    ("config.field.added", "Field '{field}' added."),
    ("config.field.removed", "Field '{field}' removed."),
    ("config.field.bad_index", "No field at index {index}."),
    ("config.field.identifier", "The identifier field cannot be removed."),
    ("config.field.bad_column", "Invalid column name: {value}"),
    ("store.open_failed", "Failed to open the client database: {error}"),
    ("store.failed", "Database operation failed: {error}"),
    ("register.ok", "Client {id} registered."),
    ("register.duplicate", "A client with id {id} already exists."),
    ("update.ok", "Client {id} updated."),
    (
        "update.identifier_readonly",
        "The identifier field cannot be changed; delete the record and register it again.",
    ),
    ("delete.ok", "Removed {count} record(s)."),
    ("find.missing", "No client found for '{identifier}'."),
    ("next_id.value", "Next client id: {id}"),
    ("show.entry", "{field}: {value}"),
    ("validation.failed", "Validation failed:"),
    ("set.invalid", "Invalid --set argument '{value}'. Expected FIELD=VALUE."),
    ("set.unknown_field", "Unknown field: '{field}'"),
    ("cep.invalid", "Invalid postal code '{value}'. Expected 8 digits."),
    ("cep.not_found", "Postal code {cep} is not known to the address service."),
    ("cep.timeout", "Address lookup timed out."),
    ("cep.failed", "Address lookup failed: {error}"),
    ("cep.empty", "The service returned no address fields."),
    ("cep.street", "Street: {value}"),
    ("cep.neighborhood", "Neighborhood: {value}"),
    ("cep.city", "City: {value}"),
    ("cep.state", "State: {value}"),
    ("log.empty", "No activity recorded."),
    ("log.entry", "[{timestamp}] {action} by {user}: {subject}"),
    ("log.read_failed", "Failed to read the activity log: {error}"),
    ("audit.write_failed", "Warning: failed to write the activity log: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'pt'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Brazilian Portuguese catalog entries loaded into the localized
/// message bundle.
const CATALOG_PT: &[(&str, &str)] = &[
    ("main.version", "cadastro {version}"),
    ("main.no_command", "Nenhum comando informado. Use --help para listar os comandos."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.write_failed", "Falha ao escrever em {stream}: {error}"),
    (
        "config.load_failed",
        "Aviso: falha ao carregar a configuração: {error}. Usando os padrões internos.",
    ),
    ("config.schema_invalid", "A tabela de campos configurada é inválida: {error}"),
    ("config.json_failed", "Falha ao renderizar a configuração: {error}"),
    ("config.save_failed", "Falha ao salvar a configuração: {error}"),
    ("config.reset.ok", "Configuração restaurada para os padrões internos."),
    ("config.window.ok", "Tamanho da janela definido para {width}x{height}."),
    ("config.window.invalid", "As dimensões da janela devem ser maiores que zero."),
    ("config.field.added", "Campo '{field}' adicionado."),
    ("config.field.removed", "Campo '{field}' removido."),
    ("config.field.bad_index", "Não há campo no índice {index}."),
    ("config.field.identifier", "O campo identificador não pode ser removido."),
    ("config.field.bad_column", "Nome de coluna inválido: {value}"),
    ("store.open_failed", "Falha ao abrir o banco de dados de clientes: {error}"),
    ("store.failed", "A operação no banco de dados falhou: {error}"),
    ("register.ok", "Cliente {id} cadastrado."),
    ("register.duplicate", "Já existe um cliente com id {id}."),
    ("update.ok", "Cliente {id} atualizado."),
    (
        "update.identifier_readonly",
        "O campo identificador não pode ser alterado; exclua o registro e cadastre-o novamente.",
    ),
    ("delete.ok", "{count} registro(s) removido(s)."),
    ("find.missing", "Nenhum cliente encontrado para '{identifier}'."),
    ("next_id.value", "Próximo id de cliente: {id}"),
    ("show.entry", "{field}: {value}"),
    ("validation.failed", "A validação falhou:"),
    ("set.invalid", "Argumento --set inválido '{value}'. Esperado CAMPO=VALOR."),
    ("set.unknown_field", "Campo desconhecido: '{field}'"),
    ("cep.invalid", "CEP inválido '{value}'. Esperados 8 dígitos."),
    ("cep.not_found", "O CEP {cep} não é conhecido pelo serviço de endereços."),
    ("cep.timeout", "A consulta de endereço excedeu o tempo limite."),
    ("cep.failed", "A consulta de endereço falhou: {error}"),
    ("cep.empty", "O serviço não retornou campos de endereço."),
    ("cep.street", "Logradouro: {value}"),
    ("cep.neighborhood", "Bairro: {value}"),
    ("cep.city", "Cidade: {value}"),
    ("cep.state", "Estado: {value}"),
    ("log.empty", "Nenhuma atividade registrada."),
    ("log.entry", "[{timestamp}] {action} por {user}: {subject}"),
    ("log.read_failed", "Falha ao ler o registro de atividades: {error}"),
    ("audit.write_failed", "Aviso: falha ao gravar o registro de atividades: {error}"),
    ("i18n.lang.invalid_env", "Valor inválido para {env}: {value}. Esperado 'en' ou 'pt'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: a saída em idiomas diferentes do inglês é traduzida automaticamente e pode conter \
         imprecisões.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Pt => CATALOG_PT,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_PT_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let cell = match locale {
        Locale::En => &CATALOG_EN_MAP,
        Locale::Pt => &CATALOG_PT_MAP,
    };
    cell.get_or_init(|| catalog_entries_for(locale).iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
