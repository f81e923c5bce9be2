// crates/cadastro-cli/src/main.rs
// ============================================================================
// Module: Cadastro CLI Entry Point
// Description: Command dispatcher for client registration and configuration.
// Purpose: Provide a safe, localized CLI over the registration data model.
// Dependencies: cadastro-audit, cadastro-cep, cadastro-config, cadastro-core,
//               cadastro-store-sqlite, clap, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The Cadastro CLI drives the client registration system: registering,
//! showing, updating, and deleting client records, previewing identifiers,
//! resolving postal codes, and editing the configuration document. All
//! user-facing strings are routed through the i18n catalog; validation
//! messages are the one exception, printed verbatim as a fixed contract.
//!
//! A failed configuration load is a warning, not a fatal error: commands
//! proceed against the built-in defaults so a damaged document never locks
//! the operator out. Every command returns an [`ExitCode`] and no panic
//! escapes a user-triggered action.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use cadastro_audit::ActivityLog;
use cadastro_audit::AuditEntry;
use cadastro_cep::Address;
use cadastro_cep::CepClient;
use cadastro_cep::CepClientConfig;
use cadastro_cep::CepError;
use cadastro_cli::i18n::Locale;
use cadastro_cli::i18n::MessageArg;
use cadastro_cli::i18n::set_locale;
use cadastro_cli::i18n::translate;
use cadastro_cli::t;
use cadastro_config::AppConfig;
use cadastro_config::ConfigError;
use cadastro_config::ConfigStore;
use cadastro_config::ConfigUpdate;
use cadastro_config::IDENTIFIER_FIELD;
use cadastro_config::WindowSettings;
use cadastro_config::default_delete_strategies;
use cadastro_config::default_find_strategies;
use cadastro_core::ActorId;
use cadastro_core::Cep;
use cadastro_core::ClientRecord;
use cadastro_core::ColumnName;
use cadastro_core::FieldDefinition;
use cadastro_core::FieldName;
use cadastro_core::FieldSchema;
use cadastro_core::FormData;
use cadastro_core::OverflowPolicy;
use cadastro_core::ValidationError;
use cadastro_core::validate;
use cadastro_store_sqlite::SqliteClientStore;
use cadastro_store_sqlite::SqliteStoreError;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "CADASTRO_LANG";
/// Actor recorded in the activity log when `--actor` is not given.
const DEFAULT_ACTOR: &str = "operator";

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Command-line interface for the Cadastro client registration system.
#[derive(Debug, Parser)]
#[command(name = "cadastro", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print the version and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Output language.
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Path of the configuration document.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Acting operator recorded in the activity log.
    #[arg(long, value_name = "ID", global = true)]
    actor: Option<String>,
    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Language selection flag values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LangArg {
    /// English.
    En,
    /// Brazilian Portuguese.
    Pt,
}

impl LangArg {
    /// Maps the flag value to a catalog locale.
    const fn locale(self) -> Locale {
        match self {
            Self::En => Locale::En,
            Self::Pt => Locale::Pt,
        }
    }
}

/// Top-level CLI commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new client record.
    Register(RegisterArgs),
    /// Show one client record.
    Show(ShowArgs),
    /// Update fields of an existing client record.
    Update(UpdateArgs),
    /// Delete a client record.
    Delete(DeleteArgs),
    /// Preview the next client identifier without reserving it.
    NextId,
    /// Resolve a postal code to an address.
    Cep(CepArgs),
    /// Inspect or change the configuration document.
    Config {
        /// Configuration subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Inspect the activity log.
    Log {
        /// Activity log subcommand.
        #[command(subcommand)]
        command: LogCommand,
    },
}

/// Arguments for `register`.
#[derive(Debug, Args)]
struct RegisterArgs {
    /// Explicit client identifier; omitted means the next free id is assigned.
    #[arg(long, value_name = "ID")]
    id: Option<String>,
    /// Field assignment in FIELD=VALUE form; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
}

/// Arguments for `show`.
#[derive(Debug, Args)]
struct ShowArgs {
    /// Identifier, tax registration, or partial company name.
    identifier: String,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
struct UpdateArgs {
    /// Identifier, tax registration, or partial company name.
    identifier: String,
    /// Field assignment in FIELD=VALUE form; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
}

/// Arguments for `delete`.
#[derive(Debug, Args)]
struct DeleteArgs {
    /// Identifier, tax registration, or state registration (exact match).
    identifier: String,
}

/// Arguments for `cep`.
#[derive(Debug, Args)]
struct CepArgs {
    /// Postal code, with or without separators.
    code: String,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the configuration document.
    Show,
    /// Restore the built-in defaults.
    Reset,
    /// Set the main window geometry.
    SetWindow(SetWindowArgs),
    /// Append a field to the client field table.
    AddField(AddFieldArgs),
    /// Remove a field from the client field table by position.
    RemoveField(RemoveFieldArgs),
}

/// Arguments for `config set-window`.
#[derive(Debug, Args)]
struct SetWindowArgs {
    /// Window width in pixels.
    width: u32,
    /// Window height in pixels.
    height: u32,
}

/// Arguments for `config add-field`.
#[derive(Debug, Args)]
struct AddFieldArgs {
    /// Logical field name shown on the form.
    name: String,
    /// Maximum value length in characters.
    #[arg(long, value_name = "N")]
    max_length: usize,
    /// Require a non-blank value.
    #[arg(long, action = ArgAction::SetTrue)]
    required: bool,
    /// Database column name; defaults to the field name.
    #[arg(long, value_name = "COLUMN")]
    column: Option<String>,
    /// Truncate overlong values instead of rejecting them.
    #[arg(long, action = ArgAction::SetTrue)]
    truncate: bool,
}

/// Arguments for `config remove-field`.
#[derive(Debug, Args)]
struct RemoveFieldArgs {
    /// Zero-based position in the field table.
    index: usize,
}

/// Activity log subcommands.
#[derive(Debug, Subcommand)]
enum LogCommand {
    /// List all recorded activity entries.
    List,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a fully localized message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Localized message presented to the operator.
    message: String,
}

impl CliError {
    /// Creates an error from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI command handlers.
type CliResult<T> = Result<T, CliError>;

/// Wraps a store failure in a localized CLI error.
fn store_error(error: SqliteStoreError) -> CliError {
    CliError::new(t!("store.failed", error = error))
}

/// Wraps a configuration save failure in a localized CLI error.
fn config_save_error(error: ConfigError) -> CliError {
    CliError::new(t!("config.save_failed", error = error))
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Binary entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, selects the locale, and dispatches the command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        let _ = write_stderr_line(&t!("i18n.disclaimer.machine_translated"));
    }
    if cli.show_version {
        print_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        return Ok(emit_error(&t!("main.no_command")));
    };
    let context = CommandContext::load(cli.config, cli.actor);
    match command {
        Commands::Register(args) => command_register(&context, &args),
        Commands::Show(args) => command_show(&context, &args),
        Commands::Update(args) => command_update(&context, &args),
        Commands::Delete(args) => command_delete(&context, &args),
        Commands::NextId => command_next_id(&context),
        Commands::Cep(args) => command_cep(&args),
        Commands::Config {
            command,
        } => command_config(&context, command),
        Commands::Log {
            command,
        } => command_log(&context, command),
    }
}

/// Resolves the output locale from the flag and the environment.
///
/// The flag wins; an unset or blank environment variable means English.
fn resolve_locale(flag: Option<LangArg>, env_value: Option<&str>) -> CliResult<Locale> {
    if let Some(flag) = flag {
        return Ok(flag.locale());
    }
    match env_value {
        None => Ok(Locale::En),
        Some(value) if value.trim().is_empty() => Ok(Locale::En),
        Some(value) => Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        }),
    }
}

// ============================================================================
// SECTION: Command Context
// ============================================================================

/// Shared state assembled once per invocation.
struct CommandContext {
    /// Owned handle to the configuration document.
    config_store: ConfigStore,
    /// Configuration snapshot; the built-in defaults when loading failed.
    config: AppConfig,
    /// Acting operator recorded in audit entries.
    actor: ActorId,
    /// Activity log handle.
    log: ActivityLog,
}

impl CommandContext {
    /// Loads the configuration, warning and falling back to the built-in
    /// defaults when the document cannot be read.
    fn load(config_path: Option<PathBuf>, actor: Option<String>) -> Self {
        let config_store = config_path.map_or_else(ConfigStore::at_default_path, ConfigStore::new);
        let config = match config_store.load() {
            Ok(config) => config,
            Err(err) => {
                let _ = write_stderr_line(&t!("config.load_failed", error = err));
                AppConfig::default()
            }
        };
        let actor = ActorId::from(actor.as_deref().unwrap_or(DEFAULT_ACTOR));
        Self {
            config_store,
            config,
            actor,
            log: ActivityLog::at_default_path(),
        }
    }

    /// Derives the field schema from the loaded configuration.
    fn schema(&self) -> CliResult<FieldSchema> {
        self.config
            .schema()
            .map_err(|err| CliError::new(t!("config.schema_invalid", error = err)))
    }

    /// Opens the client store against the configured database.
    fn open_store(&self, schema: FieldSchema) -> CliResult<SqliteClientStore> {
        SqliteClientStore::new(
            self.config.db_connection.clone(),
            schema,
            default_find_strategies(),
            default_delete_strategies(),
        )
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))
    }

    /// Appends an activity entry, reporting but never propagating failures.
    fn record_activity(
        &self,
        action: &str,
        before: Option<&ClientRecord>,
        after: Option<&ClientRecord>,
    ) {
        if let Err(err) = self.log.record(action, &self.actor, before, after) {
            let _ = write_stderr_line(&t!("audit.write_failed", error = err));
        }
    }
}

// ============================================================================
// SECTION: Record Commands
// ============================================================================

/// Handles `register`.
fn command_register(context: &CommandContext, args: &RegisterArgs) -> CliResult<ExitCode> {
    let schema = context.schema()?;
    let store = context.open_store(schema.clone())?;
    let pairs = parse_set_pairs(&args.set, &schema)?;
    let mut form = FormData::new();
    form.apply_defaults(&context.config.internal_defaults);
    for (field, value) in pairs {
        form.set(field, value);
    }
    let identifier = schema.identifier_name().clone();
    if let Some(id) = &args.id {
        form.set(identifier.clone(), id.clone());
    } else if form.get(&identifier).is_none_or(|value| value.trim().is_empty()) {
        let next = store.next_identifier().map_err(store_error)?;
        form.set(identifier.clone(), next.as_str());
    }
    let errors = validate(&mut form, &schema.rules());
    if !errors.is_empty() {
        return Ok(report_validation(&errors));
    }
    let mut record = ClientRecord::from_form(&schema, &form);
    if args.id.is_some() {
        let outcome = match store.insert(&record) {
            Ok(outcome) => outcome,
            Err(err) => {
                context.record_activity("CREATE_FAILED", None, Some(&record));
                return Err(store_error(err));
            }
        };
        let id = record.identifier(&schema).map_or_else(String::new, |id| id.to_string());
        if outcome.is_inserted() {
            context.record_activity("CREATE", None, Some(&record));
            print_line(&t!("register.ok", id = id))?;
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(emit_error(&t!("register.duplicate", id = id)))
        }
    } else {
        let id = match store.register(&record) {
            Ok(id) => id,
            Err(err) => {
                context.record_activity("CREATE_FAILED", None, Some(&record));
                return Err(store_error(err));
            }
        };
        record.set(schema.identifier_column().clone(), id.as_str());
        context.record_activity("CREATE", None, Some(&record));
        print_line(&t!("register.ok", id = id))?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Handles `show`.
fn command_show(context: &CommandContext, args: &ShowArgs) -> CliResult<ExitCode> {
    let schema = context.schema()?;
    let store = context.open_store(schema.clone())?;
    let Some(record) = store.find(&args.identifier).map_err(store_error)? else {
        return Ok(emit_error(&t!("find.missing", identifier = args.identifier)));
    };
    for field in schema.fields() {
        let value = record.get(&field.db_column).unwrap_or_default();
        print_line(&t!("show.entry", field = field.name, value = value))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Handles `update`.
fn command_update(context: &CommandContext, args: &UpdateArgs) -> CliResult<ExitCode> {
    let schema = context.schema()?;
    let store = context.open_store(schema.clone())?;
    let pairs = parse_set_pairs(&args.set, &schema)?;
    if pairs.iter().any(|(name, _)| name == schema.identifier_name()) {
        return Err(CliError::new(t!("update.identifier_readonly")));
    }
    let Some(before) = store.find(&args.identifier).map_err(store_error)? else {
        return Ok(emit_error(&t!("find.missing", identifier = args.identifier)));
    };
    let mut form = FormData::new();
    for field in schema.fields() {
        if let Some(value) = before.get(&field.db_column) {
            form.set(field.name.clone(), value);
        }
    }
    for (field, value) in pairs {
        form.set(field, value);
    }
    let errors = validate(&mut form, &schema.rules());
    if !errors.is_empty() {
        return Ok(report_validation(&errors));
    }
    let record = ClientRecord::from_form(&schema, &form);
    let changed = match store.update(&record) {
        Ok(changed) => changed,
        Err(err) => {
            context.record_activity("UPDATE_FAILED", Some(&before), Some(&record));
            return Err(store_error(err));
        }
    };
    if !changed {
        return Ok(emit_error(&t!("find.missing", identifier = args.identifier)));
    }
    context.record_activity("UPDATE", Some(&before), Some(&record));
    let id = record.identifier(&schema).map_or_else(String::new, |id| id.to_string());
    print_line(&t!("update.ok", id = id))?;
    Ok(ExitCode::SUCCESS)
}

/// Handles `delete`.
fn command_delete(context: &CommandContext, args: &DeleteArgs) -> CliResult<ExitCode> {
    let schema = context.schema()?;
    let store = context.open_store(schema)?;
    // The snapshot must resolve through the delete strategy order, never
    // find's, so the audited row is the row actually removed.
    let before = store.find_for_delete(&args.identifier).map_err(store_error)?;
    let removed = match store.delete(&args.identifier) {
        Ok(removed) => removed,
        Err(err) => {
            context.record_activity("DELETE_FAILED", before.as_ref(), None);
            return Err(store_error(err));
        }
    };
    if removed == 0 {
        return Ok(emit_error(&t!("find.missing", identifier = args.identifier)));
    }
    context.record_activity("DELETE", before.as_ref(), None);
    print_line(&t!("delete.ok", count = removed))?;
    Ok(ExitCode::SUCCESS)
}

/// Handles `next-id`.
fn command_next_id(context: &CommandContext) -> CliResult<ExitCode> {
    let schema = context.schema()?;
    let store = context.open_store(schema)?;
    let next = store.next_identifier().map_err(store_error)?;
    print_line(&t!("next_id.value", id = next))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Address Lookup Command
// ============================================================================

/// Handles `cep`. Format failures never reach the network.
fn command_cep(args: &CepArgs) -> CliResult<ExitCode> {
    let Some(cep) = Cep::parse(&args.code) else {
        return Ok(emit_error(&t!("cep.invalid", value = args.code)));
    };
    let client = CepClient::new(CepClientConfig::default())
        .map_err(|err| CliError::new(t!("cep.failed", error = err)))?;
    let receiver = client.lookup_in_background(cep.clone());
    let result =
        receiver.recv().map_err(|err| CliError::new(t!("cep.failed", error = err)))?;
    match result {
        Ok(address) => {
            print_address(&address)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(CepError::NotFound) => Ok(emit_error(&t!("cep.not_found", cep = cep))),
        Err(CepError::Timeout) => Ok(emit_error(&t!("cep.timeout"))),
        Err(err) => Ok(emit_error(&t!("cep.failed", error = err))),
    }
}

/// Prints the resolved address fields, one labeled line per resolved field.
fn print_address(address: &Address) -> CliResult<()> {
    let lines: [(&str, Option<&String>); 4] = [
        ("cep.street", address.street.as_ref()),
        ("cep.neighborhood", address.neighborhood.as_ref()),
        ("cep.city", address.city.as_ref()),
        ("cep.state", address.state.as_ref()),
    ];
    let mut resolved_any = false;
    for (key, value) in lines {
        if let Some(value) = value {
            resolved_any = true;
            print_line(&translate(key, vec![MessageArg::new("value", value.clone())]))?;
        }
    }
    if !resolved_any {
        print_line(&t!("cep.empty"))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Configuration Commands
// ============================================================================

/// Handles `config` subcommands.
fn command_config(context: &CommandContext, command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Show => {
            let text = serde_json::to_string_pretty(&context.config)
                .map_err(|err| CliError::new(t!("config.json_failed", error = err)))?;
            print_line(&text)?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Reset => {
            context.config_store.reset_to_defaults().map_err(config_save_error)?;
            print_line(&t!("config.reset.ok"))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::SetWindow(args) => {
            if args.width == 0 || args.height == 0 {
                return Err(CliError::new(t!("config.window.invalid")));
            }
            context
                .config_store
                .update(ConfigUpdate {
                    window_settings: Some(WindowSettings {
                        width: args.width,
                        height: args.height,
                    }),
                    ..ConfigUpdate::default()
                })
                .map_err(config_save_error)?;
            print_line(&t!("config.window.ok", width = args.width, height = args.height))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::AddField(args) => command_add_field(context, &args),
        ConfigCommand::RemoveField(args) => command_remove_field(context, &args),
    }
}

/// Handles `config add-field`.
fn command_add_field(context: &CommandContext, args: &AddFieldArgs) -> CliResult<ExitCode> {
    let column = args.column.as_deref().unwrap_or(&args.name);
    let Some(db_column) = ColumnName::parse(column) else {
        return Err(CliError::new(t!("config.field.bad_column", value = column)));
    };
    let overflow = if args.truncate {
        OverflowPolicy::Truncate
    } else {
        OverflowPolicy::Reject
    };
    let mut fields = context.config.client_fields.clone();
    fields.push(FieldDefinition {
        name: FieldName::new(args.name.clone()),
        max_length: args.max_length,
        required: args.required,
        db_column,
        overflow,
    });
    // Derive once up front so a broken table never reaches the document.
    FieldSchema::derive(fields.clone(), &FieldName::new(IDENTIFIER_FIELD))
        .map_err(|err| CliError::new(t!("config.schema_invalid", error = err)))?;
    context
        .config_store
        .update(ConfigUpdate {
            client_fields: Some(fields),
            ..ConfigUpdate::default()
        })
        .map_err(config_save_error)?;
    print_line(&t!("config.field.added", field = args.name))?;
    Ok(ExitCode::SUCCESS)
}

/// Handles `config remove-field`.
fn command_remove_field(context: &CommandContext, args: &RemoveFieldArgs) -> CliResult<ExitCode> {
    let mut fields = context.config.client_fields.clone();
    if args.index >= fields.len() {
        return Err(CliError::new(t!("config.field.bad_index", index = args.index)));
    }
    let removed = fields.remove(args.index);
    if removed.name.as_str() == IDENTIFIER_FIELD {
        return Err(CliError::new(t!("config.field.identifier")));
    }
    FieldSchema::derive(fields.clone(), &FieldName::new(IDENTIFIER_FIELD))
        .map_err(|err| CliError::new(t!("config.schema_invalid", error = err)))?;
    context
        .config_store
        .update(ConfigUpdate {
            client_fields: Some(fields),
            ..ConfigUpdate::default()
        })
        .map_err(config_save_error)?;
    print_line(&t!("config.field.removed", field = removed.name))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Activity Log Command
// ============================================================================

/// Handles `log` subcommands.
fn command_log(context: &CommandContext, command: LogCommand) -> CliResult<ExitCode> {
    match command {
        LogCommand::List => {
            let entries = context
                .log
                .read_all()
                .map_err(|err| CliError::new(t!("log.read_failed", error = err)))?;
            if entries.is_empty() {
                print_line(&t!("log.empty"))?;
                return Ok(ExitCode::SUCCESS);
            }
            let schema = context.schema().ok();
            for entry in entries {
                let subject = log_subject(schema.as_ref(), &entry);
                print_line(&t!(
                    "log.entry",
                    timestamp = entry.timestamp,
                    action = entry.action,
                    user = entry.user_id,
                    subject = subject
                ))?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Picks the client identifier named by an entry's snapshots, if any.
fn log_subject(schema: Option<&FieldSchema>, entry: &AuditEntry) -> String {
    let record = entry.data_after.as_ref().or(entry.data_before.as_ref());
    schema
        .zip(record)
        .and_then(|(schema, record)| record.identifier(schema))
        .map_or_else(|| "-".to_string(), |id| id.to_string())
}

// ============================================================================
// SECTION: Input Parsing
// ============================================================================

/// Parses repeated `--set FIELD=VALUE` arguments against the schema.
fn parse_set_pairs(
    values: &[String],
    schema: &FieldSchema,
) -> CliResult<Vec<(FieldName, String)>> {
    let mut pairs = Vec::with_capacity(values.len());
    for value in values {
        let Some((field, assigned)) = value.split_once('=') else {
            return Err(CliError::new(t!("set.invalid", value = value)));
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(CliError::new(t!("set.invalid", value = value)));
        }
        let name = FieldName::new(field);
        if schema.definition(&name).is_none() {
            return Err(CliError::new(t!("set.unknown_field", field = field)));
        }
        pairs.push((name, assigned.to_string()));
    }
    Ok(pairs)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{message}")
}

/// Writes one line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Writes one line to stdout, converting I/O failure into a CLI error.
fn print_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| {
        CliError::new(t!(
            "output.write_failed",
            stream = t!("output.stream.stdout"),
            error = err
        ))
    })
}

/// Writes an error message to stderr and yields a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

/// Reports validation failures on stderr.
///
/// The per-field messages are a fixed contract of the validation engine and
/// are printed verbatim in every locale.
fn report_validation(errors: &[ValidationError]) -> ExitCode {
    let _ = write_stderr_line(&t!("validation.failed"));
    for error in errors {
        let _ = write_stderr_line(&error.to_string());
    }
    ExitCode::FAILURE
}
