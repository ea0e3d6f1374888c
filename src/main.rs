mod cli;
mod commands;
mod format;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use certdeck_common::error::ErrorCode;
use certdeck_common::paths;
use certdeck_config::{dirs, ConfigError, Settings};
use certdeck_store::{CertificateStore, FileStore, StoreError, StoreEvent};

use cli::{Cli, Command};
use commands::InvalidInput;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(cli.log_filter())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Hold the non-blocking guards for the lifetime of main so logs flush on exit.
    let _log_guards = match init_logging(env_filter, cli.log_file.as_deref()) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Error: could not initialize logging: {e:#}");
            return ExitCode::from(ErrorCode::IoError.exit_code());
        }
    };

    match run(cli.command, cli.data_dir, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = error_code(&e);
            tracing::debug!(code = %code, error = %e, "Command failed");
            if cli.json {
                print_error_json(code, &e);
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(code.exit_code())
        }
    }
}

fn run(command: Command, data_dir: Option<std::path::PathBuf>, json: bool) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(paths::data_dir);
    dirs::ensure_data_dir(&data_dir);
    let settings = Settings::load(&data_dir).context("loading config.toml")?;

    let mut store = CertificateStore::builder(FileStore::new(&data_dir))
        .key(settings.store.key.clone())
        .on_event(report_store_event)
        .build();
    tracing::debug!(
        dir = %store.storage().dir().display(),
        key = %store.key(),
        count = store.len(),
        "Store opened"
    );

    let now = chrono::Utc::now();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::List(args) => {
            commands::list(&store, args, settings.view.default_sort, now, json, &mut out)
        }
        Command::Show { id } => commands::show(&store, &id, now, json, &mut out),
        Command::Add(args) => commands::add(&mut store, args, json, &mut out),
        Command::Update(args) => commands::update(&mut store, args, json, &mut out),
        Command::Remove { id } => commands::remove(&mut store, &id, json, &mut out),
        Command::Issuers => commands::issuers(&store, json, &mut out),
    }
}

fn report_store_event(event: &StoreEvent) {
    if event.is_mutation() {
        tracing::debug!(?event, "Collection changed");
    }
    if let StoreEvent::LoadFailed { key, reason } = event {
        eprintln!(
            "Warning: stored certificates under '{key}' could not be read ({reason}); \
             starting with an empty list"
        );
    }
}

/// Map a failure to the code reported in JSON and used as exit status.
fn error_code(err: &anyhow::Error) -> ErrorCode {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            return ErrorCode::from(e);
        }
        if cause.is::<InvalidInput>() {
            return ErrorCode::InvalidPayload;
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return match e {
                ConfigError::Parse { .. } => ErrorCode::ParseError,
                ConfigError::Read { .. } => ErrorCode::IoError,
            };
        }
        if cause.is::<std::io::Error>() {
            return ErrorCode::IoError;
        }
    }
    ErrorCode::Internal
}

fn print_error_json(code: ErrorCode, err: &anyhow::Error) {
    let body = serde_json::json!({
        "error": code,
        "message": format!("{err:#}"),
    });
    println!("{body}");
}

// ── Logging setup ───────────────────────────────────────────────────

/// Initialize tracing with stderr + optional file output.
/// Returns guards that must be held for the lifetime of the program
/// to ensure the non-blocking writers flush on shutdown.
fn init_logging(
    env_filter: tracing_subscriber::EnvFilter,
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Vec<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    let (nb_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(nb_stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        let (nb_file, file_guard) = tracing_appender::non_blocking(file);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(nb_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        Ok(vec![stderr_guard, file_guard])
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();

        Ok(vec![stderr_guard])
    }
}
