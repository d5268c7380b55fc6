//! Supamig - execute one SQL migration file against a Supabase project
//!
//! The flow is strictly linear: credentials, settings, client, file,
//! one remote call, one reported outcome.

pub mod args;
pub mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use supamig_config::{AppConfig, ConfigError, Credentials, CONFIG_PATH_VAR};
use supamig_core::{ExecuteError, ExecutionOutcome, Migration, MigrationError, SqlExecutor};
use supamig_executors::{RpcExecutor, RpcSettings};
use tracing::info;

pub use args::Cli;
pub use report::Report;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Settings that shape a single run after all sources are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub migration_file: PathBuf,
    pub preview_chars: usize,
    pub dry_run: bool,
}

impl RunOptions {
    /// Flags win over the settings file, which wins over defaults
    pub fn resolve(cli: &Cli, settings: &AppConfig) -> Self {
        Self {
            migration_file: cli
                .file
                .clone()
                .unwrap_or_else(|| settings.migration_file()),
            preview_chars: cli.preview_chars.unwrap_or_else(|| settings.preview_chars()),
            dry_run: cli.dry_run,
        }
    }
}

pub fn rpc_settings(settings: &AppConfig) -> RpcSettings {
    RpcSettings {
        function: settings.rpc_function(),
        argument: settings.rpc_argument(),
        schema: settings.rpc_schema(),
    }
}

/// Read the migration, show it, and hand the full text to `executor` once.
/// Returns `None` for a dry run.
pub async fn run_migration<E, W>(
    executor: &E,
    opts: &RunOptions,
    report: &mut Report<W>,
) -> Result<Option<ExecutionOutcome>, RunError>
where
    E: SqlExecutor + ?Sized,
    W: Write,
{
    let migration = Migration::load(&opts.migration_file)?;
    report.preview(&migration, opts.preview_chars)?;

    if opts.dry_run {
        report.dry_run()?;
        info!(file = %migration.path().display(), "dry run, nothing sent");
        return Ok(None);
    }

    report.executing()?;
    info!(
        file = %migration.path().display(),
        chars = migration.char_len(),
        endpoint = executor.target(),
        "executing migration"
    );
    let outcome = executor.execute(migration.sql()).await?;
    info!(status = outcome.status, "migration executed");

    report.success(&outcome)?;
    Ok(Some(outcome))
}

async fn execute<F, W>(cli: &Cli, lookup: F, report: &mut Report<W>) -> Result<(), RunError>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let credentials = Credentials::from_lookup(&lookup)?;
    let settings = AppConfig::load(cli.config.as_deref(), lookup(CONFIG_PATH_VAR))?;

    let executor = RpcExecutor::new(
        &credentials.url,
        credentials.service_key.clone(),
        rpc_settings(&settings),
    )?;
    report.connected(credentials.display_url())?;

    let opts = RunOptions::resolve(cli, &settings);
    run_migration(&executor, &opts, report).await?;
    Ok(())
}

/// Run with variables resolved through `lookup`. Returns the exit code.
pub async fn run<F, W>(cli: &Cli, lookup: F, out: W) -> u8
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let mut report = Report::new(out);
    let result = execute(cli, lookup, &mut report).await;
    report.finish(&result)
}

/// Load `.env` files from the working directory, then run against the
/// process environment. Returns the exit code.
pub async fn run_from_env<W: Write>(cli: &Cli, out: W) -> u8 {
    let mut report = Report::new(out);
    let result = match load_env(cli) {
        Ok(()) => execute(cli, |key| std::env::var(key).ok(), &mut report).await,
        Err(e) => Err(e),
    };
    report.finish(&result)
}

fn load_env(cli: &Cli) -> Result<(), RunError> {
    let cwd = std::env::current_dir()?;
    supamig_config::load_env_files(&cwd, cli.env_file.as_deref())?;
    Ok(())
}
