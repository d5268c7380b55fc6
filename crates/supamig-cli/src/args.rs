//! Command-line interface definitions

use clap::Parser;
use std::path::PathBuf;

/// Execute a SQL migration file against a Supabase project
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "supamig")]
#[command(version)]
pub struct Cli {
    /// Migration file to execute [default: PADDLE_MIGRATION.sql]
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Settings file [default: $SUPAMIG_CONFIG, then supamig.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environment file loaded in place of .env.local
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Characters of SQL echoed before truncation [default: 300]
    #[arg(long)]
    pub preview_chars: Option<usize>,

    /// Show the migration without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub log_json: bool,
}
