//! Human-readable status lines written to stdout

use std::io::{self, Write};

use supamig_config::ConfigError;
use supamig_core::{ExecutionOutcome, Migration};

use crate::RunError;

const RULE: &str = "--------------------------------------------------";

pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn connected(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out, "✓ Connected to Supabase: {url}")
    }

    pub fn preview(&mut self, migration: &Migration, limit: usize) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "📋 Migration SQL ({} chars):", migration.char_len())?;
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "{}", migration.preview(limit))?;
        writeln!(self.out, "{RULE}")
    }

    pub fn executing(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "⏳ Executing migration...")
    }

    pub fn success(&mut self, outcome: &ExecutionOutcome) -> io::Result<()> {
        writeln!(self.out, "✅ Migration executed successfully!")?;
        writeln!(self.out, "Result: {outcome}")
    }

    pub fn dry_run(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "🔎 Dry run: migration not executed")
    }

    /// Print the failure and return the process exit code
    pub fn finish(&mut self, result: &Result<(), RunError>) -> u8 {
        let Err(err) = result else {
            let _ = self.out.flush();
            return 0;
        };

        let written = match err {
            RunError::Config(ConfigError::Missing(names)) => self.missing(names),
            other => writeln!(self.out, "❌ Error: {other}"),
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            tracing::error!(error = %e, "failed to write report");
        }
        1
    }

    fn missing(&mut self, names: &[&str]) -> io::Result<()> {
        writeln!(self.out, "❌ Missing environment variables:")?;
        for name in names {
            writeln!(self.out, "   - {name}")?;
        }
        Ok(())
    }
}
