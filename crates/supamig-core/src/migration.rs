//! Migration file loading and preview

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Migration file read when no other path is configured
pub const DEFAULT_MIGRATION_FILE: &str = "PADDLE_MIGRATION.sql";

/// Number of characters of SQL echoed before the ellipsis
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read migration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A migration script held entirely in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    path: PathBuf,
    sql: String,
}

impl Migration {
    /// Read the whole file. The contents are not inspected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MigrationError> {
        let path = path.as_ref().to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(sql) => Ok(Self { path, sql }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(MigrationError::NotFound { path })
            }
            Err(source) => Err(MigrationError::Read { path, source }),
        }
    }

    pub fn from_sql(path: impl Into<PathBuf>, sql: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sql: sql.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Length in characters, which is what the status line reports
    pub fn char_len(&self) -> usize {
        self.sql.chars().count()
    }

    pub fn preview(&self, limit: usize) -> Cow<'_, str> {
        preview(&self.sql, limit)
    }
}

/// Truncate `sql` to `limit` characters, appending `...` only when something
/// was cut off. Never splits a multi-byte character.
pub fn preview(sql: &str, limit: usize) -> Cow<'_, str> {
    match sql.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &sql[..cut], ELLIPSIS)),
        None => Cow::Borrowed(sql),
    }
}
