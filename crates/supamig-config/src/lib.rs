use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use supamig_core::{DEFAULT_MIGRATION_FILE, DEFAULT_PREVIEW_CHARS};
use url::Url;

/// Base URL of the Supabase project
pub const URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Service role key; bypasses row level security
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// Optional path to the TOML settings file
pub const CONFIG_PATH_VAR: &str = "SUPAMIG_CONFIG";

pub const DEFAULT_CONFIG_FILE: &str = "supamig.toml";
pub const DEFAULT_ENV_FILES: [&str; 2] = [".env.local", ".env"];

pub const DEFAULT_RPC_FUNCTION: &str = "exec_sql";
pub const DEFAULT_RPC_ARGUMENT: &str = "query";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MigrationSection {
    pub file: Option<PathBuf>,
    pub preview_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RpcSection {
    pub function: Option<String>,
    pub argument: Option<String>,
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub migration: Option<MigrationSection>,
    pub rpc: Option<RpcSection>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{var} is not a valid http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl AppConfig {
    /// Load settings from `explicit`, else from `configured` (the value of
    /// SUPAMIG_CONFIG), else from supamig.toml. Only an explicitly named file
    /// has to exist.
    pub fn load(explicit: Option<&Path>, configured: Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = configured
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        if Path::new(&path).exists() {
            Self::from_file(path)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loaded settings file");
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<AppConfig>(s)?)
    }

    /// Migration file path (default PADDLE_MIGRATION.sql)
    pub fn migration_file(&self) -> PathBuf {
        self.migration
            .as_ref()
            .and_then(|m| m.file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATION_FILE))
    }

    /// Characters of SQL echoed before truncation (default 300)
    pub fn preview_chars(&self) -> usize {
        self.migration
            .as_ref()
            .and_then(|m| m.preview_chars)
            .unwrap_or(DEFAULT_PREVIEW_CHARS)
    }

    /// Database function invoked through PostgREST (default exec_sql)
    pub fn rpc_function(&self) -> String {
        self.rpc
            .as_ref()
            .and_then(|r| r.function.clone())
            .unwrap_or_else(|| DEFAULT_RPC_FUNCTION.to_string())
    }

    /// Name of the function parameter that receives the SQL (default query)
    pub fn rpc_argument(&self) -> String {
        self.rpc
            .as_ref()
            .and_then(|r| r.argument.clone())
            .unwrap_or_else(|| DEFAULT_RPC_ARGUMENT.to_string())
    }

    pub fn rpc_schema(&self) -> Option<String> {
        self.rpc.as_ref().and_then(|r| r.schema.clone())
    }
}

/// The two values every run needs
#[derive(Debug, Clone)]
pub struct Credentials {
    pub url: Url,
    pub service_key: SecretString,
}

impl Credentials {
    /// Resolve both variables through `lookup`. Empty values count as missing
    /// and every missing name is reported, in declaration order.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let url = present(URL_VAR);
        let key = present(SERVICE_KEY_VAR);

        let (url, key) = match (url, key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(URL_VAR);
                }
                if key.is_none() {
                    missing.push(SERVICE_KEY_VAR);
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let invalid = || ConfigError::InvalidUrl {
            var: URL_VAR,
            value: url.clone(),
        };
        let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(Self {
            url: parsed,
            service_key: SecretString::from(key.trim().to_string()),
        })
    }

    /// The base URL as an operator would write it, without a trailing slash
    pub fn display_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

/// Load dotenv files into the process environment without overriding
/// variables that are already set. `explicit` replaces `.env.local` and must
/// exist; the defaults are skipped when absent. Returns the files loaded.
pub fn load_env_files(
    dir: &Path,
    explicit: Option<&Path>,
) -> Result<Vec<PathBuf>, ConfigError> {
    let mut loaded = Vec::new();

    if let Some(path) = explicit {
        dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        loaded.push(path.to_path_buf());
    }

    let defaults = if explicit.is_some() {
        &DEFAULT_ENV_FILES[1..]
    } else {
        &DEFAULT_ENV_FILES[..]
    };
    for name in defaults {
        let path = dir.join(name);
        match dotenvy::from_path(&path) {
            Ok(()) => loaded.push(path),
            Err(e) if e.not_found() => {}
            Err(source) => return Err(ConfigError::EnvFile { path, source }),
        }
    }

    for path in &loaded {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
    Ok(loaded)
}
