//! The seam between the migration flow and a database backend

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("request to {target} failed: {message}")]
    Transport { target: String, message: String },

    #[error("remote execution failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// What the backend returned. The body is opaque and only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: u16,
    pub body: Value,
}

impl ExecutionOutcome {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}

/// Something that can run a block of SQL text exactly as given
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Human-readable description of where the SQL goes
    fn target(&self) -> &str;

    async fn execute(&self, sql: &str) -> Result<ExecutionOutcome, ExecuteError>;
}
