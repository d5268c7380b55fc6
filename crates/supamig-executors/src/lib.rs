//! Backends that carry migration SQL to a database

#[cfg(feature = "rpc")]
pub mod rpc;

#[cfg(feature = "rpc")]
pub use rpc::{RpcExecutor, RpcSettings};

use serde_json::Value;

/// Interpret a response body as JSON when possible. Empty bodies become
/// `null` and anything unparseable is kept as a string.
pub fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(text.to_string()))
}
