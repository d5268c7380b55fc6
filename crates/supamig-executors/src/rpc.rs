use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use supamig_core::{ExecuteError, ExecutionOutcome, SqlExecutor};
use url::Url;

use crate::parse_body;

/// Which database function receives the SQL, and under which parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcSettings {
    pub function: String,
    pub argument: String,
    /// PostgREST schema profile; the project's default schema when `None`
    pub schema: Option<String>,
}

/// Executes SQL by calling a SQL-running database function through the
/// PostgREST RPC endpoint of a Supabase project.
pub struct RpcExecutor {
    client: Client,
    endpoint: Url,
    target: String,
    argument: String,
    schema: Option<String>,
    service_key: SecretString,
}

impl RpcExecutor {
    pub fn new(
        base_url: &Url,
        service_key: SecretString,
        settings: RpcSettings,
    ) -> Result<Self, ExecuteError> {
        if !is_identifier(&settings.function) || !is_identifier(&settings.argument) {
            return Err(ExecuteError::InvalidRequest(format!(
                "rpc function and argument must be plain identifiers, got {:?}({:?})",
                settings.function, settings.argument
            )));
        }
        let endpoint = rpc_endpoint(base_url, &settings.function)?;
        let client = Client::builder()
            .build()
            .map_err(|e| ExecuteError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            client,
            target: endpoint.to_string(),
            endpoint,
            argument: settings.argument,
            schema: settings.schema,
            service_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_body(&self, sql: &str) -> Value {
        let mut body = Map::new();
        body.insert(self.argument.clone(), Value::String(sql.to_string()));
        Value::Object(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> ExecuteError {
        if e.is_builder() {
            return ExecuteError::InvalidRequest(e.to_string());
        }
        ExecuteError::Transport {
            target: self.target.clone(),
            message: e.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SqlExecutor for RpcExecutor {
    fn target(&self) -> &str {
        &self.target
    }

    async fn execute(&self, sql: &str) -> Result<ExecutionOutcome, ExecuteError> {
        let key = self.service_key.expose_secret();
        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", key)
            .bearer_auth(key)
            .json(&self.request_body(sql));
        if let Some(schema) = &self.schema {
            req = req.header("Content-Profile", schema.as_str());
        }

        tracing::debug!(target_url = %self.target, bytes = sql.len(), "posting migration");
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "rpc call rejected");
            return Err(ExecuteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(ExecutionOutcome::new(status.as_u16(), parse_body(&text)))
    }
}

/// `<base>/rest/v1/rpc/<function>`, keeping any path prefix on the base
fn rpc_endpoint(base: &Url, function: &str) -> Result<Url, ExecuteError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ExecuteError::InvalidRequest(format!("{base} cannot be used as a base URL"))
        })?;
        segments.pop_if_empty().extend(["rest", "v1", "rpc", function]);
    }
    Ok(url)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
