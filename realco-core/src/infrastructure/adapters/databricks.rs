// realco-core/src/infrastructure/adapters/databricks.rs

//! Databricks SQL warehouse driver over the Statement Execution REST API.
//!
//! `connect` checks that the warehouse named by the HTTP path exists and that the
//! token is accepted. Sessions are logical handles over the shared HTTP client;
//! statements are submitted with `row_limit`, polled until they reach a terminal
//! state, and their JSON_ARRAY result chunks are zipped with the manifest column
//! names into [`SqlRow`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::{
    ConnectParams, ExecuteOptions, SqlRow, WarehouseConnection, WarehouseDriver,
    WarehouseSession, WarehouseStatement,
};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const SYNC_WAIT_TIMEOUT: &str = "30s";

#[derive(Debug, Default, Clone, Copy)]
pub struct DatabricksHttpDriver;

impl DatabricksHttpDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WarehouseDriver for DatabricksHttpDriver {
    async fn connect(
        &self,
        params: &ConnectParams,
    ) -> Result<Arc<dyn WarehouseConnection>, WarehouseError> {
        let base_url = base_url(&params.host);
        let warehouse_id = warehouse_id(&params.http_path)?;

        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", params.token))
            .map_err(|_| WarehouseError::configuration("DATABRICKS_TOKEN contains invalid characters"))?;
        headers.insert(header::AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(params.socket_timeout_ms))
            .build()?;

        let response = client
            .get(format!("{base_url}/api/2.0/sql/warehouses/{warehouse_id}"))
            .send()
            .await?;
        let warehouse: WarehouseInfo = check_status(response).await?.json().await?;
        info!(
            warehouse = %warehouse_id,
            name = warehouse.name.as_deref().unwrap_or("?"),
            state = warehouse.state.as_deref().unwrap_or("?"),
            "Connected to Databricks SQL warehouse"
        );

        Ok(Arc::new(DatabricksConnection {
            inner: Arc::new(ClientInner {
                client,
                base_url,
                warehouse_id,
            }),
        }))
    }
}

struct ClientInner {
    client: Client,
    base_url: String,
    warehouse_id: String,
}

impl ClientInner {
    fn statement_url(&self, statement_id: &str) -> String {
        format!("{}/api/2.0/sql/statements/{}", self.base_url, statement_id)
    }

    async fn get_statement(&self, statement_id: &str) -> Result<StatementResponse, WarehouseError> {
        let response = self.client.get(self.statement_url(statement_id)).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn get_chunk(&self, statement_id: &str, chunk_index: u64) -> Result<ResultChunk, WarehouseError> {
        let url = format!(
            "{}/result/chunks/{}",
            self.statement_url(statement_id),
            chunk_index
        );
        let response = self.client.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }
}

struct DatabricksConnection {
    inner: Arc<ClientInner>,
}

#[async_trait]
impl WarehouseConnection for DatabricksConnection {
    async fn open_session(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError> {
        Ok(Box::new(DatabricksSession {
            inner: Arc::clone(&self.inner),
            closed: AtomicBool::new(false),
        }))
    }
}

struct DatabricksSession {
    inner: Arc<ClientInner>,
    closed: AtomicBool,
}

#[async_trait]
impl WarehouseSession for DatabricksSession {
    async fn execute_statement(
        &self,
        sql: &str,
        options: ExecuteOptions,
    ) -> Result<Box<dyn WarehouseStatement>, WarehouseError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WarehouseError::TransientConnection(
                "The session has been closed.".to_string(),
            ));
        }

        let body = json!({
            "statement": sql,
            "warehouse_id": self.inner.warehouse_id,
            "disposition": "INLINE",
            "format": "JSON_ARRAY",
            "row_limit": options.max_rows,
            "wait_timeout": if options.run_async { "0s" } else { SYNC_WAIT_TIMEOUT },
            "on_wait_timeout": "CONTINUE",
        });

        let response = self
            .inner
            .client
            .post(format!("{}/api/2.0/sql/statements", self.inner.base_url))
            .json(&body)
            .send()
            .await?;
        let submitted: StatementResponse = check_status(response).await?.json().await?;
        debug!(statement_id = %submitted.statement_id, state = ?submitted.state(), "Statement submitted");

        Ok(Box::new(DatabricksStatement {
            inner: Arc::clone(&self.inner),
            max_rows: options.max_rows,
            pending: Some(submitted.clone()),
            statement_id: submitted.statement_id,
            finished: false,
        }))
    }

    async fn close(&self) -> Result<(), WarehouseError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct DatabricksStatement {
    inner: Arc<ClientInner>,
    statement_id: String,
    max_rows: usize,
    pending: Option<StatementResponse>,
    /// Set once the server reported a terminal state; nothing left to cancel.
    finished: bool,
}

impl DatabricksStatement {
    async fn wait_for_completion(&mut self) -> Result<StatementResponse, WarehouseError> {
        let mut current = match self.pending.take() {
            Some(response) => response,
            None => self.inner.get_statement(&self.statement_id).await?,
        };

        loop {
            let state = current.state();
            self.finished = state.is_terminal();
            match state {
                StatementState::Pending | StatementState::Running => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    current = self.inner.get_statement(&self.statement_id).await?;
                }
                StatementState::Succeeded => return Ok(current),
                StatementState::Failed => {
                    let message = current
                        .status
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "Databricks statement failed.".to_string());
                    return Err(WarehouseError::from_driver_message(message));
                }
                StatementState::Canceled | StatementState::Closed | StatementState::Unknown => {
                    return Err(WarehouseError::Query(format!(
                        "Databricks statement {} ended in state {}.",
                        self.statement_id, current.status.state
                    )));
                }
            }
        }
    }
}

#[async_trait]
impl WarehouseStatement for DatabricksStatement {
    async fn fetch_all(&mut self) -> Result<Vec<SqlRow>, WarehouseError> {
        let completed = self.wait_for_completion().await?;
        let columns: Vec<String> = completed
            .manifest
            .as_ref()
            .map(|m| m.schema.columns.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();

        let mut rows = Vec::new();
        let mut chunk = completed.result;

        while let Some(current) = chunk.take() {
            for values in current.data_array {
                if rows.len() >= self.max_rows {
                    return Ok(rows);
                }
                rows.push(zip_row(&columns, values));
            }
            if let Some(next) = current.next_chunk_index {
                chunk = Some(self.inner.get_chunk(&self.statement_id, next).await?);
            }
        }

        Ok(rows)
    }

    async fn close(&self) -> Result<(), WarehouseError> {
        if self.finished {
            return Ok(());
        }
        debug!(statement_id = %self.statement_id, "Cancelling unfinished statement");
        let response = self
            .inner
            .client
            .post(format!("{}/cancel", self.inner.statement_url(&self.statement_id)))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

fn zip_row(columns: &[String], values: Vec<Value>) -> SqlRow {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let name = columns
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("col_{i}"));
            (name, value)
        })
        .collect()
}

fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Warehouse id from an HTTP path such as `/sql/1.0/warehouses/abc123`.
fn warehouse_id(http_path: &str) -> Result<String, WarehouseError> {
    http_path
        .trim()
        .trim_end_matches('/')
        .rsplit_once("/warehouses/")
        .map(|(_, id)| id.to_string())
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .ok_or_else(|| {
            WarehouseError::configuration(format!(
                "DATABRICKS_HTTP_PATH '{http_path}' does not reference a SQL warehouse (expected /sql/1.0/warehouses/<id>)."
            ))
        })
}

async fn check_status(response: Response) -> Result<Response, WarehouseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WarehouseError::configuration(format!(
            "Databricks rejected the access token ({status}): {message}"
        )),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::TOO_MANY_REQUESTS | StatusCode::BAD_GATEWAY => {
            WarehouseError::TransientConnection(format!(
                "Databricks temporarily unavailable ({status}): {message}"
            ))
        }
        _ => WarehouseError::from_driver_message(format!("Databricks API error {status}: {message}")),
    })
}

// --- WIRE TYPES ---

#[derive(Debug, Deserialize)]
struct WarehouseInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
    Unknown,
}

impl StatementState {
    fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StatementResponse {
    statement_id: String,
    #[serde(default)]
    status: StatementStatus,
    #[serde(default)]
    manifest: Option<ResultManifest>,
    #[serde(default)]
    result: Option<ResultChunk>,
}

impl StatementResponse {
    fn state(&self) -> StatementState {
        match self.status.state.as_str() {
            "PENDING" => StatementState::Pending,
            "RUNNING" => StatementState::Running,
            "SUCCEEDED" => StatementState::Succeeded,
            "FAILED" => StatementState::Failed,
            "CANCELED" => StatementState::Canceled,
            "CLOSED" => StatementState::Closed,
            _ => StatementState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatementStatus {
    #[serde(default)]
    state: String,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResultManifest {
    #[serde(default)]
    schema: ResultSchema,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResultSchema {
    #[serde(default)]
    columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ColumnInfo {
    name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResultChunk {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
    #[serde(default)]
    next_chunk_index: Option<u64>,
}
