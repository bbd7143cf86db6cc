// realco-core/src/ports/warehouse.rs

// Capability the core needs from a SQL warehouse driver. The executor only ever sees
// these traits; the concrete driver is injected at startup (HTTP in production, a
// scripted fake in tests).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::infrastructure::error::WarehouseError;

/// One warehouse row. Column names keep whatever casing the warehouse returned.
pub type SqlRow = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Validate)]
pub struct ConnectParams {
    #[validate(length(min = 1, message = "DATABRICKS_HOST is empty"))]
    pub host: String,
    #[validate(length(min = 1, message = "DATABRICKS_HTTP_PATH is empty"))]
    pub http_path: String,
    #[validate(length(min = 1, message = "DATABRICKS_TOKEN is empty"))]
    pub token: String,
    /// Socket-level budget handed to the driver, in milliseconds.
    pub socket_timeout_ms: u64,
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("http_path", &self.http_path)
            .field("token", &"***REDACTED***")
            .field("socket_timeout_ms", &self.socket_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub run_async: bool,
    pub max_rows: usize,
}

#[async_trait]
pub trait WarehouseDriver: Send + Sync {
    async fn connect(
        &self,
        params: &ConnectParams,
    ) -> Result<Arc<dyn WarehouseConnection>, WarehouseError>;
}

#[async_trait]
pub trait WarehouseConnection: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError>;
}

#[async_trait]
pub trait WarehouseSession: Send + Sync {
    async fn execute_statement(
        &self,
        sql: &str,
        options: ExecuteOptions,
    ) -> Result<Box<dyn WarehouseStatement>, WarehouseError>;

    async fn close(&self) -> Result<(), WarehouseError>;
}

#[async_trait]
pub trait WarehouseStatement: Send + Sync {
    async fn fetch_all(&mut self) -> Result<Vec<SqlRow>, WarehouseError>;

    async fn close(&self) -> Result<(), WarehouseError>;
}
