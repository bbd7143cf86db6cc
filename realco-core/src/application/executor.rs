// realco-core/src/application/executor.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, instrument, warn};

use crate::domain::configuration::DatabricksConfig;
use crate::infrastructure::adapters::mock::mock_execute;
use crate::infrastructure::connection::{ConnectionManager, with_timeout};
use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::{ExecuteOptions, SqlRow, WarehouseDriver, WarehouseSession};

pub const EXECUTE_LABEL: &str = "Databricks execute";
pub const FETCH_LABEL: &str = "Databricks fetch";

/// Bounds applied to every `execute_read_only` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub backoff: Duration,
    pub max_rows: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(250),
            max_rows: 10_000,
        }
    }
}

/// Read-only access to the warehouse, or to the mock responder when not live.
///
/// One client is meant to be shared (behind an `Arc`) by everything in the
/// process: it owns the single warehouse connection through its
/// [`ConnectionManager`]. Each call opens its own session on that connection, so
/// concurrent calls never share a session.
pub struct WarehouseClient {
    config: DatabricksConfig,
    connections: ConnectionManager,
    policy: RetryPolicy,
}

impl WarehouseClient {
    pub fn new(driver: Arc<dyn WarehouseDriver>, config: DatabricksConfig) -> Self {
        Self {
            connections: ConnectionManager::new(driver, &config),
            config,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &DatabricksConfig {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        self.config.is_live()
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Run one read-only statement and return at most `max_rows` rows.
    ///
    /// Timeouts and transient connection failures are retried once on a fresh
    /// connection after a fixed backoff. Anything else is returned as-is.
    #[instrument(skip(self, sql), fields(mode = %self.config.mode, sql.len = sql.len()))]
    pub async fn execute_read_only(&self, sql: &str) -> Result<Vec<SqlRow>, WarehouseError> {
        if !self.config.is_live() {
            return mock_execute(sql);
        }

        debug!(sql, "Executing read-only statement");
        let start = Instant::now();
        let mut attempt = 1;

        loop {
            let mut generation = None;
            match self.attempt(sql, &mut generation).await {
                Ok(rows) => {
                    debug!(rows = rows.len(), attempt, "Statement finished in {:.2?}", start.elapsed());
                    return Ok(rows);
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    warn!(attempt, error = %e, "Transient warehouse failure, reconnecting before retry");
                    // a failed connect already cleared its own slot
                    if let Some(generation) = generation {
                        self.connections.invalidate(generation);
                    }
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(attempt, error = %e, "Statement failed after {:.2?}", start.elapsed());
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(
        &self,
        sql: &str,
        generation: &mut Option<u64>,
    ) -> Result<Vec<SqlRow>, WarehouseError> {
        let (checked_out, connection) = self.connections.checkout().await?;
        *generation = Some(checked_out);
        let session = connection.open_session().await?;

        let result = self.run_statement(session.as_ref(), sql).await;

        if let Err(e) = session.close().await {
            debug!(error = %e, "Ignoring session close failure");
        }
        result
    }

    /// Execute and fetch, each under its own query timeout. The statement handle is
    /// closed before returning, whatever the outcome.
    async fn run_statement(
        &self,
        session: &dyn WarehouseSession,
        sql: &str,
    ) -> Result<Vec<SqlRow>, WarehouseError> {
        let timeout = self.config.query_timeout();
        let options = ExecuteOptions {
            run_async: true,
            max_rows: self.policy.max_rows,
        };

        let mut statement =
            with_timeout(session.execute_statement(sql, options), timeout, EXECUTE_LABEL).await?;
        let rows = with_timeout(statement.fetch_all(), timeout, FETCH_LABEL).await;

        if let Err(e) = statement.close().await {
            debug!(error = %e, "Ignoring statement close failure");
        }
        rows
    }
}
