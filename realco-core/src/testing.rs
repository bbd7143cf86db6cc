// realco-core/src/testing.rs
//
// Scripted in-memory warehouse driver for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::configuration::{DatabricksConfig, DatabricksMode};
use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::{
    ConnectParams, ExecuteOptions, SqlRow, WarehouseConnection, WarehouseDriver,
    WarehouseSession, WarehouseStatement,
};

pub fn live_config() -> DatabricksConfig {
    DatabricksConfig {
        host: "adb-000.azuredatabricks.net".into(),
        http_path: "/sql/1.0/warehouses/test".into(),
        token: "dapi-test".into(),
        mode: DatabricksMode::Live,
        ..Default::default()
    }
}

pub fn row(value: serde_json::Value) -> SqlRow {
    value.as_object().cloned().unwrap_or_default()
}

/// What the next statement does, consumed in order before falling back to the handler.
#[derive(Debug, Clone)]
pub enum Step {
    FailExecute(WarehouseError),
    FailFetch(WarehouseError),
    HangFetch,
    Rows(Vec<SqlRow>),
}

type Handler = dyn Fn(&str) -> Result<Vec<SqlRow>, WarehouseError> + Send + Sync;

struct Shared {
    events: Mutex<Vec<String>>,
    steps: Mutex<VecDeque<Step>>,
    handler: Box<Handler>,
    fail_closes: AtomicBool,
    fetch_delay_ms: AtomicU64,
    hang_on: Mutex<Vec<String>>,
    options_seen: Mutex<Vec<ExecuteOptions>>,
}

impl Shared {
    fn hangs_on(&self, sql: &str) -> bool {
        self.hang_on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .any(|fragment| sql.contains(fragment.as_str()))
    }

    fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.into());
    }
}

pub struct ScriptedDriver {
    shared: Arc<Shared>,
    connect_delay: Duration,
    connect_failures: Mutex<VecDeque<WarehouseError>>,
    connects: AtomicUsize,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::with_handler(|_| Ok(vec![row(json!({ "1": 1 }))]))
    }

    pub fn with_handler(
        handler: impl Fn(&str) -> Result<Vec<SqlRow>, WarehouseError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                events: Mutex::new(Vec::new()),
                steps: Mutex::new(VecDeque::new()),
                handler: Box::new(handler),
                fail_closes: AtomicBool::new(false),
                fetch_delay_ms: AtomicU64::new(0),
                hang_on: Mutex::new(Vec::new()),
                options_seen: Mutex::new(Vec::new()),
            }),
            connect_delay: Duration::ZERO,
            connect_failures: Mutex::new(VecDeque::new()),
            connects: AtomicUsize::new(0),
        }
    }

    /// Statement and session `close` calls fail (and must be swallowed by callers).
    pub fn failing_closes(self) -> Self {
        self.shared.fail_closes.store(true, Ordering::SeqCst);
        self
    }

    /// Every fetch takes `delay` before answering.
    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        self.shared
            .fetch_delay_ms
            .store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
        self
    }

    /// Fetches of statements whose SQL contains `fragment` never complete.
    pub fn hang_when(self, fragment: &str) -> Self {
        self.shared
            .hang_on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(fragment.to_string());
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn fail_next_connect(self, err: WarehouseError) -> Self {
        self.connect_failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(err);
        self
    }

    pub fn then(self, step: Step) -> Self {
        self.shared
            .steps
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(step);
        self
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.shared
            .events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("execute:").map(str::to_string))
            .collect()
    }

    pub fn options_seen(&self) -> Vec<ExecuteOptions> {
        self.shared
            .options_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WarehouseDriver for ScriptedDriver {
    async fn connect(
        &self,
        _params: &ConnectParams,
    ) -> Result<Arc<dyn WarehouseConnection>, WarehouseError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.shared.record("connect");
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        let failure = self
            .connect_failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        match failure {
            Some(err) => Err(err),
            None => Ok(Arc::new(ScriptedConnection {
                shared: Arc::clone(&self.shared),
            })),
        }
    }
}

struct ScriptedConnection {
    shared: Arc<Shared>,
}

#[async_trait]
impl WarehouseConnection for ScriptedConnection {
    async fn open_session(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError> {
        self.shared.record("open_session");
        Ok(Box::new(ScriptedSession {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct ScriptedSession {
    shared: Arc<Shared>,
}

#[async_trait]
impl WarehouseSession for ScriptedSession {
    async fn execute_statement(
        &self,
        sql: &str,
        options: ExecuteOptions,
    ) -> Result<Box<dyn WarehouseStatement>, WarehouseError> {
        self.shared.record(format!("execute:{sql}"));
        self.shared
            .options_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(options);

        let step = self
            .shared
            .steps
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        let outcome = match step {
            Some(Step::FailExecute(err)) => return Err(err),
            Some(Step::FailFetch(err)) => Outcome::Ready(Err(err)),
            Some(Step::HangFetch) => Outcome::Hang,
            Some(Step::Rows(rows)) => Outcome::Ready(Ok(rows)),
            None if self.shared.hangs_on(sql) => Outcome::Hang,
            None => Outcome::Ready((self.shared.handler)(sql)),
        };

        Ok(Box::new(ScriptedStatement {
            shared: Arc::clone(&self.shared),
            outcome: Some(outcome),
        }))
    }

    async fn close(&self) -> Result<(), WarehouseError> {
        self.shared.record("session.close");
        if self.shared.fail_closes.load(Ordering::SeqCst) {
            return Err(WarehouseError::Query("session close failed".into()));
        }
        Ok(())
    }
}

enum Outcome {
    Ready(Result<Vec<SqlRow>, WarehouseError>),
    Hang,
}

struct ScriptedStatement {
    shared: Arc<Shared>,
    outcome: Option<Outcome>,
}

#[async_trait]
impl WarehouseStatement for ScriptedStatement {
    async fn fetch_all(&mut self) -> Result<Vec<SqlRow>, WarehouseError> {
        self.shared.record("fetch");
        let delay = self.shared.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match self.outcome.take() {
            Some(Outcome::Ready(result)) => result,
            Some(Outcome::Hang) => futures::future::pending().await,
            None => Ok(Vec::new()),
        }
    }

    async fn close(&self) -> Result<(), WarehouseError> {
        self.shared.record("statement.close");
        if self.shared.fail_closes.load(Ordering::SeqCst) {
            return Err(WarehouseError::Query("statement close failed".into()));
        }
        Ok(())
    }
}
