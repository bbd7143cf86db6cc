// realco-core/src/infrastructure/connection.rs

// Owns the process-wide warehouse connection. At most one connect attempt is in
// flight at a time: every caller arriving while it runs awaits the same shared
// future, and a failed attempt clears the slot so the next caller starts over.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::domain::configuration::DatabricksConfig;
use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::{ConnectParams, WarehouseConnection, WarehouseDriver};

pub const CONNECT_LABEL: &str = "Databricks connect";

type ConnectResult = Result<Arc<dyn WarehouseConnection>, WarehouseError>;
type ConnectFuture = Shared<BoxFuture<'static, ConnectResult>>;

#[derive(Default)]
struct Slot {
    generation: u64,
    current: Option<ConnectFuture>,
}

pub struct ConnectionManager {
    driver: Arc<dyn WarehouseDriver>,
    params: ConnectParams,
    live: bool,
    connect_timeout: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl ConnectionManager {
    pub fn new(driver: Arc<dyn WarehouseDriver>, config: &DatabricksConfig) -> Self {
        Self {
            driver,
            params: config.connect_params(),
            live: config.is_live(),
            connect_timeout: config.connect_timeout(),
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// The shared connection, connecting first if nothing is established or pending.
    pub async fn get_connection(&self) -> ConnectResult {
        self.checkout().await.map(|(_, connection)| connection)
    }

    /// Like [`get_connection`](Self::get_connection), also returning the generation
    /// of the attempt that produced the connection, for a later [`invalidate`](Self::invalidate).
    #[instrument(skip(self), fields(host = %self.params.host))]
    pub async fn checkout(&self) -> Result<(u64, Arc<dyn WarehouseConnection>), WarehouseError> {
        if !self.live {
            return Err(WarehouseError::configuration(
                "Databricks is not configured (running in mock mode).",
            ));
        }
        self.params
            .validate()
            .map_err(|e| WarehouseError::configuration(format!("Invalid Databricks connection settings: {e}")))?;

        let (generation, pending) = {
            let mut slot = lock(&self.slot);
            match &slot.current {
                Some(existing) => (slot.generation, existing.clone()),
                None => {
                    slot.generation += 1;
                    let attempt = self.connect_attempt(slot.generation);
                    slot.current = Some(attempt.clone());
                    (slot.generation, attempt)
                }
            }
        };

        pending.await.map(|connection| (generation, connection))
    }

    /// Drop the shared connection if it is still the one from `generation`; the next
    /// `get_connection` reconnects. A newer connection (or pending attempt) is kept.
    pub fn invalidate(&self, generation: u64) -> bool {
        let mut slot = lock(&self.slot);
        if slot.generation != generation || slot.current.is_none() {
            debug!(generation, current = slot.generation, "Stale invalidation ignored");
            return false;
        }
        slot.current = None;
        info!(generation, "Shared warehouse connection invalidated");
        true
    }

    pub fn has_connection(&self) -> bool {
        lock(&self.slot).current.is_some()
    }

    fn connect_attempt(&self, generation: u64) -> ConnectFuture {
        let driver = Arc::clone(&self.driver);
        let params = self.params.clone();
        let slot = Arc::clone(&self.slot);
        let timeout = self.connect_timeout;

        async move {
            info!(generation, "Connecting to Databricks SQL warehouse");
            let result = with_timeout(driver.connect(&params), timeout, CONNECT_LABEL).await;

            if let Err(e) = &result {
                warn!(generation, error = %e, "Databricks connect failed");
                let mut slot = lock(&slot);
                // a newer attempt may already own the slot
                if slot.generation == generation {
                    slot.current = None;
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bound `future` by `timeout`, failing with a `Timeout` error tagged with `label`.
///
/// The inner future is dropped when the budget runs out. That abandons the wait on
/// our side only: a statement already accepted by the warehouse may keep running
/// there until it finishes or is cancelled.
pub async fn with_timeout<T, F>(future: F, timeout: Duration, label: &str) -> Result<T, WarehouseError>
where
    F: Future<Output = Result<T, WarehouseError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(WarehouseError::timeout(
            label,
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}
