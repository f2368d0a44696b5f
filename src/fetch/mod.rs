pub mod source;

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};

use crate::model::{CollateralSnapshot, LiquidityPool};
use crate::normalize::{NormalizedCore, normalize_core};
use crate::pools::available_chains;
use crate::validate::{DroppedRecord, ValidationMode, parse_pools};

pub use source::{DashboardSource, FetchError, HttpSource};

// ── Datasets ─────────────────────────────────────────────────────────

/// Everything shown from the combined-data endpoint.
#[derive(Debug, Clone)]
pub struct CoreDataset {
    pub collateral: CollateralSnapshot,
    pub core: NormalizedCore,
    pub fetched_at: DateTime<Utc>,
}

/// Everything shown from the pools endpoint.
#[derive(Debug, Clone)]
pub struct PoolDataset {
    pub pools: Vec<LiquidityPool>,
    /// Chain selector options, first-seen order.
    pub chains: Vec<String>,
    pub dropped: Vec<DroppedRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Progress of one dataset. Each dataset moves independently.
#[derive(Debug)]
pub enum DatasetState<T> {
    Loading,
    Ready(Arc<T>),
    Failed(String),
    Cancelled,
}

impl<T> Clone for DatasetState<T> {
    fn clone(&self) -> Self {
        match self {
            DatasetState::Loading => DatasetState::Loading,
            DatasetState::Ready(data) => DatasetState::Ready(Arc::clone(data)),
            DatasetState::Failed(msg) => DatasetState::Failed(msg.clone()),
            DatasetState::Cancelled => DatasetState::Cancelled,
        }
    }
}

impl<T> DatasetState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DatasetState::Loading)
    }

    pub fn ready(&self) -> Option<&Arc<T>> {
        match self {
            DatasetState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────

/// Handle to an in-flight dashboard load.
///
/// Dropping the handle cancels whatever is still loading.
pub struct LoadHandle {
    core: watch::Receiver<DatasetState<CoreDataset>>,
    pools: watch::Receiver<DatasetState<PoolDataset>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl LoadHandle {
    /// Stop both fetches. Datasets still loading become `Cancelled`;
    /// finished ones keep their state.
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn core_state(&self) -> DatasetState<CoreDataset> {
        self.core.borrow().clone()
    }

    pub fn pools_state(&self) -> DatasetState<PoolDataset> {
        self.pools.borrow().clone()
    }

    pub fn subscribe_core(&self) -> watch::Receiver<DatasetState<CoreDataset>> {
        self.core.clone()
    }

    pub fn subscribe_pools(&self) -> watch::Receiver<DatasetState<PoolDataset>> {
        self.pools.clone()
    }

    /// Wait for both datasets to settle.
    pub async fn settled(mut self) -> (DatasetState<CoreDataset>, DatasetState<PoolDataset>) {
        let core = wait_settled(&mut self.core).await;
        let pools = wait_settled(&mut self.pools).await;
        (core, pools)
    }
}

/// Wait until a dataset leaves `Loading`.
pub async fn wait_settled<T>(rx: &mut watch::Receiver<DatasetState<T>>) -> DatasetState<T> {
    match rx.wait_for(|state| !state.is_loading()).await {
        Ok(state) => state.clone(),
        Err(_) => DatasetState::Failed("loader stopped before finishing".to_string()),
    }
}

/// Start both fetches concurrently and return immediately.
///
/// Must be called inside a tokio runtime.
pub fn load(source: Arc<dyn DashboardSource>, mode: ValidationMode) -> LoadHandle {
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let (core_tx, core_rx) = watch::channel(DatasetState::Loading);
    let (pools_tx, pools_rx) = watch::channel(DatasetState::Loading);

    let core_source = Arc::clone(&source);
    spawn_dataset("core", core_tx, shutdown_tx.subscribe(), async move {
        load_core(core_source.as_ref(), mode).await
    });
    spawn_dataset("pools", pools_tx, shutdown_tx.subscribe(), async move {
        load_pools(source.as_ref(), mode).await
    });

    LoadHandle {
        core: core_rx,
        pools: pools_rx,
        shutdown_tx,
    }
}

fn spawn_dataset<T, F>(
    name: &'static str,
    tx: watch::Sender<DatasetState<T>>,
    mut shutdown_rx: broadcast::Receiver<()>,
    fetch: F,
) where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    tokio::spawn(async move {
        let state = tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::debug!(dataset = name, "load cancelled");
                DatasetState::Cancelled
            }
            result = fetch => match result {
                Ok(data) => DatasetState::Ready(Arc::new(data)),
                Err(e) => {
                    tracing::warn!(dataset = name, error = %e, "load failed");
                    DatasetState::Failed(e.to_string())
                }
            },
        };
        let _ = tx.send(state);
    });
}

/// Fetch and normalize the combined-data payload.
pub async fn load_core(
    source: &dyn DashboardSource,
    mode: ValidationMode,
) -> Result<CoreDataset, FetchError> {
    let data = source.combined().await?;
    let core = normalize_core(&data.core, mode);
    tracing::debug!(
        assets = core.assets.len(),
        dropped = core.dropped.len(),
        "core metrics loaded"
    );
    Ok(CoreDataset {
        collateral: data.protocol.collateral,
        core,
        fetched_at: Utc::now(),
    })
}

/// Fetch and validate the pools payload.
pub async fn load_pools(
    source: &dyn DashboardSource,
    mode: ValidationMode,
) -> Result<PoolDataset, FetchError> {
    let raw = source.pools().await?;
    let set = parse_pools(raw, mode);
    let chains = available_chains(&set.pools);
    tracing::debug!(
        pools = set.pools.len(),
        dropped = set.dropped.len(),
        chains = chains.len(),
        "pools loaded"
    );
    Ok(PoolDataset {
        pools: set.pools,
        chains,
        dropped: set.dropped,
        fetched_at: Utc::now(),
    })
}
