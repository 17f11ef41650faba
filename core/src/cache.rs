//! Compute-once dataset cache.
//!
//! The first caller generates the dataset behind an init guard; every
//! later read is a lock-free `OnceLock` hit returning the same `Arc`.

use crate::{config::DashboardConfig, dataset::Dataset, error::DashResult};
use std::sync::{Arc, Mutex, OnceLock};

pub struct DatasetCache {
    config: DashboardConfig,
    cell: OnceLock<Arc<Dataset>>,
    init_guard: Mutex<()>,
}

impl DatasetCache {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cell: OnceLock::new(),
            init_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Shared snapshot, generating it on first access.
    pub fn get(&self) -> DashResult<Arc<Dataset>> {
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }

        // A poisoned guard only means another initializer panicked;
        // the cell is still either empty or fully set.
        let _guard = self
            .init_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }

        let dataset = Arc::new(Dataset::from_config(&self.config)?);
        let _ = self.cell.set(Arc::clone(&dataset));
        log::debug!("dataset cached (seed={})", dataset.seed());
        Ok(dataset)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
