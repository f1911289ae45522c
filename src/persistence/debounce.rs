//! Debounced layout writer
//!
//! Every `schedule` replaces the pending snapshot and restarts one timer.
//! When the timer fires, whatever snapshot is pending at that moment is
//! written, so a burst of mutations costs a single write of the latest state.

use super::PersistedLayout;
use super::storage::save_layout;
use super::store::LayoutStore;
use par_grid_config::PersistenceConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Coalesces layout snapshots into delayed writes
pub struct LayoutPersister {
    store: Arc<dyn LayoutStore>,
    key: String,
    max_backups: usize,
    delay: Duration,
    runtime: Handle,
    /// Latest snapshot not yet written
    pending: Arc<Mutex<Option<PersistedLayout>>>,
    /// Serializes writes between the timer task and `flush`
    write_lock: Arc<Mutex<()>>,
    timer: Option<JoinHandle<()>>,
}

impl LayoutPersister {
    pub fn new(
        store: Arc<dyn LayoutStore>,
        key: impl Into<String>,
        max_backups: usize,
        delay: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            max_backups,
            delay,
            runtime,
            pending: Arc::new(Mutex::new(None)),
            write_lock: Arc::new(Mutex::new(())),
            timer: None,
        }
    }

    /// Persister using the configured key, backups and (clamped) delay
    pub fn from_config(
        store: Arc<dyn LayoutStore>,
        config: &PersistenceConfig,
        runtime: Handle,
    ) -> Self {
        Self::new(
            store,
            config.storage_key.clone(),
            config.max_backups,
            Duration::from_millis(config.effective_debounce_ms()),
            runtime,
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Queue a snapshot, superseding any snapshot still waiting
    pub fn schedule(&mut self, layout: PersistedLayout) {
        *self.pending.lock() = Some(layout);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let max_backups = self.max_backups;
        let pending = Arc::clone(&self.pending);
        let write_lock = Arc::clone(&self.write_lock);
        let delay = self.delay;

        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let result = tokio::task::spawn_blocking(move || {
                write_pending(store.as_ref(), &key, max_backups, &pending, &write_lock)
            })
            .await;
            if let Err(e) = result {
                log::error!("Layout write task failed: {}", e);
            }
        }));
        crate::debug_trace!("PERSIST", "Layout write scheduled in {:?}", self.delay);
    }

    /// Cancel the timer and write the pending snapshot now
    ///
    /// Returns true if a snapshot was written.
    pub fn flush(&mut self) -> bool {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        write_pending(
            self.store.as_ref(),
            &self.key,
            self.max_backups,
            &self.pending,
            &self.write_lock,
        )
    }
}

/// Take and write the pending snapshot under the write lock
///
/// A failed write puts the snapshot back unless a newer one arrived, so the
/// next scheduled write or flush retries it.
fn write_pending(
    store: &dyn LayoutStore,
    key: &str,
    max_backups: usize,
    pending: &Mutex<Option<PersistedLayout>>,
    write_lock: &Mutex<()>,
) -> bool {
    let _guard = write_lock.lock();
    let Some(layout) = pending.lock().take() else {
        return false;
    };
    match save_layout(store, key, &layout, max_backups) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to save layout '{}': {}", key, e);
            let mut slot = pending.lock();
            if slot.is_none() {
                *slot = Some(layout);
            }
            false
        }
    }
}
