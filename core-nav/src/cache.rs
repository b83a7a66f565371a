//! Last-location cache
//!
//! Persists the navigated path so a technician returning within the same
//! working day resumes where they left off. The cache is strictly
//! best-effort: storage failures are swallowed and never block navigation.

use bridge_traits::storage::SettingsStore;
use bridge_traits::time::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::types::{Breadcrumb, TargetFolder};

/// Fixed storage key for the snapshot
pub const LOCATION_KEY: &str = "fieldphoto.last_location";

/// Snapshot lifetime: 10 hours
pub const LOCATION_TTL_MILLIS: i64 = 10 * 60 * 60 * 1000;

/// Persisted navigation snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLocation {
    pub breadcrumbs: Vec<Breadcrumb>,
    pub target_folder: Option<TargetFolder>,
    pub saved_at_epoch_millis: i64,
}

/// Last-location cache over platform key-value storage
pub struct LocationCache {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl LocationCache {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(store, clock, LOCATION_TTL_MILLIS)
    }

    pub fn with_ttl(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>, ttl_millis: i64) -> Self {
        Self {
            store,
            clock,
            ttl_millis,
        }
    }

    /// Write a timestamped snapshot.
    ///
    /// Unavailable or full storage drops the write silently; the cache must
    /// never turn a successful navigation into a failure.
    pub async fn save(&self, breadcrumbs: &[Breadcrumb], target: Option<&TargetFolder>) {
        let snapshot = SavedLocation {
            breadcrumbs: breadcrumbs.to_vec(),
            target_folder: target.cloned(),
            saved_at_epoch_millis: self.clock.unix_timestamp_millis(),
        };

        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                debug!(error = %e, "Skipping location snapshot, serialization failed");
                return;
            }
        };

        if let Err(e) = self.store.set_string(LOCATION_KEY, &json).await {
            debug!(error = %e, "Skipping location snapshot, storage unavailable");
        }
    }

    /// Read the snapshot back.
    ///
    /// Returns `None` when absent, corrupt, or older than the TTL; corrupt
    /// and expired entries are evicted from storage on read.
    pub async fn load(&self) -> Option<SavedLocation> {
        let json = match self.store.get_string(LOCATION_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Treating unreadable location cache as a miss");
                return None;
            }
        };

        let snapshot: SavedLocation = match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(error = %e, "Evicting corrupt location snapshot");
                self.evict().await;
                return None;
            }
        };

        let age = self.clock.unix_timestamp_millis() - snapshot.saved_at_epoch_millis;
        if age > self.ttl_millis {
            debug!(age_millis = age, "Evicting expired location snapshot");
            self.evict().await;
            return None;
        }

        Some(snapshot)
    }

    /// Remove the snapshot.
    pub async fn clear(&self) {
        self.evict().await;
    }

    async fn evict(&self) {
        if let Err(e) = self.store.delete(LOCATION_KEY).await {
            debug!(error = %e, "Failed to evict location snapshot");
        }
    }
}
