//! Trust base cache keyed by epoch.
//!
//! The cache is an explicit object handed to the policy; nothing here is
//! global. Entries are immutable `Arc<TrustBase>` values, so readers never
//! observe a partially replaced roster.
//!
//! ## Eviction
//!
//! When a trust base for an epoch newer than every cached epoch is stored,
//! entries more than `retained_epochs` behind it are dropped. Older epochs
//! can still be stored explicitly (for example to verify historic proofs),
//! they are simply evicted again on the next advance.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::certificate::TrustBase;
use crate::config::VerifyConfig;

/// Read-mostly cache of trust bases by epoch.
#[derive(Debug)]
pub struct TrustBaseCache {
    entries: RwLock<BTreeMap<u64, Arc<TrustBase>>>,
    retained_epochs: u64,
}

impl Default for TrustBaseCache {
    fn default() -> Self {
        Self::new(VerifyConfig::default().retained_epochs)
    }
}

impl TrustBaseCache {
    /// Create an empty cache keeping `retained_epochs` epochs behind the
    /// newest one.
    #[must_use]
    pub fn new(retained_epochs: u64) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            retained_epochs,
        }
    }

    /// Create an empty cache from configuration.
    #[must_use]
    pub fn from_config(config: &VerifyConfig) -> Self {
        Self::new(config.retained_epochs)
    }

    /// Trust base for `epoch`, if cached.
    #[must_use]
    pub fn get(&self, epoch: u64) -> Option<Arc<TrustBase>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&epoch).cloned())
    }

    /// Trust base with the highest cached epoch.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<TrustBase>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.values().next_back().cloned())
    }

    /// Store a trust base, replacing any entry for the same epoch.
    pub fn put(&self, trust_base: TrustBase) -> Arc<TrustBase> {
        let epoch = trust_base.epoch();
        let trust_base = Arc::new(trust_base);

        let Ok(mut entries) = self.entries.write() else {
            warn!(epoch, "Trust base cache lock poisoned, entry not stored");
            return trust_base;
        };

        let advances = entries.keys().next_back().map_or(true, |newest| epoch > *newest);
        entries.insert(epoch, Arc::clone(&trust_base));

        if advances {
            let oldest_kept = epoch.saturating_sub(self.retained_epochs);
            let evicted = entries.len();
            entries.retain(|cached, _| *cached >= oldest_kept);
            debug!(epoch, evicted = evicted - entries.len(), "Trust base cache advanced");
        } else {
            debug!(epoch, "Trust base cached");
        }
        trust_base
    }

    /// Drop the entry for `epoch`.
    pub fn invalidate(&self, epoch: u64) {
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(&epoch).is_some() {
                debug!(epoch, "Trust base invalidated");
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of cached epochs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached epochs in ascending order.
    #[must_use]
    pub fn epochs(&self) -> Vec<u64> {
        self.entries
            .read()
            .map(|entries| entries.keys().copied().collect())
            .unwrap_or_default()
    }
}
