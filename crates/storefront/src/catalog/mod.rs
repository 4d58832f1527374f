//! In-memory catalog cache.
//!
//! # Architecture
//!
//! - The cache holds one [`CatalogSnapshot`] behind an `Arc`; readers clone
//!   the `Arc` and keep a stable view for as long as they need it
//! - `refresh()` builds a whole new snapshot and swaps it in under a write
//!   lock, so no reader ever sees a half-replaced list
//! - Every refresh takes a request token before it awaits the source; a
//!   completion whose token is not newer than the last applied one is
//!   discarded, so a slow old response cannot overwrite a newer one
//! - Failures leave the snapshot untouched and raise an error flag that the
//!   next applied refresh clears. Nothing is retried automatically
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::catalog::{CatalogCache, RefreshOutcome};
//!
//! let cache = CatalogCache::new(client);
//! if let RefreshOutcome::Failed(e) = cache.refresh().await {
//!     tracing::warn!(error = %e, "catalog unavailable, showing last snapshot");
//! }
//! let shoes = cache.snapshot().filter_by_category("Footwear").len();
//! ```

mod snapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use shopfront_core::ProductId;

use crate::api::{ApiError, CatalogItem, CatalogSource};

pub use snapshot::CatalogSnapshot;

/// What happened to a single `refresh()` call.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The fetched batch is now the current snapshot.
    Applied { items: usize },
    /// A newer refresh was applied first; this result was dropped.
    Superseded,
    /// The fetch failed; the previous snapshot is still served.
    Failed(ApiError),
}

impl RefreshOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Observable state of the cache, for rendering a retry affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStatus {
    /// Token of the snapshot currently served (0 = never refreshed).
    pub epoch: u64,
    pub item_count: usize,
    /// Set when the most recent non-stale refresh failed.
    pub last_error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CatalogStatus {
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Cloneable handle to the process-wide catalog cache.
pub struct CatalogCache<S> {
    inner: Arc<CatalogCacheInner<S>>,
}

impl<S> Clone for CatalogCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogCacheInner<S> {
    source: S,
    issued: AtomicU64,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    snapshot: Arc<CatalogSnapshot>,
    applied_token: u64,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Create an empty cache over `source`. Call [`Self::refresh`] to fill it.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(CatalogCacheInner {
                source,
                issued: AtomicU64::new(0),
                state: RwLock::new(CacheState::default()),
            }),
        }
    }

    /// The source this cache fetches from.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Fetch the full catalog and swap it in if no newer result won the race.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let token = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "Catalog refresh issued");

        let result = self.inner.source.fetch_catalog().await;

        let mut state = self.inner.state.write();
        if token <= state.applied_token {
            debug!(
                token,
                applied = state.applied_token,
                "Discarding stale catalog response"
            );
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(items) => {
                let now = Utc::now();
                let snapshot = CatalogSnapshot::with_epoch(items, token, Some(now));
                let count = snapshot.len();
                state.snapshot = Arc::new(snapshot);
                state.applied_token = token;
                state.last_error = None;
                state.refreshed_at = Some(now);
                info!(token, items = count, "Catalog snapshot replaced");
                RefreshOutcome::Applied { items: count }
            }
            Err(e) => {
                warn!(token, error = %e, "Catalog refresh failed, keeping previous snapshot");
                state.last_error = Some(e.to_string());
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// The snapshot currently served.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.inner.state.read().snapshot)
    }

    /// Cached item by id. Never touches the network.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<CatalogItem> {
        self.snapshot().find_by_id(id).cloned()
    }

    /// See [`CatalogSnapshot::filter_by_category`].
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<CatalogItem> {
        self.snapshot()
            .filter_by_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`CatalogSnapshot::filter_by_keyword`].
    #[must_use]
    pub fn filter_by_keyword(&self, text: &str) -> Vec<CatalogItem> {
        self.snapshot()
            .filter_by_keyword(text)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn status(&self) -> CatalogStatus {
        let state = self.inner.state.read();
        CatalogStatus {
            epoch: state.snapshot.epoch(),
            item_count: state.snapshot.len(),
            last_error: state.last_error.clone(),
            refreshed_at: state.refreshed_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedSource, item, unreachable_error};

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let source = ScriptedSource::ready(vec![
            Ok(vec![item(1, "Mug", 100)]),
            Ok(vec![item(2, "Plate", 250), item(3, "Bowl", 180)]),
        ]);
        let cache = CatalogCache::new(source);
        assert!(cache.snapshot().is_empty());

        assert!(cache.refresh().await.is_applied());
        assert!(cache.find_by_id(ProductId::new(1)).is_some());

        assert!(matches!(
            cache.refresh().await,
            RefreshOutcome::Applied { items: 2 }
        ));
        assert!(cache.find_by_id(ProductId::new(1)).is_none());
        assert_eq!(cache.status().epoch, 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_snapshot_and_raises_flag() {
        let source = ScriptedSource::ready(vec![
            Ok(vec![item(1, "Mug", 100)]),
            Err(unreachable_error()),
            Ok(vec![item(1, "Mug", 120)]),
        ]);
        let cache = CatalogCache::new(source);
        cache.refresh().await;
        let before = cache.snapshot();

        assert!(matches!(cache.refresh().await, RefreshOutcome::Failed(_)));
        let status = cache.status();
        assert!(status.has_error());
        assert_eq!(status.item_count, 1);
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));

        // next applied refresh clears the flag
        assert!(cache.refresh().await.is_applied());
        assert!(!cache.status().has_error());
    }

    #[tokio::test]
    async fn test_readers_keep_their_snapshot_across_refresh() {
        let source = ScriptedSource::ready(vec![
            Ok(vec![item(1, "Mug", 100)]),
            Ok(vec![item(2, "Plate", 250)]),
        ]);
        let cache = CatalogCache::new(source);
        cache.refresh().await;
        let held = cache.snapshot();

        cache.refresh().await;
        assert!(held.contains(ProductId::new(1)));
        assert!(!held.contains(ProductId::new(2)));
        assert!(cache.snapshot().contains(ProductId::new(2)));
    }

    #[tokio::test]
    async fn test_older_response_arriving_late_is_discarded() {
        let (source, mut script) = ScriptedSource::new(2);
        let cache = CatalogCache::new(source);

        // A is issued first
        let cache_a = cache.clone();
        let task_a = tokio::spawn(async move { cache_a.refresh().await });
        assert_eq!(script.started.recv().await, Some(0));

        // B is issued second
        let cache_b = cache.clone();
        let task_b = tokio::spawn(async move { cache_b.refresh().await });
        assert_eq!(script.started.recv().await, Some(1));

        let mut senders = script.senders.into_iter();
        let tx_a = senders.next().unwrap();
        let tx_b = senders.next().unwrap();

        // B's response lands first
        tx_b.send(Ok(vec![item(2, "From B", 200)])).unwrap();
        assert!(task_b.await.unwrap().is_applied());

        // A's response lands afterwards and must not overwrite B
        tx_a.send(Ok(vec![item(1, "From A", 100)])).unwrap();
        assert!(matches!(task_a.await.unwrap(), RefreshOutcome::Superseded));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains(ProductId::new(2)));
        assert_eq!(snapshot.epoch(), 2);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_raise_flag() {
        let (source, mut script) = ScriptedSource::new(2);
        let cache = CatalogCache::new(source);

        let cache_a = cache.clone();
        let task_a = tokio::spawn(async move { cache_a.refresh().await });
        script.started.recv().await;
        let cache_b = cache.clone();
        let task_b = tokio::spawn(async move { cache_b.refresh().await });
        script.started.recv().await;

        let mut senders = script.senders.into_iter();
        let tx_a = senders.next().unwrap();
        let tx_b = senders.next().unwrap();

        tx_b.send(Ok(vec![item(1, "Mug", 100)])).unwrap();
        task_b.await.unwrap();
        tx_a.send(Err(unreachable_error())).unwrap();
        assert!(matches!(task_a.await.unwrap(), RefreshOutcome::Superseded));

        assert!(!cache.status().has_error());
        assert_eq!(cache.status().item_count, 1);
    }

    #[tokio::test]
    async fn test_filters_read_current_snapshot() {
        let mut mug = item(1, "Enamel Mug", 100);
        mug.category = Some("Kitchen".to_string());
        let source = ScriptedSource::ready(vec![Ok(vec![mug, item(2, "Lamp", 900)])]);
        let cache = CatalogCache::new(source);
        cache.refresh().await;

        assert_eq!(cache.filter_by_category("Kitchen").len(), 1);
        assert_eq!(cache.filter_by_keyword("mug").len(), 1);
        assert_eq!(cache.filter_by_keyword("").len(), 2);
    }
}
