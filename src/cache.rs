use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{backend::BackendState, entitlements::Entitlements, error::BackendError};

#[derive(Debug, Clone)]
struct Cached {
    entitlements: Entitlements,
    refreshed_at: DateTime<Utc>,
}

/// EntitlementsCache
///
/// Process-wide copy of the deployment's entitlements. One background task
/// writes it; requests read it to seed their own store.
#[derive(Clone, Default)]
pub struct EntitlementsCache {
    inner: Arc<RwLock<Option<Cached>>>,
}

impl EntitlementsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Entitlements> {
        self.inner.read().await.as_ref().map(|c| c.entitlements.clone())
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.as_ref().map(|c| c.refreshed_at)
    }

    /// Fetches fresh entitlements. On failure the previous copy is kept.
    pub async fn refresh(&self, backend: &BackendState) -> Result<Entitlements, BackendError> {
        let entitlements = backend.entitlements().await?;
        *self.inner.write().await = Some(Cached {
            entitlements: entitlements.clone(),
            refreshed_at: Utc::now(),
        });
        tracing::debug!(
            features = entitlements.features.len(),
            has_license = entitlements.has_license,
            "entitlements refreshed"
        );
        Ok(entitlements)
    }

    /// The cached copy, or a fetch when nothing was cached yet.
    pub async fn current(&self, backend: &BackendState) -> Option<Entitlements> {
        if let Some(entitlements) = self.get().await {
            return Some(entitlements);
        }
        match self.refresh(backend).await {
            Ok(entitlements) => Some(entitlements),
            Err(e) => {
                tracing::warn!(error = %e, "entitlements unavailable");
                None
            }
        }
    }

    /// spawn_refresher
    ///
    /// Refreshes the cache every `every` until the runtime shuts down.
    pub fn spawn_refresher(&self, backend: BackendState, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if let Err(e) = cache.refresh(&backend).await {
                    tracing::warn!(error = %e, "entitlements refresh failed, keeping previous copy");
                }
            }
        })
    }
}
