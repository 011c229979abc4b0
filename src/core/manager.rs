use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_util::sync::CancellationToken;

use crate::core::error::DownloadError;
use crate::core::events::{DownloadHandle, DownloadProgress};
use crate::core::hooks::{DownloadHooks, NoopHooks};
use crate::core::http_client;
use crate::core::worker::{self, TaskContext};
use crate::fs_paths::{AppPaths, DesktopPaths};
use crate::models::request::DownloadRequest;
use crate::models::settings::DownloadSettings;
use crate::storage::share::{FileUriResolver, ShareResolver};

struct ActiveTask {
    url: String,
    cancel: CancellationToken,
}

/// Owns the in-flight download set. One spawned task per request, no pool,
/// no queueing; each task is independent and cancellable by id.
pub struct DownloadManager {
    client: reqwest::Client,
    settings: DownloadSettings,
    paths: Arc<dyn AppPaths>,
    share: Arc<dyn ShareResolver>,
    hooks: Arc<dyn DownloadHooks>,
    active: Arc<Mutex<HashMap<u64, ActiveTask>>>,
    next_id: AtomicU64,
}

impl DownloadManager {
    pub fn new(settings: DownloadSettings) -> Result<Self, DownloadError> {
        Self::with_collaborators(
            settings,
            Arc::new(DesktopPaths),
            Arc::new(FileUriResolver),
            Arc::new(NoopHooks),
        )
    }

    pub fn with_collaborators(
        settings: DownloadSettings,
        paths: Arc<dyn AppPaths>,
        share: Arc<dyn ShareResolver>,
        hooks: Arc<dyn DownloadHooks>,
    ) -> Result<Self, DownloadError> {
        let client = http_client::build_client(&settings)?;
        Ok(Self {
            client,
            settings,
            paths,
            share,
            hooks,
            active: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        })
    }

    /// Registers the task under a fresh id and launches it. Returns as soon
    /// as the task is spawned; the handle resolves to the outcome.
    pub async fn start(&self, request: DownloadRequest) -> DownloadHandle {
        self.spawn_task(request, None).await
    }

    /// Same as `start`, forwarding per-chunk progress over the given sender.
    pub async fn start_with_progress(
        &self,
        request: DownloadRequest,
        progress: mpsc::Sender<DownloadProgress>,
    ) -> DownloadHandle {
        self.spawn_task(request, Some(progress)).await
    }

    async fn spawn_task(
        &self,
        request: DownloadRequest,
        progress: Option<mpsc::Sender<DownloadProgress>>,
    ) -> DownloadHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        {
            let mut active = self.active.lock().await;
            active.insert(
                id,
                ActiveTask {
                    url: request.url.clone(),
                    cancel: cancel.clone(),
                },
            );
        }

        let ctx = TaskContext {
            id,
            request,
            cancel,
            client: self.client.clone(),
            settings: self.settings.clone(),
            paths: Arc::clone(&self.paths),
            share: Arc::clone(&self.share),
            hooks: Arc::clone(&self.hooks),
            progress,
        };
        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            let outcome = worker::run(ctx).await;
            active.lock().await.remove(&id);
            // The caller may have dropped the handle; the outcome is then
            // simply discarded.
            let _ = outcome_tx.send(outcome);
        });

        DownloadHandle::new(id, outcome_rx)
    }

    /// Cooperative cancel: flips the task's token if it is still active.
    /// The worker stops at the next chunk boundary and removes its partial
    /// output. Returns false for unknown or already-terminated ids.
    pub async fn cancel(&self, id: u64) -> bool {
        let active = self.active.lock().await;
        match active.get(&id) {
            Some(task) => {
                tracing::debug!("[download] cancelling task {} ({})", id, task.url);
                task.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn is_active(&self, id: u64) -> bool {
        self.active.lock().await.contains_key(&id)
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_of_unknown_id_is_a_noop() {
        let manager = DownloadManager::new(DownloadSettings::default()).unwrap();
        assert!(!manager.cancel(42).await);
        assert!(!manager.is_active(42).await);
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test]
    async fn ids_are_unique_and_monotonic() {
        let manager = DownloadManager::new(DownloadSettings::default()).unwrap();
        let first = manager
            .start(DownloadRequest::new("http://127.0.0.1:1/a"))
            .await;
        let second = manager
            .start(DownloadRequest::new("http://127.0.0.1:1/b"))
            .await;
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
        // Both settle independently (connection refused, but terminal).
        first.wait().await;
        second.wait().await;
        assert_eq!(manager.active_count().await, 0);
    }
}
