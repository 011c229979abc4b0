use serde::Serialize;
use tokio::sync::oneshot;

/// Terminal state of one download task. Delivered exactly once per task.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum DownloadOutcome {
    Success {
        final_uri: String,
        mimetype: String,
        saved_to_gallery: bool,
        open_on_finish: bool,
        final_filename: String,
        bytes_written: u64,
    },
    Failed {
        reason: String,
    },
    Cancelled,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DownloadProgress {
    pub id: u64,
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
}

/// Returned by `DownloadManager::start`; resolves to the task's outcome.
#[derive(Debug)]
pub struct DownloadHandle {
    pub id: u64,
    outcome: oneshot::Receiver<DownloadOutcome>,
}

impl DownloadHandle {
    pub(crate) fn new(id: u64, outcome: oneshot::Receiver<DownloadOutcome>) -> Self {
        Self { id, outcome }
    }

    /// Waits for the task to terminate. A dropped worker (runtime shutdown)
    /// reports as a failure rather than hanging forever.
    pub async fn wait(self) -> DownloadOutcome {
        self.outcome.await.unwrap_or(DownloadOutcome::Failed {
            reason: "download task dropped before reporting an outcome".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_string(&DownloadOutcome::Cancelled).unwrap();
        assert_eq!(json, r#"{"type":"Cancelled"}"#);
    }

    #[tokio::test]
    async fn dropped_sender_reports_failure() {
        let (tx, rx) = oneshot::channel();
        drop(tx);
        let handle = DownloadHandle::new(7, rx);
        match handle.wait().await {
            DownloadOutcome::Failed { reason } => assert!(reason.contains("dropped")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
