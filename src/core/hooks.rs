use async_trait::async_trait;

/// Everything the shell needs to act on a finished download: share it,
/// open it, index it into the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedDownload {
    pub final_uri: String,
    pub mimetype: String,
    pub saved_to_gallery: bool,
    pub open_on_finish: bool,
    pub final_filename: String,
}

/// Post-processing seam invoked once per successful download, before the
/// outcome is delivered. Errors are logged and never fail the task.
#[async_trait]
pub trait DownloadHooks: Send + Sync {
    async fn handle_download(&self, download: &CompletedDownload) -> anyhow::Result<()>;
}

pub struct NoopHooks;

#[async_trait]
impl DownloadHooks for NoopHooks {
    async fn handle_download(&self, _download: &CompletedDownload) -> anyhow::Result<()> {
        Ok(())
    }
}
