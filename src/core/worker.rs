use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::error::DownloadError;
use crate::core::events::{DownloadOutcome, DownloadProgress};
use crate::core::filename::{self, ResolvedName};
use crate::core::hooks::{CompletedDownload, DownloadHooks};
use crate::fs_paths::AppPaths;
use crate::models::request::DownloadRequest;
use crate::models::settings::DownloadSettings;
use crate::storage::destination::{self, AllocatedFile, ResolvedDestination};
use crate::storage::share::ShareResolver;

const WRITE_BUFFER_SIZE: usize = 4096;

const FALLBACK_MIMETYPE: &str = "application/octet-stream";

/// Everything one spawned task needs; handed over by the manager.
pub(crate) struct TaskContext {
    pub id: u64,
    pub request: DownloadRequest,
    pub cancel: CancellationToken,
    pub client: reqwest::Client,
    pub settings: DownloadSettings,
    pub paths: Arc<dyn AppPaths>,
    pub share: Arc<dyn ShareResolver>,
    pub hooks: Arc<dyn DownloadHooks>,
    pub progress: Option<mpsc::Sender<DownloadProgress>>,
}

enum StreamEnd {
    Finished(u64),
    Cancelled,
}

/// Runs one download to its terminal state. Never panics the host; every
/// error path folds into the returned outcome.
pub(crate) async fn run(ctx: TaskContext) -> DownloadOutcome {
    tracing::debug!("[download] task {} starting: {}", ctx.id, ctx.request.url);
    match run_inner(&ctx).await {
        Ok(Some((done, bytes_written))) => {
            if let Err(err) = ctx.hooks.handle_download(&done).await {
                tracing::warn!(
                    "[download] post-processing failed for '{}': {}",
                    done.final_filename,
                    err
                );
            }
            tracing::debug!(
                "[download] task {} finished: {} ({} bytes)",
                ctx.id,
                done.final_filename,
                bytes_written
            );
            DownloadOutcome::Success {
                final_uri: done.final_uri,
                mimetype: done.mimetype,
                saved_to_gallery: done.saved_to_gallery,
                open_on_finish: done.open_on_finish,
                final_filename: done.final_filename,
                bytes_written,
            }
        }
        Ok(None) => {
            tracing::debug!("[download] task {} cancelled", ctx.id);
            DownloadOutcome::Cancelled
        }
        Err(err) => {
            tracing::error!("[download] task {} failed: {}", ctx.id, err);
            DownloadOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// `Ok(None)` means the task observed cancellation and cleaned up.
async fn run_inner(
    ctx: &TaskContext,
) -> Result<Option<(CompletedDownload, u64)>, DownloadError> {
    let request = &ctx.request;

    if ctx.cancel.is_cancelled() {
        return Ok(None);
    }

    let response = ctx.client.get(&request.url).send().await?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(DownloadError::HttpStatus {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown status").to_string(),
        });
    }

    // Response Content-Type wins over whatever the request claimed.
    let mimetype = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.mimetype.clone());

    let explicit = request.filename.as_deref().filter(|name| !name.is_empty());
    let resolved = match explicit {
        Some(name) => filename::resolve_explicit(name, mimetype.as_deref()),
        None => {
            let content_disposition = response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok());
            filename::resolve_guessed(&request.url, content_disposition, mimetype.as_deref())
        }
    };
    tracing::debug!(
        "[download] task {} resolved name: '{}' ext '{}' mime {:?}",
        ctx.id,
        resolved.stem,
        resolved.extension,
        resolved.mimetype
    );

    let dest = destination::resolve(
        ctx.paths.as_ref(),
        request.destination,
        request.save_to_gallery,
        request.open_on_finish,
        &resolved.stem,
        &resolved.extension,
        resolved.mimetype.as_deref(),
    )
    .await
    .map_err(|err| {
        tracing::error!("[download] task {} allocation failed: {}", ctx.id, err);
        allocation_error(&resolved)
    })?;

    let ResolvedDestination {
        file: AllocatedFile {
            file,
            path,
            filename: final_filename,
        },
        uri,
        saved_to_gallery,
        open_on_finish,
    } = dest;

    match copy_response_body(ctx, response, file).await {
        Ok(StreamEnd::Finished(bytes_written)) => {
            let final_uri = match uri {
                Some(uri) => uri,
                None => sharable_uri_or_path(ctx.share.as_ref(), &path),
            };
            let mimetype = resolved
                .mimetype
                .unwrap_or_else(|| FALLBACK_MIMETYPE.to_string());
            Ok(Some((
                CompletedDownload {
                    final_uri,
                    mimetype,
                    saved_to_gallery,
                    open_on_finish,
                    final_filename,
                },
                bytes_written,
            )))
        }
        Ok(StreamEnd::Cancelled) => {
            discard_partial(&path).await;
            Ok(None)
        }
        Err(err) => {
            discard_partial(&path).await;
            Err(err)
        }
    }
}

/// Streams the body into the reserved file, observing the cancellation
/// token between chunks. A transfer that stays silent past the chunk
/// timeout is failed rather than left hanging.
async fn copy_response_body(
    ctx: &TaskContext,
    response: reqwest::Response,
    file: tokio::fs::File,
) -> Result<StreamEnd, DownloadError> {
    let total_bytes = response.content_length();
    let chunk_timeout = ctx.settings.chunk_timeout();
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Ok(StreamEnd::Cancelled),
            next = tokio::time::timeout(chunk_timeout, stream.next()) => next,
        };
        match next {
            Ok(Some(Ok(chunk))) => {
                writer.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
                if let Some(tx) = &ctx.progress {
                    let _ = tx
                        .send(DownloadProgress {
                            id: ctx.id,
                            downloaded_bytes: downloaded,
                            total_bytes,
                        })
                        .await;
                }
            }
            Ok(Some(Err(err))) => return Err(err.into()),
            Ok(None) => break,
            Err(_) => {
                return Err(DownloadError::Stalled {
                    seconds: ctx.settings.chunk_timeout_secs,
                })
            }
        }
    }

    writer.flush().await?;
    Ok(StreamEnd::Finished(downloaded))
}

fn allocation_error(resolved: &ResolvedName) -> DownloadError {
    DownloadError::StorageAllocation {
        filename: resolved.stem.clone(),
        mimetype: resolved
            .mimetype
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn sharable_uri_or_path(share: &dyn ShareResolver, path: &Path) -> String {
    match share.sharable_uri(path) {
        Some(uri) => uri,
        None => {
            tracing::warn!(
                "[download] no sharable uri for {}, falling back to raw path",
                path.display()
            );
            path.display().to_string()
        }
    }
}

async fn discard_partial(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        tracing::warn!(
            "[download] failed to remove partial file {}: {}",
            path.display(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hooks::NoopHooks;
    use crate::fs_paths::AppPaths;
    use crate::models::request::DownloadDestination;
    use crate::storage::share::FileUriResolver;
    use std::path::PathBuf;

    struct TestPaths {
        root: PathBuf,
    }

    impl AppPaths for TestPaths {
        fn public_downloads_dir(&self) -> PathBuf {
            self.root.join("downloads")
        }

        fn public_pictures_dir(&self) -> PathBuf {
            self.root.join("pictures")
        }

        fn private_files_dir(&self) -> PathBuf {
            self.root.join("private")
        }
    }

    fn context(root: &Path, request: DownloadRequest) -> TaskContext {
        let settings = DownloadSettings::default();
        let client = crate::core::http_client::build_client(&settings).unwrap();
        TaskContext {
            id: 1,
            request,
            cancel: CancellationToken::new(),
            client,
            settings,
            paths: Arc::new(TestPaths {
                root: root.to_path_buf(),
            }),
            share: Arc::new(FileUriResolver),
            hooks: Arc::new(NoopHooks),
            progress: None,
        }
    }

    #[tokio::test]
    async fn pre_cancelled_task_never_touches_the_network() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing listens on this address; a request attempt would fail, a
        // cancelled task must not even try.
        let request = DownloadRequest::new("http://127.0.0.1:1/unreachable")
            .destination(DownloadDestination::PublicStorage);
        let ctx = context(dir.path(), request);
        ctx.cancel.cancel();
        let outcome = run(ctx).await;
        assert_eq!(outcome, DownloadOutcome::Cancelled);
        assert!(!dir.path().join("downloads").exists());
    }

    #[tokio::test]
    async fn connection_failure_reports_failed() {
        let dir = tempfile::tempdir().unwrap();
        let request = DownloadRequest::new("http://127.0.0.1:1/unreachable");
        let ctx = context(dir.path(), request);
        match run(ctx).await {
            DownloadOutcome::Failed { reason } => {
                assert!(reason.contains("request failed"))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
