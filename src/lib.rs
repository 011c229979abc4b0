//! Background file downloads for a WebView app shell: fetch a URL, resolve
//! its final name and MIME type, stream it into public or private storage,
//! and report the outcome. The shell itself (UI, permissions, lifecycle)
//! stays behind the collaborator traits.

pub mod core;
pub mod fs_paths;
pub mod models;
pub mod storage;

pub use crate::core::error::DownloadError;
pub use crate::core::events::{DownloadHandle, DownloadOutcome, DownloadProgress};
pub use crate::core::hooks::{CompletedDownload, DownloadHooks, NoopHooks};
pub use crate::core::manager::DownloadManager;
pub use crate::fs_paths::{AppPaths, DesktopPaths};
pub use crate::models::request::{DownloadDestination, DownloadRequest};
pub use crate::models::settings::DownloadSettings;
pub use crate::storage::share::{AuthorityUriResolver, FileUriResolver, ShareResolver};
