use std::io;
use std::path::{Path, PathBuf};

use crate::core::{filename, mime};
use crate::fs_paths::AppPaths;
use crate::models::request::DownloadDestination;

const MAX_COLLISION_SUFFIX: u32 = 1000;

/// An output file reserved on disk. The handle is already open for writing;
/// `filename` is the collision-resolved on-disk name.
#[derive(Debug)]
pub struct AllocatedFile {
    pub file: tokio::fs::File,
    pub path: PathBuf,
    pub filename: String,
}

#[derive(Debug)]
pub struct ResolvedDestination {
    pub file: AllocatedFile,
    /// URI of a public allocation; private files resolve theirs through the
    /// share resolver after the write completes.
    pub uri: Option<String>,
    pub saved_to_gallery: bool,
    pub open_on_finish: bool,
}

/// Applies the destination policy and reserves the output file.
///
/// Public storage writes into the downloads collection, or the pictures
/// collection for image gallery saves; a gallery request for a non-image is
/// silently demoted to a plain downloads save. Private storage always forces
/// `open_on_finish`, since those files are unreachable without an explicit
/// open or share.
pub async fn resolve(
    paths: &dyn AppPaths,
    destination: DownloadDestination,
    save_to_gallery: bool,
    open_on_finish: bool,
    stem: &str,
    extension: &str,
    mimetype: Option<&str>,
) -> io::Result<ResolvedDestination> {
    match destination {
        DownloadDestination::PrivateAppStorage => {
            let file = allocate_in_dir(&paths.private_files_dir(), stem, extension).await?;
            Ok(ResolvedDestination {
                file,
                uri: None,
                saved_to_gallery: save_to_gallery,
                open_on_finish: true,
            })
        }
        DownloadDestination::PublicStorage => {
            let is_image = mimetype.map(mime::is_image).unwrap_or(false);
            let (dir, saved_to_gallery) = if save_to_gallery && is_image {
                (paths.public_pictures_dir(), true)
            } else {
                (paths.public_downloads_dir(), false)
            };
            let file = allocate_in_dir(&dir, stem, extension).await?;
            let uri = url::Url::from_file_path(&file.path)
                .ok()
                .map(|u| u.to_string());
            Ok(ResolvedDestination {
                file,
                uri,
                saved_to_gallery,
                open_on_finish,
            })
        }
    }
}

/// Reserves a uniquely named file under `dir`, numbering around collisions:
/// `name.ext`, `name (1).ext`, `name (2).ext`, ...
pub async fn allocate_in_dir(
    dir: &Path,
    stem: &str,
    extension: &str,
) -> io::Result<AllocatedFile> {
    tokio::fs::create_dir_all(dir).await?;

    let stem = filename::sanitize_path_component(stem);
    let stem = if stem.is_empty() {
        "download".to_string()
    } else {
        stem
    };
    let extension = filename::sanitize_path_component(extension);

    for n in 0..MAX_COLLISION_SUFFIX {
        let candidate = if n == 0 {
            stem.clone()
        } else {
            format!("{stem} ({n})")
        };
        let name = compose_filename(&candidate, &extension);
        let path = dir.join(&name);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                return Ok(AllocatedFile {
                    file,
                    path,
                    filename: name,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for '{stem}' after {MAX_COLLISION_SUFFIX} attempts"),
    ))
}

pub fn compose_filename(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_with_and_without_extension() {
        assert_eq!(compose_filename("report", "pdf"), "report.pdf");
        assert_eq!(compose_filename("README", ""), "README");
    }

    #[tokio::test]
    async fn allocation_numbers_around_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let first = allocate_in_dir(dir.path(), "report", "pdf").await.unwrap();
        let second = allocate_in_dir(dir.path(), "report", "pdf").await.unwrap();
        let third = allocate_in_dir(dir.path(), "report", "pdf").await.unwrap();
        assert_eq!(first.filename, "report.pdf");
        assert_eq!(second.filename, "report (1).pdf");
        assert_eq!(third.filename, "report (2).pdf");
        assert!(first.path.exists());
        assert!(third.path.exists());
    }

    #[tokio::test]
    async fn allocation_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let allocated = allocate_in_dir(&nested, "file", "txt").await.unwrap();
        assert!(allocated.path.starts_with(&nested));
    }

    #[tokio::test]
    async fn allocation_sanitizes_hostile_stems() {
        let dir = tempfile::tempdir().unwrap();
        let allocated = allocate_in_dir(dir.path(), "../escape", "txt").await.unwrap();
        assert!(allocated.path.starts_with(dir.path()));
        assert!(!allocated.filename.contains('/'));
    }

    #[tokio::test]
    async fn empty_stem_falls_back_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let allocated = allocate_in_dir(dir.path(), "", "bin").await.unwrap();
        assert_eq!(allocated.filename, "download.bin");
    }
}
