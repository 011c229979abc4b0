use std::path::PathBuf;

/// Storage layout the shell runs against. Mirrors the platform storage
/// collaborators: shared collections plus the app-private files area.
pub trait AppPaths: Send + Sync {
    fn public_downloads_dir(&self) -> PathBuf;
    fn public_pictures_dir(&self) -> PathBuf;
    fn private_files_dir(&self) -> PathBuf;
}

pub struct DesktopPaths;

impl AppPaths for DesktopPaths {
    fn public_downloads_dir(&self) -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    fn public_pictures_dir(&self) -> PathBuf {
        dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    fn private_files_dir(&self) -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("webshell").join("files"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
