use std::path::Path;

/// Maps a file in app-private storage to a reference other components can
/// dereference. Public-collection files already carry their own URI.
pub trait ShareResolver: Send + Sync {
    fn sharable_uri(&self, path: &Path) -> Option<String>;
}

/// Plain `file://` URIs; enough for shells whose private area is readable
/// by the consumer of the URI.
pub struct FileUriResolver;

impl ShareResolver for FileUriResolver {
    fn sharable_uri(&self, path: &Path) -> Option<String> {
        url::Url::from_file_path(path).ok().map(|u| u.to_string())
    }
}

/// App-scoped references in the `content://<authority><path>` form used by
/// shells that expose private files through a provider identity.
pub struct AuthorityUriResolver {
    pub authority: String,
}

impl ShareResolver for AuthorityUriResolver {
    fn sharable_uri(&self, path: &Path) -> Option<String> {
        let path = path.to_str()?;
        Some(format!("content://{}{}", self.authority, path))
    }
}
