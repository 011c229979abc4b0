use serde::Deserialize;

/// Logical write target for a finished download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadDestination {
    /// Shared storage: the user's downloads collection, or the pictures
    /// collection for gallery saves.
    PublicStorage,
    /// App-private files area, reachable only through a sharable URI.
    PrivateAppStorage,
}

/// One download order, as handed over by the shell bridge. Immutable once
/// built.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub save_to_gallery: bool,
    #[serde(default)]
    pub open_on_finish: bool,
    #[serde(default = "default_destination")]
    pub destination: DownloadDestination,
}

fn default_destination() -> DownloadDestination {
    DownloadDestination::PublicStorage
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: None,
            mimetype: None,
            save_to_gallery: false,
            open_on_finish: false,
            destination: DownloadDestination::PublicStorage,
        }
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn save_to_gallery(mut self, save: bool) -> Self {
        self.save_to_gallery = save;
        self
    }

    pub fn open_on_finish(mut self, open: bool) -> Self {
        self.open_on_finish = open;
        self
    }

    pub fn destination(mut self, destination: DownloadDestination) -> Self {
        self.destination = destination;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let request = DownloadRequest::new("https://example.com/file.zip");
        assert_eq!(request.url, "https://example.com/file.zip");
        assert!(request.filename.is_none());
        assert!(request.mimetype.is_none());
        assert!(!request.save_to_gallery);
        assert!(!request.open_on_finish);
        assert_eq!(request.destination, DownloadDestination::PublicStorage);
    }

    #[test]
    fn deserializes_bridge_message() {
        let request: DownloadRequest = serde_json::from_str(
            r#"{
                "url": "https://example.com/report.pdf",
                "filename": "report.pdf",
                "save_to_gallery": false,
                "open_on_finish": true,
                "destination": "private_app_storage"
            }"#,
        )
        .unwrap();
        assert_eq!(request.filename.as_deref(), Some("report.pdf"));
        assert!(request.open_on_finish);
        assert_eq!(request.destination, DownloadDestination::PrivateAppStorage);
    }

    #[test]
    fn deserializes_minimal_message() {
        let request: DownloadRequest =
            serde_json::from_str(r#"{"url": "https://example.com/a"}"#).unwrap();
        assert!(request.mimetype.is_none());
        assert_eq!(request.destination, DownloadDestination::PublicStorage);
    }
}
