use thiserror::Error;

/// Terminal failure of a single download task. Never retried; surfaced to
/// the caller as `DownloadOutcome::Failed` with the display string.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("response code: {code}. {message}")]
    HttpStatus { code: u16, message: String },

    #[error("failed to create download file. filename = {filename}, mimetype = {mimetype}")]
    StorageAllocation { filename: String, mimetype: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer stalled: no data received for {seconds} seconds")]
    Stalled { seconds: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_carries_code() {
        let err = DownloadError::HttpStatus {
            code: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "response code: 404. Not Found");
    }

    #[test]
    fn allocation_message_names_file_and_mime() {
        let err = DownloadError::StorageAllocation {
            filename: "report".to_string(),
            mimetype: "application/pdf".to_string(),
        };
        assert!(err.to_string().contains("filename = report"));
        assert!(err.to_string().contains("mimetype = application/pdf"));
    }
}
