use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Sent with every request; the shell usually injects its WebView UA.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// A transfer that delivers no chunk for this long is failed as stalled.
    #[serde(default = "default_chunk_timeout_secs")]
    pub chunk_timeout_secs: u64,
}

fn default_user_agent() -> String {
    format!("webshell-downloads/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_chunk_timeout_secs() -> u64 {
    45
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            chunk_timeout_secs: default_chunk_timeout_secs(),
        }
    }
}

impl DownloadSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_secs(self.chunk_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = DownloadSettings::default();
        assert_eq!(settings.connect_timeout(), Duration::from_secs(5));
        assert_eq!(settings.chunk_timeout(), Duration::from_secs(45));
        assert!(settings.user_agent.starts_with("webshell-downloads/"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let settings: DownloadSettings =
            serde_json::from_str(r#"{"user_agent": "Mozilla/5.0 TestShell"}"#).unwrap();
        assert_eq!(settings.user_agent, "Mozilla/5.0 TestShell");
        assert_eq!(settings.connect_timeout_secs, 5);
        assert_eq!(settings.chunk_timeout_secs, 45);
    }
}
