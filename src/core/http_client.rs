use crate::models::settings::DownloadSettings;

/// Builds the shared client every task requests through: shell User-Agent,
/// bounded connect timeout, redirects followed.
pub fn build_client(settings: &DownloadSettings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .connect_timeout(settings.connect_timeout())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}
