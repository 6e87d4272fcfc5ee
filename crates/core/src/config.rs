use std::time::Duration;

pub const API_URL_ENV: &str = "STUDYMATE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiConfig {
    /// A blank `base_url` falls back to [`DEFAULT_API_URL`]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = match base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_API_URL,
            trimmed => trimmed,
        };
        Self {
            base_url: base_url.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
