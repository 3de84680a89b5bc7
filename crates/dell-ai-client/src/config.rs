use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://dell.huggingface.co/api";
pub const DEFAULT_IDENTITY_URL: &str = "https://huggingface.co/api/whoami-v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the client talks to and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Hub REST root, without trailing slash.
    pub base_url: String,

    /// Identity provider endpoint returning the caller's profile.
    pub identity_url: String,

    /// Applies to the whole request; there is no retry.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `DELL_AI_API_URL`, `DELL_AI_IDENTITY_URL` and
    /// `DELL_AI_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("DELL_AI_API_URL") {
            cfg.base_url = url;
        }
        if let Ok(url) = std::env::var("DELL_AI_IDENTITY_URL") {
            cfg.identity_url = url;
        }
        if let Some(secs) = std::env::var("DELL_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.timeout = Duration::from_secs(secs);
        }
        cfg
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
