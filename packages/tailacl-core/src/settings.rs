use crate::error::{Result, SyncError};
use std::fmt;

/// Environment variable naming the default tailnet
pub const ENV_TAILNET: &str = "TAILSCALE_TAILNET";
/// Environment variable holding the default API key
pub const ENV_API_KEY: &str = "TAILSCALE_API_KEY";

/// Tailscale API key. Sent as the basic-auth username; never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Target tailnet and credential for one invocation
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub tailnet: String,
    pub api_key: ApiKey,
}

impl SyncSettings {
    /// Build settings from already-merged flag/environment values.
    /// Absent or blank values are rejected, tailnet first.
    pub fn resolve(tailnet: Option<String>, api_key: Option<String>) -> Result<Self> {
        let tailnet = non_blank(tailnet).ok_or(SyncError::MissingTailnet)?;
        let api_key = non_blank(api_key).ok_or(SyncError::MissingApiKey)?;
        Ok(SyncSettings {
            tailnet,
            api_key: ApiKey::new(api_key),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
