use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default control-plane host
const DEFAULT_BASE_URL: &str = "https://api.tailscale.com";

/// Path prefix under which tailnet resources live
const TAILNET_API_PATH: &str = "/api/v2/tailnet";

/// Environment variable name for base URL override
pub const ENV_BASE_URL: &str = "TAILSCALE_BASE_URL";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiConfig {
    /// Control-plane host (e.g., "https://api.tailscale.com")
    base_url: Option<String>,
}

/// Runtime API endpoint configuration
#[derive(Debug, Clone)]
pub struct ApiEndpointConfig {
    /// Control-plane host without trailing slash
    pub base_url: String,
    /// Source of the configuration (for logging)
    pub source: ConfigSource,
}

impl ApiEndpointConfig {
    /// Endpoint pointing at an explicit host, bypassing env and config file
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_url(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            source: ConfigSource::Default,
        }
    }

    /// Root of the tailnet API, e.g. `https://api.tailscale.com/api/v2/tailnet`
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url, TAILNET_API_PATH)
    }
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            source: ConfigSource::Default,
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("tailacl").join("config.toml"))
}

/// Load configuration from the config file
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Pick the endpoint from the environment value, then the config file, then the default
fn resolve_endpoint(env_url: Option<String>, config: Option<ConfigFile>) -> ApiEndpointConfig {
    if let Some(url) = env_url.as_deref().and_then(normalize_url) {
        tracing::debug!("Using API base URL from environment variable: {}", url);
        return ApiEndpointConfig {
            base_url: url,
            source: ConfigSource::Environment,
        };
    }

    let file_url = config
        .and_then(|c| c.api)
        .and_then(|a| a.base_url)
        .as_deref()
        .and_then(normalize_url);
    if let Some(url) = file_url {
        tracing::debug!("Using API base URL from config file: {}", url);
        return ApiEndpointConfig {
            base_url: url,
            source: ConfigSource::ConfigFile,
        };
    }

    tracing::debug!("Using default API base URL: {}", DEFAULT_BASE_URL);
    ApiEndpointConfig::default()
}

/// Load API endpoint configuration with priority:
/// 1. Environment variable (TAILSCALE_BASE_URL)
/// 2. Config file (~/.config/tailacl/config.toml)
/// 3. Default value
pub fn load_api_config() -> ApiEndpointConfig {
    resolve_endpoint(std::env::var(ENV_BASE_URL).ok(), load_config_file())
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/tailacl/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# tailacl configuration
# Place this file at: ~/.config/tailacl/config.toml
# The API key is never read from this file; use --api-key or TAILSCALE_API_KEY.

[api]
# Control-plane host, e.g. for a self-hosted coordination server
# Default: https://api.tailscale.com
# base_url = "https://headscale.example.com"
"#
    .to_string()
}
