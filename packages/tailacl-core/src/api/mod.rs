//! Control-plane API module.
//!
//! Provides the HTTP client for the tailnet ACL and IP range endpoints.

mod client;
pub mod config;

pub use client::{Resource, TailnetClient};
pub use config::{ApiEndpointConfig, ConfigSource, load_api_config};
