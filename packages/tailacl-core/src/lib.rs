//! tailacl Core Library
//!
//! This crate provides the pieces behind the `tailacl` command:
//! - Tailnet ACL and IP range client for the Tailscale control-plane API
//! - The combined export document and import file parsing
//! - Endpoint configuration (environment variable, config file, default)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tailacl_core::{api, sync, SyncSettings};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), tailacl_core::SyncError> {
//!     let settings = SyncSettings::resolve(
//!         std::env::var("TAILSCALE_TAILNET").ok(),
//!         std::env::var("TAILSCALE_API_KEY").ok(),
//!     )?;
//!     let client = api::TailnetClient::new(&api::load_api_config(), settings);
//!
//!     sync::export(&client, Path::new("acl.json")).await?;
//!     sync::import(&client, Path::new("acl.json")).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod document;
pub mod error;
pub mod settings;
pub mod sync;

// Re-export commonly used types
pub use api::{ApiEndpointConfig, ConfigSource, TailnetClient};
pub use document::{ExportDocument, ImportDocument, IpRangeSet, PolicyDocument};
pub use error::SyncError;
pub use settings::{ApiKey, SyncSettings};
pub use sync::ImportSummary;
