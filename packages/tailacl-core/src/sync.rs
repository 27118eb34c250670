//! Export and import flows.

use crate::api::TailnetClient;
use crate::document::{ExportDocument, ImportDocument};
use crate::error::Result;
use std::path::Path;

/// What an import pushed to the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub pushed_ranges: bool,
}

/// Fetch the ACL policy and IP ranges and write them to `path`.
///
/// The policy is fetched before the ranges. An existing file at `path` is
/// overwritten; nothing is written if either fetch fails.
pub async fn export(client: &TailnetClient, path: &Path) -> Result<ExportDocument> {
    let acl = client.fetch_policy().await?;
    let ip_ranges = client.fetch_ranges().await?;

    let doc = ExportDocument { acl, ip_ranges };
    doc.write_to(path)?;

    tracing::info!("Exported tailnet '{}' policy to {:?}", client.tailnet(), path);
    Ok(doc)
}

/// Read `path` and push its contents to the control plane.
///
/// A missing `acl` key pushes an empty policy. A missing `ip_ranges` key
/// leaves the remote ranges untouched. If the ranges push fails after the
/// policy push succeeded, the policy is not rolled back.
pub async fn import(client: &TailnetClient, path: &Path) -> Result<ImportSummary> {
    let doc = ImportDocument::read_from(path)?;

    client.push_policy(&doc.acl).await?;

    let pushed_ranges = match &doc.ip_ranges {
        Some(ranges) => {
            client.push_ranges(ranges).await?;
            true
        }
        None => {
            tracing::debug!("No ip_ranges in {:?}, leaving remote ranges unchanged", path);
            false
        }
    };

    tracing::info!(
        "Imported policy from {:?} into tailnet '{}'{}",
        path,
        client.tailnet(),
        if pushed_ranges { " (with IP ranges)" } else { "" }
    );
    Ok(ImportSummary { pushed_ranges })
}
