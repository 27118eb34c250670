//! Policy documents and the on-disk export format.
//!
//! The ACL policy and the IP range set are carried as opaque JSON values.
//! Nothing here looks inside them; they are fetched, written, read back and
//! pushed unchanged.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Key holding the ACL policy in an export file
pub const ACL_KEY: &str = "acl";
/// Key holding the IP range set in an export file
pub const IP_RANGES_KEY: &str = "ip_ranges";

/// ACL policy as returned by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyDocument(pub Value);

impl PolicyDocument {
    /// An empty policy object, pushed when an import file has no `acl` key
    pub fn empty() -> Self {
        PolicyDocument(Value::Object(Map::new()))
    }
}

/// Advertised subnet routes as returned by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpRangeSet(pub Value);

/// Combined document written by `export`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub acl: PolicyDocument,
    pub ip_ranges: IpRangeSet,
}

impl ExportDocument {
    /// Serialize with two-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Write the document to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_pretty_json()?;
        fs::write(path, json).map_err(|source| SyncError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Export document written to {:?}", path);
        Ok(())
    }
}

/// Contents of an import file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    pub acl: PolicyDocument,
    /// `None` only when the key is absent; an explicit `null` is still pushed
    pub ip_ranges: Option<IpRangeSet>,
}

impl ImportDocument {
    /// Parse import file contents. `path` is used for error messages only.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| SyncError::Input {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {}", e),
        })?;

        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SyncError::Input {
                    path: path.to_path_buf(),
                    reason: format!("expected a JSON object, found {}", json_kind(&other)),
                });
            }
        };

        let acl = map
            .remove(ACL_KEY)
            .map(PolicyDocument)
            .unwrap_or_else(PolicyDocument::empty);
        let ip_ranges = map.remove(IP_RANGES_KEY).map(IpRangeSet);

        Ok(ImportDocument { acl, ip_ranges })
    }

    /// Read and parse an import file
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SyncError::Input {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, path)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
