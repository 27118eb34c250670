use super::config::ApiEndpointConfig;
use crate::document::{IpRangeSet, PolicyDocument};
use crate::error::{Result, SyncError};
use crate::settings::SyncSettings;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Tailnet resources handled by this client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Acl,
    IpRanges,
}

impl Resource {
    fn path(self) -> &'static str {
        match self {
            Resource::Acl => "acl",
            Resource::IpRanges => "ip-ranges",
        }
    }
}

/// Client for the tailnet ACL and IP range endpoints.
///
/// Every call opens its own request and awaits it before returning; nothing
/// is retried.
#[derive(Debug, Clone)]
pub struct TailnetClient {
    api_root: String,
    settings: SyncSettings,
    http: reqwest::Client,
}

impl TailnetClient {
    pub fn new(endpoint: &ApiEndpointConfig, settings: SyncSettings) -> Self {
        Self {
            api_root: endpoint.api_root(),
            settings,
            http: reqwest::Client::new(),
        }
    }

    pub fn tailnet(&self) -> &str {
        &self.settings.tailnet
    }

    /// Full URL of a tailnet resource
    pub fn resource_url(&self, resource: Resource) -> String {
        format!("{}/{}/{}", self.api_root, self.settings.tailnet, resource.path())
    }

    pub async fn fetch_policy(&self) -> Result<PolicyDocument> {
        self.get(Resource::Acl).await
    }

    pub async fn fetch_ranges(&self) -> Result<IpRangeSet> {
        self.get(Resource::IpRanges).await
    }

    pub async fn push_policy(&self, doc: &PolicyDocument) -> Result<()> {
        self.post(Resource::Acl, doc).await
    }

    pub async fn push_ranges(&self, ranges: &IpRangeSet) -> Result<()> {
        self.post(Resource::IpRanges, ranges).await
    }

    async fn get<T: DeserializeOwned>(&self, resource: Resource) -> Result<T> {
        let url = self.resource_url(resource);
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .basic_auth(self.settings.api_key.expose(), Some(""))
            // the ACL endpoint answers with HuJSON unless JSON is asked for
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| SyncError::Transport {
                url: url.clone(),
                source,
            })?;

        let resp = check_status("GET", &url, resp).await?;

        resp.json::<T>()
            .await
            .map_err(|source| SyncError::Transport { url, source })
    }

    async fn post<B: Serialize + ?Sized>(&self, resource: Resource, body: &B) -> Result<()> {
        let url = self.resource_url(resource);
        let payload = serde_json::to_vec(body)?;
        tracing::debug!("POST {} ({} bytes)", url, payload.len());

        let resp = self
            .http
            .post(&url)
            .basic_auth(self.settings.api_key.expose(), Some(""))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| SyncError::Transport {
                url: url.clone(),
                source,
            })?;

        check_status("POST", &url, resp).await?;
        Ok(())
    }
}

async fn check_status(
    method: &'static str,
    url: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::debug!("{} {} failed: {} - {}", method, url, status, body);
    Err(SyncError::Remote {
        method,
        url: url.to_string(),
        status,
        body,
    })
}
