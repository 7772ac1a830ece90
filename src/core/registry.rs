use crate::domain::ports::{ConfigProvider, PageFetcher, RegistryApi};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Builds the single HTTP client shared by the registry and ownership lookups.
pub fn build_http_client<C: ConfigProvider + ?Sized>(config: &C) -> Result<Client> {
    if config.accept_invalid_certs() {
        tracing::warn!(
            "⚠️ TLS certificate verification is disabled (http.accept_invalid_certs = true)"
        );
    }

    let client = Client::builder()
        .user_agent(config.user_agent())
        .timeout(config.request_timeout())
        .danger_accept_invalid_certs(config.accept_invalid_certs())
        .build()?;
    Ok(client)
}

/// GET + JSON client for the cadastral registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn resource_url(&self, resource_path: &str) -> String {
        format!("{}/{}", self.base_url, resource_path.trim_start_matches('/'))
    }

    async fn try_request(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> reqwest::Result<Option<serde_json::Value>> {
        let response = self.client.get(url).query(query).send().await?;
        tracing::debug!("Registry response status: {} for {}", response.status(), url);

        let body = response.error_for_status()?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Registry returned a non-JSON body for {}: {}", url, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn request(
        &self,
        resource_path: &str,
        query: &[(&str, String)],
    ) -> Option<serde_json::Value> {
        let url = self.resource_url(resource_path);
        tracing::debug!("Registry request: {} {:?}", url, query);

        self.try_request(&url, query).await.unwrap_or_else(|e| {
            tracing::warn!("Registry request to {} failed: {}", url, e);
            None
        })
    }
}

/// Plain GET for HTML pages; any failure or non-success status is `None`.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn try_fetch(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) if !body.is_empty() => Some(body),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Page fetch from {} failed: {}", url, e);
                None
            }
        }
    }
}
