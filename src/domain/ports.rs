use async_trait::async_trait;
use std::time::Duration;

/// JSON access to the cadastral registry. Transport and decoding failures
/// are reported as `None`; callers treat that exactly like "no data".
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn request(
        &self,
        resource_path: &str,
        query: &[(&str, String)],
    ) -> Option<serde_json::Value>;
}

/// Raw HTML fetch for the ownership lookup page. `None` on any failure.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn registry_base_url(&self) -> &str;
    fn ownership_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn accept_invalid_certs(&self) -> bool;
    fn concurrency(&self) -> usize;
    fn user_agent(&self) -> &str;
}
