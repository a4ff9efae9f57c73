// This file contains the implementation of the RegistryClient struct,
// which reads catalog, tag and manifest data from the Docker registry API
// and forwards manifest deletions.

use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{RegistryError, Result};
use crate::registry::RegistryApi;
use crate::registry::types::{
    Catalog, DOCKER_CONTENT_DIGEST, MANIFEST_V2_MEDIA_TYPE, Manifest, TagList,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

pub struct RegistryClientBuilder {
    address: String,
    skip_tls: bool,
}

impl RegistryClientBuilder {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            skip_tls: false,
        }
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let base_url = base_url(&self.address)?;

        let client = if self.skip_tls {
            Client::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "client setup"))?
        } else {
            Client::new()
        };

        Ok(RegistryClient {
            client,
            identity: self.address,
            base_url,
        })
    }
}

/// Resolve a configured registry (bare host or full URL) to the API base URL.
///
/// A bare host gets `https://`, the scheme the registry API is served on by default.
pub fn base_url(address: &str) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(RegistryError::Config(
            "Registry address cannot be empty".to_string(),
        ));
    }

    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    };

    let url = Url::parse(&candidate)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(RegistryError::Config(format!(
            "Invalid registry address: {}. Must use http:// or https://",
            address
        )));
    }

    Ok(candidate.trim_end_matches('/').to_string())
}

#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    identity: String,
    base_url: String,
}

impl RegistryClient {
    pub fn new(address: impl Into<String>, skip_tls: bool) -> Result<Self> {
        Self::builder(address).with_skip_tls(skip_tls).build()
    }

    pub fn builder(address: impl Into<String>) -> RegistryClientBuilder {
        RegistryClientBuilder::new(address)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn manifest_url(&self, repository: &str, reference: &str) -> String {
        format!("{}/v2/{}/manifests/{}", self.base_url, repository, reference)
    }

    /// Send a request and turn transport failures and error statuses into errors
    async fn send(request: RequestBuilder, operation: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, operation))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            Err(HttpErrorHandler::handle_registry_error(
                status,
                &error_text,
                operation,
            ))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T> {
        tracing::debug!(url, "{}", operation);

        let response = Self::send(self.client.get(url), operation).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, operation))?;

        serde_json::from_slice(&body).map_err(|e| RegistryError::decode(operation, e))
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    fn registry(&self) -> &str {
        &self.identity
    }

    async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = format!("{}/v2/_catalog", self.base_url);
        self.get_json(&url, "catalog fetch").await
    }

    async fn fetch_tag_list(&self, repository: &str) -> Result<TagList> {
        let url = format!("{}/v2/{}/tags/list", self.base_url, repository);
        self.get_json(&url, &format!("tag listing for {}", repository))
            .await
    }

    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest> {
        let url = self.manifest_url(repository, tag);
        self.get_json(&url, &format!("manifest fetch for {}:{}", repository, tag))
            .await
    }

    async fn fetch_digest(&self, repository: &str, tag: &str) -> Result<String> {
        let operation = format!("digest lookup for {}:{}", repository, tag);
        let url = self.manifest_url(repository, tag);
        tracing::debug!(url = %url, "{}", operation);

        let request = self.client.get(&url).header(ACCEPT, MANIFEST_V2_MEDIA_TYPE);
        let response = Self::send(request, &operation).await?;

        let digest = response
            .headers()
            .get(DOCKER_CONTENT_DIGEST)
            .map(|value| value.to_str().map(str::trim))
            .transpose()
            .map_err(|e| RegistryError::Decode(format!("{}: {}", operation, e)))?;

        match digest {
            Some(digest) if !digest.is_empty() => Ok(digest.to_string()),
            _ => Err(RegistryError::MissingDigest {
                repository: repository.to_string(),
                tag: tag.to_string(),
            }),
        }
    }

    async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()> {
        let operation = format!("manifest delete for {}@{}", repository, digest);
        let url = self.manifest_url(repository, digest);
        tracing::debug!(url = %url, "{}", operation);

        Self::send(self.client.delete(&url), &operation).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_defaults_to_https() {
        assert_eq!(base_url("registry.local").unwrap(), "https://registry.local");
    }

    #[test]
    fn explicit_scheme_is_kept_without_trailing_slash() {
        assert_eq!(
            base_url("http://127.0.0.1:5000/").unwrap(),
            "http://127.0.0.1:5000"
        );
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        assert!(matches!(
            base_url("ftp://registry.local"),
            Err(RegistryError::Config(_))
        ));
        assert!(matches!(base_url("  "), Err(RegistryError::Config(_))));
    }

    #[test]
    fn identity_is_the_configured_address() {
        let client = RegistryClient::new("registry.local", false).unwrap();
        assert_eq!(client.registry(), "registry.local");
        assert_eq!(client.base_url(), "https://registry.local");
        assert_eq!(
            client.manifest_url("team/app", "v1"),
            "https://registry.local/v2/team/app/manifests/v1"
        );
    }
}
