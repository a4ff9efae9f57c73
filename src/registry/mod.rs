//! Registry module for Docker registry interactions
//!
//! This module provides the HTTP client for the Docker Registry HTTP API v2
//! and the [`RegistryApi`] trait the aggregation pipeline and the web server
//! are written against.

pub mod client;
pub mod types;

pub use client::{RegistryClient, RegistryClientBuilder};
pub use types::{Catalog, HistoryEntry, Manifest, TagList};

use crate::error::Result;
use async_trait::async_trait;

/// Read and delete operations of a registry, one network call each
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Identity shown to users, usually the configured host
    fn registry(&self) -> &str;

    /// `GET /v2/_catalog`
    async fn fetch_catalog(&self) -> Result<Catalog>;

    /// `GET /v2/{repository}/tags/list`
    async fn fetch_tag_list(&self, repository: &str) -> Result<TagList>;

    /// `GET /v2/{repository}/manifests/{tag}` with default accept headers
    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest>;

    /// Content digest of the v2 manifest for `tag`
    async fn fetch_digest(&self, repository: &str, tag: &str) -> Result<String>;

    /// `DELETE /v2/{repository}/manifests/{digest}`
    async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()>;
}
