//! Configuration module for the service and the aggregation pipeline
//!
//! The configuration is built once at startup and passed to the server
//! state; nothing reads the environment after that.

use crate::error::{RegistryError, Result};
use crate::pipeline::ranking::DEFAULT_TAG_LIMIT;
use crate::registry::client::base_url;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_LISTEN: &str = ":8080";
pub const DEFAULT_REGISTRY: &str = "registry.local";
pub const DEFAULT_MAX_CONCURRENT_REPOSITORIES: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Settings of one aggregation run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Repositories resolved at the same time, `0` for no limit
    pub max_concurrent_repositories: usize,
    /// Non-pinned tags kept per repository
    pub tag_limit: usize,
    /// Deadline for a whole aggregation, `None` to wait indefinitely
    pub request_timeout: Option<Duration>,
    /// Surface undecodable provenance as info messages instead of ignoring it
    pub report_provenance_errors: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_repositories: DEFAULT_MAX_CONCURRENT_REPOSITORIES,
            tag_limit: DEFAULT_TAG_LIMIT,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            report_provenance_errors: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_max_concurrent_repositories(mut self, limit: usize) -> Self {
        self.max_concurrent_repositories = limit;
        self
    }

    pub fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = limit;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_report_provenance_errors(mut self, report: bool) -> Self {
        self.report_provenance_errors = report;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Socket address the web server binds
    pub listen: String,
    /// Registry host or base URL
    pub registry: String,
    pub skip_tls: bool,
    pub pipeline: PipelineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: normalize_listen(DEFAULT_LISTEN),
            registry: DEFAULT_REGISTRY.to_string(),
            skip_tls: false,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new(listen: &str, registry: &str, skip_tls: bool, pipeline: PipelineConfig) -> Self {
        Self {
            listen: normalize_listen(listen),
            registry: registry.trim().to_string(),
            skip_tls,
            pipeline,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.listen.is_empty() {
            return Err(RegistryError::Config(
                "Listen address cannot be empty".to_string(),
            ));
        }

        base_url(&self.registry)?;

        if self.pipeline.max_concurrent_repositories > Semaphore::MAX_PERMITS {
            return Err(RegistryError::Config(format!(
                "Max concurrent repositories cannot exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }

        if self.pipeline.request_timeout == Some(Duration::ZERO) {
            return Err(RegistryError::Config(
                "Request timeout must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

/// `:8080` style addresses bind every interface
pub fn normalize_listen(listen: &str) -> String {
    let listen = listen.trim();
    if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    }
}
