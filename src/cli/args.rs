//! Command-line argument parsing

use crate::config::{
    AppConfig, DEFAULT_LISTEN, DEFAULT_MAX_CONCURRENT_REPOSITORIES, DEFAULT_REGISTRY,
    DEFAULT_REQUEST_TIMEOUT_SECS, PipelineConfig,
};
use crate::error::{RegistryError, Result};
use crate::pipeline::ranking::DEFAULT_TAG_LIMIT;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "registry-hub")]
#[command(about = "Web overview of the repositories, tags and builds of a Docker registry")]
#[command(version, author)]
pub struct Args {
    /// Address the web server listens on
    #[arg(
        long = "listen",
        short = 'l',
        env = "LISTEN",
        default_value = DEFAULT_LISTEN,
        help = "Listen address, ':PORT' binds all interfaces"
    )]
    pub listen: String,

    /// Registry to inspect
    #[arg(
        long = "registry",
        short = 'r',
        env = "REGISTRY",
        default_value = DEFAULT_REGISTRY,
        help = "Registry host (https is assumed) or base URL"
    )]
    pub registry: String,

    /// Skip TLS verification
    #[arg(
        long = "skip-tls",
        short = 'k',
        env = "SKIP_TLS",
        help = "Skip TLS certificate verification"
    )]
    pub skip_tls: bool,

    /// Repositories resolved concurrently
    #[arg(
        long = "max-concurrent-repositories",
        short = 'j',
        env = "MAX_CONCURRENT_REPOSITORIES",
        default_value_t = DEFAULT_MAX_CONCURRENT_REPOSITORIES,
        help = "Repositories resolved at the same time, 0 for no limit"
    )]
    pub max_concurrent_repositories: usize,

    /// Tags shown per repository besides `latest`
    #[arg(
        long = "tag-limit",
        env = "TAG_LIMIT",
        default_value_t = DEFAULT_TAG_LIMIT,
        help = "Number of newest tags shown per repository besides latest"
    )]
    pub tag_limit: usize,

    /// Deadline for one page in seconds
    #[arg(
        long = "request-timeout",
        short = 't',
        env = "REQUEST_TIMEOUT",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        help = "Seconds to wait for the registry per page, 0 waits indefinitely"
    )]
    pub request_timeout: u64,

    #[arg(
        long = "report-provenance-errors",
        env = "REPORT_PROVENANCE_ERRORS",
        help = "Show undecodable build metadata as info messages"
    )]
    pub report_provenance_errors: bool,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(
        long = "quiet",
        short = 'q',
        conflicts_with = "verbose",
        help = "Only log errors"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(RegistryError::Config(
                "Registry cannot be empty".to_string(),
            ));
        }

        if self.request_timeout > 86400 {
            return Err(RegistryError::Config(
                "Request timeout cannot exceed 24 hours (86400 seconds)".to_string(),
            ));
        }

        Ok(())
    }

    /// Validated configuration for the server
    pub fn into_config(self) -> Result<AppConfig> {
        self.validate()?;

        let request_timeout =
            (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout));
        let pipeline = PipelineConfig::default()
            .with_max_concurrent_repositories(self.max_concurrent_repositories)
            .with_tag_limit(self.tag_limit)
            .with_request_timeout(request_timeout)
            .with_report_provenance_errors(self.report_provenance_errors);

        let config = AppConfig::new(&self.listen, &self.registry, self.skip_tls, pipeline);
        config.validate()?;
        Ok(config)
    }
}
