//! Registry Hub Library
//!
//! Aggregates the catalog, tags, build provenance and delete digests of a
//! Docker registry into one overview, and serves it as a web page.

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod server;

pub use config::{AppConfig, PipelineConfig};
pub use error::{RegistryError, Result};
pub use model::{AggregatedImage, AggregationResult, Level, Message, ResolvedTag};
pub use pipeline::aggregate;
pub use registry::{RegistryApi, RegistryClient};
