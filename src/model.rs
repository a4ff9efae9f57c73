//! Aggregated view handed to the renderers

use crate::image::Provenance;
use serde::Serialize;

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Danger,
    Info,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Danger => "danger",
            Level::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: Level,
    pub message: String,
}

impl Message {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Level::Danger, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTag {
    pub name: String,
    pub architecture: String,
    pub provenance: Provenance,
    /// Absent when the digest lookup failed
    pub digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedImage {
    pub name: String,
    pub tags: Vec<ResolvedTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub registry: String,
    /// Completion order of the repository workers
    pub images: Vec<AggregatedImage>,
    pub messages: Vec<Message>,
}

impl AggregationResult {
    pub fn image(&self, name: &str) -> Option<&AggregatedImage> {
        self.images.iter().find(|image| image.name == name)
    }
}

impl AggregatedImage {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}
