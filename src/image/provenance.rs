//! Build provenance embedded in schema 1 manifests
//!
//! Source-to-image builds record the commit they were built from as labels on
//! the image configuration. The configuration of the newest layer is carried
//! in `history[0].v1Compatibility` as a JSON document encoded in a string.

use crate::error::{RegistryError, Result};
use crate::registry::Manifest;
use serde::{Deserialize, Serialize};

/// Environment variable naming the build that produced an image
pub const BUILD_NAME_VAR: &str = "OPENSHIFT_BUILD_NAME";

/// Build metadata of a tag. Every field is empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub author: String,
    pub date: String,
    pub sha: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub repository: String,
    pub message: String,
    pub base_image: String,
    /// `KEY=value` entries of the image configuration
    pub env: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct V1Compatibility {
    #[serde(default)]
    config: Option<ContainerConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerConfig {
    #[serde(rename = "Env", default)]
    env: Option<Vec<String>>,
    #[serde(rename = "Labels", default)]
    labels: Option<BuildLabels>,
}

#[derive(Debug, Default, Deserialize)]
struct BuildLabels {
    #[serde(rename = "io.openshift.s2i.build.commit.author", default)]
    author: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.commit.date", default)]
    date: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.commit.id", default)]
    sha: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.commit.ref", default)]
    reference: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.source-location", default)]
    repository: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.commit.message", default)]
    message: Option<String>,
    #[serde(rename = "io.openshift.s2i.build.image", default)]
    base_image: Option<String>,
}

impl Provenance {
    /// Decode the provenance of `repository:tag` from its manifest history
    pub fn from_manifest(manifest: &Manifest, repository: &str, tag: &str) -> Result<Self> {
        let failure = |reason: String| RegistryError::ProvenanceDecode {
            repository: repository.to_string(),
            tag: tag.to_string(),
            reason,
        };

        let first = manifest
            .history
            .first()
            .ok_or_else(|| failure("manifest has no history".to_string()))?;

        Self::from_v1_compatibility(&first.v1_compatibility).map_err(|e| failure(e.to_string()))
    }

    fn from_v1_compatibility(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        let compat: V1Compatibility = serde_json::from_str(raw)?;
        let config = compat.config.unwrap_or_default();
        let labels = config.labels.unwrap_or_default();

        Ok(Self {
            author: labels.author.unwrap_or_default(),
            date: labels.date.unwrap_or_default(),
            sha: labels.sha.unwrap_or_default(),
            reference: labels.reference.unwrap_or_default(),
            repository: labels.repository.unwrap_or_default(),
            message: labels.message.unwrap_or_default(),
            base_image: labels.base_image.unwrap_or_default(),
            env: config.env.unwrap_or_default(),
        })
    }

    /// Value of the first `name=value` environment entry, empty when unset
    pub fn env_var(&self, name: &str) -> &str {
        self.env
            .iter()
            .find_map(|entry| {
                entry
                    .strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix('='))
            })
            .unwrap_or("")
    }

    /// Commit SHA shortened for display
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HistoryEntry;

    fn manifest_with(v1_compatibility: &str) -> Manifest {
        Manifest {
            history: vec![HistoryEntry {
                v1_compatibility: v1_compatibility.to_string(),
            }],
            ..Manifest::default()
        }
    }

    #[test]
    fn labels_are_decoded() {
        let nested = serde_json::json!({
            "architecture": "amd64",
            "config": {
                "Env": ["PATH=/usr/bin", "APP_VERSION=1.4.2"],
                "Labels": {
                    "io.openshift.s2i.build.commit.author": "Jane Doe <jane@example.com>",
                    "io.openshift.s2i.build.commit.date": "Fri Mar 15 10:00:00 2024 +0100",
                    "io.openshift.s2i.build.commit.id": "0123456789abcdef",
                    "io.openshift.s2i.build.commit.ref": "main",
                    "io.openshift.s2i.build.source-location": "https://git.example.com/app.git",
                    "io.openshift.s2i.build.commit.message": "Fix login",
                    "io.openshift.s2i.build.image": "centos/python-36",
                    "maintainer": "ops"
                }
            }
        })
        .to_string();

        let provenance = Provenance::from_manifest(&manifest_with(&nested), "app", "v1").unwrap();
        assert_eq!(provenance.author, "Jane Doe <jane@example.com>");
        assert_eq!(provenance.date, "Fri Mar 15 10:00:00 2024 +0100");
        assert_eq!(provenance.reference, "main");
        assert_eq!(provenance.repository, "https://git.example.com/app.git");
        assert_eq!(provenance.base_image, "centos/python-36");
        assert_eq!(provenance.short_sha(), "01234567");
        assert_eq!(provenance.env_var("APP_VERSION"), "1.4.2");
        assert_eq!(provenance.env_var("APP"), "");
    }

    #[test]
    fn missing_labels_yield_empty_provenance() {
        let provenance =
            Provenance::from_manifest(&manifest_with(r#"{"config":{"Labels":null}}"#), "app", "v1")
                .unwrap();
        assert!(provenance.is_empty());
    }

    #[test]
    fn malformed_nested_json_is_an_error() {
        let err = Provenance::from_manifest(&manifest_with("{not json"), "app", "v1").unwrap_err();
        assert!(matches!(err, RegistryError::ProvenanceDecode { ref tag, .. } if tag == "v1"));
    }

    #[test]
    fn empty_history_is_an_error() {
        let err = Provenance::from_manifest(&Manifest::default(), "app", "v1").unwrap_err();
        assert!(err.to_string().contains("no history"));
    }
}
