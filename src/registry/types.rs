//! Wire types for the Docker Registry HTTP API v2 responses we consume

use serde::Deserialize;

/// Media type requested when looking up a manifest digest
pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Header carrying the content digest of a manifest
pub const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// Body of `GET /v2/_catalog`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub repositories: Vec<String>,
}

/// Body of `GET /v2/{name}/tags/list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub name: String,
    /// Registries answer `null` for repositories whose tags were all deleted
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// Schema 1 manifest, as served with the default accept headers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub architecture: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    /// JSON document encoded as a string
    #[serde(rename = "v1Compatibility", default)]
    pub v1_compatibility: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
