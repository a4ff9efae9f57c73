//! In-memory registry used by the pipeline and server tests
#![allow(dead_code)]

use async_trait::async_trait;
use registry_hub::RegistryError;
use registry_hub::error::Result;
use registry_hub::registry::{Catalog, HistoryEntry, Manifest, RegistryApi, TagList};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type TagKey = (String, String);

/// Calls currently running and the highest number seen at once
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(self)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a InFlight);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    catalog: Option<Vec<String>>,
    tag_lists: HashMap<String, Vec<String>>,
    histories: HashMap<TagKey, String>,
    digests: HashMap<TagKey, String>,
    hanging: HashSet<String>,
    manifest_delay: Duration,
    pub tag_lists_in_flight: InFlight,
    pub manifests_in_flight: InFlight,
    pub tag_list_calls: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<TagKey>>,
}

pub fn digest_of(repository: &str, tag: &str) -> String {
    format!("sha256:{}-{}", repository.replace('/', "-"), tag)
}

pub fn build_history(tag: &str, date: &str) -> String {
    serde_json::json!({
        "architecture": "amd64",
        "config": {
            "Env": ["PATH=/usr/bin", format!("TAG={}", tag)],
            "Labels": {
                "io.openshift.s2i.build.commit.date": date,
                "io.openshift.s2i.build.commit.id": format!("deadbeef{}", tag),
                "io.openshift.s2i.build.commit.message": format!("build {}", tag),
            }
        }
    })
    .to_string()
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            catalog: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Listed repository whose tags all resolve, `tags` as (name, commit date)
    pub fn with_repository(mut self, repository: &str, tags: &[(&str, &str)]) -> Self {
        self.push_catalog(repository);
        self.tag_lists.insert(
            repository.to_string(),
            tags.iter().map(|(name, _)| name.to_string()).collect(),
        );
        for (name, date) in tags {
            let key = (repository.to_string(), name.to_string());
            self.histories.insert(key.clone(), build_history(name, date));
            self.digests.insert(key, digest_of(repository, name));
        }
        self
    }

    /// In the catalog, but its tag list cannot be fetched
    pub fn with_unlistable_repository(mut self, repository: &str) -> Self {
        self.push_catalog(repository);
        self
    }

    /// Listed repository whose manifest fetches never complete
    pub fn with_hanging_repository(mut self, repository: &str, tags: &[&str]) -> Self {
        self.push_catalog(repository);
        self.tag_lists.insert(
            repository.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        self.hanging.insert(repository.to_string());
        self
    }

    /// Keep every manifest fetch pending for `delay`
    pub fn with_manifest_delay(mut self, delay: Duration) -> Self {
        self.manifest_delay = delay;
        self
    }

    pub fn without_catalog(mut self) -> Self {
        self.catalog = None;
        self
    }

    pub fn with_broken_manifest(mut self, repository: &str, tag: &str) -> Self {
        self.histories
            .remove(&(repository.to_string(), tag.to_string()));
        self
    }

    pub fn with_missing_digest(mut self, repository: &str, tag: &str) -> Self {
        self.digests.remove(&(repository.to_string(), tag.to_string()));
        self
    }

    pub fn with_raw_history(mut self, repository: &str, tag: &str, raw: &str) -> Self {
        self.histories
            .insert((repository.to_string(), tag.to_string()), raw.to_string());
        self
    }

    fn push_catalog(&mut self, repository: &str) {
        if let Some(catalog) = self.catalog.as_mut() {
            catalog.push(repository.to_string());
        }
    }

    fn key(repository: &str, tag: &str) -> TagKey {
        (repository.to_string(), tag.to_string())
    }
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    fn registry(&self) -> &str {
        "registry.test"
    }

    async fn fetch_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(repositories) => Ok(Catalog {
                repositories: repositories.clone(),
            }),
            None => Err(RegistryError::Network(
                "Connection error during catalog fetch: refused".to_string(),
            )),
        }
    }

    async fn fetch_tag_list(&self, repository: &str) -> Result<TagList> {
        let _running = self.tag_lists_in_flight.enter();
        tokio::task::yield_now().await;

        self.tag_list_calls
            .lock()
            .unwrap()
            .push(repository.to_string());

        match self.tag_lists.get(repository) {
            Some(tags) => Ok(TagList {
                name: repository.to_string(),
                tags: tags.clone(),
            }),
            None => Err(RegistryError::Network(format!(
                "Resource not found for tag listing for {}",
                repository
            ))),
        }
    }

    async fn fetch_manifest(&self, repository: &str, tag: &str) -> Result<Manifest> {
        let _running = self.manifests_in_flight.enter();
        if self.manifest_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.manifest_delay).await;
        }

        if self.hanging.contains(repository) {
            std::future::pending::<()>().await;
        }

        match self.histories.get(&Self::key(repository, tag)) {
            Some(history) => Ok(Manifest {
                architecture: "amd64".to_string(),
                history: vec![HistoryEntry {
                    v1_compatibility: history.clone(),
                }],
            }),
            None => Err(RegistryError::Network(format!(
                "Resource not found for manifest fetch for {}:{}",
                repository, tag
            ))),
        }
    }

    async fn fetch_digest(&self, repository: &str, tag: &str) -> Result<String> {
        self.digests
            .get(&Self::key(repository, tag))
            .cloned()
            .ok_or_else(|| RegistryError::MissingDigest {
                repository: repository.to_string(),
                tag: tag.to_string(),
            })
    }

    async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()> {
        self.deleted
            .lock()
            .unwrap()
            .push(Self::key(repository, digest));
        Ok(())
    }
}
