//! Third tier: manifest and digest of every tag of one repository

use crate::image::Provenance;
use crate::model::{Level, ResolvedTag};
use crate::pipeline::sink::ErrorReporter;
use crate::registry::RegistryApi;
use std::sync::Arc;

pub struct TagManifestResolver {
    registry: Arc<dyn RegistryApi>,
    errors: ErrorReporter,
    report_provenance_errors: bool,
}

impl TagManifestResolver {
    pub fn new(
        registry: Arc<dyn RegistryApi>,
        errors: ErrorReporter,
        report_provenance_errors: bool,
    ) -> Self {
        Self {
            registry,
            errors,
            report_provenance_errors,
        }
    }

    /// Resolve `tags` one after another.
    ///
    /// A failed manifest fetch drops that tag; a failed digest lookup keeps it
    /// without a digest. Either failure is reported and ends the repository,
    /// keeping the tags resolved so far.
    pub async fn resolve(&self, repository: &str, tags: &[String]) -> Vec<ResolvedTag> {
        let mut resolved = Vec::with_capacity(tags.len());

        for tag in tags {
            let manifest = match self.registry.fetch_manifest(repository, tag).await {
                Ok(manifest) => manifest,
                Err(err) => {
                    self.errors.report(&err);
                    break;
                }
            };

            let provenance = match Provenance::from_manifest(&manifest, repository, tag) {
                Ok(provenance) => provenance,
                Err(err) => {
                    if self.report_provenance_errors {
                        self.errors.report_with(Level::Info, &err);
                    } else {
                        tracing::debug!("{}", err);
                    }
                    Provenance::default()
                }
            };

            let digest = match self.registry.fetch_digest(repository, tag).await {
                Ok(digest) => Some(digest),
                Err(err) => {
                    self.errors.report(&err);
                    None
                }
            };
            let digest_failed = digest.is_none();

            resolved.push(ResolvedTag {
                name: tag.clone(),
                architecture: manifest.architecture,
                provenance,
                digest,
            });

            if digest_failed {
                break;
            }
        }

        resolved
    }
}
