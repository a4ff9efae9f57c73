//! Second tier: tag lists, fetched by a single sequential worker

use crate::pipeline::sink::ErrorReporter;
use crate::registry::RegistryApi;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Tags of one repository, as listed by the registry
#[derive(Debug, Clone)]
pub struct RepositoryTags {
    pub name: String,
    pub tags: Vec<String>,
}

/// Spawn the worker that walks `repositories` in order, one call at a time.
///
/// Each listed repository is emitted as soon as its call completes. The first
/// failure is reported and ends the walk: repositories after it are skipped.
pub fn spawn_tag_lister<I>(
    registry: Arc<dyn RegistryApi>,
    repositories: I,
    errors: ErrorReporter,
) -> (mpsc::Receiver<RepositoryTags>, JoinHandle<()>)
where
    I: IntoIterator<Item = String> + Send + 'static,
    I::IntoIter: Send,
{
    let (tx, rx) = mpsc::channel(1);

    let handle = tokio::spawn(async move {
        for repository in repositories {
            let list = match registry.fetch_tag_list(&repository).await {
                Ok(list) => list,
                Err(err) => {
                    errors.report(&err);
                    tracing::debug!("stopped tag listing at {}", repository);
                    return;
                }
            };

            let record = RepositoryTags {
                name: repository,
                tags: list.tags,
            };
            if tx.send(record).await.is_err() {
                // receiver gone: the request was abandoned
                return;
            }
        }
    });

    (rx, handle)
}
