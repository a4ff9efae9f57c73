//! Aggregation pipeline
//!
//! Builds the registry overview in three dependent tiers:
//!
//! 1. the catalog is fetched once ([`catalog`]);
//! 2. a single worker lists the tags of each repository in catalog order ([`tags`]);
//! 3. every listed repository gets its own worker resolving manifests and
//!    digests tag by tag ([`resolver`]), bounded by a semaphore.
//!
//! Failures of any tier are collected by the [`ErrorSink`] and never abort
//! unrelated work. Each repository's tags are ranked ([`ranking`]) before
//! its image is emitted; images arrive in completion order.

pub mod catalog;
pub mod ranking;
pub mod resolver;
pub mod sink;
pub mod tags;

pub use ranking::rank_tags;
pub use resolver::TagManifestResolver;
pub use sink::{ErrorReporter, ErrorSink};
pub use tags::RepositoryTags;

use crate::config::PipelineConfig;
use crate::model::{AggregatedImage, AggregationResult, Message};
use crate::registry::RegistryApi;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

/// Run the whole pipeline against `registry`
pub async fn aggregate(registry: Arc<dyn RegistryApi>, config: &PipelineConfig) -> AggregationResult {
    let deadline = config.request_timeout.map(|limit| Instant::now() + limit);
    let sink = ErrorSink::spawn();
    let errors = sink.reporter();

    let images = match within(deadline, catalog::fetch_repositories(registry.as_ref(), &errors)).await {
        Some(Some(repositories)) => {
            collect_images(registry.clone(), repositories, config, deadline, &errors).await
        }
        Some(None) => Vec::new(),
        None => {
            report_deadline(config, &errors);
            Vec::new()
        }
    };

    drop(errors);
    let messages = sink.finish().await;

    tracing::info!(
        "aggregated {} images from {} with {} messages",
        images.len(),
        registry.registry(),
        messages.len()
    );

    AggregationResult {
        registry: registry.registry().to_string(),
        images,
        messages,
    }
}

async fn collect_images(
    registry: Arc<dyn RegistryApi>,
    repositories: Vec<String>,
    config: &PipelineConfig,
    deadline: Option<Instant>,
    errors: &ErrorReporter,
) -> Vec<AggregatedImage> {
    let (records, lister) = tags::spawn_tag_lister(registry.clone(), repositories, errors.clone());
    let (image_tx, mut image_rx) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(
        records,
        image_tx,
        registry,
        config.clone(),
        errors.clone(),
    ));

    let mut images = Vec::new();
    let drained = within(deadline, async {
        // closes once the dispatcher and every worker dropped their sender
        while let Some(image) = image_rx.recv().await {
            images.push(image);
        }
    })
    .await;

    if drained.is_none() {
        lister.abort();
        // dropping the dispatcher's JoinSet aborts the outstanding workers
        dispatcher.abort();
        report_deadline(config, errors);
        return images;
    }

    report_panic("tag lister", lister.await, errors);
    report_panic("repository dispatcher", dispatcher.await, errors);

    images
}

/// Spawn one worker per listed repository and wait for all of them
async fn dispatch(
    mut records: mpsc::Receiver<RepositoryTags>,
    images: mpsc::UnboundedSender<AggregatedImage>,
    registry: Arc<dyn RegistryApi>,
    config: PipelineConfig,
    errors: ErrorReporter,
) {
    let permits = (config.max_concurrent_repositories > 0)
        .then(|| Arc::new(Semaphore::new(config.max_concurrent_repositories)));
    let mut workers = JoinSet::new();

    while let Some(record) = records.recv().await {
        let permit = match &permits {
            Some(permits) => match permits.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => break,
            },
            None => None,
        };

        let resolver = TagManifestResolver::new(
            registry.clone(),
            errors.clone(),
            config.report_provenance_errors,
        );
        let images = images.clone();
        let tag_limit = config.tag_limit;

        workers.spawn(async move {
            let _permit = permit;
            let tags = resolver.resolve(&record.name, &record.tags).await;
            let image = AggregatedImage {
                name: record.name,
                tags: rank_tags(tags, tag_limit),
            };
            let _ = images.send(image);
        });
    }

    while let Some(joined) = workers.join_next().await {
        report_panic("repository worker", joined, &errors);
    }
}

fn report_panic(task: &str, joined: Result<(), JoinError>, errors: &ErrorReporter) {
    if let Err(err) = joined {
        if err.is_panic() {
            errors.send(Message::danger(format!("{} panicked: {}", task, err)));
        }
    }
}

fn report_deadline(config: &PipelineConfig, errors: &ErrorReporter) {
    let limit = config.request_timeout.unwrap_or_default();
    errors.send(Message::danger(format!(
        "Registry did not answer within {}s, showing partial results",
        limit.as_secs_f64()
    )));
}

/// Run `future` to completion or until `deadline`, `None` meaning it elapsed
async fn within<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}
