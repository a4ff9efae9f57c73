//! First tier: the repository catalog

use crate::pipeline::sink::ErrorReporter;
use crate::registry::RegistryApi;

/// Fetch the repository names of the registry.
///
/// Returns `None` after reporting the failure; nothing can be listed without a catalog.
pub async fn fetch_repositories(
    registry: &dyn RegistryApi,
    errors: &ErrorReporter,
) -> Option<Vec<String>> {
    match registry.fetch_catalog().await {
        Ok(catalog) => {
            tracing::debug!(
                "catalog of {} lists {} repositories",
                registry.registry(),
                catalog.repositories.len()
            );
            Some(catalog.repositories)
        }
        Err(err) => {
            errors.report(&err);
            None
        }
    }
}
