//! Request handlers

use crate::model::AggregationResult;
use crate::pipeline;
use crate::server::AppState;
use crate::server::render::render_page;
use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

/// Overview page; every request re-reads the registry
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let result = pipeline::aggregate(state.registry.clone(), &state.pipeline).await;
    Html(render_page(&result))
}

/// The overview as JSON
pub async fn images(State(state): State<AppState>) -> Json<AggregationResult> {
    Json(pipeline::aggregate(state.registry.clone(), &state.pipeline).await)
}

pub async fn health() -> &'static str {
    "ok"
}

/// Fields posted by the delete buttons of the overview page
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "DockerContentDigest", default)]
    pub digest: String,
}

/// Delete a manifest by digest, then send the browser back to the overview.
///
/// Reads the query string on GET and the urlencoded body on POST.
pub async fn delete(
    State(state): State<AppState>,
    form: Result<Form<DeleteRequest>, FormRejection>,
) -> Response {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            tracing::warn!("Unreadable delete request: {}", rejection);
            DeleteRequest::default()
        }
    };

    if request.image.is_empty() || request.digest.is_empty() {
        tracing::warn!(
            "No image to delete '{}/{}'.",
            request.image,
            request.digest
        );
    } else {
        tracing::info!("Deleting image {}@{}.", request.image, request.digest);
        match state
            .registry
            .delete_manifest(&request.image, &request.digest)
            .await
        {
            Ok(()) => tracing::info!("Deleted image {}@{}.", request.image, request.digest),
            Err(err) => tracing::error!(
                "Error while deleting image {}@{}: {}",
                request.image,
                request.digest,
                err
            ),
        }
    }

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
