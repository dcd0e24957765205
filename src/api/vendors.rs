use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{RebuildResponse, SelectionResponse};
use crate::selection;
use crate::state::AppState;

/// POST /api/select_vendors - Recommend vendors for a (possibly partial) request.
/// Only an unparsable body is an error; everything else degrades.
pub async fn select_vendors(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SelectionResponse>, ApiError> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    Ok(Json(selection::select_vendors(&state, &request).await))
}

/// POST /api/rebuild_embeddings - Re-embed the whole catalog.
pub async fn rebuild_embeddings(
    State(state): State<AppState>,
) -> Result<Json<RebuildResponse>, ApiError> {
    let Some(llm) = state.llm.as_deref() else {
        return Err(ApiError::NotConfigured(
            "Embedding provider not configured".to_string(),
        ));
    };

    let catalog = state.catalog.load();
    match state.embeddings.ensure(&catalog, Some(llm), true).await {
        Some(mapping) => {
            tracing::info!("Rebuilt embeddings for {} vendors", mapping.len());
            Ok(Json(RebuildResponse {
                success: true,
                count: mapping.len(),
            }))
        }
        None => Err(ApiError::Internal("failed to build embeddings".to_string())),
    }
}
