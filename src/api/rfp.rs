use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::models::RfpResponse;
use crate::rfp;
use crate::state::AppState;

/// POST /api/generate_rfp/{id} - Render the RFP text file for a stored request
pub async fn generate_rfp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RfpResponse>, ApiError> {
    let download_url = rfp::generate(state.requests.as_ref(), &state.config.rfp_dir(), &id)?;
    Ok(Json(RfpResponse {
        success: true,
        download_url,
    }))
}
