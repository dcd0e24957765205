use std::collections::BTreeMap;

use axum::extract::{Multipart, State};
use axum::Json;

use crate::error::ApiError;
use crate::models::{CreateRequestResponse, RequestEntry};
use crate::state::AppState;
use crate::store::Submission;
use crate::uploads::save_upload;

/// GET /api/requests - All stored requests, oldest first
pub async fn list_requests(State(state): State<AppState>) -> Json<Vec<RequestEntry>> {
    Json(state.requests.read_all())
}

/// POST /api/requests - Create a request from a multipart form, or update
/// an existing one when `originalId` is supplied.
///
/// File parts are saved under the uploads directory; every other part is a
/// body field (a repeated field keeps its last value). `originalId` and
/// `status` are control fields and are not stored in the body.
pub async fn create_request(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreateRequestResponse>, ApiError> {
    let mut fields = BTreeMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                // Browsers send an empty, unnamed part for an untouched file input
                if file_name.is_empty() {
                    continue;
                }
                files.push(save_upload(&state.config.upload_dir, &file_name, &data)?);
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field {name}: {e}")))?;
                fields.insert(name, value);
            }
        }
    }

    let mut original_id = fields.remove("originalId").filter(|s| !s.is_empty());
    if original_id.is_none() {
        original_id = fields.remove("original_id").filter(|s| !s.is_empty());
    }
    let status = fields.remove("status");

    let entry = state.requests.create(Submission {
        fields,
        files,
        original_id,
        status,
    })?;

    Ok(Json(CreateRequestResponse {
        success: true,
        id: entry.id.clone(),
        entry,
    }))
}
