use std::path::Path as FsPath;

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::error::ApiError;
use crate::models::SchemaEntry;
use crate::state::AppState;
use crate::uploads::is_safe_file_name;

/// GET / - `public/index.html` when present, else the bundled landing page
pub async fn serve_index(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(state.config.public_dir.join("index.html")).await {
        Ok(page) => Html(page),
        Err(_) => Html(include_str!("../../static/index.html").to_string()),
    }
}

/// GET /api/schemas - Form schemas available under `public/formSchemas`
pub async fn list_schemas(State(state): State<AppState>) -> Json<Vec<SchemaEntry>> {
    Json(read_schemas(&state.config.schemas_dir()))
}

fn read_schemas(dir: &FsPath) -> Vec<SchemaEntry> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut schemas: Vec<SchemaEntry> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter_map(|file| {
            let id = file.strip_suffix(".json")?.to_string();
            Some(SchemaEntry {
                id,
                file: format!("/formSchemas/{file}"),
            })
        })
        .collect();
    schemas.sort_by(|a, b| a.id.cmp(&b.id));
    schemas
}

/// GET /data/rfps/{filename}
pub async fn get_rfp_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(
        &state.config.rfp_dir(),
        &filename,
        "text/plain; charset=utf-8",
        true,
    )
    .await
}

/// GET /uploads/{filename}
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(
        &state.config.upload_dir,
        &filename,
        "application/octet-stream",
        false,
    )
    .await
}

/// GET /formSchemas/{filename}
pub async fn get_form_schema(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(&state.config.schemas_dir(), &filename, "application/json", false).await
}

async fn serve_file(
    dir: &FsPath,
    filename: &str,
    content_type: &'static str,
    attachment: bool,
) -> Result<Response, ApiError> {
    if !is_safe_file_name(filename) {
        return Err(ApiError::NotFound("not found".to_string()));
    }

    let data = match tokio::fs::read(dir.join(filename)).await {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Download of {filename} failed: {e}");
            return Err(ApiError::NotFound("not found".to_string()));
        }
    };

    let mut response = (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], data).into_response();
    if attachment {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
            response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_schemas_lists_json_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sourcing.json"), "{}").unwrap();
        std::fs::write(dir.path().join("audit.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let schemas = read_schemas(dir.path());
        assert_eq!(
            schemas,
            vec![
                SchemaEntry {
                    id: "audit".to_string(),
                    file: "/formSchemas/audit.json".to_string()
                },
                SchemaEntry {
                    id: "sourcing".to_string(),
                    file: "/formSchemas/sourcing.json".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_read_schemas_missing_dir() {
        assert!(read_schemas(FsPath::new("/definitely/not/here")).is_empty());
    }
}
