//! Axum HTTP surface.

pub mod files;
pub mod requests;
pub mod rfp;
pub mod vendors;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Upper bound on request bodies (multipart uploads included).
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Serve frontend
        .route("/", get(files::serve_index))
        // API routes
        .route(
            "/api/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/api/schemas", get(files::list_schemas))
        .route("/api/select_vendors", post(vendors::select_vendors))
        .route("/api/rebuild_embeddings", post(vendors::rebuild_embeddings))
        .route("/api/generate_rfp/{id}", post(rfp::generate_rfp))
        // File downloads
        .route("/data/rfps/{filename}", get(files::get_rfp_file))
        .route("/uploads/{filename}", get(files::get_upload))
        .route("/formSchemas/{filename}", get(files::get_form_schema))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
