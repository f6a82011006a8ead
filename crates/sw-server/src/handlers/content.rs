//! Content request endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::dispatch::{self, ContentResponse};
use crate::error::ServerError;
use crate::state::AppState;

/// Handle POST /.
pub(crate) async fn post_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ContentResponse>, ServerError> {
    let response = dispatch::handle_json(body, state.renderer.as_ref())?;
    Ok(Json(response))
}
