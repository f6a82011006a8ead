//! Bootstrap document endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::Html;

use crate::bootstrap;
use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_bootstrap(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, ServerError> {
    let base_url = bootstrap::request_base_url(&headers, &uri);
    let html = bootstrap::render(&state.site, &base_url)?;
    Ok(Html(html))
}
