//! Cross-origin and header middleware.
//!
//! - Permissive CORS, so pages served from another origin can post content
//!   requests
//! - X-Content-Type-Options on every response

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Create layer that allows cross-origin content requests.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Create layer that adds X-Content-Type-Options header.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}
