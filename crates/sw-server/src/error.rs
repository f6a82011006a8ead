//! Server error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::dispatch::DispatchError;

/// Failure surfaced to the transport layer instead of a content response.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Content request could not be served.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Bootstrap payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            Self::Dispatch(DispatchError::Malformed(err)) => {
                tracing::warn!(error = %err, "Malformed content request");
                (StatusCode::BAD_REQUEST, "bad_request", Some(err.to_string()))
            }
            Self::Dispatch(err) => {
                tracing::error!(error = %err, "Content rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "render_failed", None)
            }
            Self::Serialization(err) => {
                tracing::error!(error = %err, "Bootstrap serialization failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use sw_templates::RenderError;

    use super::*;

    #[test]
    fn test_render_failure_is_server_error() {
        let err = ServerError::from(DispatchError::Render(RenderError::NotFound(
            "missing.html".to_owned(),
        )));

        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_template_is_server_error() {
        let err = ServerError::from(DispatchError::MissingTemplate);

        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_malformed_is_bad_request() {
        let parse = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = ServerError::from(DispatchError::Malformed(parse));

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_omits_empty_message() {
        let body = ErrorResponse {
            error: "render_failed",
            message: None,
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "render_failed");
        assert!(json.get("message").is_none());
    }
}
