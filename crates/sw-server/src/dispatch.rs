//! Content request dispatch.
//!
//! Turns a content request posted by the client router into a rendered
//! fragment. Page and section requests get structurally identical responses;
//! only the client uses `target_id` to decide whether to replace the whole
//! view or splice the fragment into one element.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sw_directive::RequestKind;
use sw_templates::{RenderError, TemplateRenderer};

/// Message of the structured error response.
pub const INVALID_REQUEST: &str = "Invalid Request";

/// Content request as posted by the client router.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ContentRequest {
    /// Request kind; anything but `page`/`section` reads as `None`.
    #[serde(rename = "request", default, deserialize_with = "lenient_kind")]
    pub kind: Option<RequestKind>,
    /// Template identifier to render.
    #[serde(default)]
    pub template: Option<String>,
    /// Document title after navigation.
    #[serde(default)]
    pub title: Option<String>,
    /// Template arguments.
    #[serde(default)]
    pub args: Option<Map<String, Value>>,
    /// Assets needing a full reload, echoed back to the client.
    #[serde(rename = "reloadRequired", default)]
    pub reload_required: Option<Vec<String>>,
    /// Element a section is spliced into. Only the client acts on it.
    #[serde(default)]
    pub target_id: Option<String>,
}

/// Content response returned to the client router.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContentResponse {
    /// Rendered fragment.
    Success {
        /// Rendered HTML fragment.
        template: String,
        /// Document title.
        title: Option<String>,
        /// Assets needing a full reload.
        #[serde(rename = "reloadRequired")]
        reload_required: Option<Vec<String>>,
    },
    /// The request was not a page or section request.
    Error {
        /// Human-readable message.
        message: String,
    },
}

impl ContentResponse {
    /// Response for a request of unknown kind.
    pub fn invalid_request() -> Self {
        Self::Error {
            message: INVALID_REQUEST.to_owned(),
        }
    }
}

/// Failure that is not reported as a [`ContentResponse`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Page or section request without a template.
    #[error("content request has no template")]
    MissingTemplate,
    /// Page or section request with mistyped fields.
    #[error("malformed content request: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The template could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Handle a parsed content request.
///
/// # Errors
///
/// Render failures are returned as errors, never as a [`ContentResponse`].
pub fn handle(
    request: &ContentRequest,
    renderer: &dyn TemplateRenderer,
) -> Result<ContentResponse, DispatchError> {
    let Some(kind) = request.kind else {
        tracing::warn!("Rejected content request of unknown kind");
        return Ok(ContentResponse::invalid_request());
    };

    let template = request
        .template
        .as_deref()
        .ok_or(DispatchError::MissingTemplate)?;
    let empty = Map::new();
    let args = request.args.as_ref().unwrap_or(&empty);

    tracing::debug!(%kind, template, target = ?request.target_id, "Dispatching content request");
    let html = renderer.render(template, args)?;

    Ok(ContentResponse::Success {
        template: html,
        title: request.title.clone(),
        reload_required: request.reload_required.clone(),
    })
}

/// Handle a raw JSON request body.
///
/// The kind is checked before the other fields are parsed, so any body whose
/// `request` is not `page` or `section` gets the structured error response
/// no matter what else it contains.
///
/// # Errors
///
/// [`DispatchError::Malformed`] for a page/section body with mistyped fields,
/// otherwise as [`handle`].
pub fn handle_json(
    body: Value,
    renderer: &dyn TemplateRenderer,
) -> Result<ContentResponse, DispatchError> {
    let kind = body
        .get("request")
        .and_then(Value::as_str)
        .and_then(RequestKind::parse);
    if kind.is_none() {
        tracing::warn!(request = ?body.get("request"), "Rejected content request of unknown kind");
        return Ok(ContentResponse::invalid_request());
    }

    let request: ContentRequest = serde_json::from_value(body)?;
    handle(&request, renderer)
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<RequestKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(RequestKind::parse))
}
