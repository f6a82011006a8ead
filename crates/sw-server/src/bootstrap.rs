//! Bootstrap document rendering.
//!
//! The bootstrap document is served once per visit. It embeds two JSON
//! payloads, [`SiteMetadata`] and [`StartInstruction`], which the client router
//! uses to initialize itself and issue the first content request.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, Uri, header};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sw_config::{SITE_DATA_MARKER, START_DATA_MARKER, SiteConfig};

/// Served when no starting page is configured.
pub const NOT_CONFIGURED_HTML: &str = r#"<div style="text-align: center;">
<h1>Not Configured</h1>
<br>
No Starting page set.<br>Set a starting page with `set_index` or `template` in the [site] table of sw.toml.
</div>"#;

/// Routing state handed to the client router's `init`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    /// Base URL content requests are posted to.
    pub route: String,
    /// Stylesheets by name.
    pub css_stylesheets: BTreeMap<String, String>,
    /// Scripts by name.
    pub js_scripts: BTreeMap<String, String>,
}

impl SiteMetadata {
    /// Derive the metadata for a request arriving at `route`.
    pub fn from_config(config: &SiteConfig, route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            css_stylesheets: config.css_stylesheets().clone(),
            js_scripts: config.js_scripts().clone(),
        }
    }
}

/// First navigation handed to the client router's `start`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartInstruction {
    /// Starting template.
    pub template: Option<String>,
    /// Starting title.
    pub title: Option<String>,
    /// Starting template arguments.
    pub args: Option<Map<String, Value>>,
    /// Assets needing a full reload.
    pub reload: Option<Vec<String>>,
}

impl StartInstruction {
    /// Derive the start instruction from the site settings.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            template: config.template().map(str::to_owned),
            title: config.title().map(str::to_owned),
            args: config.args().cloned(),
            reload: config.reload().map(<[String]>::to_vec),
        }
    }
}

/// Render the bootstrap document for a request arriving at `base_url`.
///
/// Returns [`NOT_CONFIGURED_HTML`] when no starting template is set.
///
/// # Errors
///
/// Fails only if a payload cannot be serialized to JSON.
pub fn render(config: &SiteConfig, base_url: &str) -> serde_json::Result<String> {
    if config.template().is_none() {
        return Ok(NOT_CONFIGURED_HTML.to_owned());
    }

    let site_data = script_json(&SiteMetadata::from_config(config, base_url))?;
    let start_data = script_json(&StartInstruction::from_config(config))?;

    Ok(substitute(
        config.bootstrap_template(),
        &[(SITE_DATA_MARKER, &site_data), (START_DATA_MARKER, &start_data)],
    ))
}

/// Base URL of a request: scheme, host and path without the query string.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it.
pub fn request_base_url(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{scheme}://{host}{}", uri.path())
}

/// Serialize `value` as JSON that can sit inside a `<script>` element.
///
/// The escaped characters can only occur inside JSON strings, so the output
/// parses to the same value.
fn script_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Replace markers in a single pass so substituted text is never rescanned.
fn substitute(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((pos, marker, value)) = replacements
        .iter()
        .filter_map(|(marker, value)| rest.find(marker).map(|pos| (pos, *marker, *value)))
        .min_by_key(|(pos, _, _)| *pos)
    {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + marker.len()..];
    }
    out.push_str(rest);

    out
}
