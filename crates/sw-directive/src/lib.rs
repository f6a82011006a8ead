//! Directive strings for the Sparkle client router.
//!
//! A directive is a JavaScript call embedded in rendered markup (usually an
//! `onclick` attribute) that tells the client router to issue a content request:
//!
//! ```text
//! loadPage({"request": "page", "template": "about.html", "title": "About", "args": {}, "reloadRequired": []})
//! ```
//!
//! Directives are built as structured values and serialized once, so template
//! names, titles and error messages containing quotes cannot break the call.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let data = json!({"template": "about.html", "title": "About"});
//! let call = sw_directive::directive("page", data.as_object().unwrap()).unwrap();
//! assert!(call.starts_with("loadPage({\"request\": \"page\""));
//! ```

mod directive;
mod format;

use serde::{Deserialize, Serialize};

pub use directive::{
    Directive, DirectiveError, ERROR_CONTAINER_ID, ERROR_ROUTE, ERROR_TEMPLATE, ERROR_TITLE,
    Navigation, directive,
};

/// Kind of content request understood by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Replace the whole view.
    Page,
    /// Splice the fragment into a target element.
    Section,
}

impl RequestKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
        }
    }

    /// Parse a wire name. Anything other than `page`/`section` is `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "page" => Some(Self::Page),
            "section" => Some(Self::Section),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
