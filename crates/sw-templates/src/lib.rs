//! Template rendering for Sparkle fragments.
//!
//! The content dispatcher only needs `render(template, args) -> HTML`; that
//! seam is the [`TemplateRenderer`] trait. [`TemplateEnv`] implements it with
//! minijinja and exposes the directive generator to templates as `load`, usable
//! both as a filter and as a function:
//!
//! ```text
//! <a onclick="{{ 'page'|load(template='about.html', title='About') }}">About</a>
//! <a onclick="{{ load('section', template='news.html', title='News', target_id='side') }}">News</a>
//! ```
//!
//! Template arguments are available as `args`.

mod env;

use serde_json::{Map, Value};

pub use env::TemplateEnv;

/// Error returned when a fragment cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No template with this identifier.
    #[error("Template not found: {0}")]
    NotFound(String),
    /// Template failed to compile or evaluate.
    #[error("Failed to render {template}: {source}")]
    Template {
        /// Template identifier.
        template: String,
        /// Engine error.
        #[source]
        source: minijinja::Error,
    },
}

/// Renders a template identifier with an argument bag into HTML.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `args`.
    fn render(&self, template: &str, args: &Map<String, Value>) -> Result<String, RenderError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &Map<String, Value>) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, template: &str, args: &Map<String, Value>) -> Result<String, RenderError> {
        self(template, args)
    }
}
