//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use sw_config::SiteConfig;
use sw_templates::TemplateRenderer;

/// Application state shared across all handlers.
///
/// Built once before the listener is bound and never mutated afterwards.
pub(crate) struct AppState {
    /// Site settings read on every bootstrap render.
    pub(crate) site: SiteConfig,
    /// Renderer for content requests.
    pub(crate) renderer: Arc<dyn TemplateRenderer>,
}
