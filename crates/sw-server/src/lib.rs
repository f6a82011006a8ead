//! HTTP server for Sparkle partial-content delivery.
//!
//! A Sparkle site is served from a single path:
//!
//! - `GET /` returns the bootstrap document, which embeds the site metadata
//!   and the start instruction for the client router
//! - `POST /` takes a content request and returns a rendered fragment as JSON
//!
//! Rendered fragments contain directive strings (see `sw-directive`) that make
//! the client router issue further content requests.
//!
//! # Quick Start
//!
//! ```ignore
//! use sw_config::IndexPage;
//! use sw_server::SiteServer;
//! use sw_templates::TemplateEnv;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = SiteServer::new(TemplateEnv::from_dir("templates"));
//!     server.site_mut().set_index(IndexPage::new("index.html").title("SparkleWeb"));
//!     server.site_mut().set_styles([("main", "/static/main.css")]);
//!
//!     let router = server.router().unwrap();
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5300").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──GET /──► bootstrap::render(SiteConfig, base URL)
//!    │
//!    └──POST /──► dispatch::handle_json ──► TemplateRenderer::render
//!                                                 │
//!                                                 └─► load(...) directives in fragments
//! ```

mod app;
pub mod bootstrap;
pub mod dispatch;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use sw_config::{ConfigError, SiteConfig};
use sw_templates::{TemplateEnv, TemplateRenderer};

pub use bootstrap::{SiteMetadata, StartInstruction};
pub use dispatch::{ContentRequest, ContentResponse, DispatchError};
use state::AppState;

/// A site being set up: its settings plus the renderer for fragments.
///
/// Settings are mutable until [`SiteServer::router`] freezes them.
pub struct SiteServer {
    site: SiteConfig,
    renderer: Arc<dyn TemplateRenderer>,
}

impl SiteServer {
    /// Site with default settings and no starting page.
    pub fn new(renderer: impl TemplateRenderer + 'static) -> Self {
        Self::with_site(SiteConfig::default(), renderer)
    }

    /// Site with the given settings.
    pub fn with_site(site: SiteConfig, renderer: impl TemplateRenderer + 'static) -> Self {
        Self {
            site,
            renderer: Arc::new(renderer),
        }
    }

    /// Current settings.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Settings for in-place changes.
    pub fn site_mut(&mut self) -> &mut SiteConfig {
        &mut self.site
    }

    /// Replace the settings, returning the previous ones.
    pub fn set_site(&mut self, site: SiteConfig) -> SiteConfig {
        std::mem::replace(&mut self.site, site)
    }

    /// Validate the settings and build the router serving this site.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the bootstrap template lacks a
    /// substitution point.
    pub fn router(self) -> Result<Router, ConfigError> {
        self.site.validate()?;

        let state = Arc::new(AppState {
            site: self.site,
            renderer: self.renderer,
        });
        Ok(app::create_router(state))
    }
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory templates are loaded from.
    pub templates_dir: PathBuf,
    /// Site settings.
    pub site: SiteConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5300,
            templates_dir: PathBuf::from("templates"),
            site: SiteConfig::default(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = TemplateEnv::from_dir(&config.templates_dir);

    if let Some(template) = config.site.template()
        && !renderer.has_template(template)
    {
        tracing::warn!(
            template,
            dir = %config.templates_dir.display(),
            "Starting template not found"
        );
    }

    let app = SiteServer::with_site(config.site, renderer).router()?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Sparkle config.
#[must_use]
pub fn server_config_from_sw_config(config: &sw_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        templates_dir: config.templates_resolved.dir.clone(),
        site: config.site_resolved.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sw_config::IndexPage;
    use sw_templates::RenderError;

    use super::*;

    fn renderer() -> impl TemplateRenderer {
        |template: &str, _: &serde_json::Map<String, serde_json::Value>| {
            Err::<String, _>(RenderError::NotFound(template.to_owned()))
        }
    }

    #[test]
    fn test_set_site_returns_previous() {
        let mut server = SiteServer::new(renderer());
        server.site_mut().set_index(IndexPage::new("home.html"));

        let previous = server.set_site(SiteConfig::default());

        assert_eq!(previous.template(), Some("home.html"));
        assert_eq!(server.site().template(), None);
    }

    #[test]
    fn test_router_rejects_invalid_bootstrap() {
        let mut server = SiteServer::new(renderer());
        server
            .site_mut()
            .configure([("bootstrap_template", json!("<html></html>"))])
            .unwrap();

        assert!(matches!(server.router(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_server_config_from_sw_config() {
        let config = sw_config::Config::default();

        let server_config = server_config_from_sw_config(&config);

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 5300);
        assert_eq!(server_config.templates_dir, config.templates_resolved.dir);
        assert_eq!(server_config.site, SiteConfig::default());
    }
}
