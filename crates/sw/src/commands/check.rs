//! `sw check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sw_config::{CliSettings, Config};
use sw_templates::TemplateEnv;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long, env = "SW_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the starting template
    /// cannot be found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            templates_dir: self.templates_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Configuration: {}", path.display()));
        }

        let templates_dir = &config.templates_resolved.dir;
        let Some(template) = config.site_resolved.template() else {
            output.warning("No starting page set");
            return Ok(());
        };

        let env = TemplateEnv::from_dir(templates_dir);
        if !env.has_template(template) {
            return Err(CliError::Validation(format!(
                "starting template {template} not found in {}",
                templates_dir.display()
            )));
        }

        output.success(&format!("Configuration OK (starting page: {template})"));
        Ok(())
    }
}
