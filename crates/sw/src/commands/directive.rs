//! `sw directive` command implementation.

use clap::Args;
use serde_json::{Map, Value};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the directive command.
#[derive(Args)]
pub(crate) struct DirectiveArgs {
    /// Directive kind: page, section or error.
    kind: String,

    /// Directive data as a JSON object, e.g. '{"template": "a.html", "title": "A"}'.
    #[arg(short, long, default_value = "{}")]
    data: String,
}

impl DirectiveArgs {
    /// Execute the directive command.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a JSON object or lacks a field the
    /// kind requires.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let data = parse_data(&self.data)?;
        let call = sw_directive::directive(&self.kind, &data)?;
        Output::stdout().info(&call);
        Ok(())
    }
}

fn parse_data(data: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str(data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::Validation(
            "--data must be a JSON object".to_owned(),
        )),
        Err(e) => Err(CliError::Validation(format!("--data is not valid JSON: {e}"))),
    }
}
