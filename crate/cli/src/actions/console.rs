use parameter_manager_client::Parameter;
use serde::Serialize;

use crate::error::CliError;

pub const PM_CLI_FORMAT: &str = "PM_CLI_FORMAT";
pub const CLI_DEFAULT_FORMAT: &str = "text";
pub const CLI_JSON_FORMAT: &str = "json";

/// What a command prints: a text line, or a JSON document when
/// `PM_CLI_FORMAT=json`.
#[derive(Serialize, Debug, Default)]
pub struct Stdout {
    stdout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<Parameter>,
}

impl Stdout {
    #[must_use]
    pub fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_owned(),
            ..Default::default()
        }
    }

    pub fn set_parameter(&mut self, parameter: Parameter) {
        self.parameter = Some(parameter);
    }

    fn json_format_from_env() -> bool {
        std::env::var(PM_CLI_FORMAT)
            .unwrap_or_else(|_| CLI_DEFAULT_FORMAT.to_owned())
            .to_lowercase()
            == CLI_JSON_FORMAT
    }

    pub fn write(&self) -> Result<(), CliError> {
        if Self::json_format_from_env() {
            let console_stdout = serde_json::to_string_pretty(&self)?;
            println!("{console_stdout}");
        } else if !self.stdout.is_empty() {
            println!("{}", self.stdout);
        }
        Ok(())
    }
}
