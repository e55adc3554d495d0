use clap::Parser;
use parameter_manager_client::{ClientConf, get_param};

use crate::{actions::console, error::result::CliResult};

/// Display a parameter
#[derive(Parser, Debug)]
pub struct GetParameterAction {
    /// The project of the parameter
    #[clap(long = "project-id", short = 'p', required = true)]
    project_id: String,

    /// The identifier of the parameter
    #[clap(long = "parameter-id", short = 'i', required = true)]
    parameter_id: String,
}

impl GetParameterAction {
    pub async fn run(&self, conf: &ClientConf) -> CliResult<()> {
        let parameter = get_param(conf, &self.project_id, &self.parameter_id).await?;

        let format = serde_json::to_value(parameter.format.unwrap_or_default())?;
        let format = format.as_str().unwrap_or("PARAMETER_FORMAT_UNSPECIFIED");
        let line = match &parameter.kms_key {
            Some(kms_key) => format!(
                "Found parameter {} with format {format} and kms_key {kms_key}",
                parameter.name
            ),
            None => format!("Found parameter {} with format {format}", parameter.name),
        };
        let mut stdout = console::Stdout::new(&line);
        stdout.set_parameter(parameter);
        stdout.write()
    }
}
