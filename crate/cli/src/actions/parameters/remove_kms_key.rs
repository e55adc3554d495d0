use clap::Parser;
use parameter_manager_client::{ClientConf, remove_param_kms_key};

use crate::{actions::console, error::result::CliResult};

/// Remove the Cloud KMS key protecting a parameter.
#[derive(Parser, Debug)]
#[clap(verbatim_doc_comment)]
pub struct RemoveKmsKeyAction {
    /// The project of the parameter
    #[clap(long = "project-id", short = 'p', required = true)]
    project_id: String,

    /// The identifier of the parameter
    #[clap(long = "parameter-id", short = 'i', required = true)]
    parameter_id: String,
}

impl RemoveKmsKeyAction {
    pub async fn run(&self, conf: &ClientConf) -> CliResult<()> {
        let mut out = Vec::new();
        let parameter =
            remove_param_kms_key(&mut out, conf, &self.project_id, &self.parameter_id).await?;

        let mut stdout = console::Stdout::new(String::from_utf8(out)?.trim_end());
        stdout.set_parameter(parameter);
        stdout.write()
    }
}
