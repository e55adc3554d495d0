use clap::Parser;
use parameter_manager_client::{ClientConf, update_param_kms_key};

use crate::{actions::console, error::result::CliResult};

/// Protect a parameter with a Cloud KMS key.
///
/// Only the KMS key association is updated: the format, labels and versions
/// of the parameter are left untouched.
#[derive(Parser, Debug)]
#[clap(verbatim_doc_comment)]
pub struct UpdateKmsKeyAction {
    /// The project of the parameter
    #[clap(long = "project-id", short = 'p', required = true)]
    project_id: String,

    /// The identifier of the parameter
    #[clap(long = "parameter-id", short = 'i', required = true)]
    parameter_id: String,

    /// The full resource name of the Cloud KMS key,
    /// e.g. `projects/my-project/locations/global/keyRings/my-key-ring/cryptoKeys/my-key`
    #[clap(long = "kms-key", short = 'k', required = true)]
    kms_key: String,
}

impl UpdateKmsKeyAction {
    pub async fn run(&self, conf: &ClientConf) -> CliResult<()> {
        let mut out = Vec::new();
        let parameter = update_param_kms_key(
            &mut out,
            conf,
            &self.project_id,
            &self.parameter_id,
            &self.kms_key,
        )
        .await?;

        let mut stdout = console::Stdout::new(String::from_utf8(out)?.trim_end());
        stdout.set_parameter(parameter);
        stdout.write()
    }
}
