use clap::Subcommand;
use parameter_manager_client::ClientConf;

use self::{
    get::GetParameterAction, remove_kms_key::RemoveKmsKeyAction,
    update_kms_key::UpdateKmsKeyAction,
};
use crate::error::result::CliResult;

mod get;
mod remove_kms_key;
mod update_kms_key;

/// Manage the parameters of the `global` location.
#[derive(Subcommand)]
pub enum ParameterCommands {
    Get(GetParameterAction),
    UpdateKmsKey(UpdateKmsKeyAction),
    RemoveKmsKey(RemoveKmsKeyAction),
}

impl ParameterCommands {
    pub async fn process(&self, conf: &ClientConf) -> CliResult<()> {
        match self {
            Self::Get(action) => action.run(conf).await,
            Self::UpdateKmsKey(action) => action.run(conf).await,
            Self::RemoveKmsKey(action) => action.run(conf).await,
        }
    }
}
