use async_trait::async_trait;

use crate::{
    config::ClientConf,
    error::ClientError,
    model::Parameter,
    request::UpdateParameterRequest,
    resource::ParameterName,
    rest_client::ParameterManagerClient,
};

/// Remote operations of the Parameter Manager used by this crate.
#[async_trait]
pub trait ParameterService: Send + Sync {
    async fn get_parameter(&self, name: &ParameterName) -> Result<Parameter, ClientError>;

    async fn update_parameter(
        &self,
        request: &UpdateParameterRequest,
    ) -> Result<Parameter, ClientError>;
}

/// Builds a [`ParameterService`] for the duration of one operation.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: ParameterService;

    async fn connect(&self) -> Result<Self::Client, ClientError>;
}

#[async_trait]
impl ParameterService for ParameterManagerClient {
    async fn get_parameter(&self, name: &ParameterName) -> Result<Parameter, ClientError> {
        Self::get_parameter(self, name).await
    }

    async fn update_parameter(
        &self,
        request: &UpdateParameterRequest,
    ) -> Result<Parameter, ClientError> {
        Self::update_parameter(self, request).await
    }
}

#[async_trait]
impl Connector for ClientConf {
    type Client = ParameterManagerClient;

    async fn connect(&self) -> Result<ParameterManagerClient, ClientError> {
        ParameterManagerClient::instantiate(self).await
    }
}
