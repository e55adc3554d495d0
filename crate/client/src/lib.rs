pub use auth::{CLOUD_PLATFORM_SCOPE, ServiceAccount, create_jwt, retrieve_token};
pub use config::{ClientConf, DEFAULT_PARAMETER_MANAGER_URL, PM_CLI_CONF_ENV};
pub use error::{
    ClientError,
    result::{ClientResult, ClientResultHelper},
};
pub use model::{
    FieldMask, GoogleApiErrorBody, GoogleApiErrorContent, Parameter, ParameterFormat,
    ResourcePolicyMember,
};
pub use parameters::{get_param, remove_param_kms_key, update_param_kms_key};
pub use request::{ParameterUpdate, UpdateParameterRequest};
pub use resource::{GLOBAL_LOCATION, ParameterName};
pub use rest_client::ParameterManagerClient;
pub use service::{Connector, ParameterService};

mod auth;
mod config;
mod error;
mod model;
mod parameters;
mod request;
mod resource;
mod rest_client;
mod service;
