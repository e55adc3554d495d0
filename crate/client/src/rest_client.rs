use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;
use url::Url;

use crate::{
    auth::resolve_access_token,
    config::ClientConf,
    error::{ClientError, result::ClientResultHelper},
    model::{GoogleApiErrorBody, Parameter},
    request::UpdateParameterRequest,
    resource::ParameterName,
};

const API_VERSION: &str = "v1";

/// REST client of the Parameter Manager `v1` API.
#[derive(Clone)]
pub struct ParameterManagerClient {
    pub server_url: String,
    client: Client,
    token: String,
}

impl ParameterManagerClient {
    /// Build the HTTP client and resolve the bearer token from the
    /// configuration.
    ///
    /// # Errors
    /// Return an error if the HTTP client cannot be built, if no credentials
    /// are configured or if the token exchange fails.
    pub async fn instantiate(conf: &ClientConf) -> Result<Self, ClientError> {
        let server_url = conf.parameter_manager_url.trim_end_matches('/').to_owned();
        // fail early on a malformed endpoint
        Url::parse(&server_url)?;

        let mut builder = ClientBuilder::new().danger_accept_invalid_certs(conf.accept_invalid_certs);
        if let Some(timeout_secs) = conf.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .context("Unable to build the HTTP client")?;

        let token = resolve_access_token(&client, conf).await?;

        Ok(Self {
            server_url,
            client,
            token,
        })
    }

    /// `{server_url}/v1/projects/{p}/locations/{l}/parameters/{id}`, every
    /// identifier percent-encoded as a single path segment.
    fn resource_url(&self, name: &ParameterName) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/{API_VERSION}", self.server_url))?;
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Configuration(format!(
                    "{} cannot be used as a base URL",
                    self.server_url
                ))
            })?
            .extend(name.segments());
        Ok(url)
    }

    /// `GET /v1/{name}`
    pub async fn get_parameter(&self, name: &ParameterName) -> Result<Parameter, ClientError> {
        let url = self.resource_url(name)?;
        trace!("==> GET {url}");
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;
        handle_response(url.path(), response).await
    }

    /// `PATCH /v1/{name}?updateMask=...` with the request delta as body.
    pub async fn update_parameter(
        &self,
        request: &UpdateParameterRequest,
    ) -> Result<Parameter, ClientError> {
        let mut url = self.resource_url(request.name())?;
        url.query_pairs_mut()
            .append_pair("updateMask", &request.update_mask().to_query_value());
        trace!("==> PATCH {url}\n{}", to_pretty_json(request.parameter()));
        let response = self
            .client
            .patch(url.clone())
            .bearer_auth(&self.token)
            .json(request.parameter())
            .send()
            .await?;
        handle_response(url.path(), response).await
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[N/A]".to_owned())
}

async fn handle_response<R>(endpoint: &str, response: Response) -> Result<R, ClientError>
where
    R: DeserializeOwned + Serialize,
{
    if response.status().is_success() {
        let text = response.text().await?;
        let result = serde_json::from_str::<R>(&text)
            .map_err(|e| ClientError::ResponseFailed(format!("{endpoint}: {e}")))?;
        trace!("<==\n{}", to_pretty_json(&result));
        return Ok(result)
    }

    let p = handle_error(endpoint, response).await?;
    Err(ClientError::RequestFailed(p))
}

/// Errors sent by the front ends of the API do not always carry a Google
/// error body. In that case, derive a clearer message from the status.
async fn handle_error(endpoint: &str, response: Response) -> Result<String, ClientError> {
    trace!("Error response received on {endpoint}: Response: {response:?}");
    let status = response.status();
    let text = response.text().await?;

    if let Ok(body) = serde_json::from_str::<GoogleApiErrorBody>(&text) {
        let code = if body.error.status.is_empty() {
            status.to_string()
        } else {
            body.error.status
        };
        return Ok(format!("{endpoint}: {code}: {}", body.error.message))
    }

    Ok(format!(
        "{}: {}",
        endpoint,
        if text.is_empty() {
            match status {
                StatusCode::NOT_FOUND => "Parameter Manager endpoint does not exist".to_owned(),
                StatusCode::UNAUTHORIZED => "Bad authorization token".to_owned(),
                _ => format!("{status}"),
            }
        } else {
            format!("{status} {text}")
        }
    ))
}
