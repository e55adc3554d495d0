use jwt_simple::{
    algorithms::RSAKeyPairLike,
    prelude::{Claims, Duration, RS256KeyPair},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ServiceAccount;
use crate::{
    config::ClientConf,
    error::{ClientError, result::ClientResultHelper},
};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const GRANT_TYPE_SERVICE_ACCOUNT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
// Token expiration time in hours
const TOKEN_EXPIRATION_TIME: u64 = 1;

#[derive(Serialize, Deserialize, Debug)]
pub struct GoogleAuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u32,
    #[serde(default)]
    pub token_type: String,
}

#[derive(Serialize, Deserialize)]
struct GoogleAuthRequest {
    grant_type: String,
    assertion: String,
}

impl GoogleAuthRequest {
    fn new(assertion: String) -> Self {
        Self {
            grant_type: GRANT_TYPE_SERVICE_ACCOUNT.to_owned(),
            assertion,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct JwtAuth {
    aud: String,
    iss: String,
    scope: String,
}

/// Self signed assertion of the service account, valid for one hour.
pub fn create_jwt(service_account: &ServiceAccount) -> Result<String, ClientError> {
    let key_pair = RS256KeyPair::from_pem(&service_account.private_key)?
        .with_key_id(&service_account.private_key_id);
    let jwt_data = JwtAuth {
        aud: service_account.token_uri.clone(),
        iss: service_account.client_email.clone(),
        scope: CLOUD_PLATFORM_SCOPE.to_owned(),
    };

    let claims = Claims::with_custom_claims(jwt_data, Duration::from_hours(TOKEN_EXPIRATION_TIME));

    Ok(key_pair.sign(claims)?)
}

/// Exchange the service account assertion for an OAuth2 access token.
pub async fn retrieve_token(
    client: &Client,
    service_account: &ServiceAccount,
) -> Result<String, ClientError> {
    let jwt = create_jwt(service_account)?;

    debug!(
        "requesting an access token for {} at {}",
        service_account.client_email, service_account.token_uri
    );
    let response = client
        .post(&service_account.token_uri)
        .form(&GoogleAuthRequest::new(jwt))
        .send()
        .await?;
    let status = response.status();
    let response_text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::TokenRetrieval(format!(
            "{status}: {response_text}"
        )))
    }
    let response: GoogleAuthResponse = serde_json::from_str(&response_text)
        .context("Unable to parse the token endpoint response")?;
    Ok(response.access_token)
}

/// The bearer token to use with the configuration: the configured token
/// first, the service account key otherwise.
pub(crate) async fn resolve_access_token(
    client: &Client,
    conf: &ClientConf,
) -> Result<String, ClientError> {
    if let Some(token) = &conf.access_token {
        return Ok(token.clone())
    }
    let Some(key_path) = &conf.service_account_key_path else {
        return Err(ClientError::Configuration(
            "no credentials: set either access_token or service_account_key_path".to_owned(),
        ))
    };
    let service_account = ServiceAccount::load(key_path)?;
    retrieve_token(client, &service_account).await
}
