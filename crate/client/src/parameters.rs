//! Operations on a single parameter.
//!
//! Each operation connects, issues exactly one remote call, and drops the
//! client before returning, on the success path as on the error paths.
//! Nothing is retried here: retries belong to the transport.

use std::io::Write;

use crate::{
    error::ClientError,
    model::Parameter,
    request::UpdateParameterRequest,
    resource::ParameterName,
    service::{Connector, ParameterService},
};

/// Associate the Cloud KMS key `kms_key` with the parameter
/// `projects/{project_id}/locations/global/parameters/{parameter_id}`.
///
/// Only the `kms_key` field is sent and named in the update mask; the
/// value, format and labels of the parameter are left untouched.
///
/// On success, `Updated parameter <name> with kms_key <key>` is written
/// to `writer` and the updated parameter is returned.
///
/// # Errors
/// - [`ClientError::ClientInitialization`] if the client cannot be created
/// - [`ClientError::UpdateParameter`] if the remote call fails
/// - [`ClientError::MissingKmsKey`] if the service answers without a key
///
/// Nothing is written to `writer` on error.
pub async fn update_param_kms_key<C, W>(
    writer: &mut W,
    connector: &C,
    project_id: &str,
    parameter_id: &str,
    kms_key: &str,
) -> Result<Parameter, ClientError>
where
    C: Connector + ?Sized,
    W: Write + ?Sized,
{
    let client = connector
        .connect()
        .await
        .map_err(ClientError::client_initialization)?;

    let request =
        UpdateParameterRequest::set_kms_key(ParameterName::global(project_id, parameter_id), kms_key);
    let parameter = client
        .update_parameter(&request)
        .await
        .map_err(ClientError::update_parameter)?;

    let Some(kms_key) = parameter.kms_key.as_deref() else {
        return Err(ClientError::MissingKmsKey(parameter.name))
    };
    writeln!(
        writer,
        "Updated parameter {} with kms_key {kms_key}",
        parameter.name
    )?;
    Ok(parameter)
}

/// Remove the Cloud KMS key associated with a parameter.
///
/// The update mask names `kms_key` while the payload leaves it unset,
/// which clears the association server side.
/// On success, `Removed kms_key for parameter <name>` is written to `writer`.
///
/// # Errors
/// - [`ClientError::ClientInitialization`] if the client cannot be created
/// - [`ClientError::UpdateParameter`] if the remote call fails
pub async fn remove_param_kms_key<C, W>(
    writer: &mut W,
    connector: &C,
    project_id: &str,
    parameter_id: &str,
) -> Result<Parameter, ClientError>
where
    C: Connector + ?Sized,
    W: Write + ?Sized,
{
    let client = connector
        .connect()
        .await
        .map_err(ClientError::client_initialization)?;

    let request = UpdateParameterRequest::clear_kms_key(ParameterName::global(project_id, parameter_id));
    let parameter = client
        .update_parameter(&request)
        .await
        .map_err(ClientError::update_parameter)?;

    writeln!(writer, "Removed kms_key for parameter {}", parameter.name)?;
    Ok(parameter)
}

/// Fetch a parameter of the `global` location.
///
/// # Errors
/// - [`ClientError::ClientInitialization`] if the client cannot be created
/// - [`ClientError::GetParameter`] if the remote call fails
pub async fn get_param<C>(
    connector: &C,
    project_id: &str,
    parameter_id: &str,
) -> Result<Parameter, ClientError>
where
    C: Connector + ?Sized,
{
    let client = connector
        .connect()
        .await
        .map_err(ClientError::client_initialization)?;

    client
        .get_parameter(&ParameterName::global(project_id, parameter_id))
        .await
        .map_err(ClientError::get_parameter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::{get_param, remove_param_kms_key, update_param_kms_key};
    use crate::{
        ClientError, Parameter, ParameterName, UpdateParameterRequest,
        service::{Connector, ParameterService},
    };

    const NAME: &str = "projects/p1/locations/global/parameters/param1";
    const KMS_KEY: &str = "projects/p1/locations/global/keyRings/r/cryptoKeys/k";

    #[derive(Clone, Copy)]
    enum Outcome {
        FailConnect,
        FailUpdate,
        Answer { with_kms_key: bool },
    }

    /// Records what the operations send and how many clients get dropped.
    #[derive(Clone)]
    struct FakeConnector {
        outcome: Outcome,
        connects: Arc<AtomicUsize>,
        drops: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<UpdateParameterRequest>>>,
    }

    impl FakeConnector {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                connects: Arc::new(AtomicUsize::new(0)),
                drops: Arc::new(AtomicUsize::new(0)),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> Vec<UpdateParameterRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    struct FakeClient {
        connector: FakeConnector,
    }

    impl Drop for FakeClient {
        fn drop(&mut self) {
            self.connector.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ParameterService for FakeClient {
        async fn get_parameter(&self, name: &ParameterName) -> Result<Parameter, ClientError> {
            if matches!(self.connector.outcome, Outcome::FailUpdate) {
                return Err(ClientError::RequestFailed(
                    "NOT_FOUND: Parameter not found".to_owned(),
                ))
            }
            Ok(Parameter {
                name: name.to_string(),
                kms_key: Some(KMS_KEY.to_owned()),
                ..Default::default()
            })
        }

        async fn update_parameter(
            &self,
            request: &UpdateParameterRequest,
        ) -> Result<Parameter, ClientError> {
            self.connector.requests.lock().unwrap().push(request.clone());
            match self.connector.outcome {
                Outcome::FailUpdate => Err(ClientError::RequestFailed(
                    "NOT_FOUND: Parameter not found".to_owned(),
                )),
                Outcome::Answer { with_kms_key } => Ok(Parameter {
                    name: request.name().to_string(),
                    kms_key: if with_kms_key {
                        request.parameter().kms_key.clone()
                    } else {
                        None
                    },
                    ..Default::default()
                }),
                Outcome::FailConnect => unreachable!("no client is built"),
            }
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        type Client = FakeClient;

        async fn connect(&self) -> Result<FakeClient, ClientError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if matches!(self.outcome, Outcome::FailConnect) {
                return Err(ClientError::Configuration("missing credentials".to_owned()))
            }
            Ok(FakeClient {
                connector: self.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_update_kms_key_success() {
        let connector = FakeConnector::new(Outcome::Answer { with_kms_key: true });
        let mut out = Vec::new();

        let parameter = update_param_kms_key(&mut out, &connector, "p1", "param1", KMS_KEY)
            .await
            .unwrap();

        assert_eq!(parameter.name, NAME);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Updated parameter {NAME} with kms_key {KMS_KEY}\n")
        );
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_kms_key_sends_a_partial_update() {
        let connector = FakeConnector::new(Outcome::Answer { with_kms_key: true });
        let mut out = Vec::new();
        update_param_kms_key(&mut out, &connector, "p1", "param1", KMS_KEY)
            .await
            .unwrap();

        let requests = connector.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.name().to_string(), NAME);
        assert_eq!(request.update_mask().paths, vec!["kms_key".to_owned()]);
        assert_eq!(
            request.parameter(),
            &Parameter {
                name: NAME.to_owned(),
                kms_key: Some(KMS_KEY.to_owned()),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_update_kms_key_client_creation_failure() {
        let connector = FakeConnector::new(Outcome::FailConnect);
        let mut out = Vec::new();

        let e = update_param_kms_key(&mut out, &connector, "p1", "param1", KMS_KEY)
            .await
            .unwrap_err();

        assert!(matches!(e, ClientError::ClientInitialization(_)));
        assert!(e.to_string().contains("Parameter Manager client"));
        assert!(out.is_empty());
        assert!(connector.requests().is_empty());
        assert_eq!(connector.drops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_kms_key_update_failure() {
        let connector = FakeConnector::new(Outcome::FailUpdate);
        let mut out = Vec::new();

        let e = update_param_kms_key(&mut out, &connector, "p1", "param1", KMS_KEY)
            .await
            .unwrap_err();

        assert!(matches!(e, ClientError::UpdateParameter(_)));
        assert!(e.to_string().contains("update parameter"));
        assert!(e.to_string().contains("Parameter not found"));
        assert!(out.is_empty());
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_kms_key_missing_key_in_response() {
        let connector = FakeConnector::new(Outcome::Answer {
            with_kms_key: false,
        });
        let mut out = Vec::new();

        let e = update_param_kms_key(&mut out, &connector, "p1", "param1", KMS_KEY)
            .await
            .unwrap_err();

        assert!(matches!(e, ClientError::MissingKmsKey(ref name) if name == NAME));
        assert!(out.is_empty());
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_kms_key() {
        let connector = FakeConnector::new(Outcome::Answer {
            with_kms_key: false,
        });
        let mut out = Vec::new();

        let parameter = remove_param_kms_key(&mut out, &connector, "p1", "param1")
            .await
            .unwrap();

        assert!(parameter.kms_key.is_none());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Removed kms_key for parameter {NAME}\n")
        );
        let requests = connector.requests();
        assert_eq!(requests[0].update_mask().paths, vec!["kms_key".to_owned()]);
        assert!(requests[0].parameter().kms_key.is_none());
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_kms_key_update_failure() {
        let connector = FakeConnector::new(Outcome::FailUpdate);
        let mut out = Vec::new();

        let e = remove_param_kms_key(&mut out, &connector, "p1", "param1")
            .await
            .unwrap_err();

        assert!(matches!(e, ClientError::UpdateParameter(_)));
        assert!(e.to_string().contains("Parameter not found"));
        assert!(out.is_empty());
        assert_eq!(connector.requests().len(), 1);
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_kms_key_client_creation_failure() {
        let connector = FakeConnector::new(Outcome::FailConnect);
        let mut out = Vec::new();

        let e = remove_param_kms_key(&mut out, &connector, "p1", "param1")
            .await
            .unwrap_err();

        assert!(matches!(e, ClientError::ClientInitialization(_)));
        assert!(out.is_empty());
        assert!(connector.requests().is_empty());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(connector.drops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_param_failure_keeps_its_cause() {
        use std::error::Error as _;

        let connector = FakeConnector::new(Outcome::FailUpdate);
        let e = get_param(&connector, "p1", "param1").await.unwrap_err();

        assert!(matches!(e, ClientError::GetParameter(_)));
        assert!(e.to_string().starts_with("failed to get parameter"));
        assert!(e.source().is_some_and(|s| s.to_string().contains("NOT_FOUND")));
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_param() {
        let connector = FakeConnector::new(Outcome::Answer { with_kms_key: true });
        let parameter = get_param(&connector, "p1", "param1").await.unwrap();
        assert_eq!(parameter.name, NAME);
        assert_eq!(connector.drops.load(Ordering::SeqCst), 1);

        let connector = FakeConnector::new(Outcome::FailConnect);
        let e = get_param(&connector, "p1", "param1").await.unwrap_err();
        assert!(e.to_string().contains("Parameter Manager client"));
    }
}
