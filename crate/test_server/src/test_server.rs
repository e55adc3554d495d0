use std::{
    io,
    net::SocketAddr,
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use actix_server::ServerHandle;
use actix_web::{App, HttpServer, web::Data};
use jwt_simple::prelude::RS256KeyPair;
use parameter_manager_client::{ClientConf, ClientError, Parameter, ServiceAccount, client_error};
use parameter_manager_logger::{error, trace};

use crate::routes::{ReceivedUpdate, ServerState, get_parameter, token, update_parameter};

/// Bearer token accepted by the test server and returned by its `/token` endpoint.
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

pub struct TestsContext {
    pub server_url: String,
    state: Data<ServerState>,
    pub server_handle: ServerHandle,
    pub thread_handle: JoinHandle<io::Result<()>>,
}

impl TestsContext {
    /// A client configuration pointing at this server with a valid token.
    #[must_use]
    pub fn client_conf(&self) -> ClientConf {
        ClientConf {
            parameter_manager_url: self.server_url.clone(),
            access_token: Some(TEST_ACCESS_TOKEN.to_owned()),
            timeout_secs: Some(10),
            ..ClientConf::default()
        }
    }

    /// The stored state of a parameter, by full resource name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<Parameter> {
        self.state.parameter(name)
    }

    /// Every `UpdateParameter` call received so far.
    #[must_use]
    pub fn received_updates(&self) -> Vec<ReceivedUpdate> {
        self.state.received_updates()
    }

    pub async fn stop_server(self) -> Result<(), ClientError> {
        self.server_handle.stop(false).await;
        self.thread_handle
            .join()
            .map_err(|_e| client_error!("failed joining the test server thread"))?
            .map_err(ClientError::from)
    }
}

/// Start an in-memory Parameter Manager on a random local port, in its
/// own thread and runtime, seeded with `parameters`.
pub fn start_test_parameter_server(
    parameters: Vec<Parameter>,
) -> Result<TestsContext, ClientError> {
    parameter_manager_logger::log_init("info");

    let state = Data::new(ServerState::new(parameters));
    let server_state = state.clone();
    let (tx, rx) = mpsc::channel::<(ServerHandle, SocketAddr)>();

    let thread_handle = thread::spawn(move || {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_server(server_state, tx))
    });

    trace!("Waiting for test Parameter Manager server to start...");
    let (server_handle, addr) = rx.recv_timeout(Duration::from_secs(25)).map_err(|e| {
        client_error!("Error getting test Parameter Manager server handle: {e}")
    })?;
    trace!("... got handle, listening on {addr}");

    Ok(TestsContext {
        server_url: format!("http://{addr}"),
        state,
        server_handle,
        thread_handle,
    })
}

async fn run_server(
    state: Data<ServerState>,
    tx: mpsc::Sender<(ServerHandle, SocketAddr)>,
) -> io::Result<()> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(get_parameter)
            .service(update_parameter)
            .service(token)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))?;
    let addr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no bound address"))?;
    let server = server.run();
    if tx.send((server.handle(), addr)).is_err() {
        error!("the test server handle could not be sent");
    }
    server.await
}

/// A freshly generated service account whose token endpoint is `token_uri`.
pub fn generate_service_account(token_uri: &str) -> Result<ServiceAccount, ClientError> {
    let key_pair = RS256KeyPair::generate(2048)?;
    Ok(ServiceAccount {
        account_type: "service_account".to_owned(),
        project_id: "p1".to_owned(),
        private_key_id: "test-key-id".to_owned(),
        private_key: key_pair.to_pem()?,
        client_email: "tester@p1.iam.gserviceaccount.com".to_owned(),
        client_id: "1234567890".to_owned(),
        auth_uri: "https://accounts.google.com/o/oauth2/auth".to_owned(),
        token_uri: token_uri.to_owned(),
    })
}
