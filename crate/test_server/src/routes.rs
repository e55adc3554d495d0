use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use actix_web::{
    HttpRequest, HttpResponse, get, http::StatusCode, patch, post,
    web::{Data, Form, Json, Path, Query},
};
use parameter_manager_client::{GoogleApiErrorBody, GoogleApiErrorContent, Parameter};
use parameter_manager_logger::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::TEST_ACCESS_TOKEN;

/// An `UpdateParameter` call as received on the wire.
#[derive(Debug, Clone)]
pub struct ReceivedUpdate {
    pub name: String,
    pub update_mask: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub(crate) struct ServerState {
    parameters: Mutex<HashMap<String, Parameter>>,
    updates: Mutex<Vec<ReceivedUpdate>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ServerState {
    pub(crate) fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters: Mutex::new(
                parameters
                    .into_iter()
                    .map(|p| (p.name.clone(), p))
                    .collect(),
            ),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn parameter(&self, name: &str) -> Option<Parameter> {
        lock(&self.parameters).get(name).cloned()
    }

    pub(crate) fn received_updates(&self) -> Vec<ReceivedUpdate> {
        lock(&self.updates).clone()
    }
}

fn error_response(status: StatusCode, grpc_status: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(GoogleApiErrorBody {
        error: GoogleApiErrorContent {
            code: status.as_u16(),
            message: message.into(),
            status: grpc_status.to_owned(),
        },
    })
}

fn check_bearer(req: &HttpRequest) -> Result<(), HttpResponse> {
    let expected = format!("Bearer {TEST_ACCESS_TOKEN}");
    match req.headers().get("authorization").map(|v| v.to_str()) {
        Some(Ok(value)) if value == expected => Ok(()),
        _ => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "Request had invalid authentication credentials.",
        )),
    }
}

fn parameter_name(path: &(String, String, String)) -> String {
    let (project, location, parameter) = path;
    format!("projects/{project}/locations/{location}/parameters/{parameter}")
}

#[get("/v1/projects/{project}/locations/{location}/parameters/{parameter}")]
pub(crate) async fn get_parameter(
    req: HttpRequest,
    path: Path<(String, String, String)>,
    state: Data<ServerState>,
) -> HttpResponse {
    if let Err(response) = check_bearer(&req) {
        return response
    }
    let name = parameter_name(&path);
    debug!("GET {name}");
    match state.parameter(&name) {
        Some(parameter) => HttpResponse::Ok().json(parameter),
        None => error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Parameter [{name}] not found."),
        ),
    }
}

#[derive(Deserialize)]
pub(crate) struct UpdateQuery {
    #[serde(rename = "updateMask")]
    update_mask: Option<String>,
}

#[patch("/v1/projects/{project}/locations/{location}/parameters/{parameter}")]
pub(crate) async fn update_parameter(
    req: HttpRequest,
    path: Path<(String, String, String)>,
    query: Query<UpdateQuery>,
    body: Json<Value>,
    state: Data<ServerState>,
) -> HttpResponse {
    if let Err(response) = check_bearer(&req) {
        return response
    }
    let name = parameter_name(&path);
    let body = body.into_inner();
    let update_mask = query.into_inner().update_mask;
    info!("PATCH {name} updateMask={update_mask:?}");
    lock(&state.updates).push(ReceivedUpdate {
        name: name.clone(),
        update_mask: update_mask.clone(),
        body: body.clone(),
    });

    let delta: Parameter = match serde_json::from_value(body) {
        Ok(delta) => delta,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", e.to_string()),
    };
    let paths = update_mask
        .unwrap_or_default()
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if paths.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_ARGUMENT",
            "update_mask must not be empty",
        )
    }

    let mut parameters = lock(&state.parameters);
    let Some(stored) = parameters.get_mut(&name) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Parameter [{name}] not found."),
        )
    };
    let mut updated = stored.clone();
    for path in &paths {
        match path.as_str() {
            "kmsKey" => updated.kms_key = delta.kms_key.clone(),
            "labels" => updated.labels = delta.labels.clone(),
            "format" => updated.format = delta.format,
            other => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "INVALID_ARGUMENT",
                    format!("Invalid update_mask path: {other}"),
                )
            }
        }
    }
    *stored = updated.clone();
    HttpResponse::Ok().json(updated)
}

#[derive(Deserialize)]
pub(crate) struct TokenRequest {
    grant_type: String,
    assertion: String,
}

/// OAuth2 token endpoint accepting any well formed JWT bearer assertion.
#[post("/token")]
pub(crate) async fn token(form: Form<TokenRequest>) -> HttpResponse {
    if form.grant_type != "urn:ietf:params:oauth:grant-type:jwt-bearer" {
        return HttpResponse::BadRequest().json(json!({"error": "unsupported_grant_type"}))
    }
    if form.assertion.split('.').count() != 3 {
        return HttpResponse::BadRequest().json(json!({"error": "invalid_grant"}))
    }
    HttpResponse::Ok().json(json!({
        "access_token": TEST_ACCESS_TOKEN,
        "expires_in": 3600,
        "token_type": "Bearer",
    }))
}
