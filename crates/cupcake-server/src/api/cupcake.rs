//! Cupcake resource API
//!
//! Provides endpoints for managing cupcakes:
//! - GET /v2/cupcake - List all cupcakes
//! - POST /v2/cupcake - Create a cupcake
//! - GET /v2/cupcake/{cupcakeId} - Get a cupcake by id
//! - PUT /v2/cupcake/{cupcakeId} - Replace a cupcake by id
//! - DELETE /v2/cupcake/{cupcakeId} - Delete a cupcake by id
//!
//! Every handler validates first, then talks to the store. Store failures of
//! any kind become a 500 with a fixed message; details only go to the log.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use cupcake_core::validation::{
    CUPCAKE_BODY_RULES, CUPCAKE_ID_PARAM, CUPCAKE_ID_RULES, ErrorOutcome, Location, RequestData,
    all_messages, first_error_outcome, validate,
};
use cupcake_core::{CupcakeBody, CupcakeId, CupcakeStore, Error};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::CupcakeServer;

const LIST_ERROR: &str = "Server error encountered while listing all cupcakes";
const CREATE_ERROR: &str = "Server error encountered while creating cupcake";
const GET_ERROR: &str = "Server error encountered while retrieving cupcake by id";
const UPDATE_ERROR: &str = "Error encountered while updating cupcake";
const DELETE_ERROR: &str = "Server error encountered while deleting cupcake";
const NOT_FOUND: &str = "Cupcake not found";
const DELETED: &str = "Cupcake deleted successfully";

/// Response for cupcake creation
#[derive(Debug, Serialize)]
pub struct CreateCupcakeResponse {
    /// Id assigned by the store
    #[serde(rename = "cupcakeId")]
    pub cupcake_id: CupcakeId,
}

/// List all cupcakes
pub async fn list_cupcakes(State(server): State<CupcakeServer>) -> Response {
    info!("Retrieving all cupcakes...");

    match with_store(&server, |store| Ok(store.list_all())).await {
        Ok(cupcakes) => Json(cupcakes).into_response(),
        Err(e) => {
            error!("Failed to list cupcakes: {}", e);
            message(StatusCode::INTERNAL_SERVER_ERROR, LIST_ERROR)
        }
    }
}

/// Create a cupcake
pub async fn add_cupcake(
    State(server): State<CupcakeServer>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let req = RequestData::new().with_body(request_body(body));

    let errors = validate(&req, &[CUPCAKE_BODY_RULES]);
    if let Some(outcome) = all_messages(&errors, Location::Body) {
        debug!("Rejected cupcake body: {:?}", outcome.message);
        return outcome_response(outcome);
    }

    let cupcake = match CupcakeBody::from_validated(&req.body) {
        Ok(cupcake) => cupcake,
        Err(e) => {
            error!("Validated cupcake body could not be read: {}", e);
            return message(StatusCode::INTERNAL_SERVER_ERROR, CREATE_ERROR);
        }
    };

    match with_store(&server, move |store| store.create(cupcake)).await {
        Ok(cupcake_id) => {
            info!("Cupcake {} created successfully", cupcake_id);
            (
                StatusCode::CREATED,
                Json(CreateCupcakeResponse { cupcake_id }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to create cupcake: {}", e);
            message(StatusCode::INTERNAL_SERVER_ERROR, CREATE_ERROR)
        }
    }
}

/// Get a cupcake by id
pub async fn get_cupcake(
    State(server): State<CupcakeServer>,
    Path(cupcake_id): Path<String>,
) -> Response {
    let req = RequestData::new().with_param(CUPCAKE_ID_PARAM, cupcake_id.as_str());

    let errors = validate(&req, &[CUPCAKE_ID_RULES]);
    if let Some(outcome) = all_messages(&errors, Location::Params) {
        debug!("Rejected cupcake id {:?}", cupcake_id);
        return outcome_response(outcome);
    }

    let Some(id) = parse_cupcake_id(&cupcake_id) else {
        warn!("Could not retrieve cupcake {}", cupcake_id);
        return message(StatusCode::NOT_FOUND, NOT_FOUND);
    };

    match with_store(&server, move |store| Ok(store.get_by_id(id))).await {
        Ok(Some(cupcake)) => {
            info!("Retrieved cupcake {} successfully", id);
            Json(cupcake).into_response()
        }
        Ok(None) => {
            warn!("Could not retrieve cupcake {}", id);
            message(StatusCode::NOT_FOUND, NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to retrieve cupcake {}: {}", id, e);
            message(StatusCode::INTERNAL_SERVER_ERROR, GET_ERROR)
        }
    }
}

/// Replace a cupcake by id
pub async fn update_cupcake(
    State(server): State<CupcakeServer>,
    Path(cupcake_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let req = RequestData::new()
        .with_param(CUPCAKE_ID_PARAM, cupcake_id.as_str())
        .with_body(request_body(body));

    // Id rules go first so a bad id wins over a bad body
    let errors = validate(&req, &[CUPCAKE_ID_RULES, CUPCAKE_BODY_RULES]);
    if let Some(outcome) = first_error_outcome(&errors) {
        debug!(
            "Rejected cupcake update {:?} with status {}: {}",
            cupcake_id, outcome.status, outcome.message
        );
        return outcome_response(outcome);
    }

    let not_found = || {
        message(
            StatusCode::NOT_FOUND,
            format!("Cupcake with id {} not found", cupcake_id),
        )
    };

    let Some(id) = parse_cupcake_id(&cupcake_id) else {
        return not_found();
    };

    let body = match CupcakeBody::from_validated(&req.body) {
        Ok(body) => body,
        Err(e) => {
            error!("Validated cupcake body could not be read: {}", e);
            return message(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_ERROR);
        }
    };

    let result = with_store(&server, move |store| {
        if store.get_by_id(id).is_none() {
            return Err(Error::NotFound(id));
        }
        store.update_by_id(id, body.into_cupcake(id))
    })
    .await;

    match result {
        Ok(Some(cupcake)) => {
            info!("Updated cupcake {} successfully", id);
            Json(cupcake).into_response()
        }
        Ok(None) => {
            error!("Cupcake {} disappeared before it could be updated", id);
            message(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_ERROR)
        }
        Err(e) if e.is_not_found() => not_found(),
        Err(e) => {
            error!("Failed to update cupcake {}: {}", id, e);
            message(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_ERROR)
        }
    }
}

/// Delete a cupcake by id
pub async fn delete_cupcake(
    State(server): State<CupcakeServer>,
    Path(cupcake_id): Path<String>,
) -> Response {
    let req = RequestData::new().with_param(CUPCAKE_ID_PARAM, cupcake_id.as_str());

    let errors = validate(&req, &[CUPCAKE_ID_RULES]);
    if let Some(outcome) = all_messages(&errors, Location::Params) {
        debug!("Rejected cupcake id {:?}", cupcake_id);
        return outcome_response(outcome);
    }

    let Some(id) = parse_cupcake_id(&cupcake_id) else {
        return message(StatusCode::NOT_FOUND, NOT_FOUND);
    };

    let result = with_store(&server, move |store| {
        if store.get_by_id(id).is_none() {
            return Err(Error::NotFound(id));
        }
        store.delete_by_id(id)
    })
    .await;

    match result {
        Ok(_) => {
            info!("Deleted cupcake {} successfully", id);
            message(StatusCode::OK, DELETED)
        }
        Err(e) if e.is_not_found() => message(StatusCode::NOT_FOUND, NOT_FOUND),
        Err(e) => {
            error!("Failed to delete cupcake {}: {}", id, e);
            message(StatusCode::INTERNAL_SERVER_ERROR, DELETE_ERROR)
        }
    }
}

/// Run a store operation on the blocking pool; the store does synchronous
/// file I/O under its lock.
async fn with_store<T, F>(server: &CupcakeServer, op: F) -> cupcake_core::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&CupcakeStore) -> cupcake_core::Result<T> + Send + 'static,
{
    let store = server.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| Error::unexpected(format!("store task failed: {}", e)))?
}

/// Body to validate; a missing or malformed JSON body validates as `{}`
fn request_body(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!("Unreadable request body: {}", rejection);
            json!({})
        }
    }
}

/// Convert a validated id literal. Records are keyed by their canonical
/// decimal form, so signed, zero-padded or out-of-range ids match nothing.
fn parse_cupcake_id(raw: &str) -> Option<CupcakeId> {
    let id: CupcakeId = raw.parse().ok()?;
    (id.to_string() == raw).then_some(id)
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

fn outcome_response<M: Serialize>(outcome: ErrorOutcome<M>) -> Response {
    let status =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome)).into_response()
}
