//! Car resource handlers.
//!
//! Id-scoped handlers resolve the path id through `require_car` before doing
//! anything else, so a missing car is answered with 404 and a failed lookup
//! with 500 without touching the rest of the handler.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use service::cars::{Car, CarInput, Lookup};
use tracing::debug;

use crate::errors::ApiError;
use crate::routes::ServerState;

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Turn a request body into car fields.
///
/// A body without a JSON content type, or an empty one, carries no fields.
/// Unparsable JSON and bare scalars are a 400 that never quotes the body.
fn read_body(headers: &HeaderMap, body: &Bytes) -> Result<CarInput, ApiError> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CarInput::default());
    }
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejected car body");
        ApiError::BadRequest
    })?;
    CarInput::from_json(value).ok_or_else(|| {
        debug!("rejected car body: bare scalar");
        ApiError::BadRequest
    })
}

/// Existence guard for id-scoped routes.
async fn require_car(state: &ServerState, id: &str) -> Result<Car, ApiError> {
    match state.cars.lookup(id).await {
        Lookup::Found(car) => Ok(car),
        Lookup::NotFound => {
            debug!(%id, "car lookup missed");
            Err(ApiError::NotFound)
        }
        Lookup::Failed(e) => Err(ApiError::Service(e)),
    }
}

#[utoipa::path(
    post, path = "/cars", tag = "cars",
    request_body = crate::openapi::CarInputDoc,
    responses(
        (status = 201, description = "Car created", body = crate::openapi::CarDoc),
        (status = 400, description = "Body is not valid JSON"),
        (status = 500, description = "Server error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let input = read_body(&headers, &body)?;
    let car = state.cars.create(input).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

#[utoipa::path(
    get, path = "/cars", tag = "cars",
    responses(
        (status = 200, description = "All cars", body = [crate::openapi::CarDoc]),
        (status = 500, description = "Server error")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Car>>, ApiError> {
    Ok(Json(state.cars.list().await?))
}

#[utoipa::path(
    get, path = "/cars/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car found", body = crate::openapi::CarDoc),
        (status = 404, description = "Car not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let car = require_car(&state, &id).await?;
    Ok(Json(car))
}

#[utoipa::path(
    put, path = "/cars/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car id")),
    request_body = crate::openapi::CarInputDoc,
    responses(
        (status = 200, description = "Car updated", body = crate::openapi::CarDoc),
        (status = 400, description = "Body is not valid JSON"),
        (status = 404, description = "Car not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Car>, ApiError> {
    let input = read_body(&headers, &body)?;
    let existing = require_car(&state, &id).await?;
    let car = state.cars.update(&existing, input).await?;
    Ok(Json(car))
}

#[utoipa::path(
    delete, path = "/cars/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car deleted; body is its last representation", body = crate::openapi::CarDoc),
        (status = 404, description = "Car not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let existing = require_car(&state, &id).await?;
    let car = state.cars.delete(&existing).await?;
    Ok(Json(car))
}
