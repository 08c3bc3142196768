use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageResponse;
use service::catalog::{CreateService, Service};

use super::path_id;
use crate::errors::JsonApiError;
use crate::state::AppState;

/// List the catalog
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "services",
    responses(
        (status = 200, description = "All services", body = [crate::openapi::ServiceDoc]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Service>>, JsonApiError> {
    Ok(Json(state.services.list().await?))
}

/// Register a service by name
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "services",
    request_body = crate::openapi::CreateServiceDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Malformed body or empty name"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateService>, JsonRejection>,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let Json(input) = payload.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let created = state.services.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Remove a service together with its subscriptions
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such service")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = path_id(id)?;
    state.services.delete(id).await?;
    Ok(Json(MessageResponse::new("Service deleted successfully")))
}
