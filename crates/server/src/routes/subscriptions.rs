use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use common::types::MessageResponse;
use service::subscription::{CreateSubscription, Subscription, SumFilter, UpdateSubscription};

use super::path_id;
use crate::errors::JsonApiError;
use crate::state::AppState;

/// Query string of `GET /api/subs/sum`. Months are `MM-YYYY`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SumParams {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<SumParams> for SumFilter {
    fn from(p: SumParams) -> Self {
        SumFilter {
            user_id: p.user_id,
            service_name: p.service_name,
            start_date: p.start_date,
            end_date: p.end_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SumResponse {
    pub sum: i64,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload.map(|Json(v)| v).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/api/subs",
    tag = "subscriptions",
    responses((status = 200, description = "All subscriptions", body = [crate::openapi::SubscriptionDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    Ok(Json(state.subscriptions.list().await?))
}

/// Create a subscription, provisioning its service on first use
#[utoipa::path(
    post,
    path = "/api/subs",
    tag = "subscriptions",
    request_body = crate::openapi::CreateSubscriptionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Malformed body, bad month or end before start")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscription>, JsonRejection>,
) -> Result<(StatusCode, Json<Subscription>), JsonApiError> {
    let input = json_body(payload)?;
    let created = state.subscriptions.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/subs/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::SubscriptionDoc),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Subscription>, JsonApiError> {
    let id = path_id(id)?;
    Ok(Json(state.subscriptions.get(id).await?))
}

/// Change price and/or end month
#[utoipa::path(
    put,
    path = "/api/subs/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    request_body = crate::openapi::UpdateSubscriptionDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Malformed body, bad month or end before start"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateSubscription>, JsonRejection>,
) -> Result<Json<Subscription>, JsonApiError> {
    let id = path_id(id)?;
    let input = json_body(payload)?;
    Ok(Json(state.subscriptions.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/subs/{id}",
    tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = path_id(id)?;
    state.subscriptions.delete(id).await?;
    Ok(Json(MessageResponse::new("Subscription deleted successfully")))
}

/// Total price of the subscriptions matching every supplied filter
#[utoipa::path(
    get,
    path = "/api/subs/sum",
    tag = "subscriptions",
    params(SumParams),
    responses(
        (status = 200, description = "Sum of prices", body = SumResponse),
        (status = 400, description = "Bad filter value")
    )
)]
pub async fn sum(
    State(state): State<AppState>,
    params: Result<Query<SumParams>, QueryRejection>,
) -> Result<Json<SumResponse>, JsonApiError> {
    let Query(params) = params.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let filter = SumFilter::from(params);
    let sum = state.subscriptions.sum_by_filters(Some(&filter)).await?;
    Ok(Json(SumResponse { sum }))
}
