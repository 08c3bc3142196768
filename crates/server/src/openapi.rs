use chrono::{DateTime, Utc};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::routes::subscriptions::SumResponse;

#[derive(ToSchema)]
pub struct PongDoc { pub message: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct CreateServiceDoc { pub name: String }

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `start_date` and `end_date` are `MM-YYYY`.
#[derive(ToSchema)]
pub struct CreateSubscriptionDoc {
    pub service_name: String,
    pub price: u32,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateSubscriptionDoc {
    pub price: Option<u32>,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: i32,
    pub service_id: i32,
    pub service: Option<ServiceDoc>,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Subscriptions API", description = "Online subscription aggregation service"),
    paths(
        crate::routes::ping,
        crate::routes::services::list,
        crate::routes::services::create,
        crate::routes::services::delete,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::sum,
    ),
    components(
        schemas(
            PongDoc,
            MessageDoc,
            ErrorDoc,
            CreateServiceDoc,
            ServiceDoc,
            CreateSubscriptionDoc,
            UpdateSubscriptionDoc,
            SubscriptionDoc,
            SumResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "services"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
