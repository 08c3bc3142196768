use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Service;

/// Subscription read model with its service joined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i32,
    pub service_id: i32,
    pub service: Option<Service>,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn from_parts(row: models::subscription::Model, service: Option<Service>) -> Self {
        Self {
            id: row.id,
            service_id: row.service_id,
            service,
            price: row.price,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated row ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_id: i32,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Create request; dates are `MM-YYYY`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscription {
    pub service_name: String,
    pub price: u32,
    pub user_id: Uuid,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Partial update; only price and end date are mutable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscription {
    #[serde(default)]
    pub price: Option<u32>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Raw aggregation filters as received from clients
#[derive(Debug, Clone, Default)]
pub struct SumFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Parsed aggregation filters handed to the repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SumQuery {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SumQuery {
    /// In-memory form of the SQL filter: open-ended rows always pass the end bound.
    pub fn matches(&self, row: &models::subscription::Model, service_name: Option<&str>) -> bool {
        if let Some(uid) = self.user_id {
            if row.user_id != uid { return false; }
        }
        if let Some(wanted) = self.service_name.as_deref() {
            if service_name != Some(wanted) { return false; }
        }
        if let Some(start) = self.start {
            if row.start_date < start { return false; }
        }
        if let (Some(end), Some(row_end)) = (self.end, row.end_date) {
            if row_end > end { return false; }
        }
        true
    }
}
