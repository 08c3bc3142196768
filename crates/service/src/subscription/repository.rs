use async_trait::async_trait;

use super::domain::{NewSubscription, Subscription, SumQuery};
use crate::errors::ServiceError;

/// Repository abstraction for subscription persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, new: NewSubscription) -> Result<Subscription, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Subscription, ServiceError>;
    async fn get_all(&self) -> Result<Vec<Subscription>, ServiceError>;
    /// Full-row save of every mutable column.
    async fn update(&self, subscription: Subscription) -> Result<Subscription, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    /// Sum of `price` over matching rows; 0 when nothing matches.
    async fn sum_by_filters(&self, query: &SumQuery) -> Result<i64, ServiceError>;
}
