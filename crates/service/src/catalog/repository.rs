use async_trait::async_trait;

use crate::errors::ServiceError;

/// Catalog entry as stored.
pub type Service = models::service::Model;

/// Repository abstraction for catalog persistence.
///
/// Lookups report a missing row as [`ServiceError::NotFound`]; subscription
/// creation relies on that to auto-provision services.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Service, ServiceError>;
    async fn get_all(&self) -> Result<Vec<Service>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Service, ServiceError>;
    async fn get_by_name(&self, name: &str) -> Result<Service, ServiceError>;
    async fn update(&self, service: Service) -> Result<Service, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}
