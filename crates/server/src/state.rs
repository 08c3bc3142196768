use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::catalog::{ServiceCatalog, ServiceRepository};
use service::repo::seaorm::{SeaOrmServiceRepository, SeaOrmSubscriptionRepository};
use service::subscription::{SubscriptionRepository, SubscriptionService};

/// Shared handler state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceCatalog>,
    pub subscriptions: Arc<SubscriptionService>,
}

impl AppState {
    pub fn new(services: Arc<dyn ServiceRepository>, subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            services: Arc::new(ServiceCatalog::new(Arc::clone(&services))),
            subscriptions: Arc::new(SubscriptionService::new(subscriptions, services)),
        }
    }

    /// Wire the SeaORM repositories over one pooled connection.
    pub fn with_database(db: DatabaseConnection) -> Self {
        Self::new(
            Arc::new(SeaOrmServiceRepository::new(db.clone())),
            Arc::new(SeaOrmSubscriptionRepository::new(db)),
        )
    }
}
