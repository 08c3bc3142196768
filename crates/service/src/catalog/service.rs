use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::repository::{Service, ServiceRepository};
use crate::errors::ServiceError;

/// Explicit catalog entry creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub name: String,
}

/// Thin application service over [`ServiceRepository`].
pub struct ServiceCatalog {
    repo: Arc<dyn ServiceRepository>,
}

impl ServiceCatalog {
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Service>, ServiceError> {
        self.repo.get_all().await.map_err(|e| {
            error!(error = %e, "list services failed");
            e
        })
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateService) -> Result<Service, ServiceError> {
        models::service::validate_name(&input.name)?;
        match self.repo.create(&input.name).await {
            Ok(created) => {
                info!(id = created.id, "service_created");
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "create service failed");
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: i32) -> Result<Service, ServiceError> {
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(|e| {
            if !e.is_not_found() {
                error!(error = %e, "delete service failed");
            }
            e
        })?;
        info!("service_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::InMemoryStore;

    fn catalog() -> (Arc<InMemoryStore>, ServiceCatalog) {
        let store = Arc::new(InMemoryStore::default());
        (store.clone(), ServiceCatalog::new(store))
    }

    #[tokio::test]
    async fn create_then_list() {
        let (_, svc) = catalog();
        let netflix = svc.create(CreateService { name: "Netflix".into() }).await.unwrap();
        let spotify = svc.create(CreateService { name: "Spotify".into() }).await.unwrap();
        assert_ne!(netflix.id, spotify.id);

        let all = svc.list().await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Netflix", "Spotify"]);
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let (_, svc) = catalog();
        svc.create(CreateService { name: "Netflix".into() }).await.unwrap();
        let err = svc.create(CreateService { name: "Netflix".into() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn blank_name_is_validation_error() {
        let (store, svc) = catalog();
        let err = svc.create(CreateService { name: "  ".into() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.service_count().await, 0);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (_, svc) = catalog();
        let err = svc.delete(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_service() {
        let (store, svc) = catalog();
        let s = svc.create(CreateService { name: "Kinopoisk".into() }).await.unwrap();
        assert_eq!(svc.get(s.id).await.unwrap().name, "Kinopoisk");
        svc.delete(s.id).await.unwrap();
        assert_eq!(store.service_count().await, 0);
        assert!(svc.get(s.id).await.unwrap_err().is_not_found());
    }
}
