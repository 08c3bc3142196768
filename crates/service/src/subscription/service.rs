use std::sync::Arc;

use chrono::{DateTime, Utc};
use models::month::{format_month, parse_month};
use tracing::{error, info, instrument, warn};

use super::domain::{CreateSubscription, NewSubscription, Subscription, SumFilter, SumQuery, UpdateSubscription};
use super::repository::SubscriptionRepository;
use crate::catalog::{Service, ServiceRepository};
use crate::errors::ServiceError;

/// Application service encapsulating subscription lifecycle rules:
/// month-date parsing, start/end ordering and service auto-provisioning.
pub struct SubscriptionService {
    subs: Arc<dyn SubscriptionRepository>,
    services: Arc<dyn ServiceRepository>,
}

fn parse_logged(raw: &str, which: &str) -> Result<DateTime<Utc>, ServiceError> {
    parse_month(raw).map_err(|e| {
        warn!(error = %e, which, "parsing date failed");
        ServiceError::from(e)
    })
}

fn ensure_ordered(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<(), ServiceError> {
    if models::subscription::validate_period(start, Some(end)) {
        Ok(())
    } else {
        let err = ServiceError::InvalidDate;
        warn!(start = %format_month(start), end = %format_month(end), "{}", err);
        Err(err)
    }
}

impl SubscriptionService {
    pub fn new(subs: Arc<dyn SubscriptionRepository>, services: Arc<dyn ServiceRepository>) -> Self {
        Self { subs, services }
    }

    /// Create a subscription, creating its service on first use.
    ///
    /// Dates are validated before anything is written, so a rejected request
    /// leaves no service behind.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::repo::memory::InMemoryStore;
    /// use service::subscription::{CreateSubscription, SubscriptionService};
    /// let store = Arc::new(InMemoryStore::default());
    /// let svc = SubscriptionService::new(store.clone(), store.clone());
    /// let input = CreateSubscription {
    ///     service_name: "Spotify".into(),
    ///     price: 500,
    ///     user_id: uuid::Uuid::new_v4(),
    ///     start_date: "01-2025".into(),
    ///     end_date: None,
    /// };
    /// let sub = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(sub.service.unwrap().name, "Spotify");
    /// ```
    #[instrument(skip(self, input), fields(service_name = %input.service_name, user_id = %input.user_id))]
    pub async fn create(&self, input: CreateSubscription) -> Result<Subscription, ServiceError> {
        let start_date = parse_logged(&input.start_date, "start_date")?;
        let end_date = match input.end_date.as_deref() {
            Some(raw) => {
                let end = parse_logged(raw, "end_date")?;
                ensure_ordered(&start_date, &end)?;
                Some(end)
            }
            None => None,
        };

        let service = self.resolve_service(&input.service_name).await?;

        let new = NewSubscription {
            service_id: service.id,
            price: i64::from(input.price),
            user_id: input.user_id,
            start_date,
            end_date,
        };
        info!(service_id = new.service_id, price = new.price, start = %format_month(&start_date), "creating subscription");
        let mut created = self.subs.create(new).await.map_err(|e| {
            error!(error = %e, "create subscription failed");
            e
        })?;
        created.service = Some(service);
        Ok(created)
    }

    /// Look a service up by name, inserting it when missing. A concurrent
    /// insert of the same name surfaces as `Conflict`; the row then exists.
    async fn resolve_service(&self, name: &str) -> Result<Service, ServiceError> {
        models::service::validate_name(name)?;
        match self.services.get_by_name(name).await {
            Ok(found) => Ok(found),
            Err(ServiceError::NotFound(_)) => match self.services.create(name).await {
                Ok(created) => {
                    info!(service_id = created.id, name, "auto_created_service_for_subscription");
                    Ok(created)
                }
                Err(ServiceError::Conflict(_)) => self.services.get_by_name(name).await,
                Err(e) => {
                    error!(error = %e, "create service failed");
                    Err(e)
                }
            },
            Err(e) => {
                error!(error = %e, "get service by name failed");
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: i32) -> Result<Subscription, ServiceError> {
        self.subs.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Subscription>, ServiceError> {
        self.subs.get_all().await.map_err(|e| {
            error!(error = %e, "list subscriptions failed");
            e
        })
    }

    /// Apply a partial update. `end_date` is checked against the stored `start_date`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateSubscription) -> Result<Subscription, ServiceError> {
        let mut sub = self.subs.get_by_id(id).await?;

        if let Some(price) = input.price {
            sub.price = i64::from(price);
        }
        if let Some(raw) = input.end_date.as_deref() {
            let end = parse_logged(raw, "end_date")?;
            ensure_ordered(&sub.start_date, &end)?;
            sub.end_date = Some(end);
        }

        info!(price = sub.price, "updating subscription");
        self.subs.update(sub).await.map_err(|e| {
            if !e.is_not_found() {
                error!(error = %e, "update subscription failed");
            }
            e
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.subs.delete(id).await.map_err(|e| {
            if !e.is_not_found() {
                error!(error = %e, "delete subscription failed");
            }
            e
        })
    }

    /// Total price of subscriptions matching `filters`.
    pub async fn sum_by_filters(&self, filters: Option<&SumFilter>) -> Result<i64, ServiceError> {
        let Some(filters) = filters else {
            error!("sum_by_filters called without filters");
            return Err(ServiceError::Validation("filters are required".into()));
        };

        let start = filters.start_date.as_deref().map(|raw| parse_logged(raw, "start_date")).transpose()?;
        let end = filters.end_date.as_deref().map(|raw| parse_logged(raw, "end_date")).transpose()?;
        if let (Some(start), Some(end)) = (start.as_ref(), end.as_ref()) {
            ensure_ordered(start, end)?;
        }

        let query = SumQuery {
            user_id: filters.user_id,
            service_name: filters.service_name.clone(),
            start,
            end,
        };
        info!(?query, "sum_by_filters");
        self.subs.sum_by_filters(&query).await.map_err(|e| {
            error!(error = %e, "sum_by_filters failed");
            e
        })
    }
}
