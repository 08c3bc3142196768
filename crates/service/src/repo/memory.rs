use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::catalog::{Service, ServiceRepository};
use crate::errors::ServiceError;
use crate::subscription::{NewSubscription, Subscription, SubscriptionRepository, SumQuery};

#[derive(Default)]
struct Tables {
    services: BTreeMap<i32, Service>,
    subscriptions: BTreeMap<i32, models::subscription::Model>,
    next_service_id: i32,
    next_subscription_id: i32,
}

impl Tables {
    fn joined(&self, row: &models::subscription::Model) -> Subscription {
        Subscription::from_parts(row.clone(), self.services.get(&row.service_id).cloned())
    }
}

/// In-memory store implementing both repositories over shared tables, so the
/// service join and the cascade on service delete behave like the database.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    sum_calls: AtomicUsize,
    last_sum_query: Mutex<Option<SumQuery>>,
}

impl InMemoryStore {
    pub async fn service_count(&self) -> usize {
        self.tables.lock().await.services.len()
    }

    pub async fn subscription_count(&self) -> usize {
        self.tables.lock().await.subscriptions.len()
    }

    pub async fn service_by_name(&self, name: &str) -> Option<Service> {
        self.tables.lock().await.services.values().find(|s| s.name == name).cloned()
    }

    /// Insert a catalog entry, returning the existing one on duplicate name.
    pub async fn seed_service(&self, name: &str) -> Service {
        if let Some(found) = self.service_by_name(name).await {
            return found;
        }
        let mut t = self.tables.lock().await;
        insert_service(&mut t, name)
    }

    /// Insert a row as-is, bypassing month normalisation.
    pub async fn seed_subscription(&self, new: NewSubscription) -> Subscription {
        let mut t = self.tables.lock().await;
        insert_subscription(&mut t, new)
    }

    /// Number of aggregate queries that reached the store.
    pub fn sum_calls(&self) -> usize {
        self.sum_calls.load(Ordering::SeqCst)
    }

    pub async fn last_sum_query(&self) -> Option<SumQuery> {
        self.last_sum_query.lock().await.clone()
    }
}

fn insert_service(t: &mut Tables, name: &str) -> Service {
    t.next_service_id += 1;
    let now = Utc::now();
    let s = Service { id: t.next_service_id, name: name.to_string(), created_at: now, updated_at: now };
    t.services.insert(s.id, s.clone());
    s
}

fn insert_subscription(t: &mut Tables, new: NewSubscription) -> Subscription {
    t.next_subscription_id += 1;
    let now = Utc::now();
    let row = models::subscription::Model {
        id: t.next_subscription_id,
        service_id: new.service_id,
        price: new.price,
        user_id: new.user_id,
        start_date: new.start_date,
        end_date: new.end_date,
        created_at: now,
        updated_at: now,
    };
    t.subscriptions.insert(row.id, row.clone());
    Subscription::from_parts(row, None)
}

#[async_trait]
impl ServiceRepository for InMemoryStore {
    async fn create(&self, name: &str) -> Result<Service, ServiceError> {
        models::service::validate_name(name)?;
        let mut t = self.tables.lock().await;
        if t.services.values().any(|s| s.name == name) {
            return Err(ServiceError::Conflict(format!("service {name:?} already exists")));
        }
        Ok(insert_service(&mut t, name))
    }

    async fn get_all(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(self.tables.lock().await.services.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Service, ServiceError> {
        self.tables.lock().await.services.get(&id).cloned().ok_or_else(|| ServiceError::not_found("service"))
    }

    async fn get_by_name(&self, name: &str) -> Result<Service, ServiceError> {
        self.service_by_name(name).await.ok_or_else(|| ServiceError::not_found("service"))
    }

    async fn update(&self, service: Service) -> Result<Service, ServiceError> {
        models::service::validate_name(&service.name)?;
        let mut t = self.tables.lock().await;
        if t.services.values().any(|s| s.name == service.name && s.id != service.id) {
            return Err(ServiceError::Conflict(format!("service {:?} already exists", service.name)));
        }
        let slot = t.services.get_mut(&service.id).ok_or_else(|| ServiceError::not_found("service"))?;
        *slot = Service { updated_at: Utc::now(), ..service };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let mut t = self.tables.lock().await;
        t.services.remove(&id).ok_or_else(|| ServiceError::not_found("service"))?;
        t.subscriptions.retain(|_, row| row.service_id != id);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create(&self, new: NewSubscription) -> Result<Subscription, ServiceError> {
        models::subscription::validate_price(new.price)?;
        let mut t = self.tables.lock().await;
        if !t.services.contains_key(&new.service_id) {
            return Err(ServiceError::Db(format!("service {} does not exist", new.service_id)));
        }
        Ok(insert_subscription(&mut t, new))
    }

    async fn get_by_id(&self, id: i32) -> Result<Subscription, ServiceError> {
        let t = self.tables.lock().await;
        t.subscriptions.get(&id).map(|row| t.joined(row)).ok_or_else(|| ServiceError::not_found("subscription"))
    }

    async fn get_all(&self) -> Result<Vec<Subscription>, ServiceError> {
        let t = self.tables.lock().await;
        Ok(t.subscriptions.values().map(|row| t.joined(row)).collect())
    }

    async fn update(&self, subscription: Subscription) -> Result<Subscription, ServiceError> {
        models::subscription::validate_price(subscription.price)?;
        let mut t = self.tables.lock().await;
        let row = t.subscriptions.get_mut(&subscription.id).ok_or_else(|| ServiceError::not_found("subscription"))?;
        row.service_id = subscription.service_id;
        row.price = subscription.price;
        row.user_id = subscription.user_id;
        row.start_date = subscription.start_date;
        row.end_date = subscription.end_date;
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(t.joined(&row))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let mut t = self.tables.lock().await;
        t.subscriptions.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("subscription"))
    }

    async fn sum_by_filters(&self, query: &SumQuery) -> Result<i64, ServiceError> {
        self.sum_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_sum_query.lock().await = Some(query.clone());

        let t = self.tables.lock().await;
        let total = t
            .subscriptions
            .values()
            .filter(|row| {
                let name = t.services.get(&row.service_id).map(|s| s.name.as_str());
                query.matches(row, name)
            })
            .map(|row| row.price)
            .sum();
        Ok(total)
    }
}
