use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use models::{service, subscription};

use crate::catalog::{Service, ServiceRepository};
use crate::errors::ServiceError;
use crate::subscription::{NewSubscription, Subscription, SubscriptionRepository, SumQuery};

/// SeaORM-backed catalog repository.
#[derive(Clone)]
pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn not_updated(entity: &str) -> impl FnOnce(DbErr) -> ServiceError + '_ {
    move |e| match e {
        DbErr::RecordNotUpdated => ServiceError::not_found(entity),
        e => ServiceError::from(e),
    }
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn create(&self, name: &str) -> Result<Service, ServiceError> {
        Ok(service::create(&self.db, name).await?)
    }

    async fn get_all(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(service::Entity::find().order_by_asc(service::Column::Id).all(&self.db).await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Service, ServiceError> {
        service::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    async fn get_by_name(&self, name: &str) -> Result<Service, ServiceError> {
        service::Entity::find()
            .filter(service::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    async fn update(&self, svc: Service) -> Result<Service, ServiceError> {
        service::validate_name(&svc.name)?;
        let am = service::ActiveModel {
            id: Set(svc.id),
            name: Set(svc.name),
            created_at: Set(svc.created_at),
            updated_at: Set(Utc::now()),
        };
        am.update(&self.db).await.map_err(not_updated("service"))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = service::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("service"));
        }
        Ok(())
    }
}

/// SeaORM-backed subscription repository. Reads join the owning service.
#[derive(Clone)]
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, new: NewSubscription) -> Result<Subscription, ServiceError> {
        let row = subscription::create(
            &self.db,
            new.service_id,
            new.price,
            new.user_id,
            new.start_date,
            new.end_date,
        )
        .await?;
        Ok(Subscription::from_parts(row, None))
    }

    async fn get_by_id(&self, id: i32) -> Result<Subscription, ServiceError> {
        let (row, svc) = subscription::Entity::find_by_id(id)
            .find_also_related(service::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("subscription"))?;
        Ok(Subscription::from_parts(row, svc))
    }

    async fn get_all(&self) -> Result<Vec<Subscription>, ServiceError> {
        let rows = subscription::Entity::find()
            .find_also_related(service::Entity)
            .order_by_asc(subscription::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(row, svc)| Subscription::from_parts(row, svc)).collect())
    }

    async fn update(&self, sub: Subscription) -> Result<Subscription, ServiceError> {
        subscription::validate_price(sub.price)?;
        let am = subscription::ActiveModel {
            id: Set(sub.id),
            service_id: Set(sub.service_id),
            price: Set(sub.price),
            user_id: Set(sub.user_id),
            start_date: Set(sub.start_date),
            end_date: Set(sub.end_date),
            created_at: Set(sub.created_at),
            updated_at: Set(Utc::now()),
        };
        let row = am.update(&self.db).await.map_err(not_updated("subscription"))?;
        Ok(Subscription::from_parts(row, sub.service))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = subscription::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("subscription"));
        }
        Ok(())
    }

    async fn sum_by_filters(&self, query: &SumQuery) -> Result<i64, ServiceError> {
        // SUM(bigint) is NUMERIC in postgres; cast back so it decodes as i64.
        let total = Func::cast_as(
            Func::sum(Expr::col((subscription::Entity, subscription::Column::Price))),
            Alias::new("BIGINT"),
        );
        let mut select = subscription::Entity::find()
            .select_only()
            .column_as(SimpleExpr::from(total), "total");

        if let Some(user_id) = query.user_id {
            select = select.filter(subscription::Column::UserId.eq(user_id));
        }
        if let Some(name) = query.service_name.as_deref() {
            select = select
                .join(JoinType::InnerJoin, subscription::Relation::Service.def())
                .filter(service::Column::Name.eq(name));
        }
        if let Some(start) = query.start {
            select = select.filter(subscription::Column::StartDate.gte(start));
        }
        if let Some(end) = query.end {
            select = select.filter(
                Condition::any()
                    .add(subscription::Column::EndDate.lte(end))
                    .add(subscription::Column::EndDate.is_null()),
            );
        }

        let total: Option<Option<i64>> = select.into_tuple().one(&self.db).await?;
        Ok(total.flatten().unwrap_or(0))
    }
}
