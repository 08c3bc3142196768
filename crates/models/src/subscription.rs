use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::service::Entity",
        from = "Column::ServiceId",
        to = "crate::service::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Service,
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_price(price: i64) -> Result<(), errors::ModelError> {
    if price < 0 {
        return Err(errors::ModelError::Validation("price must be >= 0".into()));
    }
    Ok(())
}

/// `end` may equal `start` (a single-month subscription) but never precede it.
pub fn validate_period(start: &DateTimeUtc, end: Option<&DateTimeUtc>) -> bool {
    end.map_or(true, |end| end >= start)
}

pub async fn create(
    db: &DatabaseConnection,
    service_id: i32,
    price: i64,
    user_id: Uuid,
    start_date: DateTimeUtc,
    end_date: Option<DateTimeUtc>,
) -> Result<Model, errors::ModelError> {
    validate_price(price)?;
    if !validate_period(&start_date, end_date.as_ref()) {
        return Err(errors::ModelError::Validation("end date must be after start date".into()));
    }

    let now = Utc::now();
    let am = ActiveModel {
        service_id: Set(service_id),
        price: Set(price),
        user_id: Set(user_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
