//! Create `subscriptions` table.
//! A user's paid period for a service; `end_date` NULL means still active.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscriptions::Id))
                    .col(integer(Subscriptions::ServiceId).not_null())
                    .col(big_integer(Subscriptions::Price).not_null())
                    .col(uuid(Subscriptions::UserId).not_null())
                    .col(timestamp_with_time_zone(Subscriptions::StartDate).not_null())
                    .col(timestamp_with_time_zone_null(Subscriptions::EndDate))
                    .col(timestamp_with_time_zone(Subscriptions::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscriptions::UpdatedAt).not_null())
                    .check(Expr::col(Subscriptions::Price).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_service")
                            .from(Subscriptions::Table, Subscriptions::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    ServiceId,
    Price,
    UserId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
