//! Create `car` table.
//! One row per car document; `id` is a store-assigned UUID string.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(string_len(Car::Id, 36).primary_key())
                    .col(string_null(Car::Color))
                    .col(string_null(Car::Brand))
                    .col(integer(Car::Revision).default(0))
                    .col(timestamp_with_time_zone(Car::CreatedAt))
                    .col(timestamp_with_time_zone(Car::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // List ordering is by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_car_created_at")
                    .table(Car::Table)
                    .col(Car::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Car::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Car {
    Table,
    Id,
    Color,
    Brand,
    Revision,
    CreatedAt,
    UpdatedAt,
}
