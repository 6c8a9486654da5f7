use sea_orm_migration::prelude::*;

use crate::m20221104_000001_create_collections::Collections;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataPoints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataPoints::CollectionId).integer().not_null())
                    .col(
                        ColumnDef::new(DataPoints::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DataPoints::AvgPrice).decimal().null())
                    .col(ColumnDef::new(DataPoints::MaxPrice).decimal().null())
                    .col(ColumnDef::new(DataPoints::MinPrice).decimal().null())
                    .col(ColumnDef::new(DataPoints::TokensBurned).big_integer().null())
                    .col(ColumnDef::new(DataPoints::TokensMinted).big_integer().null())
                    .col(ColumnDef::new(DataPoints::TotalBurned).big_integer().null())
                    .col(ColumnDef::new(DataPoints::TotalMinted).big_integer().null())
                    .col(ColumnDef::new(DataPoints::SalesCount).big_integer().null())
                    .col(ColumnDef::new(DataPoints::SalesVolume).decimal().null())
                    .col(ColumnDef::new(DataPoints::OwnersCount).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_data_points_collection")
                            .from(DataPoints::Table, DataPoints::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One sample per collection per timestamp; the populator upserts on this key
        manager
            .create_index(
                Index::create()
                    .name("idx_data_points_collection_timestamp")
                    .table(DataPoints::Table)
                    .col(DataPoints::CollectionId)
                    .col(DataPoints::Timestamp)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataPoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DataPoints {
    Table,
    Id,
    CollectionId,
    Timestamp,
    AvgPrice,
    MaxPrice,
    MinPrice,
    TokensBurned,
    TokensMinted,
    TotalBurned,
    TotalMinted,
    SalesCount,
    SalesVolume,
    OwnersCount,
}
