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
                    .table(RankTables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RankTables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RankTables::RankType).string_len(32).not_null())
                    .col(ColumnDef::new(RankTables::TimePeriod).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rank_tables_type_period")
                    .table(RankTables::Table)
                    .col(RankTables::RankType)
                    .col(RankTables::TimePeriod)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RankTableEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RankTableEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RankTableEntries::CollectionId).integer().not_null())
                    .col(ColumnDef::new(RankTableEntries::TableId).integer().not_null())
                    .col(ColumnDef::new(RankTableEntries::Position).integer().not_null())
                    .col(ColumnDef::new(RankTableEntries::Value).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rank_table_entries_collection")
                            .from(RankTableEntries::Table, RankTableEntries::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rank_table_entries_table")
                            .from(RankTableEntries::Table, RankTableEntries::TableId)
                            .to(RankTables::Table, RankTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rank_table_entries_collection_table")
                    .table(RankTableEntries::Table)
                    .col(RankTableEntries::CollectionId)
                    .col(RankTableEntries::TableId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Paged reads walk a table in upstream order
        manager
            .create_index(
                Index::create()
                    .name("idx_rank_table_entries_table_position")
                    .table(RankTableEntries::Table)
                    .col(RankTableEntries::TableId)
                    .col(RankTableEntries::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RankTableEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RankTables::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RankTables {
    Table,
    Id,
    RankType,
    TimePeriod,
}

#[derive(DeriveIden)]
enum RankTableEntries {
    Table,
    Id,
    CollectionId,
    TableId,
    Position,
    Value,
}
