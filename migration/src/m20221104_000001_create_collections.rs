use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Collections::Address)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Collections::Name).string().not_null())
                    .col(ColumnDef::new(Collections::CollectionType).string().not_null())
                    .col(ColumnDef::new(Collections::Tokens).big_integer().not_null())
                    .col(ColumnDef::new(Collections::Owners).big_integer().not_null())
                    .col(ColumnDef::new(Collections::SalesVolume).decimal().not_null())
                    .col(ColumnDef::new(Collections::BannerImg).text().not_null())
                    .col(ColumnDef::new(Collections::Image).text().not_null())
                    .col(ColumnDef::new(Collections::Description).text().null())
                    .col(ColumnDef::new(Collections::ExtUrl).text().null())
                    .col(ColumnDef::new(Collections::Floor).decimal().null())
                    .col(
                        ColumnDef::new(Collections::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Collections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Collections {
    Table,
    Id,
    Address,
    Name,
    CollectionType,
    Tokens,
    Owners,
    SalesVolume,
    BannerImg,
    Image,
    Description,
    ExtUrl,
    Floor,
    CreatedAt,
}
