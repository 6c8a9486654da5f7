pub use sea_orm_migration::prelude::*;

mod m20221104_000001_create_collections;
mod m20221104_000002_create_data_points;
mod m20221104_000003_create_rank_tables;
mod m20221104_000004_create_sync_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20221104_000001_create_collections::Migration),
            Box::new(m20221104_000002_create_data_points::Migration),
            Box::new(m20221104_000003_create_rank_tables::Migration),
            Box::new(m20221104_000004_create_sync_status::Migration),
        ]
    }
}
