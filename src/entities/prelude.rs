//! `SeaORM` Entity prelude

pub use super::collections::Entity as Collections;
pub use super::data_points::Entity as DataPoints;
pub use super::rank_table_entries::Entity as RankTableEntries;
pub use super::rank_tables::Entity as RankTables;
pub use super::sync_status::Entity as SyncStatus;
