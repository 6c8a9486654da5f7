//! `SeaORM` Entity for a collection's slot in a ranking table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rank_table_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub collection_id: i32,
    pub table_id: i32,
    /// 1-based position in the upstream feed
    pub position: i32,
    /// Ranked metric value, kept verbatim from the feed
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collections::Entity",
        from = "Column::CollectionId",
        to = "super::collections::Column::Id",
        on_delete = "Cascade"
    )]
    Collections,
    #[sea_orm(
        belongs_to = "super::rank_tables::Entity",
        from = "Column::TableId",
        to = "super::rank_tables::Column::Id",
        on_delete = "Cascade"
    )]
    RankTables,
}

impl Related<super::collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl Related<super::rank_tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankTables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
