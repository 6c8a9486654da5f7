//! `SeaORM` Entity for the tracked NFT collections

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Contract address as reported by the market data API
    #[sea_orm(unique)]
    pub address: String,
    pub name: String,
    /// Token type tags joined by a single space
    pub collection_type: String,
    pub tokens: i64,
    pub owners: i64,
    pub sales_volume: Decimal,
    #[sea_orm(column_type = "Text")]
    pub banner_img: String,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ext_url: Option<String>,
    /// Real-time floor price in the chain's native currency
    pub floor: Option<Decimal>,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::data_points::Entity")]
    DataPoints,
    #[sea_orm(has_many = "super::rank_table_entries::Entity")]
    RankTableEntries,
}

impl Related<super::data_points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataPoints.def()
    }
}

impl Related<super::rank_table_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankTableEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
