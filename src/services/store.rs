//! Explicit store handle over the SeaORM connection.
//!
//! Every write the sync jobs make goes through `commit_batch`, which applies a
//! prepared list of operations inside one database transaction.

use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::entities::rank_tables::{RankMetric, TimeWindow};
use crate::entities::{collections, data_points, prelude::*, rank_table_entries, rank_tables};
use crate::error::SyncError;

/// A write prepared ahead of a batch commit
#[derive(Debug, Clone)]
pub enum PendingOp {
    /// Insert-or-overwrite keyed by (collection_id, timestamp)
    UpsertDataPoint(data_points::ActiveModel),
    /// Insert-or-overwrite keyed by (collection_id, table_id)
    UpsertRankEntry(rank_table_entries::ActiveModel),
    /// Remove every entry of a ranking table
    ClearRankTable { table_id: i32 },
    SetFloor { collection_id: i32, floor: Decimal },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub rows_deleted: u64,
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_collection_by_address(
        &self,
        address: &str,
    ) -> Result<Option<collections::Model>, DbErr> {
        Collections::find()
            .filter(collections::Column::Address.eq(address))
            .one(&self.db)
            .await
    }

    /// Inserts a new collection. A unique-key violation is reported as
    /// `ConflictOnCreate` so callers can fall back to a lookup.
    pub async fn create_collection(
        &self,
        collection: collections::ActiveModel,
    ) -> Result<collections::Model, SyncError> {
        collection.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => SyncError::ConflictOnCreate(err),
            _ => SyncError::Store(err),
        })
    }

    pub async fn count_collections(&self) -> Result<u64, DbErr> {
        Collections::find().count(&self.db).await
    }

    pub async fn all_collections(&self) -> Result<Vec<collections::Model>, DbErr> {
        Collections::find()
            .order_by_asc(collections::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn find_rank_table(
        &self,
        metric: RankMetric,
        window: TimeWindow,
    ) -> Result<Option<rank_tables::Model>, DbErr> {
        RankTables::find()
            .filter(rank_tables::Column::RankType.eq(metric))
            .filter(rank_tables::Column::TimePeriod.eq(window))
            .one(&self.db)
            .await
    }

    /// Upsert with an empty update: concurrent callers converge on one row.
    pub async fn find_or_create_rank_table(
        &self,
        metric: RankMetric,
        window: TimeWindow,
    ) -> Result<rank_tables::Model, DbErr> {
        let table = rank_tables::ActiveModel {
            rank_type: Set(metric),
            time_period: Set(window),
            ..Default::default()
        };

        RankTables::insert(table)
            .on_conflict(
                OnConflict::columns([
                    rank_tables::Column::RankType,
                    rank_tables::Column::TimePeriod,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.find_rank_table(metric, window)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("rank table {:?}/{:?}", metric, window)))
    }

    pub async fn data_points_for(
        &self,
        collection_id: i32,
    ) -> Result<Vec<data_points::Model>, DbErr> {
        DataPoints::find()
            .filter(data_points::Column::CollectionId.eq(collection_id))
            .order_by_asc(data_points::Column::Timestamp)
            .all(&self.db)
            .await
    }

    pub async fn rank_entries_for(
        &self,
        table_id: i32,
    ) -> Result<Vec<rank_table_entries::Model>, DbErr> {
        RankTableEntries::find()
            .filter(rank_table_entries::Column::TableId.eq(table_id))
            .order_by_asc(rank_table_entries::Column::Position)
            .all(&self.db)
            .await
    }

    /// Applies all operations in order inside one transaction. Any failure
    /// rolls the whole batch back.
    pub async fn commit_batch(&self, ops: Vec<PendingOp>) -> Result<BatchOutcome, SyncError> {
        let txn = self.db.begin().await.map_err(SyncError::CommitFailed)?;

        let mut outcome = BatchOutcome::default();
        for op in ops {
            outcome.rows_deleted += apply(&txn, op).await.map_err(SyncError::CommitFailed)?;
            outcome.applied += 1;
        }

        txn.commit().await.map_err(SyncError::CommitFailed)?;
        Ok(outcome)
    }
}

/// Returns the number of rows deleted by the operation
async fn apply<C: ConnectionTrait>(conn: &C, op: PendingOp) -> Result<u64, DbErr> {
    match op {
        PendingOp::UpsertDataPoint(point) => {
            DataPoints::insert(point)
                .on_conflict(
                    OnConflict::columns([
                        data_points::Column::CollectionId,
                        data_points::Column::Timestamp,
                    ])
                    .update_columns([
                        data_points::Column::AvgPrice,
                        data_points::Column::MaxPrice,
                        data_points::Column::MinPrice,
                        data_points::Column::TokensBurned,
                        data_points::Column::TokensMinted,
                        data_points::Column::TotalBurned,
                        data_points::Column::TotalMinted,
                        data_points::Column::SalesCount,
                        data_points::Column::SalesVolume,
                        data_points::Column::OwnersCount,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
            Ok(0)
        }
        PendingOp::UpsertRankEntry(entry) => {
            RankTableEntries::insert(entry)
                .on_conflict(
                    OnConflict::columns([
                        rank_table_entries::Column::CollectionId,
                        rank_table_entries::Column::TableId,
                    ])
                    .update_columns([
                        rank_table_entries::Column::Position,
                        rank_table_entries::Column::Value,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
            Ok(0)
        }
        PendingOp::ClearRankTable { table_id } => {
            let result = RankTableEntries::delete_many()
                .filter(rank_table_entries::Column::TableId.eq(table_id))
                .exec(conn)
                .await?;
            Ok(result.rows_affected)
        }
        PendingOp::SetFloor {
            collection_id,
            floor,
        } => {
            Collections::update_many()
                .col_expr(collections::Column::Floor, Expr::value(floor))
                .filter(collections::Column::Id.eq(collection_id))
                .exec(conn)
                .await?;
            Ok(0)
        }
    }
}
