//! Request/response models for the collection ranking endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};

use crate::entities::rank_tables::{RankMetric, TimeWindow};
use crate::services::mnemonic::{rank_metric_from_param, time_window_from_param};
use crate::services::top_collections::PAGE_SIZE;

/// Largest accepted page index
pub const MAX_CURSOR: i64 = i64::MAX / PAGE_SIZE as i64;

/// Query parameters for GET /api/collections/top
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopCollectionsQuery {
    /// avgPrice | maxPrice | salesCount | salesVolume (default: avgPrice)
    pub rank: Option<String>,
    /// oneDay | sevenDays | thirtyDays | oneYear (default: oneDay)
    pub time: Option<String>,
    /// Zero-based page index (default: 0)
    pub cursor: Option<i64>,
}

impl TopCollectionsQuery {
    /// Validates and resolves defaults. `rank` and `time` also accept the
    /// Mnemonic spellings (`RANK_TYPE_SALES_COUNT`, `DURATION_7_DAYS`).
    pub fn resolve(&self) -> Result<(RankMetric, TimeWindow, u64), String> {
        let metric = match self.rank.as_deref() {
            None => RankMetric::AvgPrice,
            Some(raw) => RankMetric::try_from_value(&raw.to_string())
                .ok()
                .or_else(|| rank_metric_from_param(raw))
                .ok_or_else(|| format!("Invalid rank: '{}'", raw))?,
        };

        let window = match self.time.as_deref() {
            None => TimeWindow::OneDay,
            Some(raw) => TimeWindow::try_from_value(&raw.to_string())
                .ok()
                .or_else(|| time_window_from_param(raw))
                .ok_or_else(|| format!("Invalid time: '{}'", raw))?,
        };

        let cursor = self.cursor.unwrap_or(0);
        if cursor < 0 {
            return Err("cursor cannot be negative".to_string());
        }
        // Page offsets must stay within a signed 64-bit OFFSET
        if cursor > MAX_CURSOR {
            return Err(format!("cursor cannot exceed {}", MAX_CURSOR));
        }

        Ok((metric, window, cursor as u64))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One row of a ranking page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCollectionRow {
    pub id: i32,
    pub address: String,
    pub name: String,
    pub image: String,
    pub floor: Option<Decimal>,
    /// Ranked metric value as reported upstream
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCollectionsResponse {
    pub collections: Vec<RankedCollectionRow>,
    /// Total entries in the ranking table, for pagination
    pub max: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointView {
    pub timestamp: DateTime<Utc>,
    pub avg_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub tokens_burned: Option<i64>,
    pub tokens_minted: Option<i64>,
    pub total_burned: Option<i64>,
    pub total_minted: Option<i64>,
    pub sales_count: Option<i64>,
    pub sales_volume: Option<Decimal>,
    pub owners_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionHistoryResponse {
    pub address: String,
    pub name: String,
    pub floor: Option<Decimal>,
    pub data_points: Vec<DataPointView>,
}
