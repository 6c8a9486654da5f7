//! Mnemonic market data client.
//!
//! `MarketDataSource` is the seam the sync jobs depend on; `MnemonicClient`
//! is the HTTP implementation. The translation between local enums and the
//! API's enumeration strings lives here and nowhere else.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use sea_orm::Iterable;
use serde::de::DeserializeOwned;

use crate::entities::rank_tables::{RankMetric, TimeWindow};
use crate::error::MarketDataError;
use crate::models::mnemonic::{
    CollectionMeta, FloorPrice, OwnersSample, PriceSample, SalesSample, SupplySample, TimeGroup,
    TimeSeries, TopCollections,
};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn collection_meta(&self, address: &str) -> Result<CollectionMeta, MarketDataError>;

    async fn collection_price_history(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<PriceSample>, MarketDataError>;

    async fn collection_sales_volume(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SalesSample>, MarketDataError>;

    async fn collection_tokens_supply(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SupplySample>, MarketDataError>;

    async fn collection_owners_count(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<OwnersSample>, MarketDataError>;

    async fn floor_price(&self, address: &str) -> Result<FloorPrice, MarketDataError>;

    async fn top_collections(
        &self,
        metric: RankMetric,
        window: TimeWindow,
    ) -> Result<TopCollections, MarketDataError>;
}

pub fn rank_type_param(metric: RankMetric) -> &'static str {
    match metric {
        RankMetric::AvgPrice => "RANK_TYPE_AVG_PRICE",
        RankMetric::MaxPrice => "RANK_TYPE_MAX_PRICE",
        RankMetric::SalesCount => "RANK_TYPE_SALES_COUNT",
        RankMetric::SalesVolume => "RANK_TYPE_SALES_VOLUME",
    }
}

pub fn duration_param(window: TimeWindow) -> &'static str {
    match window {
        TimeWindow::OneDay => "DURATION_1_DAY",
        TimeWindow::SevenDays => "DURATION_7_DAYS",
        TimeWindow::ThirtyDays => "DURATION_30_DAYS",
        TimeWindow::OneYear => "DURATION_365_DAYS",
    }
}

pub fn group_by_param(granularity: TimeGroup) -> &'static str {
    match granularity {
        TimeGroup::FifteenMinutes => "GROUP_BY_PERIOD_15_MINUTES",
        TimeGroup::OneHour => "GROUP_BY_PERIOD_1_HOUR",
        TimeGroup::OneDay => "GROUP_BY_PERIOD_1_DAY",
    }
}

pub fn rank_metric_from_param(value: &str) -> Option<RankMetric> {
    RankMetric::iter().find(|metric| rank_type_param(*metric) == value)
}

pub fn time_window_from_param(value: &str) -> Option<TimeWindow> {
    TimeWindow::iter().find(|window| duration_param(*window) == value)
}

#[derive(Clone)]
pub struct MnemonicClient {
    client: Client,
    api_key: String,
    base_url: String,
    top_limit: u32,
}

impl MnemonicClient {
    pub fn new(api_key: String, base_url: String, top_limit: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            top_limit,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| MarketDataError::InvalidResponse(format!("{}: {}", path, e)))
    }

    fn series_query(
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("duration", duration_param(window).to_string()),
            ("groupByPeriod", group_by_param(granularity).to_string()),
            (
                "timestampLt",
                anchor.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]
    }
}

#[async_trait]
impl MarketDataSource for MnemonicClient {
    async fn collection_meta(&self, address: &str) -> Result<CollectionMeta, MarketDataError> {
        tracing::debug!("Fetching collection metadata for {}", address);
        self.get_json(
            &format!("/collections/v1beta2/{}/metadata", address),
            &[("includeStats", "true".to_string())],
        )
        .await
    }

    async fn collection_price_history(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<PriceSample>, MarketDataError> {
        self.get_json(
            &format!("/pricing/v1beta1/prices/by_contract/{}", address),
            &Self::series_query(window, granularity, anchor),
        )
        .await
    }

    async fn collection_sales_volume(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SalesSample>, MarketDataError> {
        self.get_json(
            &format!("/collections/v1beta2/{}/sales_volume", address),
            &Self::series_query(window, granularity, anchor),
        )
        .await
    }

    async fn collection_tokens_supply(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SupplySample>, MarketDataError> {
        self.get_json(
            &format!("/collections/v1beta2/{}/supply", address),
            &Self::series_query(window, granularity, anchor),
        )
        .await
    }

    async fn collection_owners_count(
        &self,
        address: &str,
        window: TimeWindow,
        granularity: TimeGroup,
        anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<OwnersSample>, MarketDataError> {
        self.get_json(
            &format!("/collections/v1beta2/{}/owners_count", address),
            &Self::series_query(window, granularity, anchor),
        )
        .await
    }

    async fn floor_price(&self, address: &str) -> Result<FloorPrice, MarketDataError> {
        self.get_json(
            &format!("/pricing/v1beta2/floor/by_contract/{}", address),
            &[],
        )
        .await
    }

    async fn top_collections(
        &self,
        metric: RankMetric,
        window: TimeWindow,
    ) -> Result<TopCollections, MarketDataError> {
        tracing::info!(
            "Fetching top collections by {} over {}",
            rank_type_param(metric),
            duration_param(window)
        );
        self.get_json(
            "/collections/v1beta2/top",
            &[
                ("rankBy", rank_type_param(metric).to_string()),
                ("duration", duration_param(window).to_string()),
                ("limit", self.top_limit.to_string()),
            ],
        )
        .await
    }
}
