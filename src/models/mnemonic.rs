//! Response payloads of the Mnemonic market data API.
//!
//! Mnemonic encodes most numbers as JSON strings; `Decimal` accepts both
//! forms, and ranking values are kept as the verbatim string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::EnumIter;
use serde::{Deserialize, Deserializer};

/// Sampling interval of a time series request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum TimeGroup {
    FifteenMinutes,
    OneHour,
    OneDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum MetadataType {
    #[serde(rename = "METADATA_TYPE_BANNER_IMAGE_URI")]
    BannerImage,
    #[serde(rename = "METADATA_TYPE_IMAGE")]
    Image,
    #[serde(rename = "METADATA_TYPE_DESCRIPTION")]
    Description,
    #[serde(rename = "METADATA_TYPE_EXTERNAL_URL")]
    ExternalUrl,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataEntry {
    #[serde(rename = "type")]
    pub kind: MetadataType,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub owners_count: Decimal,
    #[serde(default)]
    pub tokens_count: Decimal,
    #[serde(default)]
    pub sales_volume: Decimal,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CollectionMeta {
    /// First metadata value of the given type
    pub fn metadata_value(&self, kind: MetadataType) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.value.as_str())
    }
}

/// A time series response; samples are ordered oldest first
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries<T> {
    #[serde(default = "Vec::new")]
    pub data_points: Vec<T>,
}

impl<T> TimeSeries<T> {
    pub fn new(data_points: Vec<T>) -> Self {
        Self { data_points }
    }

    pub fn len(&self) -> usize {
        self.data_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub avg: Option<Decimal>,
    pub max: Option<Decimal>,
    pub min: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesSample {
    pub timestamp: DateTime<Utc>,
    pub count: Option<Decimal>,
    pub volume: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplySample {
    pub timestamp: DateTime<Utc>,
    pub minted: Option<Decimal>,
    pub burned: Option<Decimal>,
    pub total_minted: Option<Decimal>,
    pub total_burned: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnersSample {
    pub timestamp: DateTime<Utc>,
    pub count: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPriceValue {
    pub total_native: Option<Decimal>,
    pub total_usd: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FloorPrice {
    #[serde(default)]
    pub price: FloorPriceValue,
}

/// One row of the top-collections feed, in upstream rank order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCollection {
    pub contract_address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub avg_price: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_price: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sales_count: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sales_volume: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopCollections {
    #[serde(default)]
    pub collections: Vec<RankedCollection>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
