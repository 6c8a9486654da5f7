//! Find-or-create for collections.
//!
//! Creation is the only path that calls the metadata endpoint and seeds the
//! initial history. The unique index on `collections.address` decides races:
//! a losing create falls back to reading the winner's row.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::Set;

use crate::entities::collections;
use crate::error::SyncError;
use crate::models::mnemonic::{CollectionMeta, MetadataType};
use crate::services::mnemonic::MarketDataSource;
use crate::services::store::Store;
use crate::services::time_series::{DEFAULT_GRANULARITY, DEFAULT_WINDOW, populate_data_points};

pub async fn resolve_collection(
    store: &Store,
    market: &dyn MarketDataSource,
    address: &str,
) -> Result<collections::Model, SyncError> {
    if let Some(existing) = store.find_collection_by_address(address).await? {
        return Ok(existing);
    }

    tracing::info!("New collection {}, fetching metadata", address);
    let meta = market.collection_meta(address).await?;

    match store.create_collection(new_collection(address, &meta)).await {
        Ok(created) => {
            populate_data_points(
                store,
                market,
                created.id,
                &created.address,
                DEFAULT_WINDOW,
                DEFAULT_GRANULARITY,
            )
            .await?;
            tracing::info!("Created collection {} ({})", created.name, created.address);
            Ok(created)
        }
        Err(create_err) => {
            // Most likely a concurrent resolver inserted the same address first
            tracing::debug!("Create failed for {}: {}, re-reading", address, create_err);
            store
                .find_collection_by_address(address)
                .await?
                .ok_or_else(|| SyncError::ResolutionFailed {
                    address: address.to_string(),
                    reason: create_err.to_string(),
                })
        }
    }
}

/// Maps upstream metadata onto a new row. Banner and image default to empty
/// strings; description and external URL stay null when absent.
pub fn new_collection(address: &str, meta: &CollectionMeta) -> collections::ActiveModel {
    collections::ActiveModel {
        address: Set(address.to_string()),
        name: Set(meta.name.clone()),
        collection_type: Set(meta.types.join(" ")),
        tokens: Set(as_i64(meta.tokens_count)),
        owners: Set(as_i64(meta.owners_count)),
        sales_volume: Set(meta.sales_volume),
        banner_img: Set(meta
            .metadata_value(MetadataType::BannerImage)
            .unwrap_or_default()
            .to_string()),
        image: Set(meta
            .metadata_value(MetadataType::Image)
            .unwrap_or_default()
            .to_string()),
        description: Set(meta
            .metadata_value(MetadataType::Description)
            .map(str::to_string)),
        ext_url: Set(meta
            .metadata_value(MetadataType::ExternalUrl)
            .map(str::to_string)),
        floor: Set(None),
        ..Default::default()
    }
}

fn as_i64(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or_default()
}
