//! Collection ranking handlers
//!
//! GET /api/collections/top and GET /api/collections/{address}/history

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    models::collections::{
        CollectionHistoryResponse, DataPointView, ErrorResponse, TopCollectionsQuery,
        TopCollectionsResponse,
    },
    services::top_collections::top_collections_page,
    AppState,
};

/// Handler for GET /api/collections/top
///
/// One page of a ranking table in upstream order, plus the total entry count.
///
/// ```json
/// {
///   "collections": [
///     {"id": 3, "address": "0xbc4c...", "name": "BoredApeYachtClub",
///      "image": "ipfs://...", "floor": "68.9", "value": "72.4"}
///   ],
///   "max": 48
/// }
/// ```
pub async fn get_top_collections(
    State(state): State<AppState>,
    Query(query): Query<TopCollectionsQuery>,
) -> Result<Json<TopCollectionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (metric, window, page) = query
        .resolve()
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })))?;

    let cache_key = (metric, window, page);
    if let Some(cached) = state.page_cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {:?}/{:?} page {}", metric, window, page);
        return Ok(Json(cached));
    }

    let response = top_collections_page(&state.store, metric, window, page)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read rankings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })?;

    state.page_cache.insert(cache_key, response.clone()).await;

    Ok(Json(response))
}

/// Handler for GET /api/collections/{address}/history
pub async fn get_collection_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CollectionHistoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let db_error = |e: sea_orm::DbErr| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        )
    };

    let collection = state
        .store
        .find_collection_by_address(&address)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Collection '{}' is not tracked", address),
                }),
            )
        })?;

    let points = state
        .store
        .data_points_for(collection.id)
        .await
        .map_err(db_error)?;

    Ok(Json(CollectionHistoryResponse {
        address: collection.address,
        name: collection.name,
        floor: collection.floor,
        data_points: points
            .into_iter()
            .map(|p| DataPointView {
                timestamp: p.timestamp,
                avg_price: p.avg_price,
                max_price: p.max_price,
                min_price: p.min_price,
                tokens_burned: p.tokens_burned,
                tokens_minted: p.tokens_minted,
                total_burned: p.total_burned,
                total_minted: p.total_minted,
                sales_count: p.sales_count,
                sales_volume: p.sales_volume,
                owners_count: p.owners_count,
            })
            .collect(),
    }))
}
