use sea_orm::DbErr;
use thiserror::Error;

/// Failures talking to the market data API
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mnemonic API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid market data: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the synchronization jobs
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetchFailed(#[from] MarketDataError),

    /// Unique key violation while creating a row; a concurrent writer won
    #[error("Conflicting create: {0}")]
    ConflictOnCreate(#[source] DbErr),

    #[error("Collection {address} could not be resolved: {reason}")]
    ResolutionFailed { address: String, reason: String },

    #[error("Batch commit failed: {0}")]
    CommitFailed(#[source] DbErr),

    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}
