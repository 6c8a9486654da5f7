//! Bookkeeping for scheduled jobs, so a restart inside the interval does not
//! repeat a run that already succeeded.

use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

use crate::entities::sync_status::{self, Entity as SyncStatus};

pub mod jobs {
    pub const DAILY_SYNC: &str = "daily_sync";
}

pub async fn find_status(
    db: &DatabaseConnection,
    job_name: &str,
) -> Result<Option<sync_status::Model>, DbErr> {
    SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await
}

/// True when the job never succeeded or its interval has elapsed since the
/// last success.
pub async fn should_sync(db: &DatabaseConnection, job_name: &str) -> Result<bool, DbErr> {
    let status = find_status(db, job_name).await?;
    Ok(is_due(status.as_ref(), Utc::now().naive_utc()))
}

pub fn is_due(status: Option<&sync_status::Model>, now: NaiveDateTime) -> bool {
    let Some(record) = status else {
        return true;
    };
    let Some(last_success) = record.last_success_at else {
        return true;
    };

    let elapsed = now.signed_duration_since(last_success);
    let interval = Duration::seconds(record.min_interval_secs as i64);
    if elapsed >= interval {
        true
    } else {
        tracing::info!(
            "[{}] Last success {}s ago, next run in {}s",
            record.job_name,
            elapsed.num_seconds(),
            (interval - elapsed).num_seconds()
        );
        false
    }
}

pub async fn record_success(
    db: &DatabaseConnection,
    job_name: &str,
    interval_secs: i32,
) -> Result<(), DbErr> {
    let now = Utc::now().naive_utc();

    match find_status(db, job_name).await? {
        Some(record) => {
            let success_count = record.success_count + 1;
            let mut active = record.into_active_model();
            active.last_success_at = Set(Some(now));
            active.last_attempt_at = Set(Some(now));
            active.last_error = Set(None);
            active.success_count = Set(success_count);
            active.min_interval_secs = Set(interval_secs);
            active.update(db).await?;
        }
        None => {
            sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(Some(now)),
                last_attempt_at: Set(Some(now)),
                last_error: Set(None),
                success_count: Set(1),
                error_count: Set(0),
                min_interval_secs: Set(interval_secs),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    tracing::debug!("[{}] Recorded successful run", job_name);
    Ok(())
}

pub async fn record_failure(
    db: &DatabaseConnection,
    job_name: &str,
    error: &str,
    interval_secs: i32,
) -> Result<(), DbErr> {
    let now = Utc::now().naive_utc();

    match find_status(db, job_name).await? {
        Some(record) => {
            let error_count = record.error_count + 1;
            let mut active = record.into_active_model();
            active.last_attempt_at = Set(Some(now));
            active.last_error = Set(Some(error.to_string()));
            active.error_count = Set(error_count);
            active.update(db).await?;
        }
        None => {
            sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(None),
                last_attempt_at: Set(Some(now)),
                last_error: Set(Some(error.to_string())),
                success_count: Set(0),
                error_count: Set(1),
                min_interval_secs: Set(interval_secs),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    tracing::debug!("[{}] Recorded failed run", job_name);
    Ok(())
}
