//! Database queries for the quote engine.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{DurationTier, ParkingOption, PricePlanRow};

/// Find the price plan in effect at the given time, if any.
///
/// Only the validity window and active flag are filtered here; callers fall
/// back to the built-in default plan when this returns `None`.
pub async fn find_active_plan(
    pool: &PgPool,
    check_time: DateTime<Utc>,
) -> Result<Option<PricePlanRow>, AppError> {
    let plan = sqlx::query_as::<_, PricePlanRow>(
        r#"
        SELECT
            id, name, base_price, base_duration_days, additional_day_price,
            late_fee, people_threshold, additional_people_fee, currency,
            is_active, valid_from, valid_to
        FROM pricing_priceplan
        WHERE is_active = true
          AND valid_from <= $1
          AND (valid_to IS NULL OR valid_to > $1)
        ORDER BY valid_from DESC
        LIMIT 1
        "#,
    )
    .bind(check_time)
    .fetch_optional(pool)
    .await?;

    Ok(plan)
}

/// Get a plan's duration tier table, sorted ascending by duration.
///
/// The calculators rely on this ordering for nearest-lower tier selection.
pub async fn get_plan_tiers(pool: &PgPool, plan_id: Uuid) -> Result<Vec<DurationTier>, AppError> {
    let tiers = sqlx::query_as::<_, DurationTier>(
        r#"
        SELECT duration_days, price
        FROM pricing_durationtier
        WHERE plan_id = $1
        ORDER BY duration_days ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await?;

    Ok(tiers)
}

/// Get all active add-on options, sorted by name for stable form rendering.
pub async fn get_active_options(pool: &PgPool) -> Result<Vec<ParkingOption>, AppError> {
    let options = sqlx::query_as::<_, ParkingOption>(
        r#"
        SELECT id, name, price, is_active
        FROM pricing_parkingoption
        WHERE is_active = true
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(options)
}
