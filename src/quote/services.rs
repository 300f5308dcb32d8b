//! Quote service functions with database access.
//!
//! These functions own input validation and plan/catalog resolution (cache
//! first, then database), then hand pre-validated data to the pure
//! calculators.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::cache::{AppCache, ACTIVE_PLAN_KEY, OPTION_CATALOG_KEY};

use super::calculators::{compute_quote, Quote};
use super::models::{OptionSelection, ParkingOption, PricePlan};
use super::queries;

/// Quote calculation error types
#[derive(Debug, Clone)]
pub enum QuoteError {
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Database {
        context: String,
    },
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteError::InvalidDateRange { .. } => {
                write!(f, "the departure date must be after the arrival date")
            }
            QuoteError::Database { context } => {
                write!(f, "Database error while building quote: {}", context)
            }
        }
    }
}

impl std::error::Error for QuoteError {}

/// Resolve the active price plan, cache first.
///
/// When no active plan exists in the database the built-in single-tier
/// default is substituted, so the calculators are never invoked with
/// undefined data. The default is not cached: an admin activating a plan
/// takes effect on the next request.
pub async fn resolve_active_plan(
    pool: &PgPool,
    cache: &AppCache,
    as_of: Option<DateTime<Utc>>,
) -> Result<Arc<PricePlan>, QuoteError> {
    if let Some(cached) = cache.plan.get(ACTIVE_PLAN_KEY).await {
        return Ok(cached);
    }

    let check_time = as_of.unwrap_or_else(Utc::now);
    let row = queries::find_active_plan(pool, check_time)
        .await
        .map_err(|e| QuoteError::Database {
            context: e.to_string(),
        })?;

    match row {
        Some(row) => {
            let tiers =
                queries::get_plan_tiers(pool, row.id)
                    .await
                    .map_err(|e| QuoteError::Database {
                        context: e.to_string(),
                    })?;
            let plan = Arc::new(row.with_tiers(tiers));
            cache
                .plan
                .insert(ACTIVE_PLAN_KEY.to_string(), plan.clone())
                .await;
            Ok(plan)
        }
        None => {
            warn!("No active price plan configured, using the built-in default");
            Ok(Arc::new(PricePlan::default_plan()))
        }
    }
}

/// Resolve the active option catalog, cache first.
pub async fn resolve_option_catalog(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<Vec<ParkingOption>>, QuoteError> {
    if let Some(cached) = cache.options.get(OPTION_CATALOG_KEY).await {
        return Ok(cached);
    }

    let options = queries::get_active_options(pool)
        .await
        .map_err(|e| QuoteError::Database {
            context: e.to_string(),
        })?;
    let options = Arc::new(options);
    cache
        .options
        .insert(OPTION_CATALOG_KEY.to_string(), options.clone())
        .await;
    Ok(options)
}

/// Build a quote for a prospective reservation.
///
/// Validates the date range, resolves the plan and catalog, and runs the
/// calculators. Selection quantities are expected to be clamped to >= 1 by
/// the request layer.
pub async fn build_quote(
    pool: &PgPool,
    cache: &AppCache,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    selections: &[OptionSelection],
    number_of_people: Option<i32>,
) -> Result<Quote, QuoteError> {
    if end <= start {
        return Err(QuoteError::InvalidDateRange { start, end });
    }

    let plan = resolve_active_plan(pool, cache, None).await?;
    let catalog = resolve_option_catalog(pool, cache).await?;

    // A booking with no party size given is a lone driver
    let people = number_of_people.unwrap_or(1);

    Ok(compute_quote(start, end, &plan, selections, &catalog, people))
}
