//! In-memory caching using moka
//!
//! Price plans and the option catalog change rarely (admin edits), while
//! quote requests arrive on every form keystroke, so both are cached with
//! short TTLs. Staleness is bounded by the TTL; a quote computed from a plan
//! a few minutes old is acceptable.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::quote::models::{ParkingOption, PricePlan};
use crate::quote::queries;

/// Cache key for the active plan (singleton entry)
pub const ACTIVE_PLAN_KEY: &str = "plan:active";

/// Cache key for the option catalog (singleton entry)
pub const OPTION_CATALOG_KEY: &str = "options:active";

/// Application cache holding the active plan and option catalog
#[derive(Clone)]
pub struct AppCache {
    /// Active price plan with its tier table (singleton)
    pub plan: Cache<String, Arc<PricePlan>>,
    /// Active option catalog (singleton)
    pub options: Cache<String, Arc<Vec<ParkingOption>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Active plan: 1 entry, 5 min TTL
            plan: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),

            // Option catalog: 1 entry, 5 min TTL
            options: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            plan_cached: self.plan.entry_count() > 0,
            options_cached: self.options.entry_count() > 0,
        }
    }

    /// Invalidate all caches (called after admin pricing edits)
    pub fn invalidate_all(&self) {
        self.plan.invalidate_all();
        self.options.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub plan_cached: bool,
    pub options_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 5 minutes so the first
/// quote after a quiet period does not pay the DB round-trips.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    warm_cache(&cache, &db).await;

    let mut interval = interval(Duration::from_secs(5 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the active plan and option catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::find_active_plan(db, chrono::Utc::now()).await {
        Ok(Some(row)) => {
            let tiers = match queries::get_plan_tiers(db, row.id).await {
                Ok(tiers) => tiers,
                Err(e) => {
                    warn!("Failed to load tier table during warm-up: {}", e);
                    vec![]
                }
            };
            cache
                .plan
                .insert(ACTIVE_PLAN_KEY.to_string(), Arc::new(row.with_tiers(tiers)))
                .await;
        }
        Ok(None) => {
            // No active plan configured; quotes fall back to the default
        }
        Err(e) => warn!("Failed to warm plan cache: {}", e),
    }

    match queries::get_active_options(db).await {
        Ok(options) => {
            cache
                .options
                .insert(OPTION_CATALOG_KEY.to_string(), Arc::new(options))
                .await;
        }
        Err(e) => warn!("Failed to warm option catalog cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
