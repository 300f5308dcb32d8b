//! Database models for the quote engine.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::calculators::{DEFAULT_PEOPLE_FEE, DEFAULT_PEOPLE_THRESHOLD};

/// Price plan row from pricing_priceplan
#[derive(Debug, Clone, FromRow)]
pub struct PricePlanRow {
    pub id: Uuid,
    pub name: String,
    pub base_price: Decimal,
    pub base_duration_days: i32,
    pub additional_day_price: Decimal,
    pub late_fee: Decimal,
    pub people_threshold: i32,
    pub additional_people_fee: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl PricePlanRow {
    /// Attach a tier table to produce the plan the calculators consume.
    pub fn with_tiers(self, tiers: Vec<DurationTier>) -> PricePlan {
        PricePlan {
            id: self.id,
            name: self.name,
            base_price: self.base_price,
            base_duration_days: self.base_duration_days,
            additional_day_price: self.additional_day_price,
            late_fee: self.late_fee,
            people_threshold: self.people_threshold,
            additional_people_fee: self.additional_people_fee,
            currency: self.currency,
            tiers,
        }
    }
}

/// One entry of a plan's per-day price table, from pricing_durationtier.
/// Unique by `duration_days` within a plan.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DurationTier {
    pub duration_days: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// A price plan with its tier table attached. When `tiers` is non-empty the
/// flat-tier strategy applies; otherwise base + overflow.
#[derive(Debug, Clone)]
pub struct PricePlan {
    pub id: Uuid,
    pub name: String,
    pub base_price: Decimal,
    pub base_duration_days: i32,
    pub additional_day_price: Decimal,
    pub late_fee: Decimal,
    pub people_threshold: i32,
    pub additional_people_fee: Decimal,
    pub currency: String,
    pub tiers: Vec<DurationTier>,
}

impl PricePlan {
    /// Fallback single-tier plan used when no active plan exists in the
    /// database. The calculators are never invoked with undefined data.
    pub fn default_plan() -> Self {
        Self {
            id: Uuid::nil(),
            name: "Standard".to_string(),
            base_price: dec!(39.99),
            base_duration_days: 4,
            additional_day_price: dec!(10.00),
            late_fee: dec!(0),
            people_threshold: DEFAULT_PEOPLE_THRESHOLD,
            additional_people_fee: DEFAULT_PEOPLE_FEE,
            currency: "EUR".to_string(),
            tiers: vec![],
        }
    }
}

/// Add-on option from pricing_parkingoption (car wash, valet, charging, ...)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingOption {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub is_active: bool,
}

/// A customer's pick of one option with a quantity. Quantities below 1 are
/// clamped by the request layer before the calculators see them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSelection {
    pub option_id: Uuid,
    pub quantity: i32,
}
