//! Request DTOs for the quote API endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::models::OptionSelection;

/// Request to quote a parking stay
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub options: Vec<OptionSelectionRequest>,
    #[serde(default)]
    pub number_of_people: Option<i32>,
}

impl QuoteRequest {
    /// Convert the raw selections into validated domain selections.
    /// Quantities below 1 are clamped, per the calculator contract.
    pub fn selections(&self) -> Vec<OptionSelection> {
        self.options.iter().map(OptionSelectionRequest::clamped).collect()
    }
}

/// One selected add-on option in the request
#[derive(Debug, Deserialize)]
pub struct OptionSelectionRequest {
    pub option_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

impl OptionSelectionRequest {
    fn clamped(&self) -> OptionSelection {
        OptionSelection {
            option_id: self.option_id,
            quantity: self.quantity.max(1),
        }
    }
}
