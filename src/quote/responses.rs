//! Response DTOs for the quote API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::Quote;
use super::models::{DurationTier, PricePlan};

/// Price breakdown returned to booking forms and the admin calculator
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub days: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub options_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub people_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub currency: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            days: quote.days,
            base_price: quote.base_price,
            options_total: quote.options_total,
            people_surcharge: quote.people_surcharge,
            total: quote.total,
            currency: quote.currency,
        }
    }
}

/// Active plan as shown to the admin pricing calculator
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub base_duration_days: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub additional_day_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub late_fee: Decimal,
    pub people_threshold: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub additional_people_fee: Decimal,
    pub currency: String,
    pub tiers: Vec<DurationTier>,
}

impl From<&PricePlan> for PlanResponse {
    fn from(plan: &PricePlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.clone(),
            base_price: plan.base_price,
            base_duration_days: plan.base_duration_days,
            additional_day_price: plan.additional_day_price,
            late_fee: plan.late_fee,
            people_threshold: plan.people_threshold,
            additional_people_fee: plan.additional_people_fee,
            currency: plan.currency.clone(),
            tiers: plan.tiers.clone(),
        }
    }
}

/// Generic quote error response
#[derive(Debug, Serialize)]
pub struct QuoteErrorResponse {
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_response_serializes_decimals_as_strings() {
        let response = QuoteResponse {
            days: 3,
            base_price: dec!(39.99),
            options_total: dec!(15),
            people_surcharge: dec!(0),
            total: dec!(54.99),
            currency: "EUR".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["days"], 3);
        assert_eq!(json["base_price"], "39.99");
        assert_eq!(json["total"], "54.99");
        assert_eq!(json["currency"], "EUR");
    }

    #[test]
    fn test_plan_response_serializes_tier_prices_as_strings() {
        let mut plan = PricePlan::default_plan();
        plan.tiers = vec![DurationTier {
            duration_days: 1,
            price: dec!(39),
        }];

        let json = serde_json::to_value(PlanResponse::from(&plan)).unwrap();
        assert_eq!(json["base_price"], "39.99");
        assert_eq!(json["tiers"][0]["price"], "39");
    }
}
