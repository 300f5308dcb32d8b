//! Core quote calculation functions.
//!
//! Pure functions for pricing math - no database access. Every booking form
//! and the admin pricing calculator go through these, so the arithmetic lives
//! in exactly one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use tracing::warn;

use super::models::{OptionSelection, ParkingOption, PricePlan};

/// Party size above which the group surcharge applies.
pub const DEFAULT_PEOPLE_THRESHOLD: i32 = 4;

/// Flat surcharge charged once when the party exceeds the threshold.
pub const DEFAULT_PEOPLE_FEE: Decimal = dec!(8.00);

const SECONDS_PER_DAY: i64 = 86_400;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is
/// exactly halfway between two possibilities, which reduces cumulative bias
/// on division-derived amounts.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use aeroparc_quote::quote::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Number of billable parking days for a stay.
///
/// Ceiling of the elapsed time in whole days, clamped to a minimum of 1.
/// A sub-day stay still occupies a slot for a day, and an inverted range is
/// the caller's validation problem, not this function's - it never returns
/// less than 1.
pub fn compute_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days.max(1) as i32
}

/// Base price for a stay of `days` under the given plan.
///
/// Two mutually exclusive strategies, selected by whether the plan carries a
/// per-day tier table:
///
/// 1. **Flat-tier lookup**: pick the tier whose `duration_days` is the
///    nearest at-or-below match for `days`. Below the smallest tier the
///    smallest applies; beyond the largest the largest applies. The table is
///    a step function over stay length, continued flat at both ends.
/// 2. **Base + overflow**: `base_price`, plus one `additional_day_price` per
///    day beyond `base_duration_days`.
pub fn compute_base_price(days: i32, plan: &PricePlan) -> Decimal {
    if !plan.tiers.is_empty() {
        return tier_price(days, plan);
    }

    let mut price = plan.base_price;
    if days > plan.base_duration_days {
        let extra_days = days - plan.base_duration_days;
        price += Decimal::from(extra_days) * plan.additional_day_price;
    }
    price
}

/// Nearest-lower tier lookup. Assumes `plan.tiers` is non-empty and sorted
/// ascending by `duration_days` (the query layer guarantees ordering).
fn tier_price(days: i32, plan: &PricePlan) -> Decimal {
    let mut selected = &plan.tiers[0];
    for tier in &plan.tiers {
        if tier.duration_days > days {
            break;
        }
        selected = tier;
    }
    selected.price
}

/// Total for the selected add-on options.
///
/// Each selection is resolved against the catalog; `price * quantity` for
/// every hit. A selection whose `option_id` is not in the catalog (deleted
/// or deactivated since the form was rendered) contributes zero - tolerated
/// drift, logged so it does not go unnoticed.
pub fn compute_options_total(
    selections: &[OptionSelection],
    catalog: &[ParkingOption],
) -> Decimal {
    let mut total = Decimal::ZERO;
    for selection in selections {
        match catalog.iter().find(|o| o.id == selection.option_id) {
            Some(option) => {
                total += option.price * Decimal::from(selection.quantity);
            }
            None => {
                warn!(
                    option_id = %selection.option_id,
                    "Selected option not in catalog, contributes zero"
                );
            }
        }
    }
    total
}

/// Group surcharge: the flat `fee` applies once when the party size exceeds
/// `threshold`, regardless of how far above it is.
pub fn compute_people_surcharge(number_of_people: i32, threshold: i32, fee: Decimal) -> Decimal {
    if number_of_people > threshold {
        fee
    } else {
        Decimal::ZERO
    }
}

/// Computed price breakdown for a prospective reservation. Derived, never
/// persisted - the caller displays it or copies the agreed total into the
/// reservation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub days: i32,
    pub base_price: Decimal,
    pub options_total: Decimal,
    pub people_surcharge: Decimal,
    pub total: Decimal,
    pub currency: String,
}

/// Full quote for a stay: billable days, base price under the plan's
/// strategy, options subtotal, group surcharge, and their sum.
///
/// Inputs are assumed pre-validated (date ordering, quantity clamping); this
/// function is deterministic and never errors.
pub fn compute_quote(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    plan: &PricePlan,
    selections: &[OptionSelection],
    catalog: &[ParkingOption],
    number_of_people: i32,
) -> Quote {
    let days = compute_days(start, end);
    let base_price = compute_base_price(days, plan);
    let options_total = compute_options_total(selections, catalog);
    let people_surcharge = compute_people_surcharge(
        number_of_people,
        plan.people_threshold,
        plan.additional_people_fee,
    );

    Quote {
        days,
        base_price,
        options_total,
        people_surcharge,
        total: base_price + options_total + people_surcharge,
        currency: plan.currency.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::models::DurationTier;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn ts(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .unwrap()
            .and_utc()
    }

    fn base_plan() -> PricePlan {
        PricePlan {
            id: Uuid::new_v4(),
            name: "Standard".to_string(),
            base_price: dec!(39.99),
            base_duration_days: 4,
            additional_day_price: dec!(10),
            late_fee: dec!(0),
            people_threshold: 4,
            additional_people_fee: dec!(8.00),
            currency: "EUR".to_string(),
            tiers: vec![],
        }
    }

    fn tiered_plan(tiers: &[(i32, Decimal)]) -> PricePlan {
        let mut plan = base_plan();
        plan.tiers = tiers
            .iter()
            .map(|&(duration_days, price)| DurationTier {
                duration_days,
                price,
            })
            .collect();
        plan
    }

    fn option(id: Uuid, price: Decimal) -> ParkingOption {
        ParkingOption {
            id,
            name: "Option".to_string(),
            price,
            is_active: true,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== compute_days tests ====================

    #[test]
    fn test_compute_days_exact_multiple() {
        // 3 * 24h exactly
        let days = compute_days(ts("2024-06-01T10:00"), ts("2024-06-04T10:00"));
        assert_eq!(days, 3);
    }

    #[test]
    fn test_compute_days_rounds_up_partial_day() {
        // 2 days and one hour bills as 3 days
        let days = compute_days(ts("2024-06-01T10:00"), ts("2024-06-03T11:00"));
        assert_eq!(days, 3);
    }

    #[test]
    fn test_compute_days_sub_day_stay_clamps_to_one() {
        let days = compute_days(ts("2024-06-01T10:00"), ts("2024-06-01T15:00"));
        assert_eq!(days, 1);
    }

    #[test]
    fn test_compute_days_equal_timestamps_clamps_to_one() {
        let t = ts("2024-06-01T10:00");
        assert_eq!(compute_days(t, t), 1);
    }

    #[test]
    fn test_compute_days_inverted_range_clamps_to_one() {
        let days = compute_days(ts("2024-06-04T10:00"), ts("2024-06-01T10:00"));
        assert_eq!(days, 1);
    }

    // ==================== compute_base_price tests ====================

    #[test]
    fn test_tier_lookup_exact_match() {
        let plan = tiered_plan(&[
            (1, dec!(39)),
            (2, dec!(39)),
            (3, dec!(39)),
            (4, dec!(39)),
            (5, dec!(47)),
        ]);
        assert_eq!(compute_base_price(5, &plan), dec!(47));
        assert_eq!(compute_base_price(2, &plan), dec!(39));
    }

    #[test]
    fn test_tier_lookup_gap_uses_nearest_lower() {
        // 4 is not in the table; the day-3 tier applies
        let plan = tiered_plan(&[
            (1, dec!(39)),
            (2, dec!(42)),
            (3, dec!(45)),
            (5, dec!(55)),
        ]);
        assert_eq!(compute_base_price(4, &plan), dec!(45));
    }

    #[test]
    fn test_tier_lookup_beyond_table_uses_largest() {
        let plan = tiered_plan(&[(1, dec!(39)), (5, dec!(55))]);
        assert_eq!(compute_base_price(30, &plan), dec!(55));
    }

    #[test]
    fn test_tier_lookup_below_table_uses_smallest() {
        let plan = tiered_plan(&[(3, dec!(45)), (5, dec!(55))]);
        assert_eq!(compute_base_price(1, &plan), dec!(45));
    }

    #[test]
    fn test_base_overflow_within_window() {
        let plan = base_plan();
        assert_eq!(compute_base_price(3, &plan), dec!(39.99));
        assert_eq!(compute_base_price(4, &plan), dec!(39.99));
    }

    #[test]
    fn test_base_overflow_beyond_window() {
        // 39.99 + 2 extra days * 10
        let plan = base_plan();
        assert_eq!(compute_base_price(6, &plan), dec!(59.99));
    }

    // ==================== compute_options_total tests ====================

    #[test]
    fn test_options_total_price_times_quantity() {
        let id = Uuid::new_v4();
        let catalog = vec![option(id, dec!(10))];
        let selections = vec![OptionSelection {
            option_id: id,
            quantity: 3,
        }];
        assert_eq!(compute_options_total(&selections, &catalog), dec!(30));
    }

    #[test]
    fn test_options_total_unknown_id_contributes_zero() {
        let catalog = vec![option(Uuid::new_v4(), dec!(10))];
        let selections = vec![OptionSelection {
            option_id: Uuid::new_v4(),
            quantity: 2,
        }];
        assert_eq!(compute_options_total(&selections, &catalog), dec!(0));
    }

    #[test]
    fn test_options_total_mixed_known_and_unknown() {
        let known = Uuid::new_v4();
        let catalog = vec![option(known, dec!(15))];
        let selections = vec![
            OptionSelection {
                option_id: known,
                quantity: 1,
            },
            OptionSelection {
                option_id: Uuid::new_v4(),
                quantity: 5,
            },
        ];
        assert_eq!(compute_options_total(&selections, &catalog), dec!(15));
    }

    #[test]
    fn test_options_total_empty_selection() {
        let catalog = vec![option(Uuid::new_v4(), dec!(10))];
        assert_eq!(compute_options_total(&[], &catalog), dec!(0));
    }

    // ==================== compute_people_surcharge tests ====================

    #[test]
    fn test_people_surcharge_above_threshold() {
        assert_eq!(compute_people_surcharge(5, 4, dec!(8)), dec!(8));
    }

    #[test]
    fn test_people_surcharge_at_threshold() {
        assert_eq!(compute_people_surcharge(4, 4, dec!(8)), dec!(0));
    }

    #[test]
    fn test_people_surcharge_flat_regardless_of_overage() {
        // Applied once, not per person above the threshold
        assert_eq!(compute_people_surcharge(9, 4, dec!(8)), dec!(8));
    }

    // ==================== compute_quote tests ====================

    #[test]
    fn test_quote_end_to_end() {
        // 3-day stay within the base window, one 15-euro option, 2 people
        let id = Uuid::new_v4();
        let catalog = vec![option(id, dec!(15))];
        let selections = vec![OptionSelection {
            option_id: id,
            quantity: 1,
        }];

        let quote = compute_quote(
            ts("2024-06-01T10:00"),
            ts("2024-06-04T10:00"),
            &base_plan(),
            &selections,
            &catalog,
            2,
        );

        assert_eq!(quote.days, 3);
        assert_eq!(quote.base_price, dec!(39.99));
        assert_eq!(quote.options_total, dec!(15));
        assert_eq!(quote.people_surcharge, dec!(0));
        assert_eq!(quote.total, dec!(54.99));
        assert_eq!(quote.currency, "EUR");
    }

    #[test]
    fn test_quote_with_overflow_and_surcharge() {
        let quote = compute_quote(
            ts("2024-06-01T10:00"),
            ts("2024-06-07T10:00"),
            &base_plan(),
            &[],
            &[],
            5,
        );

        assert_eq!(quote.days, 6);
        assert_eq!(quote.base_price, dec!(59.99));
        assert_eq!(quote.people_surcharge, dec!(8.00));
        assert_eq!(quote.total, dec!(67.99));
    }

    #[test]
    fn test_quote_idempotent() {
        let id = Uuid::new_v4();
        let catalog = vec![option(id, dec!(12.50))];
        let selections = vec![OptionSelection {
            option_id: id,
            quantity: 2,
        }];
        let plan = tiered_plan(&[(1, dec!(39)), (5, dec!(47))]);

        let first = compute_quote(
            ts("2024-06-01T08:00"),
            ts("2024-06-06T08:00"),
            &plan,
            &selections,
            &catalog,
            4,
        );
        let second = compute_quote(
            ts("2024-06-01T08:00"),
            ts("2024-06-06T08:00"),
            &plan,
            &selections,
            &catalog,
            4,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_quote_total_is_sum_of_components() {
        let id = Uuid::new_v4();
        let catalog = vec![option(id, dec!(7.30))];
        let selections = vec![OptionSelection {
            option_id: id,
            quantity: 3,
        }];

        let quote = compute_quote(
            ts("2024-06-01T10:00"),
            ts("2024-06-09T10:00"),
            &base_plan(),
            &selections,
            &catalog,
            6,
        );

        assert_eq!(
            quote.total,
            quote.base_price + quote.options_total + quote.people_surcharge
        );
    }
}
