//! Tiered rate application.

use crate::domain::{Decimal, RateSchedule, RoundingMode, ScheduleError, TierBreakdown};
use thiserror::Error;

/// Tier-by-tier allocation of a net quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAllocation {
    /// Only tiers that absorbed at least one unit, in schedule order.
    pub breakdowns: Vec<TierBreakdown>,
    /// Exact sum of the breakdown royalty amounts.
    pub royalty: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("quantity {requested} exceeds schedule capacity {capacity}")]
    CapacityExceeded { requested: u64, capacity: u64 },
    #[error("royalty for tier {tier_index} is out of range")]
    Overflow { tier_index: usize },
}

/// Walk the schedule in ascending order, filling each tier before the next.
///
/// Each tier's amount is rounded to the cent with `rounding`; the total is the
/// sum of those rounded amounts, so the breakdown always adds up to the total.
pub fn apply_tiers(
    net_quantity: u64,
    schedule: &RateSchedule,
    rounding: RoundingMode,
) -> Result<TierAllocation, TierError> {
    schedule.validate()?;

    let mut remaining = net_quantity;
    let mut breakdowns = Vec::new();

    for (tier_index, tier) in schedule.tiers.iter().enumerate() {
        if remaining == 0 {
            break;
        }

        let units_applied = match tier.capacity() {
            Some(capacity) => remaining.min(capacity),
            None => remaining,
        };
        if units_applied == 0 {
            continue;
        }

        let royalty_amount = schedule
            .basis
            .per_unit_amount(tier.rate)
            .and_then(|per_unit| Decimal::from_units(units_applied).checked_mul(per_unit))
            .ok_or(TierError::Overflow { tier_index })?
            .round_money(rounding);

        breakdowns.push(TierBreakdown {
            tier_index,
            min_quantity: tier.min_quantity,
            max_quantity: tier.max_quantity,
            rate: tier.rate,
            units_applied,
            royalty_amount,
        });
        remaining -= units_applied;
    }

    if remaining > 0 {
        return Err(TierError::CapacityExceeded {
            requested: net_quantity,
            capacity: net_quantity - remaining,
        });
    }

    let mut royalty = Decimal::zero();
    for breakdown in &breakdowns {
        royalty = royalty
            .checked_add(breakdown.royalty_amount)
            .ok_or(TierError::Overflow {
                tier_index: breakdown.tier_index,
            })?;
    }
    let royalty = royalty.round_money(rounding);

    Ok(TierAllocation {
        breakdowns,
        royalty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RateBasis, RateTier};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn two_tier() -> RateSchedule {
        RateSchedule::new(vec![
            RateTier::new(0, Some(1000), d("0.08")),
            RateTier::new(1000, None, d("0.10")),
        ])
    }

    #[test]
    fn test_quantity_spills_into_second_tier() {
        let allocation = apply_tiers(1250, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(allocation.breakdowns.len(), 2);
        assert_eq!(allocation.breakdowns[0].units_applied, 1000);
        assert_eq!(allocation.breakdowns[0].royalty_amount.to_string(), "80.00");
        assert_eq!(allocation.breakdowns[1].units_applied, 250);
        assert_eq!(allocation.breakdowns[1].royalty_amount.to_string(), "25.00");
        assert_eq!(allocation.royalty.to_string(), "105.00");
    }

    #[test]
    fn test_quantity_within_first_tier_omits_unreached_tiers() {
        let allocation = apply_tiers(400, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(allocation.breakdowns.len(), 1);
        assert_eq!(allocation.breakdowns[0].tier_index, 0);
        assert_eq!(allocation.royalty, d("32"));
    }

    #[test]
    fn test_zero_quantity_is_empty() {
        let allocation = apply_tiers(0, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert!(allocation.breakdowns.is_empty());
        assert_eq!(allocation.royalty.to_string(), "0.00");
    }

    #[test]
    fn test_exact_tier_boundary() {
        let allocation = apply_tiers(1000, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(allocation.breakdowns.len(), 1);
        assert_eq!(allocation.breakdowns[0].units_applied, 1000);
    }

    #[test]
    fn test_bounded_schedule_over_capacity_fails() {
        let schedule = RateSchedule::new(vec![RateTier::new(0, Some(100), d("1"))]);
        assert_eq!(
            apply_tiers(150, &schedule, RoundingMode::HalfUp),
            Err(TierError::CapacityExceeded {
                requested: 150,
                capacity: 100
            })
        );
    }

    #[test]
    fn test_invalid_schedule_fails_even_for_zero_quantity() {
        let schedule = RateSchedule::new(vec![]);
        assert_eq!(
            apply_tiers(0, &schedule, RoundingMode::HalfUp),
            Err(TierError::Schedule(ScheduleError::Empty))
        );
    }

    #[test]
    fn test_list_price_basis() {
        let schedule = two_tier().with_basis(RateBasis::ListPrice {
            list_price: d("25.00"),
        });
        let allocation = apply_tiers(1250, &schedule, RoundingMode::HalfUp).unwrap();
        assert_eq!(allocation.breakdowns[0].royalty_amount.to_string(), "2000.00");
        assert_eq!(allocation.breakdowns[1].royalty_amount.to_string(), "625.00");
        assert_eq!(allocation.royalty.to_string(), "2625.00");
    }

    #[test]
    fn test_out_of_range_royalty_is_an_error() {
        let schedule = RateSchedule::flat(d("10000000000"));
        assert_eq!(
            apply_tiers(u64::MAX, &schedule, RoundingMode::HalfUp),
            Err(TierError::Overflow { tier_index: 0 })
        );

        let priced = RateSchedule::flat(d("10000000000")).with_basis(RateBasis::ListPrice {
            list_price: d("79228162514264337593543950335"),
        });
        assert_eq!(
            apply_tiers(1, &priced, RoundingMode::HalfUp),
            Err(TierError::Overflow { tier_index: 0 })
        );
    }

    #[test]
    fn test_tier_amounts_round_per_tier() {
        // 3 units at 0.125 = 0.375 per tier.
        let schedule = RateSchedule::new(vec![
            RateTier::new(0, Some(3), d("0.125")),
            RateTier::new(3, None, d("0.125")),
        ]);
        let allocation = apply_tiers(6, &schedule, RoundingMode::HalfUp).unwrap();
        assert_eq!(allocation.breakdowns[0].royalty_amount.to_string(), "0.38");
        assert_eq!(allocation.breakdowns[1].royalty_amount.to_string(), "0.38");
        assert_eq!(allocation.royalty.to_string(), "0.76");
    }
}
