//! Per-format royalty: returns netting followed by tier application.

use super::tiers::{apply_tiers, TierError};
use super::{ensure_non_negative, CalculationError};
use crate::domain::{FormatCalculation, RateSchedule, RoundingMode, SalesAggregate};

/// Royalty for one format. Royalty follows net quantity; revenue is reported only.
pub fn calculate_format(
    sales: &SalesAggregate,
    schedule: &RateSchedule,
    rounding: RoundingMode,
) -> Result<FormatCalculation, CalculationError> {
    ensure_non_negative("grossRevenue", sales.gross_revenue)?;
    ensure_non_negative("returnsAmount", sales.returns_amount)?;

    let net_sales = sales.net_sales();
    if sales.returns_quantity > sales.gross_quantity {
        tracing::warn!(
            format = %sales.format,
            gross = sales.gross_quantity,
            returns = sales.returns_quantity,
            "returns exceed gross sales; net quantity clamped to zero"
        );
    }

    let allocation =
        apply_tiers(net_sales.net_quantity, schedule, rounding).map_err(|err| match err {
            TierError::Schedule(source) => CalculationError::InvalidSchedule {
                format: sales.format,
                source,
            },
            TierError::CapacityExceeded {
                requested,
                capacity,
            } => CalculationError::ScheduleCapacityExceeded {
                format: sales.format,
                net_quantity: requested,
                capacity,
            },
            TierError::Overflow { tier_index } => {
                CalculationError::overflow(format!("{} royalty at tier {}", sales.format, tier_index))
            }
        })?;

    tracing::debug!(
        format = %sales.format,
        net_quantity = net_sales.net_quantity,
        tiers_used = allocation.breakdowns.len(),
        royalty = %allocation.royalty,
        "format royalty computed"
    );

    Ok(FormatCalculation {
        format: sales.format,
        net_sales,
        tier_breakdowns: allocation.breakdowns,
        format_royalty: allocation.royalty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Format, RateTier, ScheduleError};

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
    fn test_returns_reduce_royalty_quantity() {
        let sales = SalesAggregate::new(Format::Physical, 1300, d("32500"), 50, d("1250"));
        let calc = calculate_format(&sales, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(calc.net_sales.net_quantity, 1250);
        assert_eq!(calc.net_sales.net_revenue, d("31250"));
        assert_eq!(calc.format_royalty.to_string(), "105.00");
    }

    #[test]
    fn test_full_returns_yield_zero_royalty() {
        let sales = SalesAggregate::new(Format::Ebook, 500, d("3500"), 500, d("3500"));
        let calc = calculate_format(&sales, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(calc.net_sales.net_quantity, 0);
        assert!(calc.tier_breakdowns.is_empty());
        assert!(calc.format_royalty.is_zero());
    }

    #[test]
    fn test_excess_returns_never_negative() {
        let sales = SalesAggregate::new(Format::Ebook, 500, d("3500"), 650, d("4550"));
        let calc = calculate_format(&sales, &two_tier(), RoundingMode::HalfUp).unwrap();
        assert_eq!(calc.net_sales.net_quantity, 0);
        assert!(!calc.format_royalty.is_negative());
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let sales = SalesAggregate::new(Format::Ebook, 5, d("-1"), 0, d("0"));
        let err = calculate_format(&sales, &two_tier(), RoundingMode::HalfUp).unwrap_err();
        assert!(matches!(err, CalculationError::NegativeAmount { ref field, .. } if field == "grossRevenue"));
    }

    #[test]
    fn test_out_of_range_royalty_names_format_and_tier() {
        let sales = SalesAggregate::new(Format::Physical, u64::MAX, d("1"), 0, d("0"));
        let err = calculate_format(&sales, &RateSchedule::flat(d("10000000000")), RoundingMode::HalfUp)
            .unwrap_err();
        assert_eq!(
            err,
            CalculationError::ArithmeticOverflow {
                context: "physical royalty at tier 0".to_string()
            }
        );
    }

    #[test]
    fn test_schedule_error_names_format() {
        let sales = SalesAggregate::new(Format::Audiobook, 5, d("50"), 0, d("0"));
        let err = calculate_format(&sales, &RateSchedule::new(vec![]), RoundingMode::HalfUp)
            .unwrap_err();
        assert_eq!(
            err,
            CalculationError::InvalidSchedule {
                format: Format::Audiobook,
                source: ScheduleError::Empty
            }
        );
        assert!(err.to_string().contains("audiobook"));
    }
}
