//! Title-level royalty totals.

use super::{ensure_non_negative, CalculationError};
use crate::domain::{Decimal, FormatCalculation, RoundingMode};

/// Title royalty for a period before splitting and recoupment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleRoyalty {
    /// Sum of every format royalty.
    pub gross: Decimal,
    /// Reserve against returns taken after summing formats.
    pub returns_deduction: Decimal,
    /// `gross - returns_deduction`. Negative when the deduction exceeds gross.
    pub total: Decimal,
}

impl TitleRoyalty {
    /// What authors can actually earn from this total.
    pub fn earnable(&self) -> Decimal {
        self.total.max(Decimal::zero())
    }
}

pub fn aggregate_title(
    formats: &[FormatCalculation],
    returns_deduction: Decimal,
    rounding: RoundingMode,
) -> Result<TitleRoyalty, CalculationError> {
    ensure_non_negative("returnsDeduction", returns_deduction)?;

    let gross = formats
        .iter()
        .try_fold(Decimal::zero(), |acc, f| acc.checked_add(f.format_royalty))
        .ok_or_else(|| CalculationError::overflow("gross title royalty"))?
        .round_money(rounding);
    let returns_deduction = returns_deduction.round_money(rounding);
    let total = gross
        .checked_sub(returns_deduction)
        .ok_or_else(|| CalculationError::overflow("title royalty after returns deduction"))?;

    Ok(TitleRoyalty {
        gross,
        returns_deduction,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Format, SalesAggregate};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn format_calc(format: Format, royalty: &str) -> FormatCalculation {
        FormatCalculation {
            format,
            net_sales: SalesAggregate::new(format, 0, d("0"), 0, d("0")).net_sales(),
            tier_breakdowns: vec![],
            format_royalty: d(royalty),
        }
    }

    #[test]
    fn test_sums_formats() {
        let formats = vec![
            format_calc(Format::Physical, "2625.00"),
            format_calc(Format::Ebook, "5600.00"),
            format_calc(Format::Audiobook, "1920.00"),
        ];
        let title = aggregate_title(&formats, Decimal::zero(), RoundingMode::HalfUp).unwrap();
        assert_eq!(title.gross.to_string(), "10145.00");
        assert_eq!(title.total, title.gross);
    }

    #[test]
    fn test_deduction_applied_after_sum() {
        let formats = vec![format_calc(Format::Physical, "100.00")];
        let title = aggregate_title(&formats, d("245.50"), RoundingMode::HalfUp).unwrap();
        assert_eq!(title.total.to_string(), "-145.50");
        assert!(title.earnable().is_zero());
    }

    #[test]
    fn test_no_formats_is_zero() {
        let title = aggregate_title(&[], Decimal::zero(), RoundingMode::HalfUp).unwrap();
        assert_eq!(title.total.to_string(), "0.00");
    }

    #[test]
    fn test_out_of_range_gross_is_an_error() {
        let max = "79228162514264337593543950335";
        let formats = vec![
            format_calc(Format::Physical, max),
            format_calc(Format::Ebook, max),
        ];
        assert_eq!(
            aggregate_title(&formats, Decimal::zero(), RoundingMode::HalfUp),
            Err(CalculationError::overflow("gross title royalty"))
        );
    }

    #[test]
    fn test_negative_deduction_rejected() {
        assert!(aggregate_title(&[], d("-1"), RoundingMode::HalfUp).is_err());
    }
}
