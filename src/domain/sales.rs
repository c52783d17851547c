//! Per-format sales aggregates and their netted form.

use crate::domain::{Decimal, Format};
use serde::{Deserialize, Serialize};

/// Gross sales and returns for one format over one statement period.
///
/// Upstream aggregation guarantees returns do not exceed gross; the engine
/// tolerates it anyway by clamping net quantity at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAggregate {
    pub format: Format,
    pub gross_quantity: u64,
    pub gross_revenue: Decimal,
    pub returns_quantity: u64,
    pub returns_amount: Decimal,
}

impl SalesAggregate {
    pub fn new(
        format: Format,
        gross_quantity: u64,
        gross_revenue: Decimal,
        returns_quantity: u64,
        returns_amount: Decimal,
    ) -> Self {
        Self {
            format,
            gross_quantity,
            gross_revenue,
            returns_quantity,
            returns_amount,
        }
    }

    /// Units that earn royalty: gross minus returns, never below zero.
    pub fn net_quantity(&self) -> u64 {
        self.gross_quantity.saturating_sub(self.returns_quantity)
    }

    /// Gross revenue minus returned amount. Reporting only; may be negative.
    pub fn net_revenue(&self) -> Decimal {
        self.gross_revenue - self.returns_amount
    }

    pub fn net_sales(&self) -> NetSales {
        NetSales {
            gross_quantity: self.gross_quantity,
            gross_revenue: self.gross_revenue,
            returns_quantity: self.returns_quantity,
            returns_amount: self.returns_amount,
            net_quantity: self.net_quantity(),
            net_revenue: self.net_revenue(),
        }
    }
}

/// Sales figures after returns netting, as reported on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetSales {
    pub gross_quantity: u64,
    pub gross_revenue: Decimal,
    pub returns_quantity: u64,
    pub returns_amount: Decimal,
    pub net_quantity: u64,
    pub net_revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_net_quantity_subtracts_returns() {
        let sales = SalesAggregate::new(Format::Physical, 1300, d("32500"), 50, d("1250"));
        assert_eq!(sales.net_quantity(), 1250);
        assert_eq!(sales.net_revenue(), d("31250"));
    }

    #[test]
    fn test_returns_exceeding_gross_clamp_to_zero() {
        let sales = SalesAggregate::new(Format::Ebook, 10, d("70"), 12, d("84"));
        assert_eq!(sales.net_quantity(), 0);
        assert_eq!(sales.net_revenue(), d("-14"));
    }

    #[test]
    fn test_negative_quantity_is_rejected_on_decode() {
        let json = r#"{"format":"ebook","grossQuantity":-1,"grossRevenue":"0","returnsQuantity":0,"returnsAmount":"0"}"#;
        assert!(serde_json::from_str::<SalesAggregate>(json).is_err());
    }
}
