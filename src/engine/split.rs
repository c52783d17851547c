//! Ownership splits with exact-sum reconciliation.
//!
//! Uses the largest remainder method: every exact share is truncated to the cent,
//! then the cents lost to truncation go one at a time to the authors with the
//! largest fractional remainders. Ties go to the author listed first.

use super::{CalculationError, OwnershipPolicy};
use crate::domain::{AuthorOwnership, Decimal, RoundingMode, PERCENT_SCALE};
use std::collections::HashSet;

/// Check the ownership set and return the percentage sum used as the divisor.
fn validate_owners(
    owners: &[AuthorOwnership],
    policy: OwnershipPolicy,
) -> Result<Decimal, CalculationError> {
    if owners.is_empty() {
        return Err(CalculationError::InvalidOwnership(
            "no authors to split between".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for owner in owners {
        let pct = owner.ownership_percentage;
        if !pct.is_positive() || pct > Decimal::hundred() || pct.fractional_digits() > PERCENT_SCALE
        {
            return Err(CalculationError::InvalidPercentage {
                contact_id: owner.contact_id,
                percentage: pct,
            });
        }
        if !seen.insert(owner.contact_id) {
            return Err(CalculationError::DuplicateAuthor(owner.contact_id));
        }
    }

    let total_pct: Decimal = owners.iter().map(|o| o.ownership_percentage).sum();
    if policy == OwnershipPolicy::Strict && total_pct != Decimal::hundred() {
        return Err(CalculationError::InvalidOwnership(format!(
            "ownership percentages sum to {}, expected 100",
            total_pct.to_canonical_string()
        )));
    }
    if total_pct != Decimal::hundred() {
        tracing::warn!(
            total_pct = %total_pct,
            "ownership percentages do not sum to 100; allocating by share of actual sum"
        );
    }

    Ok(total_pct)
}

/// Split `total_royalty` across `owners`, returning amounts in input order.
///
/// A total at or below zero splits into zeros. Otherwise the amounts sum to the
/// cent-rounded total exactly.
pub fn split_royalty(
    total_royalty: Decimal,
    owners: &[AuthorOwnership],
    policy: OwnershipPolicy,
    rounding: RoundingMode,
) -> Result<Vec<Decimal>, CalculationError> {
    let total_pct = validate_owners(owners, policy)?;

    if !total_royalty.is_positive() {
        return Ok(vec![Decimal::zero().round_money(rounding); owners.len()]);
    }

    let total = total_royalty.round_money(rounding);
    let exact = owners
        .iter()
        .map(|o| {
            total
                .checked_mul(o.ownership_percentage)
                .and_then(|scaled| scaled.checked_div(total_pct))
                .ok_or_else(|| {
                    CalculationError::overflow(format!("royalty share for author {}", o.contact_id))
                })
        })
        .collect::<Result<Vec<Decimal>, _>>()?;
    let mut amounts: Vec<Decimal> = exact.iter().map(Decimal::floor_money).collect();

    let mut remaining = total - amounts.iter().sum::<Decimal>();

    // Stable sort keeps input order among equal remainders.
    let mut order: Vec<usize> = (0..owners.len()).collect();
    order.sort_by(|&a, &b| (exact[b] - amounts[b]).cmp(&(exact[a] - amounts[a])));

    // Each truncation loses under a cent, so one pass hands out every leftover cent.
    for idx in order {
        if remaining < Decimal::cent() {
            break;
        }
        amounts[idx] += Decimal::cent();
        remaining = remaining - Decimal::cent();
    }

    let actual: Decimal = amounts.iter().sum();
    if actual != total {
        return Err(CalculationError::SplitMismatch {
            expected: total,
            actual,
        });
    }

    tracing::debug!(authors = owners.len(), total = %total, "royalty split reconciled");
    Ok(amounts)
}
