//! Advance recoupment for one author.

use super::{ensure_non_negative, CalculationError};
use crate::domain::{AdvanceStatus, ContractTerms, Decimal, RoundingMode};

/// Effect of one period's earnings on an author's advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoupmentOutcome {
    pub recoupment: Decimal,
    pub net_payable: Decimal,
    pub advance_status: AdvanceStatus,
}

/// Apply `earned` against the unrecouped advance in `terms`.
///
/// Reports the delta only; `terms` is never modified. A negative `earned`
/// counts as zero.
pub fn apply_recoupment(
    earned: Decimal,
    terms: &ContractTerms,
    rounding: RoundingMode,
) -> Result<RecoupmentOutcome, CalculationError> {
    ensure_non_negative("advanceAmount", terms.advance_amount)?;
    ensure_non_negative("advancePaid", terms.advance_paid)?;
    ensure_non_negative("advanceRecouped", terms.advance_recouped)?;

    let earned = earned.max(Decimal::zero()).round_money(rounding);
    let remaining = terms.remaining_advance().round_money(rounding);

    let recoupment = earned.min(remaining);
    let net_payable = earned - recoupment;

    tracing::debug!(
        contract_id = %terms.contract_id,
        earned = %earned,
        remaining = %remaining,
        recoupment = %recoupment,
        "advance recoupment applied"
    );

    Ok(RecoupmentOutcome {
        recoupment,
        net_payable,
        advance_status: AdvanceStatus {
            total_advance: terms.advance_amount.round_money(rounding),
            previously_recouped: terms.advance_recouped.round_money(rounding),
            remaining_after_this_period: remaining - recoupment,
        },
    })
}
