//! Result structures produced by a royalty calculation.
//!
//! Every value here is built fresh per calculation and never mutated afterwards.
//! Field order is fixed, so the JSON form of a result is canonical.

use crate::domain::{ContactId, ContractId, Decimal, Format, NetSales, StatementPeriod, TitleId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Units and royalty attributed to one tier of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBreakdown {
    /// 0-based position of the tier in its schedule.
    pub tier_index: usize,
    pub min_quantity: u64,
    pub max_quantity: Option<u64>,
    pub rate: Decimal,
    pub units_applied: u64,
    pub royalty_amount: Decimal,
}

/// Royalty earned by one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatCalculation {
    pub format: Format,
    pub net_sales: NetSales,
    pub tier_breakdowns: Vec<TierBreakdown>,
    pub format_royalty: Decimal,
}

/// Advance position after this period's recoupment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStatus {
    pub total_advance: Decimal,
    pub previously_recouped: Decimal,
    pub remaining_after_this_period: Decimal,
}

/// One co-author's share of a split calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSplitBreakdown {
    pub contact_id: ContactId,
    pub contract_id: ContractId,
    pub ownership_percentage: Decimal,
    pub split_amount: Decimal,
    pub recoupment: Decimal,
    pub net_payable: Decimal,
    pub advance_status: AdvanceStatus,
}

/// Complete royalty result for one title and statement period.
///
/// Single-author titles leave `author_splits` empty and report their advance
/// position in `advance_status`; split titles report it per author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyCalculation {
    pub period: StatementPeriod,
    pub author_id: ContactId,
    pub contract_id: ContractId,
    pub title_id: TitleId,
    pub format_calculations: Vec<FormatCalculation>,
    /// Sum of format royalties.
    pub gross_royalty: Decimal,
    pub returns_deduction: Decimal,
    /// Gross royalty less the returns deduction.
    pub title_total_royalty: Decimal,
    pub total_royalty_earned: Decimal,
    pub advance_recoupment: Decimal,
    pub net_payable: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_status: Option<AdvanceStatus>,
    pub is_split_calculation: bool,
    pub author_splits: Vec<AuthorSplitBreakdown>,
}

/// Recoupment the caller must persist against a contract once the statement is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceUpdate {
    pub contact_id: ContactId,
    pub contract_id: ContractId,
    pub recouped_delta: Decimal,
    pub advance_recouped_after: Decimal,
}

impl RoyaltyCalculation {
    /// Advance ledger deltas implied by this calculation, one per contract.
    pub fn advance_updates(&self) -> Vec<AdvanceUpdate> {
        if self.is_split_calculation {
            return self
                .author_splits
                .iter()
                .map(|split| AdvanceUpdate {
                    contact_id: split.contact_id,
                    contract_id: split.contract_id,
                    recouped_delta: split.recoupment,
                    advance_recouped_after: split.advance_status.previously_recouped
                        + split.recoupment,
                })
                .collect();
        }

        let previously_recouped = self
            .advance_status
            .as_ref()
            .map(|status| status.previously_recouped)
            .unwrap_or_default();

        vec![AdvanceUpdate {
            contact_id: self.author_id,
            contract_id: self.contract_id,
            recouped_delta: self.advance_recoupment,
            advance_recouped_after: previously_recouped + self.advance_recoupment,
        }]
    }

    /// Stable digest of the canonical JSON form.
    ///
    /// Two calculations with identical inputs share a fingerprint, so a dry run
    /// can be matched against the statement that was later finalized.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&canonical);
        Ok(format!("sha256:{}", hex::encode(&hash[..16])))
    }
}
