//! Contract terms and title ownership records.

use crate::domain::{ContactId, ContractId, Decimal};
use serde::{Deserialize, Serialize};

/// Advance position of a contract as of "now".
///
/// The caller owns this state; a calculation only reads it and reports the delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
    pub contract_id: ContractId,
    pub advance_amount: Decimal,
    pub advance_paid: Decimal,
    pub advance_recouped: Decimal,
}

impl ContractTerms {
    pub fn new(
        contract_id: ContractId,
        advance_amount: Decimal,
        advance_paid: Decimal,
        advance_recouped: Decimal,
    ) -> Self {
        Self {
            contract_id,
            advance_amount,
            advance_paid,
            advance_recouped,
        }
    }

    /// Build terms from the decimal strings a contract store hands back.
    ///
    /// # Errors
    /// Returns an error if any figure is not a valid decimal.
    pub fn from_strings(
        contract_id: ContractId,
        advance_amount: &str,
        advance_paid: &str,
        advance_recouped: &str,
    ) -> Result<Self, rust_decimal::Error> {
        Ok(Self {
            contract_id,
            advance_amount: Decimal::from_str_canonical(advance_amount)?,
            advance_paid: Decimal::from_str_canonical(advance_paid)?,
            advance_recouped: Decimal::from_str_canonical(advance_recouped)?,
        })
    }

    /// A contract with no advance.
    pub fn without_advance(contract_id: ContractId) -> Self {
        Self::new(
            contract_id,
            Decimal::zero(),
            Decimal::zero(),
            Decimal::zero(),
        )
    }

    /// Paid advance not yet earned back, never negative.
    pub fn remaining_advance(&self) -> Decimal {
        (self.advance_paid - self.advance_recouped).max(Decimal::zero())
    }
}

/// One author's share of a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorOwnership {
    pub contact_id: ContactId,
    pub contract_id: ContractId,
    pub ownership_percentage: Decimal,
}

impl AuthorOwnership {
    pub fn new(contact_id: ContactId, contract_id: ContractId, ownership_percentage: Decimal) -> Self {
        Self {
            contact_id,
            contract_id,
            ownership_percentage,
        }
    }
}

/// The author a statement is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementAuthor {
    pub contact_id: ContactId,
    pub contract_id: ContractId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn contract_id() -> ContractId {
        ContractId::new(Uuid::from_u128(1))
    }

    #[test]
    fn test_remaining_advance() {
        let terms = ContractTerms::from_strings(contract_id(), "10000", "10000", "2500.50").unwrap();
        assert_eq!(terms.remaining_advance().to_string(), "7499.50");
    }

    #[test]
    fn test_remaining_advance_never_negative() {
        let terms = ContractTerms::from_strings(contract_id(), "5000", "5000", "5200").unwrap();
        assert!(terms.remaining_advance().is_zero());
    }

    #[test]
    fn test_unpaid_advance_is_not_recoupable() {
        let terms = ContractTerms::from_strings(contract_id(), "5000", "0", "0").unwrap();
        assert!(terms.remaining_advance().is_zero());
    }

    #[test]
    fn test_from_strings_rejects_garbage() {
        assert!(ContractTerms::from_strings(contract_id(), "ten thousand", "0", "0").is_err());
    }
}
