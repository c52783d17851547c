//! Pure computation engine for royalty statements.
//!
//! Nothing in here performs I/O or keeps state between calls.

use crate::domain::{ContactId, ContractId, Decimal, Format, RoundingMode, ScheduleError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aggregate;
pub mod format;
pub mod recoupment;
pub mod split;
pub mod tiers;

pub use aggregate::{aggregate_title, TitleRoyalty};
pub use format::calculate_format;
pub use recoupment::{apply_recoupment, RecoupmentOutcome};
pub use split::split_royalty;
pub use tiers::{apply_tiers, TierAllocation, TierError};

/// How ownership percentages that do not sum to 100 are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipPolicy {
    /// Reject unless the percentages sum to exactly 100.
    #[default]
    Strict,
    /// Accept any positive sum and allocate by share of that sum.
    Trust,
}

/// Knobs that change how figures are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    pub rounding: RoundingMode,
    pub ownership_policy: OwnershipPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("invalid rate schedule for {format}: {source}")]
    InvalidSchedule {
        format: Format,
        #[source]
        source: ScheduleError,
    },
    #[error("net quantity {net_quantity} for {format} exceeds schedule capacity {capacity}")]
    ScheduleCapacityExceeded {
        format: Format,
        net_quantity: u64,
        capacity: u64,
    },
    #[error("no rate schedule for format {0}")]
    MissingRateSchedule(Format),
    #[error("format {0} appears more than once in sales")]
    DuplicateFormat(Format),
    #[error("invalid ownership: {0}")]
    InvalidOwnership(String),
    #[error("invalid ownership percentage {percentage} for author {contact_id}")]
    InvalidPercentage {
        contact_id: ContactId,
        percentage: Decimal,
    },
    #[error("author {0} is listed more than once")]
    DuplicateAuthor(ContactId),
    #[error("no contract terms for author {0}")]
    MissingContract(ContactId),
    #[error("author {contact_id} is on contract {found}, expected {expected}")]
    ContractMismatch {
        contact_id: ContactId,
        expected: ContractId,
        found: ContractId,
    },
    #[error("statement author {0} is not one of the title authors")]
    UnknownStatementAuthor(ContactId),
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },
    #[error("statement period ends ({end}) before it starts ({start})")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("split amounts sum to {actual}, expected {expected}")]
    SplitMismatch { expected: Decimal, actual: Decimal },
    #[error("arithmetic overflow computing {context}")]
    ArithmeticOverflow { context: String },
}

impl CalculationError {
    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        CalculationError::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

/// Reject a negative monetary input.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), CalculationError> {
    if value.is_negative() {
        return Err(CalculationError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
