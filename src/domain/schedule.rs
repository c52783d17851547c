//! Tiered rate schedules.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One quantity band of a rate schedule. `max_quantity == None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTier {
    pub min_quantity: u64,
    pub max_quantity: Option<u64>,
    pub rate: Decimal,
}

impl RateTier {
    pub fn new(min_quantity: u64, max_quantity: Option<u64>, rate: Decimal) -> Self {
        Self {
            min_quantity,
            max_quantity,
            rate,
        }
    }

    /// Units this tier can absorb; `None` when unbounded.
    pub fn capacity(&self) -> Option<u64> {
        self.max_quantity
            .map(|max| max.saturating_sub(self.min_quantity))
    }
}

/// What a tier's rate multiplies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RateBasis {
    /// Fixed amount per net unit.
    #[default]
    PerUnit,
    /// Fraction of the list price per net unit.
    ListPrice {
        #[serde(rename = "listPrice")]
        list_price: Decimal,
    },
}

impl RateBasis {
    /// Royalty owed per unit at `rate`; `None` if the product is out of range.
    pub fn per_unit_amount(&self, rate: Decimal) -> Option<Decimal> {
        match self {
            RateBasis::PerUnit => Some(rate),
            RateBasis::ListPrice { list_price } => list_price.checked_mul(rate),
        }
    }
}

/// Ordered, gapless, non-overlapping tiers for one format, starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSchedule {
    #[serde(default)]
    pub basis: RateBasis,
    pub tiers: Vec<RateTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule has no tiers")]
    Empty,
    #[error("first tier must start at 0, starts at {0}")]
    DoesNotStartAtZero(u64),
    #[error("tier {index} has max {max} not above min {min}")]
    EmptyRange { index: usize, min: u64, max: u64 },
    #[error("tier {index} is unbounded but is not the last tier")]
    UnboundedNotLast { index: usize },
    #[error("gap before tier {index}: previous tier ends at {expected}, tier starts at {found}")]
    Gap {
        index: usize,
        expected: u64,
        found: u64,
    },
    #[error("tier {index} overlaps previous tier: previous ends at {expected}, tier starts at {found}")]
    Overlap {
        index: usize,
        expected: u64,
        found: u64,
    },
    #[error("tier {index} has negative rate {rate}")]
    NegativeRate { index: usize, rate: Decimal },
    #[error("list price must not be negative, got {0}")]
    NegativeListPrice(Decimal),
}

impl RateSchedule {
    pub fn new(tiers: Vec<RateTier>) -> Self {
        Self {
            basis: RateBasis::PerUnit,
            tiers,
        }
    }

    /// A single unbounded tier at `rate`.
    pub fn flat(rate: Decimal) -> Self {
        Self::new(vec![RateTier::new(0, None, rate)])
    }

    pub fn with_basis(mut self, basis: RateBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Total units the schedule can absorb; `None` when the last tier is unbounded.
    pub fn total_capacity(&self) -> Option<u64> {
        self.tiers.last().and_then(|tier| tier.max_quantity)
    }

    /// Reject malformed schedules instead of guessing what the contract meant.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let first = self.tiers.first().ok_or(ScheduleError::Empty)?;
        if first.min_quantity != 0 {
            return Err(ScheduleError::DoesNotStartAtZero(first.min_quantity));
        }

        if let RateBasis::ListPrice { list_price } = &self.basis {
            if list_price.is_negative() {
                return Err(ScheduleError::NegativeListPrice(*list_price));
            }
        }

        let last_index = self.tiers.len() - 1;
        let mut previous_max: Option<u64> = None;

        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.rate.is_negative() {
                return Err(ScheduleError::NegativeRate {
                    index,
                    rate: tier.rate,
                });
            }

            if let Some(expected) = previous_max {
                if tier.min_quantity > expected {
                    return Err(ScheduleError::Gap {
                        index,
                        expected,
                        found: tier.min_quantity,
                    });
                }
                if tier.min_quantity < expected {
                    return Err(ScheduleError::Overlap {
                        index,
                        expected,
                        found: tier.min_quantity,
                    });
                }
            }

            match tier.max_quantity {
                Some(max) if max <= tier.min_quantity => {
                    return Err(ScheduleError::EmptyRange {
                        index,
                        min: tier.min_quantity,
                        max,
                    });
                }
                Some(max) => previous_max = Some(max),
                None if index != last_index => {
                    return Err(ScheduleError::UnboundedNotLast { index });
                }
                None => {}
            }
        }

        Ok(())
    }
}
