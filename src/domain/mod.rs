//! Domain types for the royalty engine.
//!
//! This module provides:
//! - Exact decimal handling via the Decimal wrapper
//! - Identifiers, sales formats and statement periods
//! - Sales aggregates, rate schedules, contract terms and ownership records
//! - Calculation result structures with canonical JSON serialization

pub mod calculation;
pub mod contract;
pub mod decimal;
pub mod primitives;
pub mod sales;
pub mod schedule;

pub use calculation::{
    AdvanceStatus, AdvanceUpdate, AuthorSplitBreakdown, FormatCalculation, RoyaltyCalculation,
    TierBreakdown,
};
pub use contract::{AuthorOwnership, ContractTerms, StatementAuthor};
pub use decimal::{Decimal, RoundingMode, MONEY_SCALE, PERCENT_SCALE};
pub use primitives::{ContactId, ContractId, Format, StatementPeriod, TitleId};
pub use sales::{NetSales, SalesAggregate};
pub use schedule::{RateBasis, RateSchedule, RateTier, ScheduleError};
