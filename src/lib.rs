pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use domain::{
    AuthorOwnership, ContactId, ContractId, ContractTerms, Decimal, Format, RateSchedule,
    RateTier, RoyaltyCalculation, SalesAggregate, StatementAuthor, StatementPeriod, TitleId,
};
pub use engine::{CalculationError, CalculationOptions, OwnershipPolicy};
pub use error::AppError;
pub use orchestration::{CalculationInput, RoyaltyCalculator};
