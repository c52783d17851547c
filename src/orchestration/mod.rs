//! Composition of the engine into whole-title calculations.

pub mod calculator;

pub use calculator::{CalculationInput, RoyaltyCalculator};
