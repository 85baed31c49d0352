//! Bid scoring: outlier filtering, benchmark derivation, tiered
//! add/deduct scoring and stable ranking of competing bids.

pub mod bids;
pub mod config;
pub mod error;
pub mod output;
pub mod project;
pub mod scoring;

pub use error::ScoringError;
pub use scoring::{evaluate, Bid, BidResult, CalculationResult, ScoringConfig};
