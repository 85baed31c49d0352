pub mod config;
pub mod engine;
pub mod explain;
pub mod rounding;
pub mod rules;
pub mod templates;
pub mod validation;

pub use config::*;
pub use engine::{evaluate, Adjustment, Bid, BidResult, CalculationResult, FilterSummary, PriceSide};
pub use explain::explain;
pub use rounding::round2;
pub use rules::{match_interval, select_outlier_rule, trim_outliers};
pub use templates::{find_template, template_names, Template, TEMPLATES};
pub use validation::validate_scoring;
