use serde::{Deserialize, Serialize};

use crate::scoring::{Bid, ScoringConfig};

/// Contents of `config.yaml`.
///
/// ```yaml
/// template: standard        # used when `scoring` is absent
/// scoring: { ... }          # full ScoringConfig, wins over `template`
/// bidders:                  # optional default bid list
///   - { name: "Acme", price: 1250000 }
/// ```
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bidders: Vec<Bid>,
}
