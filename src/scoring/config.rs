use serde::{Deserialize, Serialize};

/// Upper bound of the deviation band covered by a uniform rule.
pub const UNIFORM_MAX_DEVIATION: f64 = 100.0;

/// Scoring policy for a bid evaluation.
///
/// Defines how the benchmark price is derived from the submitted prices and
/// how each bid's deviation from it maps to a score.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   k_factor: 0.95
///   base_score: 90
///   outlier_rules:
///     - { min_count: 0, max_count: 5, remove_high: 0, remove_low: 0 }
///     - { min_count: 5, remove_high: 1, remove_low: 1 }
///   high_price:
///     intervals:
///       - { min_deviation: 0, max_deviation: 100, kind: deduct, factor: 1 }
///   low_price_rules:
///     - { min_deviation: 0, max_deviation: 5, kind: add, factor: 0.3 }
///     - { min_deviation: 5, max_deviation: 100, kind: deduct, factor: 0.5 }
///   min_score: 0
///   max_score: 100
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Multiplier applied to the filtered average price
    pub k_factor: f64,

    /// Score of a bid priced exactly at the benchmark
    pub base_score: f64,

    /// Outlier removal rules, selected by bidder count
    #[serde(default)]
    pub outlier_rules: Vec<OutlierRule>,

    /// How to pick among matching outlier rules. Inferred from the rules
    /// when absent (see [`ScoringConfig::outlier_strategy`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier_strategy: Option<OutlierStrategy>,

    /// Treatment of bids priced above the benchmark
    #[serde(default)]
    pub high_price: HighPricePolicy,

    /// Tiers for bids priced below the benchmark, first match wins
    #[serde(default)]
    pub low_price_rules: Vec<IntervalRule>,

    /// Lowest score a bid can receive (default: 0)
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Highest score a bid can receive (default: 100, `null` for no ceiling)
    #[serde(default = "default_max_score")]
    pub max_score: Option<f64>,
}

fn default_min_score() -> f64 {
    0.0
}

fn default_max_score() -> Option<f64> {
    Some(100.0)
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k_factor: 1.0,
            base_score: 100.0,
            outlier_rules: Vec::new(),
            outlier_strategy: None,
            high_price: HighPricePolicy::default(),
            low_price_rules: Vec::new(),
            min_score: default_min_score(),
            max_score: default_max_score(),
        }
    }
}

impl ScoringConfig {
    /// Strategy used to pick an outlier rule.
    ///
    /// An explicit `outlier_strategy` wins. Otherwise rule sets that declare
    /// any `max_count` use bounded matching, and rule sets written without
    /// upper bounds use largest-`min_count` matching.
    pub fn outlier_strategy(&self) -> OutlierStrategy {
        if let Some(strategy) = self.outlier_strategy {
            return strategy;
        }
        if self.outlier_rules.is_empty()
            || self.outlier_rules.iter().any(|r| r.max_count.is_some())
        {
            OutlierStrategy::BoundedCount
        } else {
            OutlierStrategy::LargestMinCount
        }
    }

    /// Clamp a raw score into `[min_score, max_score]`. The ceiling is
    /// applied first, so inverted bounds yield `min_score`.
    pub fn clamp_score(&self, score: f64) -> f64 {
        let capped = match self.max_score {
            Some(max) => score.min(max),
            None => score,
        };
        capped.max(self.min_score)
    }
}

/// Outlier removal rule.
///
/// Applies when the number of bids is greater than `min_count` and, if set,
/// at most `max_count`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutlierRule {
    /// Exclusive lower bound on the bid count
    pub min_count: usize,

    /// Inclusive upper bound on the bid count (absent = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,

    /// Number of highest prices to discard
    #[serde(default)]
    pub remove_high: usize,

    /// Number of lowest prices to discard
    #[serde(default)]
    pub remove_low: usize,
}

/// Rule-matching strategy for outlier rules.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutlierStrategy {
    /// `min_count < n <= max_count`; smallest finite `max_count` first,
    /// then smallest `min_count`
    BoundedCount,
    /// `n > min_count`, ignoring `max_count`; largest `min_count` wins
    LargestMinCount,
}

/// Add or deduct points.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Add,
    Deduct,
}

impl RuleKind {
    pub fn apply(self, base: f64, amount: f64) -> f64 {
        match self {
            RuleKind::Add => base + amount,
            RuleKind::Deduct => base - amount,
        }
    }
}

/// Bonus/malus tier over `[min_deviation, max_deviation)` percent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntervalRule {
    pub min_deviation: f64,
    pub max_deviation: f64,
    pub kind: RuleKind,
    /// Points per percent of deviation
    pub factor: f64,
}

impl IntervalRule {
    pub fn new(min_deviation: f64, max_deviation: f64, kind: RuleKind, factor: f64) -> Self {
        Self {
            min_deviation,
            max_deviation,
            kind,
            factor,
        }
    }

    /// Single rule covering every deviation up to 100%.
    pub fn uniform(kind: RuleKind, factor: f64) -> Self {
        Self::new(0.0, UNIFORM_MAX_DEVIATION, kind, factor)
    }

    pub fn contains(&self, abs_deviation: f64) -> bool {
        self.min_deviation <= abs_deviation && abs_deviation < self.max_deviation
    }

    pub fn apply(&self, base: f64, abs_deviation: f64) -> f64 {
        self.kind.apply(base, abs_deviation * self.factor)
    }
}

/// Treatment of bids priced above the benchmark.
///
/// YAML forms:
/// ```yaml
/// high_price:
///   intervals:
///     - { min_deviation: 0, max_deviation: 100, kind: deduct, factor: 0.5 }
/// # or
/// high_price:
///   linear: 0.5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum HighPricePolicy {
    /// Tiered rules; unmatched deviations keep the base score
    #[serde(rename = "intervals")]
    IntervalRules(Vec<IntervalRule>),
    /// `base_score - deviation * factor` for every high bid
    #[serde(rename = "linear")]
    LinearDeduction(f64),
}

impl Default for HighPricePolicy {
    fn default() -> Self {
        HighPricePolicy::IntervalRules(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.k_factor, 1.0);
        assert_eq!(config.base_score, 100.0);
        assert_eq!(config.min_score, 0.0);
        assert_eq!(config.max_score, Some(100.0));
        assert!(config.outlier_rules.is_empty());
        assert_eq!(config.high_price, HighPricePolicy::IntervalRules(vec![]));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig {
            outlier_rules: vec![OutlierRule {
                min_count: 5,
                max_count: Some(10),
                remove_high: 1,
                remove_low: 1,
            }],
            high_price: HighPricePolicy::LinearDeduction(0.5),
            low_price_rules: vec![IntervalRule::new(0.0, 5.0, RuleKind::Add, 0.3)],
            ..ScoringConfig::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_minimal_scoring_config_parse() {
        let yaml = r#"
k_factor: 0.95
base_score: 90
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.k_factor, 0.95);
        assert_eq!(config.base_score, 90.0);
        assert!(config.outlier_rules.is_empty());
        assert!(config.low_price_rules.is_empty());
        assert_eq!(config.min_score, 0.0);
        assert_eq!(config.max_score, Some(100.0));
    }

    #[test]
    fn test_full_scoring_config_parse() {
        let yaml = r#"
k_factor: 1
base_score: 90
outlier_rules:
  - min_count: 0
    max_count: 5
    remove_high: 1
    remove_low: 1
  - min_count: 5
    remove_high: 2
    remove_low: 2
high_price:
  intervals:
    - min_deviation: 0
      max_deviation: 100
      kind: deduct
      factor: 1
low_price_rules:
  - min_deviation: 0
    max_deviation: 5
    kind: add
    factor: 0.3
min_score: 10
max_score: 95
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.outlier_rules.len(), 2);
        assert_eq!(config.outlier_rules[1].max_count, None);
        assert_eq!(
            config.high_price,
            HighPricePolicy::IntervalRules(vec![IntervalRule::new(
                0.0,
                100.0,
                RuleKind::Deduct,
                1.0
            )])
        );
        assert_eq!(config.low_price_rules[0].kind, RuleKind::Add);
        assert_eq!(config.min_score, 10.0);
        assert_eq!(config.max_score, Some(95.0));
    }

    #[test]
    fn test_linear_high_price_parse() {
        let yaml = r#"
k_factor: 1
base_score: 100
high_price:
  linear: 0.5
max_score: null
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.high_price, HighPricePolicy::LinearDeduction(0.5));
        assert_eq!(config.max_score, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
k_factor: 1
base_score: 100
high_price_factor: 0.5
"#;
        let parsed: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_strategy_inferred_from_rules() {
        let mut config = ScoringConfig::default();
        assert_eq!(config.outlier_strategy(), OutlierStrategy::BoundedCount);

        config.outlier_rules = vec![
            OutlierRule {
                min_count: 3,
                max_count: None,
                remove_high: 1,
                remove_low: 0,
            },
            OutlierRule {
                min_count: 7,
                max_count: None,
                remove_high: 1,
                remove_low: 1,
            },
        ];
        assert_eq!(config.outlier_strategy(), OutlierStrategy::LargestMinCount);

        config.outlier_rules[0].max_count = Some(7);
        assert_eq!(config.outlier_strategy(), OutlierStrategy::BoundedCount);

        config.outlier_strategy = Some(OutlierStrategy::LargestMinCount);
        assert_eq!(config.outlier_strategy(), OutlierStrategy::LargestMinCount);
    }

    #[test]
    fn test_clamp_score() {
        let mut config = ScoringConfig::default();
        assert_eq!(config.clamp_score(-5.0), 0.0);
        assert_eq!(config.clamp_score(150.0), 100.0);
        assert_eq!(config.clamp_score(42.5), 42.5);

        config.max_score = None;
        assert_eq!(config.clamp_score(150.0), 150.0);
        assert_eq!(config.clamp_score(-5.0), 0.0);
    }

    #[test]
    fn test_clamp_score_inverted_bounds_yield_floor() {
        let config = ScoringConfig {
            min_score: 60.0,
            max_score: Some(40.0),
            ..ScoringConfig::default()
        };
        assert_eq!(config.clamp_score(50.0), 60.0);
        assert_eq!(config.clamp_score(10.0), 60.0);
        assert_eq!(config.clamp_score(90.0), 60.0);
    }

    #[test]
    fn test_interval_bounds() {
        let rule = IntervalRule::new(5.0, 10.0, RuleKind::Add, 0.5);
        assert!(!rule.contains(4.99));
        assert!(rule.contains(5.0));
        assert!(rule.contains(9.99));
        assert!(!rule.contains(10.0));
        assert_eq!(rule.apply(80.0, 6.0), 83.0);
    }

    #[test]
    fn test_uniform_rule() {
        let rule = IntervalRule::uniform(RuleKind::Deduct, 0.4);
        assert_eq!(rule.min_deviation, 0.0);
        assert_eq!(rule.max_deviation, 100.0);
        assert_eq!(rule.apply(50.0, 10.0), 46.0);
    }
}
