use super::config::{HighPricePolicy, IntervalRule, OutlierRule, RuleKind, ScoringConfig};

/// A named scoring preset bundled with the tool.
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> ScoringConfig,
}

impl Template {
    pub fn config(&self) -> ScoringConfig {
        (self.build)()
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "standard",
        description: "K=0.95, drop 1 high/1 low above 5 bids, deduct 0.5/% above, tiered low-price bonus",
        build: standard,
    },
    Template {
        name: "conservative",
        description: "K=1.0, multi-level outlier removal, deduct 0.8/% above",
        build: conservative,
    },
    Template {
        name: "strict",
        description: "K=0.98, drop 2 high/2 low above 10 bids, deduct 1/% above, four low-price tiers",
        build: strict,
    },
    Template {
        name: "lenient",
        description: "K=0.92, simple rules, deduct 0.6/% above",
        build: lenient,
    },
    Template {
        name: "platinum",
        description: "K=1, base 50, uniform deductions on both sides",
        build: platinum,
    },
    Template {
        name: "gold",
        description: "K=0.95, base 45, deduct high prices, reward low prices",
        build: gold,
    },
];

/// Look up a template by name (case-insensitive).
pub fn find_template(name: &str) -> Option<&'static Template> {
    TEMPLATES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}

fn above(min_count: usize, remove_high: usize, remove_low: usize) -> OutlierRule {
    OutlierRule {
        min_count,
        max_count: None,
        remove_high,
        remove_low,
    }
}

fn between(
    min_count: usize,
    max_count: usize,
    remove_high: usize,
    remove_low: usize,
) -> OutlierRule {
    OutlierRule {
        min_count,
        max_count: Some(max_count),
        remove_high,
        remove_low,
    }
}

fn add(min: f64, max: f64, factor: f64) -> IntervalRule {
    IntervalRule::new(min, max, RuleKind::Add, factor)
}

fn deduct(min: f64, max: f64, factor: f64) -> IntervalRule {
    IntervalRule::new(min, max, RuleKind::Deduct, factor)
}

fn standard() -> ScoringConfig {
    ScoringConfig {
        k_factor: 0.95,
        base_score: 100.0,
        outlier_rules: vec![above(5, 1, 1)],
        high_price: HighPricePolicy::LinearDeduction(0.5),
        low_price_rules: vec![
            add(0.0, 5.0, 0.3),
            add(5.0, 10.0, 0.2),
            deduct(10.0, 15.0, 0.1),
        ],
        max_score: None,
        ..ScoringConfig::default()
    }
}

fn conservative() -> ScoringConfig {
    ScoringConfig {
        k_factor: 1.0,
        base_score: 100.0,
        outlier_rules: vec![above(3, 1, 0), above(7, 1, 1)],
        high_price: HighPricePolicy::LinearDeduction(0.8),
        low_price_rules: vec![add(0.0, 3.0, 0.5), add(3.0, 8.0, 0.3)],
        max_score: None,
        ..ScoringConfig::default()
    }
}

fn strict() -> ScoringConfig {
    ScoringConfig {
        k_factor: 0.98,
        base_score: 100.0,
        outlier_rules: vec![above(10, 2, 2)],
        high_price: HighPricePolicy::LinearDeduction(1.0),
        low_price_rules: vec![
            add(0.0, 2.0, 0.4),
            add(2.0, 5.0, 0.2),
            deduct(5.0, 10.0, 0.2),
            deduct(10.0, 20.0, 0.5),
        ],
        max_score: None,
        ..ScoringConfig::default()
    }
}

fn lenient() -> ScoringConfig {
    ScoringConfig {
        k_factor: 0.92,
        base_score: 100.0,
        outlier_rules: vec![above(5, 1, 1), above(15, 2, 2)],
        high_price: HighPricePolicy::LinearDeduction(0.6),
        low_price_rules: vec![add(0.0, 8.0, 0.25)],
        max_score: None,
        ..ScoringConfig::default()
    }
}

fn platinum() -> ScoringConfig {
    ScoringConfig {
        k_factor: 1.0,
        base_score: 50.0,
        outlier_rules: vec![between(0, 6, 0, 0), between(6, 20, 1, 1)],
        high_price: HighPricePolicy::IntervalRules(vec![IntervalRule::uniform(
            RuleKind::Deduct,
            0.4,
        )]),
        low_price_rules: vec![IntervalRule::uniform(RuleKind::Deduct, 0.2)],
        min_score: 0.0,
        max_score: Some(50.0),
        ..ScoringConfig::default()
    }
}

fn gold() -> ScoringConfig {
    ScoringConfig {
        k_factor: 0.95,
        base_score: 45.0,
        outlier_rules: vec![between(0, 5, 0, 0), between(5, 20, 1, 1)],
        high_price: HighPricePolicy::IntervalRules(vec![IntervalRule::uniform(
            RuleKind::Deduct,
            0.5,
        )]),
        low_price_rules: vec![IntervalRule::uniform(RuleKind::Add, 0.8)],
        min_score: 0.0,
        max_score: Some(50.0),
        ..ScoringConfig::default()
    }
}
