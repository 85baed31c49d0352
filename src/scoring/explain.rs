use super::config::{HighPricePolicy, IntervalRule, OutlierRule, OutlierStrategy, RuleKind};
use super::ScoringConfig;

/// Describe a scoring configuration in plain language, one line per entry.
pub fn explain(config: &ScoringConfig) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Benchmark price".to_string());
    let k_text = if config.k_factor != 1.0 {
        format!(", multiplied by K={}", config.k_factor)
    } else {
        String::new()
    };
    if config.outlier_rules.is_empty() {
        lines.push(format!("  Average of all submitted prices{}.", k_text));
    } else {
        let strategy = match config.outlier_strategy() {
            OutlierStrategy::BoundedCount => "the narrowest matching bid-count range applies",
            OutlierStrategy::LargestMinCount => "the rule with the largest lower bound applies",
        };
        lines.push(format!(
            "  Average of the remaining prices{} after outlier removal ({}):",
            k_text, strategy
        ));
        for rule in &config.outlier_rules {
            lines.push(format!("  - {}: {}", describe_count(rule), describe_removal(rule)));
        }
        lines.push("  If every price is removed, the unfiltered average is used.".to_string());
    }

    lines.push("Scoring".to_string());
    let bounds = match config.max_score {
        Some(max) => format!("scores stay within [{}, {}]", config.min_score, max),
        None => format!("scores never go below {}", config.min_score),
    };
    lines.push(format!(
        "  A price equal to the benchmark scores {}; {}.",
        config.base_score, bounds
    ));

    lines.push("  Above the benchmark:".to_string());
    match &config.high_price {
        HighPricePolicy::IntervalRules(rules) => describe_tiers(rules, &mut lines),
        HighPricePolicy::LinearDeduction(factor) => lines.push(format!(
            "  - deduct {} points per 1% of deviation",
            factor
        )),
    }

    lines.push("  Below the benchmark:".to_string());
    describe_tiers(&config.low_price_rules, &mut lines);

    lines
}

fn describe_count(rule: &OutlierRule) -> String {
    match rule.max_count {
        Some(max) => format!("more than {} and at most {} bids", rule.min_count, max),
        None => format!("more than {} bids", rule.min_count),
    }
}

fn describe_removal(rule: &OutlierRule) -> String {
    match (rule.remove_high, rule.remove_low) {
        (0, 0) => "keep every price".to_string(),
        (high, 0) => format!("drop the {} highest", high),
        (0, low) => format!("drop the {} lowest", low),
        (high, low) => format!("drop the {} highest and {} lowest", high, low),
    }
}

fn describe_tiers(rules: &[IntervalRule], lines: &mut Vec<String>) {
    if rules.is_empty() {
        lines.push("  - no adjustment, base score applies".to_string());
        return;
    }
    for rule in rules {
        let range = format!(
            "deviation from {}% up to {}%",
            rule.min_deviation, rule.max_deviation
        );
        let verb = match rule.kind {
            RuleKind::Add => "add",
            RuleKind::Deduct => "deduct",
        };
        lines.push(format!(
            "  - {}: {} {} points per 1%",
            range, verb, rule.factor
        ));
    }
    lines.push("  - any other deviation keeps the base score".to_string());
}
