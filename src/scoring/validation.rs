use super::config::{HighPricePolicy, IntervalRule, ScoringConfig};

/// Validate a scoring configuration before it reaches the engine.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
        errors.push(format!(
            "scoring.k_factor: must be a positive number, got {}",
            config.k_factor
        ));
    }

    if !config.base_score.is_finite() {
        errors.push("scoring.base_score: must be a finite number".to_string());
    }

    if !config.min_score.is_finite() {
        errors.push("scoring.min_score: must be a finite number".to_string());
    }

    if let Some(max) = config.max_score {
        if !max.is_finite() {
            errors.push("scoring.max_score: must be a finite number or null".to_string());
        } else if config.min_score > max {
            errors.push(format!(
                "scoring.min_score: {} is greater than max_score {}",
                config.min_score, max
            ));
        } else if config.base_score > max {
            errors.push(format!(
                "scoring.base_score: {} is above max_score {}",
                config.base_score, max
            ));
        }
    }
    if config.base_score < config.min_score {
        errors.push(format!(
            "scoring.base_score: {} is below min_score {}",
            config.base_score, config.min_score
        ));
    }

    for (i, rule) in config.outlier_rules.iter().enumerate() {
        if let Some(max) = rule.max_count {
            if max <= rule.min_count {
                errors.push(format!(
                    "scoring.outlier_rules[{}]: max_count {} must be greater than min_count {} or the rule never applies",
                    i, max, rule.min_count
                ));
            }
        }
    }

    match &config.high_price {
        HighPricePolicy::IntervalRules(rules) => {
            validate_intervals("scoring.high_price.intervals", rules, &mut errors)
        }
        HighPricePolicy::LinearDeduction(factor) => {
            if !factor.is_finite() || *factor < 0.0 {
                errors.push(format!(
                    "scoring.high_price.linear: factor must be a non-negative number, got {}",
                    factor
                ));
            }
        }
    }

    validate_intervals("scoring.low_price_rules", &config.low_price_rules, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_intervals(prefix: &str, rules: &[IntervalRule], errors: &mut Vec<String>) {
    for (i, rule) in rules.iter().enumerate() {
        if !rule.min_deviation.is_finite() || !rule.max_deviation.is_finite() {
            errors.push(format!("{}[{}]: deviation bounds must be finite", prefix, i));
        } else {
            if rule.min_deviation < 0.0 {
                errors.push(format!(
                    "{}[{}].min_deviation: must be non-negative, got {}",
                    prefix, i, rule.min_deviation
                ));
            }
            if rule.min_deviation >= rule.max_deviation {
                errors.push(format!(
                    "{}[{}]: min_deviation {} must be less than max_deviation {}",
                    prefix, i, rule.min_deviation, rule.max_deviation
                ));
            }
        }
        if !rule.factor.is_finite() || rule.factor < 0.0 {
            errors.push(format!(
                "{}[{}].factor: must be a non-negative number, got {}",
                prefix, i, rule.factor
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{OutlierRule, RuleKind};

    #[test]
    fn test_valid_config() {
        let config = ScoringConfig {
            k_factor: 0.95,
            base_score: 90.0,
            outlier_rules: vec![OutlierRule {
                min_count: 0,
                max_count: Some(5),
                remove_high: 1,
                remove_low: 1,
            }],
            low_price_rules: vec![IntervalRule::new(0.0, 5.0, RuleKind::Add, 0.3)],
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_default_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_non_positive_k_factor() {
        let config = ScoringConfig {
            k_factor: 0.0,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.k_factor"));
    }

    #[test]
    fn test_inverted_score_bounds() {
        let config = ScoringConfig {
            base_score: 50.0,
            min_score: 80.0,
            max_score: Some(60.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("greater than max_score")));
    }

    #[test]
    fn test_base_score_outside_bounds() {
        let config = ScoringConfig {
            base_score: 120.0,
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("above max_score"));

        let config = ScoringConfig {
            base_score: 120.0,
            max_score: None,
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_unreachable_outlier_rule() {
        let config = ScoringConfig {
            outlier_rules: vec![OutlierRule {
                min_count: 5,
                max_count: Some(5),
                remove_high: 1,
                remove_low: 1,
            }],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.outlier_rules[0]"));
    }

    #[test]
    fn test_inverted_interval() {
        let config = ScoringConfig {
            low_price_rules: vec![IntervalRule::new(10.0, 5.0, RuleKind::Add, 0.3)],
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.low_price_rules[0]"));
    }

    #[test]
    fn test_negative_linear_factor() {
        let config = ScoringConfig {
            high_price: HighPricePolicy::LinearDeduction(-1.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.high_price.linear"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            k_factor: -1.0, // Error 1
            high_price: HighPricePolicy::IntervalRules(vec![IntervalRule::new(
                0.0,
                10.0,
                RuleKind::Deduct,
                -0.5, // Error 2
            )]),
            low_price_rules: vec![IntervalRule::new(-1.0, 5.0, RuleKind::Add, 0.3)], // Error 3
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
