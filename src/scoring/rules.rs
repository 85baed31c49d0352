use std::cmp::Reverse;

use super::config::{IntervalRule, OutlierRule, OutlierStrategy};

impl OutlierRule {
    /// Whether this rule covers `bid_count` under the given strategy.
    pub fn matches(&self, bid_count: usize, strategy: OutlierStrategy) -> bool {
        if bid_count <= self.min_count {
            return false;
        }
        match strategy {
            OutlierStrategy::BoundedCount => self.max_count.map_or(true, |max| bid_count <= max),
            OutlierStrategy::LargestMinCount => true,
        }
    }
}

/// Pick the single outlier rule that applies to `bid_count`.
///
/// Returns the rule together with its position in `rules`. Ties that the
/// strategy leaves open go to the rule declared first.
pub fn select_outlier_rule(
    rules: &[OutlierRule],
    bid_count: usize,
    strategy: OutlierStrategy,
) -> Option<(usize, &OutlierRule)> {
    let candidates = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.matches(bid_count, strategy));

    match strategy {
        // Unbounded rules sort after every finite max_count
        OutlierStrategy::BoundedCount => candidates
            .min_by_key(|(_, rule)| (rule.max_count.is_none(), rule.max_count, rule.min_count)),
        OutlierStrategy::LargestMinCount => {
            candidates.min_by_key(|(_, rule)| Reverse(rule.min_count))
        }
    }
}

/// Drop `remove_high` prices from the top, then `remove_low` from the bottom
/// of an ascending slice. Never removes past empty.
pub fn trim_outliers<'a>(sorted: &'a [f64], rule: &OutlierRule) -> &'a [f64] {
    let end = sorted.len().saturating_sub(rule.remove_high);
    let start = rule.remove_low.min(end);
    &sorted[start..end]
}

/// First rule, in declared order, whose interval contains `abs_deviation`.
pub fn match_interval(
    rules: &[IntervalRule],
    abs_deviation: f64,
) -> Option<(usize, &IntervalRule)> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.contains(abs_deviation))
}
