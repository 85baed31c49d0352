use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::{HighPricePolicy, IntervalRule, OutlierStrategy, RuleKind, ScoringConfig};
use super::rounding::round2;
use super::rules::{match_interval, select_outlier_rule, trim_outliers};
use crate::error::ScoringError;

/// A competing bid.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Bid {
    /// Bidder name, not required to be unique
    pub name: String,
    pub price: f64,
}

impl Bid {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Which side of the benchmark a bid fell on.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSide {
    High,
    Low,
}

/// How a bid's raw score was reached, before clamping.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Adjustment {
    /// Price equal to the benchmark
    AtBenchmark,
    /// An interval rule matched
    Interval {
        side: PriceSide,
        rule_index: usize,
        kind: RuleKind,
        factor: f64,
    },
    /// Linear high-price deduction
    Linear { factor: f64 },
    /// No interval rule covered the deviation
    Unmatched { side: PriceSide },
    /// Benchmark was zero, deviation undefined
    DegenerateBenchmark,
}

/// What the outlier phase did.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FilterSummary {
    pub bid_count: usize,
    pub strategy: OutlierStrategy,
    /// Position of the applied rule in `outlier_rules`
    pub rule_index: Option<usize>,
    pub removed_high: usize,
    pub removed_low: usize,
    /// Number of prices that went into the average
    pub averaged_count: usize,
    pub average: f64,
    /// Every price was removed and the unfiltered average was used instead
    pub used_unfiltered: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BidResult {
    pub name: String,
    pub price: f64,
    /// Signed percent deviation from the benchmark, 2 decimals
    pub deviation_percent: f64,
    /// Clamped score, 2 decimals
    pub score: f64,
    /// 1-based, ties get consecutive ranks in input order
    pub rank: usize,
    pub original_index: usize,
    pub adjustment: Adjustment,
    /// The raw score fell outside the configured bounds
    pub clamped: bool,
}

/// Outcome of one evaluation. `results` is in input order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CalculationResult {
    pub benchmark_price: f64,
    pub results: Vec<BidResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSummary>,
}

impl CalculationResult {
    pub fn empty() -> Self {
        Self {
            benchmark_price: 0.0,
            results: Vec::new(),
            filter: None,
        }
    }

    /// Results ordered by rank.
    pub fn ranked(&self) -> Vec<&BidResult> {
        let mut ranked: Vec<&BidResult> = self.results.iter().collect();
        ranked.sort_by_key(|r| r.rank);
        ranked
    }
}

/// Score and rank `bids` under `config`.
///
/// Pure and deterministic. Fails only on non-finite numbers in the
/// configuration or prices, or when the benchmark, a deviation or a raw
/// score is not finite.
pub fn evaluate(config: &ScoringConfig, bids: &[Bid]) -> Result<CalculationResult, ScoringError> {
    if bids.is_empty() {
        return Ok(CalculationResult::empty());
    }

    check_finite(config)?;
    for (index, bid) in bids.iter().enumerate() {
        if !bid.price.is_finite() {
            return Err(ScoringError::InvalidBid {
                index,
                reason: format!("price {} is not a finite number", bid.price),
            });
        }
    }

    let filter = filter_outliers(config, bids);
    let benchmark = filter.average * config.k_factor;
    if !benchmark.is_finite() {
        return Err(ScoringError::NonFiniteBenchmark(benchmark));
    }
    debug!(
        average = filter.average,
        k_factor = config.k_factor,
        benchmark,
        "benchmark derived"
    );

    let mut results = bids
        .iter()
        .enumerate()
        .map(|(index, bid)| score_bid(config, benchmark, index, bid))
        .collect::<Result<Vec<_>, _>>()?;
    assign_ranks(&mut results);

    Ok(CalculationResult {
        benchmark_price: round2(benchmark),
        results,
        filter: Some(filter),
    })
}

fn check_finite(config: &ScoringConfig) -> Result<(), ScoringError> {
    let mut fields = vec![
        ("k_factor".to_string(), config.k_factor),
        ("base_score".to_string(), config.base_score),
        ("min_score".to_string(), config.min_score),
    ];
    if let Some(max) = config.max_score {
        fields.push(("max_score".to_string(), max));
    }
    match &config.high_price {
        HighPricePolicy::IntervalRules(rules) => {
            push_interval_fields(&mut fields, "high_price.intervals", rules)
        }
        HighPricePolicy::LinearDeduction(factor) => {
            fields.push(("high_price.linear".to_string(), *factor))
        }
    }
    push_interval_fields(&mut fields, "low_price_rules", &config.low_price_rules);

    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(ScoringError::non_finite(field, value)),
        None => Ok(()),
    }
}

fn push_interval_fields(fields: &mut Vec<(String, f64)>, prefix: &str, rules: &[IntervalRule]) {
    for (i, rule) in rules.iter().enumerate() {
        fields.push((format!("{}[{}].min_deviation", prefix, i), rule.min_deviation));
        fields.push((format!("{}[{}].max_deviation", prefix, i), rule.max_deviation));
        fields.push((format!("{}[{}].factor", prefix, i), rule.factor));
    }
}

fn average(prices: &[f64]) -> f64 {
    prices.iter().sum::<f64>() / prices.len() as f64
}

fn filter_outliers(config: &ScoringConfig, bids: &[Bid]) -> FilterSummary {
    let mut sorted: Vec<f64> = bids.iter().map(|b| b.price).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let bid_count = bids.len();
    let strategy = config.outlier_strategy();
    let selected = select_outlier_rule(&config.outlier_rules, bid_count, strategy);

    let Some((rule_index, rule)) = selected else {
        debug!(bid_count, ?strategy, "no outlier rule matched");
        return FilterSummary {
            bid_count,
            strategy,
            rule_index: None,
            removed_high: 0,
            removed_low: 0,
            averaged_count: bid_count,
            average: average(&sorted),
            used_unfiltered: false,
        };
    };

    let kept = trim_outliers(&sorted, rule);
    let removed_high = rule.remove_high.min(bid_count);
    let removed_low = bid_count - removed_high - kept.len();
    debug!(
        bid_count,
        rule_index, removed_high, removed_low, "outlier rule applied"
    );

    if kept.is_empty() {
        warn!(
            bid_count,
            rule_index, "outlier rule removed every price, averaging unfiltered prices"
        );
        return FilterSummary {
            bid_count,
            strategy,
            rule_index: Some(rule_index),
            removed_high,
            removed_low,
            averaged_count: bid_count,
            average: average(&sorted),
            used_unfiltered: true,
        };
    }

    FilterSummary {
        bid_count,
        strategy,
        rule_index: Some(rule_index),
        removed_high,
        removed_low,
        averaged_count: kept.len(),
        average: average(kept),
        used_unfiltered: false,
    }
}

fn score_bid(
    config: &ScoringConfig,
    benchmark: f64,
    index: usize,
    bid: &Bid,
) -> Result<BidResult, ScoringError> {
    let base = config.base_score;
    let non_finite = |field, value| ScoringError::NonFiniteScore {
        index,
        field,
        value,
        benchmark,
    };

    let (deviation, raw, adjustment) = if benchmark == 0.0 {
        (0.0, base, Adjustment::DegenerateBenchmark)
    } else {
        let deviation = (bid.price - benchmark) / benchmark * 100.0;
        if !deviation.is_finite() {
            return Err(non_finite("deviation", deviation));
        }
        let (raw, adjustment) = match bid.price.partial_cmp(&benchmark) {
            Some(Ordering::Greater) => score_high(config, deviation),
            Some(Ordering::Less) => score_tiered(
                base,
                &config.low_price_rules,
                deviation.abs(),
                PriceSide::Low,
            ),
            _ => (base, Adjustment::AtBenchmark),
        };
        (deviation, raw, adjustment)
    };
    if !raw.is_finite() {
        return Err(non_finite("score", raw));
    }

    let score = config.clamp_score(raw);
    debug!(
        index,
        name = %bid.name,
        deviation,
        raw,
        score,
        ?adjustment,
        "bid scored"
    );

    Ok(BidResult {
        name: bid.name.clone(),
        price: bid.price,
        deviation_percent: round2(deviation),
        score: round2(score),
        rank: 0,
        original_index: index,
        adjustment,
        clamped: score != raw,
    })
}

fn score_high(config: &ScoringConfig, deviation: f64) -> (f64, Adjustment) {
    match &config.high_price {
        HighPricePolicy::IntervalRules(rules) => {
            score_tiered(config.base_score, rules, deviation.abs(), PriceSide::High)
        }
        HighPricePolicy::LinearDeduction(factor) => (
            config.base_score - deviation * factor,
            Adjustment::Linear { factor: *factor },
        ),
    }
}

fn score_tiered(
    base: f64,
    rules: &[IntervalRule],
    abs_deviation: f64,
    side: PriceSide,
) -> (f64, Adjustment) {
    match match_interval(rules, abs_deviation) {
        Some((rule_index, rule)) => (
            rule.apply(base, abs_deviation),
            Adjustment::Interval {
                side,
                rule_index,
                kind: rule.kind,
                factor: rule.factor,
            },
        ),
        None => (base, Adjustment::Unmatched { side }),
    }
}

/// Sequential ranks by descending score. Sorts a list of positions, so
/// `results` keeps its input order; equal scores keep input order too.
fn assign_ranks(results: &mut [BidResult]) {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| {
        results[b]
            .score
            .partial_cmp(&results[a].score)
            .unwrap_or(Ordering::Equal)
    });
    for (position, original_index) in order.into_iter().enumerate() {
        results[original_index].rank = position + 1;
    }
}
