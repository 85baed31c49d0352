use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{
    Adjustment, BidResult, CalculationResult, FilterSummary, OutlierStrategy, PriceSide, RuleKind,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Format a signed deviation percentage ("+10.00%", "-2.50%", "0.00%")
pub fn format_deviation(deviation: f64) -> String {
    if deviation > 0.0 {
        format!("+{:.2}%", deviation)
    } else {
        format!("{:.2}%", deviation)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a bidder name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format results as a table in input order.
/// Columns: Index, Name, Price, Deviation, Score, Rank
pub fn format_result_table(result: &CalculationResult, use_colors: bool) -> String {
    if result.results.is_empty() {
        return "No bids to score.".to_string();
    }

    let price_width = result
        .results
        .iter()
        .map(|r| format_price(r.price).len())
        .max()
        .unwrap_or(0)
        .max("Price".len());
    let deviation_width = 9;
    let score_width = 7;
    let rank_width = 4;
    let separator = "  ";

    // Index column: 3 chars + 1 space
    let fixed_width =
        4 + price_width + deviation_width + score_width + rank_width + separator.len() * 4;
    let longest_name = result
        .results
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Bidder".len());
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest_name.min(width - fixed_width),
        // Very narrow terminal
        Some(_) => longest_name.min(20),
        None => longest_name,
    };

    let benchmark = format!("Benchmark price: {}", format_price(result.benchmark_price));
    let header = format!(
        "    {:<nw$}{sep}{:>pw$}{sep}{:>dw$}{sep}{:>sw$}{sep}{:>rw$}",
        "Bidder",
        "Price",
        "Deviation",
        "Score",
        "Rank",
        nw = name_width,
        pw = price_width,
        dw = deviation_width,
        sw = score_width,
        rw = rank_width,
        sep = separator
    );

    let mut lines = Vec::with_capacity(result.results.len() + 2);
    if use_colors {
        lines.push(benchmark.bold().to_string());
        lines.push(header.dimmed().to_string());
    } else {
        lines.push(benchmark);
        lines.push(header);
    }

    for r in &result.results {
        let index_str = format!("{:>2}.", r.original_index + 1);
        let name = format!(
            "{:<width$}",
            truncate_name(&r.name, name_width),
            width = name_width
        );
        let price = format!("{:>width$}", format_price(r.price), width = price_width);
        let deviation = format!(
            "{:>width$}",
            format_deviation(r.deviation_percent),
            width = deviation_width
        );
        let score = format!("{:>width$.2}", r.score, width = score_width);
        let rank = format!("{:>width$}", format!("#{}", r.rank), width = rank_width);

        let line = if use_colors {
            let deviation = match r.deviation_percent.partial_cmp(&0.0) {
                Some(std::cmp::Ordering::Greater) => deviation.red().to_string(),
                Some(std::cmp::Ordering::Less) => deviation.green().to_string(),
                _ => deviation,
            };
            let rank = if r.rank == 1 {
                rank.yellow().bold().to_string()
            } else {
                rank
            };
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str.dimmed(),
                name,
                price,
                deviation,
                score.bold(),
                rank,
                sep = separator
            )
        } else {
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str,
                name,
                price,
                deviation,
                score,
                rank,
                sep = separator
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: index, name, price, deviation, score, rank (no headers, no colors)
pub fn format_tsv(result: &CalculationResult) -> String {
    result
        .results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{}",
                r.original_index, r.name, r.price, r.deviation_percent, r.score, r.rank
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the full result as pretty JSON
pub fn format_json(result: &CalculationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Describe the outlier phase (for verbose mode)
pub fn format_filter_summary(filter: &FilterSummary) -> String {
    let strategy = match filter.strategy {
        OutlierStrategy::BoundedCount => "bounded count",
        OutlierStrategy::LargestMinCount => "largest min count",
    };
    let rule = match filter.rule_index {
        Some(i) => format!(
            "rule #{} ({}) removed {} high, {} low",
            i + 1,
            strategy,
            filter.removed_high,
            filter.removed_low
        ),
        None => format!("no outlier rule matched ({})", strategy),
    };
    let fallback = if filter.used_unfiltered {
        ", all prices removed so the unfiltered average was used"
    } else {
        ""
    };
    format!(
        "{} bids: {}; averaged {} prices = {:.2}{}",
        filter.bid_count, rule, filter.averaged_count, filter.average, fallback
    )
}

/// Describe how a bid's score was reached (for verbose mode)
pub fn format_adjustment(result: &BidResult) -> String {
    let side_name = |side: &PriceSide| match side {
        PriceSide::High => "high",
        PriceSide::Low => "low",
    };
    let text = match &result.adjustment {
        Adjustment::AtBenchmark => "at benchmark, base score".to_string(),
        Adjustment::Interval {
            side,
            rule_index,
            kind,
            factor,
        } => {
            let verb = match kind {
                RuleKind::Add => "add",
                RuleKind::Deduct => "deduct",
            };
            format!(
                "{} price tier #{}: {} {} per 1%",
                side_name(side),
                rule_index + 1,
                verb,
                factor
            )
        }
        Adjustment::Linear { factor } => format!("linear high price deduction: {} per 1%", factor),
        Adjustment::Unmatched { side } => {
            format!("{} price, no tier matched, base score", side_name(side))
        }
        Adjustment::DegenerateBenchmark => "benchmark is zero, base score".to_string(),
    };
    if result.clamped {
        format!("{} (clamped)", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{evaluate, Bid, HighPricePolicy, IntervalRule, ScoringConfig};

    fn sample_result() -> CalculationResult {
        let config = ScoringConfig {
            k_factor: 1.0,
            base_score: 90.0,
            high_price: HighPricePolicy::IntervalRules(vec![IntervalRule::new(
                0.0,
                100.0,
                RuleKind::Deduct,
                1.0,
            )]),
            low_price_rules: vec![IntervalRule::new(0.0, 100.0, RuleKind::Deduct, 1.0)],
            ..ScoringConfig::default()
        };
        let bids = vec![
            Bid::new("Acme Construction", 100.0),
            Bid::new("Beta", 110.0),
            Bid::new("Gamma", 90.0),
        ];
        evaluate(&config, &bids).unwrap()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1234.5), "1234.50");
        assert_eq!(format_price(0.0), "0.00");
    }

    #[test]
    fn test_format_deviation_signs() {
        assert_eq!(format_deviation(10.0), "+10.00%");
        assert_eq!(format_deviation(-2.5), "-2.50%");
        assert_eq!(format_deviation(0.0), "0.00%");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Beta", 20), "Beta");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Acme Construction Group", 10), "Acme Co...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Acme", 3), "Acm");
    }

    #[test]
    fn test_format_result_table_empty() {
        let result = CalculationResult::empty();
        assert_eq!(format_result_table(&result, false), "No bids to score.");
    }

    #[test]
    fn test_format_result_table_rows() {
        let output = format_result_table(&sample_result(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Benchmark price: 100.00");
        assert!(lines[1].contains("Bidder"));
        assert!(lines[2].starts_with(" 1."));
        assert!(lines[2].contains("Acme Construction"));
        assert!(lines[2].contains("90.00"));
        assert!(lines[2].ends_with("#1"));
        assert!(lines[3].contains("+10.00%"));
        assert!(lines[3].ends_with("#2"));
        assert!(lines[4].contains("-10.00%"));
        assert!(lines[4].ends_with("#3"));
    }

    #[test]
    fn test_format_tsv() {
        let output = format_tsv(&sample_result());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0\tAcme Construction\t100.00\t0.00\t90.00\t1");
        assert_eq!(lines[2], "2\tGamma\t90.00\t-10.00\t80.00\t3");
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&CalculationResult::empty()), "");
    }

    #[test]
    fn test_format_json_fields() {
        let json = format_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["benchmark_price"], 100.0);
        assert_eq!(value["results"][1]["rank"], 2);
        assert_eq!(value["results"][1]["original_index"], 1);
        assert_eq!(value["results"][2]["adjustment"]["rule"], "interval");
    }

    #[test]
    fn test_format_filter_summary() {
        let result = sample_result();
        let summary = format_filter_summary(result.filter.as_ref().unwrap());
        assert_eq!(
            summary,
            "3 bids: no outlier rule matched (bounded count); averaged 3 prices = 100.00"
        );
    }

    #[test]
    fn test_format_adjustment() {
        let result = sample_result();
        assert_eq!(format_adjustment(&result.results[0]), "at benchmark, base score");
        assert_eq!(
            format_adjustment(&result.results[1]),
            "high price tier #1: deduct 1 per 1%"
        );
    }
}
