use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::scoring::Bid;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BidsDocument {
    bidders: Vec<Bid>,
}

/// Load bids from a JSON (`.json`) or YAML file.
///
/// Accepts either a bare list of bids or a document with a `bidders` key.
pub fn load_bids(path: &Path) -> Result<Vec<Bid>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bids file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let bids = if is_json {
        parse_json(&content)
    } else {
        parse_yaml(&content)
    }
    .with_context(|| format!("Failed to parse bids in {}", path.display()))?;

    debug!(path = %path.display(), count = bids.len(), "bids loaded");
    Ok(bids)
}

fn parse_json(content: &str) -> Result<Vec<Bid>> {
    if let Ok(doc) = serde_json::from_str::<BidsDocument>(content) {
        return Ok(doc.bidders);
    }
    Ok(serde_json::from_str::<Vec<Bid>>(content)?)
}

fn parse_yaml(content: &str) -> Result<Vec<Bid>> {
    if let Ok(doc) = serde_saphyr::from_str::<BidsDocument>(content) {
        return Ok(doc.bidders);
    }
    Ok(serde_saphyr::from_str::<Vec<Bid>>(content)?)
}

/// Check bids the way a caller must before scoring.
/// Returns all problems at once.
pub fn validate_bids(bids: &[Bid]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, bid) in bids.iter().enumerate() {
        if bid.name.trim().is_empty() {
            errors.push(format!("bidders[{}].name: must not be empty", i));
        }
        if !bid.price.is_finite() || bid.price <= 0.0 {
            errors.push(format!(
                "bidders[{}].price: must be a positive number, got {}",
                i, bid.price
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
