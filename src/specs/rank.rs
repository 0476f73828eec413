// src/specs/rank.rs
use crate::model::PromotionCandidate;

/// Percentages and "sale" read as the strongest deals.
pub fn is_priority(headline: &str) -> bool {
    headline.contains('%') || headline.to_lowercase().contains("sale")
}

/// Stable partition: priority items first, order otherwise untouched.
pub fn rank(candidates: Vec<PromotionCandidate>) -> Vec<PromotionCandidate> {
    let (mut first, rest): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| is_priority(&c.headline));
    first.extend(rest);
    first
}
