// src/specs/promotions.rs
//
// Text promotions: headings, paragraphs and inline emphasis whose text looks
// like a deal. The headline itself is the dedup id.

use std::collections::HashSet;

use scraper::{ElementRef, Selector};

use crate::config::consts::SKIP_ANCESTORS;
use crate::config::options::ScrapeOptions;
use crate::core::html::{has_ancestor, visible_text};
use crate::core::sanitize::{char_len, contains_lc};
use crate::model::PromotionCandidate;

/// Accept/reject rules for a single normalised text.
#[derive(Clone, Debug)]
pub struct HeadlineRules {
    keywords: Vec<String>,
    noise: Vec<String>,
    min_len: usize,
    max_len: usize,
}

impl HeadlineRules {
    pub fn new(opts: &ScrapeOptions) -> Self {
        let lower = |v: &[String]| -> Vec<String> {
            v.iter()
                .map(|s| s.to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            keywords: lower(&opts.keywords),
            noise: lower(&opts.noise_markers),
            min_len: opts.min_len,
            max_len: opts.max_len,
        }
    }

    /// Length window first, then noise (always wins), then keywords.
    pub fn accepts(&self, text: &str) -> bool {
        let n = char_len(text);
        if n < self.min_len || n > self.max_len {
            return false;
        }
        let lc = text.to_lowercase();
        if self.noise.iter().any(|m| contains_lc(&lc, m)) {
            return false;
        }
        self.keywords.iter().any(|k| contains_lc(&lc, k))
    }
}

/// Lazily walk `scope` in document order, yielding each accepted headline
/// once (first occurrence wins). A node nested inside an accepted node is part
/// of that headline and never a candidate of its own.
pub fn headline_candidates<'a>(
    scope: ElementRef<'a>,
    nodes: &'a Selector,
    rules: &'a HeadlineRules,
    url: &'a str,
) -> impl Iterator<Item = PromotionCandidate> + 'a {
    let mut taken = HashSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    scope
        .select(nodes)
        .filter(|el| !has_ancestor(*el, SKIP_ANCESTORS))
        .filter_map(move |el| {
            if el.ancestors().any(|a| taken.contains(&a.id())) {
                return None;
            }
            let text = visible_text(el);
            if !rules.accepts(&text) {
                return None;
            }
            taken.insert(el.id());
            seen.insert(text.clone())
                .then(|| PromotionCandidate::headline(text, url))
        })
}
