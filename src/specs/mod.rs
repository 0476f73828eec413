// src/specs/mod.rs
//! # Page reading
//!
//! Everything that knows how the promotions page is laid out lives here.
//! The rest of the crate only sees [`PromotionCandidate`]s.
//!
//! ## What lives here
//! - **Scope choice** (`scope`): an ordered chain of strategies from the most
//!   specific container (`.cms-content`, `main`, …) down to `<body>` and finally
//!   the whole document. The first one with visible text wins.
//! - **Headline extraction** (`promotions`): text-bearing nodes in the scope,
//!   whitespace-collapsed, kept when the length window, noise markers and deal
//!   keywords all agree. Noise markers beat keywords.
//! - **Banner extraction** (`banners`): anchor-wrapped images whose URL or
//!   width says "hero slide". A separate pass over the whole document; the
//!   scope chain only narrows headline search.
//! - **Ranking** (`rank`): optional reorder, `%`/"sale" first.
//!
//! ## What does **not** live here
//! - Fetching (`core::net`), the seen set (`store`), choosing what to post
//!   (`select`), or anything about the destination (`publish`).
//!
//! ## Conventions & invariants
//! - Extraction is pure: same document in, same candidates out.
//! - Output order is document order (top to bottom) unless ranking is on.
//! - Within one run a headline (or banner URL) appears at most once; the first
//!   occurrence wins.
//! - Nothing found is an empty list, never an error.
//!
//! ## Typical call chain
//! ```text
//! runner → Fetcher::fetch(url) → Extractor::extract(doc)
//!                                  ↘ ScopeChain::resolve → headline iterator
//!                                  ↘ whole document      → banner iterator
//! ```
pub mod banners;
pub mod promotions;
pub mod rank;
pub mod scope;

use scraper::{Html, Selector};

use crate::config::consts::TEXT_NODES;
use crate::config::options::{CandidateSource, ScrapeOptions};
use crate::core::html::selector;
use crate::model::PromotionCandidate;

use banners::{banner_candidates, BannerRules};
use promotions::{headline_candidates, HeadlineRules};
use scope::{ScopeChain, ScopeStrategy};

pub struct Extractor {
    scopes: ScopeChain,
    headlines: HeadlineRules,
    banners: BannerRules,
    text_nodes: Option<Selector>,
    images: Option<Selector>,
    source: CandidateSource,
    rank: bool,
    promo_url: String,
}

impl Extractor {
    pub fn new(opts: &ScrapeOptions) -> Self {
        Self {
            scopes: ScopeChain::from_selectors(&opts.container_selectors),
            headlines: HeadlineRules::new(opts),
            banners: BannerRules::new(opts),
            text_nodes: selector(TEXT_NODES),
            images: selector("a img"),
            source: opts.source,
            rank: opts.rank,
            promo_url: opts.promo_url.clone(),
        }
    }

    pub fn push_strategy(&mut self, strategy: Box<dyn ScopeStrategy>) {
        self.scopes.push(strategy);
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    /// Candidates in document order, produced on demand.
    pub fn candidates<'a>(
        &'a self,
        doc: &'a Html,
    ) -> Box<dyn Iterator<Item = PromotionCandidate> + 'a> {
        match self.source {
            CandidateSource::Headlines => self.headline_candidates(doc),
            CandidateSource::Banners => self.banner_candidates(doc),
        }
    }

    fn headline_candidates<'a>(
        &'a self,
        doc: &'a Html,
    ) -> Box<dyn Iterator<Item = PromotionCandidate> + 'a> {
        let (Some(nodes), Some((name, scope))) = (&self.text_nodes, self.scopes.resolve(doc)) else {
            return Box::new(std::iter::empty());
        };
        logd!("Searching scope {name:?}");
        Box::new(headline_candidates(scope, nodes, &self.headlines, &self.promo_url))
    }

    // Whole document, not the text scope: image-only strips never win it.
    fn banner_candidates<'a>(
        &'a self,
        doc: &'a Html,
    ) -> Box<dyn Iterator<Item = PromotionCandidate> + 'a> {
        let Some(images) = &self.images else {
            return Box::new(std::iter::empty());
        };
        Box::new(banner_candidates(doc.root_element(), images, &self.banners))
    }

    /// Parse `raw` and collect every candidate, ranked if configured.
    pub fn extract(&self, raw: &str) -> Vec<PromotionCandidate> {
        let doc = Html::parse_document(raw);
        let found: Vec<_> = self.candidates(&doc).collect();
        if self.rank { rank::rank(found) } else { found }
    }
}
