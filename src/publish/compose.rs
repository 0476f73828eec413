// src/publish/compose.rs
//
// Post text layout:
//
//   {lead_in}
//
//   {deal}
//
//   {link_text}          ← link facet → candidate URL
//
//   #Tag #Tag …          ← one tag facet each
//
// Only {deal} is ever shortened. Facet offsets are UTF-8 byte offsets taken
// while building the final string, so they can't drift from the text.

use serde::Serialize;

use crate::config::options::PostOptions;
use crate::core::sanitize::{char_len, take_chars};
use crate::model::PromotionCandidate;

const SEP: &str = "\n\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ByteSlice {
    #[serde(rename = "byteStart")]
    pub byte_start: usize,
    #[serde(rename = "byteEnd")]
    pub byte_end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "$type")]
pub enum Feature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<Feature>,
}

/// Appends text and remembers where annotated spans landed.
#[derive(Default)]
pub struct TextBuilder {
    text: String,
    facets: Vec<Facet>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.text.push_str(s);
        self
    }

    fn annotated(&mut self, s: &str, feature: Feature) -> &mut Self {
        let byte_start = self.text.len();
        self.text.push_str(s);
        self.facets.push(Facet {
            index: ByteSlice { byte_start, byte_end: self.text.len() },
            features: vec![feature],
        });
        self
    }

    pub fn link(&mut self, label: &str, uri: &str) -> &mut Self {
        self.annotated(label, Feature::Link { uri: s!(uri) })
    }

    /// `tag` without the '#'; the text gets "#tag".
    pub fn tag(&mut self, tag: &str) -> &mut Self {
        self.annotated(&join!("#", tag), Feature::Tag { tag: s!(tag) })
    }

    pub fn build(self) -> (String, Vec<Facet>) {
        (self.text, self.facets)
    }
}

/// A post ready to send, minus uploaded media.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub facets: Vec<Facet>,
    /// Target of the link facet and link-card.
    pub link: String,
    /// The deal text as it appears in the post (possibly shortened).
    pub deal: String,
    /// Full headline, for link-card titles and alt text.
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    /// Chars past the limit; nonzero only when the fixed parts alone overflow.
    pub overflow: usize,
}

/// Shorten `deal` to at most `budget` chars, ending in `ellipsis` when cut.
pub fn fit_deal(deal: &str, budget: usize, ellipsis: &str) -> String {
    if char_len(deal) <= budget {
        return s!(deal);
    }
    let marker = char_len(ellipsis);
    if budget < marker {
        return s!(take_chars(ellipsis, budget));
    }
    let kept = take_chars(deal, budget - marker).trim_end();
    join!(kept, ellipsis)
}

fn overhead(opts: &PostOptions, tags: &[String]) -> usize {
    let tag_line = tags.iter().map(|t| char_len(t) + 1).sum::<usize>()
        + tags.len().saturating_sub(1);
    let mut n = char_len(&opts.lead_in) + char_len(SEP) + char_len(SEP) + char_len(&opts.link_text);
    if !tags.is_empty() {
        n += char_len(SEP) + tag_line;
    }
    n
}

pub fn compose(candidate: &PromotionCandidate, opts: &PostOptions) -> Draft {
    let mut tags: Vec<String> = opts
        .hashtags
        .iter()
        .map(|t| t.trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect();

    // Misconfiguration guard: fixed parts alone must leave room for a marker
    let marker = char_len(&opts.ellipsis);
    while !tags.is_empty() && overhead(opts, &tags) + marker > opts.char_limit {
        let dropped = tags.pop();
        logw!("Post template too long for {} chars; dropping tag {dropped:?}", opts.char_limit);
    }

    let budget = opts.char_limit.saturating_sub(overhead(opts, &tags));
    let deal = fit_deal(&candidate.headline, budget, &opts.ellipsis);
    if deal != candidate.headline {
        logd!("Deal text shortened to {} chars", char_len(&deal));
    }

    let mut tb = TextBuilder::new();
    tb.text(&opts.lead_in)
        .text(SEP)
        .text(&deal)
        .text(SEP)
        .link(&opts.link_text, &candidate.url);
    for (i, tag) in tags.iter().enumerate() {
        tb.text(if i == 0 { SEP } else { " " }).tag(tag);
    }
    let (text, facets) = tb.build();
    let overflow = char_len(&text).saturating_sub(opts.char_limit);
    if overflow > 0 {
        logw!(
            "Post is {overflow} chars over the {} limit even with the deal cut; lead-in and link text are too long",
            opts.char_limit
        );
    }

    Draft {
        text,
        facets,
        link: candidate.url.clone(),
        deal,
        title: candidate.headline.clone(),
        description: opts.lead_in.clone(),
        image_url: candidate.image_url.clone(),
        image_alt: candidate.image_alt.clone(),
        overflow,
    }
}
