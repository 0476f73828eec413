// src/specs/banners.rs
//
// Image banners: `<a href><img></a>` where the image looks like a hero/promo
// slide. The image URL is the dedup id; alt text stands in for a headline.

use std::collections::HashSet;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::config::options::ScrapeOptions;
use crate::core::html::enclosing_link;
use crate::core::sanitize::{contains_lc, normalize_ws};
use crate::model::PromotionCandidate;

const SRC_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

#[derive(Clone, Debug)]
pub struct BannerRules {
    tokens: Vec<String>,
    min_width: u32,
    default_alt: String,
    base: Option<Url>,
    site_url: String,
}

impl BannerRules {
    pub fn new(opts: &ScrapeOptions) -> Self {
        Self {
            tokens: opts
                .banner_tokens
                .iter()
                .map(|t| t.to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            min_width: opts.banner_min_width,
            default_alt: opts.banner_default_alt.clone(),
            base: Url::parse(&opts.promo_url).ok(),
            site_url: opts.site_url.clone(),
        }
    }

    /// Absolute http(s) URL for `href`, relative to the promo page.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let url = match &self.base {
            Some(base) => base.join(href).ok()?,
            None => Url::parse(href).ok()?,
        };
        matches!(url.scheme(), "http" | "https").then(|| url.to_string())
    }

    pub fn is_banner(&self, src: &str, width: Option<u32>) -> bool {
        let lc = src.to_lowercase();
        self.tokens.iter().any(|t| contains_lc(&lc, t))
            || width.is_some_and(|w| w > self.min_width)
    }

    pub fn candidate(&self, img: ElementRef<'_>) -> Option<PromotionCandidate> {
        let el = img.value();
        let src = SRC_ATTRS
            .iter()
            .filter_map(|a| el.attr(a))
            .find_map(|raw| self.resolve(raw))?;

        if !self.is_banner(&src, el.attr("width").and_then(parse_width)) {
            return None;
        }

        let alt = el
            .attr("alt")
            .map(normalize_ws)
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.default_alt.clone());

        let link = enclosing_link(img)
            .and_then(|href| self.resolve(href))
            .unwrap_or_else(|| self.site_url.clone());

        Some(PromotionCandidate::banner(src, alt, link))
    }
}

/// "1200", "1200px" → 1200.
fn parse_width(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Lazily yield banner candidates in document order, one per image URL.
pub fn banner_candidates<'a>(
    scope: ElementRef<'a>,
    images: &'a Selector,
    rules: &'a BannerRules,
) -> impl Iterator<Item = PromotionCandidate> + 'a {
    let mut seen: HashSet<String> = HashSet::new();
    scope
        .select(images)
        .filter_map(move |img| rules.candidate(img))
        .filter(move |c| seen.insert(c.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_attribute_variants() {
        assert_eq!(parse_width("1200"), Some(1200));
        assert_eq!(parse_width(" 800px"), Some(800));
        assert_eq!(parse_width("auto"), None);
    }

    #[test]
    fn resolves_relative_links_against_promo_page() {
        let rules = BannerRules::new(&ScrapeOptions::default());
        assert_eq!(
            rules.resolve("/images/hero-sale.jpg").as_deref(),
            Some("https://shop.canaries.co.uk/images/hero-sale.jpg")
        );
        assert_eq!(rules.resolve("javascript:void(0)"), None);
        assert_eq!(rules.resolve("#top"), None);
    }
}
