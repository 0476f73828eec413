// src/model.rs

/// One scraped promotional item. Built fresh each run; only `id` outlives it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromotionCandidate {
    /// Stable dedup key: normalised headline, or the banner image URL.
    pub id: String,
    pub headline: String,
    pub url: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
}

impl PromotionCandidate {
    pub fn headline(headline: String, url: &str) -> Self {
        Self {
            id: headline.clone(),
            headline,
            url: s!(url),
            image_url: None,
            image_alt: None,
        }
    }

    pub fn banner(image_url: String, alt: String, link: String) -> Self {
        Self {
            id: image_url.clone(),
            headline: alt.clone(),
            url: link,
            image_url: Some(image_url),
            image_alt: Some(alt),
        }
    }
}
