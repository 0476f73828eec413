// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub post: PostOptions,
    pub store: StoreOptions,
    pub fetch: FetchOptions,
}

/// Which part of the page yields candidates. Also fixes the dedup key:
/// headline text for `Headlines`, image URL for `Banners`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CandidateSource {
    #[default]
    Headlines,
    Banners,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub promo_url: String,
    /// Fallback link for banners whose anchor has no usable href.
    pub site_url: String,
    /// Tried in order; first one with visible text becomes the search scope.
    pub container_selectors: Vec<String>,
    /// Case-insensitive substrings; at least one must match.
    pub keywords: Vec<String>,
    /// Case-insensitive substrings; any match rejects, even over a keyword hit.
    pub noise_markers: Vec<String>,
    /// Inclusive headline length window, in chars.
    pub min_len: usize,
    pub max_len: usize,
    pub source: CandidateSource,
    pub banner_tokens: Vec<String>,
    pub banner_min_width: u32,
    pub banner_default_alt: String,
    /// Float `%`/"sale" items to the front.
    pub rank: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            promo_url: s!(PROMO_URL),
            site_url: s!(SITE_URL),
            container_selectors: strings(CONTAINER_SELECTORS),
            keywords: strings(KEYWORDS),
            noise_markers: strings(NOISE_MARKERS),
            min_len: MIN_HEADLINE_CHARS,
            max_len: MAX_HEADLINE_CHARS,
            source: CandidateSource::Headlines,
            banner_tokens: strings(BANNER_TOKENS),
            banner_min_width: BANNER_MIN_WIDTH,
            banner_default_alt: s!(BANNER_DEFAULT_ALT),
            rank: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostOptions {
    pub lead_in: String,
    pub link_text: String,
    /// Without the leading '#'.
    pub hashtags: Vec<String>,
    /// Hard ceiling for the whole post text, in chars.
    pub char_limit: usize,
    pub ellipsis: String,
    /// Generic link-card thumbnail; missing file means no thumbnail.
    pub thumbnail_path: PathBuf,
    pub max_image_bytes: usize,
    pub max_image_dim: u32,
    /// Attach an external link-card to text posts.
    pub link_card: bool,
    pub langs: Vec<String>,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            lead_in: s!(LEAD_IN),
            link_text: s!(LINK_TEXT),
            hashtags: strings(HASHTAGS),
            char_limit: POST_CHAR_LIMIT,
            ellipsis: s!(ELLIPSIS),
            thumbnail_path: PathBuf::from(THUMBNAIL_FILE),
            max_image_bytes: MAX_IMAGE_BYTES,
            max_image_dim: MAX_IMAGE_DIM,
            link_card: true,
            langs: vec![s!("en")],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    pub seen_path: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { seen_path: PathBuf::from(SEEN_FILE) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Rendering service for client-side pages. `None` means plain GET.
    pub render: Option<RenderOptions>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
            render: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base URL of a Browserless-compatible service (`/content` is appended).
    pub endpoint: String,
    pub token: Option<String>,
    /// Upper bound on waiting for the promo container to populate.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl RenderOptions {
    pub fn new(endpoint: &str, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            wait_timeout: Duration::from_secs(RENDER_WAIT_SECS),
            poll_interval: Duration::from_millis(RENDER_POLL_MS),
        }
    }
}
