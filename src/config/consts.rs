// src/config/consts.rs

// Target site
pub const PROMO_URL: &str = "https://shop.canaries.co.uk/page/discountsandpromotions";
pub const SITE_URL: &str = "https://shop.canaries.co.uk/";

// Local state
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const SEEN_FILE: &str = "seen_promos.json";
pub const THUMBNAIL_FILE: &str = "assets/thumbnail.jpg";

// Net
pub const FETCH_TIMEOUT_SECS: u64 = 30;
pub const RENDER_WAIT_SECS: u64 = 20;
pub const RENDER_POLL_MS: u64 = 500;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Scrape
pub const CONTAINER_SELECTORS: &[&str] = &[
    ".cms-content", "main", "article", ".page-content", "#content", ".container",
];
pub const TEXT_NODES: &str = "h1, h2, h3, h4, h5, h6, p, span, strong, em, b, li";
pub const SKIP_ANCESTORS: &[&str] = &["script", "style", "noscript", "template", "nav"];
pub const KEYWORDS: &[&str] = &[
    "FREE", "% OFF", "SALE", "OFFER", "DISCOUNT", "PRICE DROP", "CLEARANCE", "REDUCED",
];
pub const NOISE_MARKERS: &[&str] = &["cookie", "policy", "terms", "membership", "season ticket"];
pub const MIN_HEADLINE_CHARS: usize = 10;
pub const MAX_HEADLINE_CHARS: usize = 400;
pub const BANNER_TOKENS: &[&str] = &["banner", "hero", "slider", "promo"];
pub const BANNER_MIN_WIDTH: u32 = 600;
pub const BANNER_DEFAULT_ALT: &str = "New offer in the club shop";

// Post
pub const BSKY_PDS: &str = "https://bsky.social";
pub const LEAD_IN: &str = "🛍️ NCFC SHOP DEAL:";
pub const LINK_TEXT: &str = "View details here";
pub const HASHTAGS: &[&str] = &["NCFC", "Canaries", "OTBC", "NorwichCity"];
pub const POST_CHAR_LIMIT: usize = 300;
pub const ELLIPSIS: &str = "…";
pub const MAX_IMAGE_BYTES: usize = 976_560; // blob ceiling on bsky.social
pub const MAX_IMAGE_DIM: u32 = 2000;
