// * Configuration Constants
// * Central location for wiki endpoints, sentinels, thresholds and timeouts

use std::time::Duration;

// * MediaWiki API endpoint (api.php)
pub const DEFAULT_API_BASE: &str = "https://starcitizen.tools/api.php";

// * Wiki origin used to absolutize root-relative image paths and build page URLs
pub const DEFAULT_WIKI_ORIGIN: &str = "https://starcitizen.tools";

// * Substituted whenever an item image is missing or cannot be resolved
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1523961131990-5ea7c61b2107?auto=format&fit=crop&w=800&q=60";

// * Landing page whose tables enumerate the catalog
pub const DEFAULT_LANDING_PAGE: &str = "Wikelo";

// * Category listing used by the category-driven catalog
pub const DEFAULT_CATEGORY: &str = "Category:Wikelo";

// * Page size for list=categorymembers
pub const DEFAULT_CATEGORY_LIMIT: u32 = 50;

// * Request timeout in milliseconds
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

// * Sections never folded into a page parse
pub const DEFAULT_EXCLUDED_SECTIONS: [&str; 4] =
    ["References", "External links", "See also", "Notes"];

// * Longer prose "keys" are sentences with an incidental colon
pub const MAX_PROSE_KEY_CHARS: usize = 60;

// * Cost sentinel when no cost could be extracted
pub const COST_UNKNOWN: &str = "N/A";

// * Cost sentinel when the detail page could not be fetched
pub const COST_UNAVAILABLE: &str = "Unavailable";

// * HTML attribute limits for table spans
pub const MAX_COLSPAN: usize = 1_000;
pub const MAX_ROWSPAN: usize = 65_534;

// * MediaWiki asks API clients to identify themselves
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikelo-catalog/",
    env!("CARGO_PKG_VERSION"),
    " (+https://starcitizen.tools/Wikelo)"
);

pub const fn request_timeout() -> Duration {
    Duration::from_millis(REQUEST_TIMEOUT_MS)
}
