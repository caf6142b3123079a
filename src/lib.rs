// * Wikelo Catalog
// * MediaWiki page → structured data, and the Wikelo item catalog built on it.

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod refinery;

pub use config::WikiConfig;
pub use engine::{CatalogBuilder, ItemRecord, PageParseResult, PageParser};
pub use network::{FetchError, WikiApi, WikiClient};
