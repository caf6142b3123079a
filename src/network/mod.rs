// * Network layer: MediaWiki API schema, the `WikiApi` seam and its HTTP client.

pub mod api;
pub mod client;
pub mod errors;
pub mod identity;

pub use api::{CategoryMember, PageRef, RawSection, RenderedPage, WikiApi};
pub use client::WikiClient;
pub use errors::FetchError;
