pub mod catalog;
pub mod normalization;
pub mod sections;

pub use catalog::{CatalogBuilder, ItemId, ItemRecord};
pub use sections::{PageParseResult, PageParser, SectionTable};
