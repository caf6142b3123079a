// * Section Orchestrator
// * Page → section listing → per-section HTML → structured data folded page-wide.

use futures::stream::{self, StreamExt, TryStreamExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::WikiConfig;
use crate::network::{FetchError, RawSection, WikiApi};
use crate::refinery::{section_html_to_plain_data, KvMap, SectionData, TableResult};

/// A table tagged with the section it came from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionTable {
    pub section: String,
    #[serde(flatten)]
    pub table: TableResult,
}

/// Structured view of a whole page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageParseResult {
    pub page: String,
    pub kv: KvMap,
    pub tables: Vec<SectionTable>,
    pub sections: IndexMap<String, SectionData>,
}

impl PageParseResult {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Default::default()
        }
    }

    // * Folds one section in; must be called in listing order.
    // * A repeated section name extends the earlier entry.
    pub fn fold_section(&mut self, name: String, data: SectionData) {
        self.kv.extend_appending(data.kv.clone());
        self.tables.extend(data.tables.iter().cloned().map(|table| SectionTable {
            section: name.clone(),
            table,
        }));

        match self.sections.get_mut(&name) {
            Some(existing) => {
                existing.kv.extend_appending(data.kv);
                existing.tables.extend(data.tables);
                existing.lists.extend(data.lists);
            }
            None => {
                self.sections.insert(name, data);
            }
        }
    }
}

/// Parses any wiki page into `PageParseResult`
pub struct PageParser<A> {
    api: A,
    config: WikiConfig,
}

impl<A: WikiApi> PageParser<A> {
    pub fn new(api: A, config: WikiConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Sections the parser will fetch, in listing order
    pub fn wanted_sections(&self, listing: Vec<RawSection>) -> Vec<RawSection> {
        listing
            .into_iter()
            .filter(|section| {
                let skip = self.config.is_excluded_section(&section.name);
                if skip {
                    debug!(section = %section.name, "Skipping excluded section");
                }
                !skip
            })
            .collect()
    }

    /// Lists, fetches and extracts every non-excluded section.
    ///
    /// Fetches may overlap up to `section_concurrency`, but results are folded
    /// in listing order. The first fetch failure aborts the parse.
    pub async fn parse_page(&self, page: &str) -> Result<PageParseResult, FetchError> {
        let sections = self.wanted_sections(self.api.sections(page).await?);
        info!(page, sections = sections.len(), "Parsing page");

        let api = &self.api;
        let fetched: Vec<(RawSection, String)> = stream::iter(sections)
            .map(|section| async move {
                let html = api.section_html(page, &section.index).await?;
                Ok::<_, FetchError>((section, html))
            })
            .buffered(self.config.section_concurrency.max(1))
            .try_collect()
            .await?;

        let mut result = PageParseResult::new(page);
        for (section, html) in fetched {
            let data = section_html_to_plain_data(&html);
            debug!(
                section = %section.name,
                kv = data.kv.len(),
                tables = data.tables.len(),
                lists = data.lists.len(),
                "Extracted section"
            );
            result.fold_section(section.name, data);
        }

        Ok(result)
    }
}
