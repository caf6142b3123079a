// * Item Catalog Builder
// * Landing page (or category) → stubs → concurrent detail fetches → merged records.
// * A detail failure degrades one record; it never fails the catalog.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::normalization::{page_url, resolve_image_url};
use crate::config::constants::COST_UNAVAILABLE;
use crate::config::WikiConfig;
use crate::network::{FetchError, PageRef, RenderedPage, WikiApi};
use crate::refinery::cost::is_unknown_cost;
use crate::refinery::{
    extract_item_detail, extract_landing_stubs, prefer_cost, IngredientRequirement, ItemDetail,
    ItemStub,
};

/// Page id when the wiki told us one, otherwise the title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ItemId {
    PageId(u64),
    Title(String),
}

/// One catalog entry as served to consumers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub title: String,
    pub image: String,
    pub cost: String,
    pub ingredients: Vec<IngredientRequirement>,
    pub url: String,
}

pub struct CatalogBuilder<A> {
    api: A,
    config: WikiConfig,
}

impl<A: WikiApi> CatalogBuilder<A> {
    pub fn new(api: A, config: WikiConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Stubs from every table row of the landing page
    pub async fn list_landing_stubs(&self, landing: &str) -> Result<Vec<ItemStub>, FetchError> {
        let page = self.api.page(&PageRef::Title(landing.to_string())).await?;
        let stubs = extract_landing_stubs(&page.html);
        info!(landing, stubs = stubs.len(), "Listed landing page items");
        Ok(stubs)
    }

    /// Stubs from a category listing; only title and page id are known
    pub async fn list_category_stubs(&self, category: &str) -> Result<Vec<ItemStub>, FetchError> {
        let members = self.api.category_members(category).await?;
        let stubs: Vec<ItemStub> = members
            .into_iter()
            .filter(|member| !member.title.trim().is_empty())
            .map(|member| {
                let stub = ItemStub::titled(member.title);
                // ? pageid 0 means the wiki omitted it
                match member.pageid {
                    0 => stub,
                    id => stub.with_page_id(id),
                }
            })
            .collect();
        info!(category, stubs = stubs.len(), "Listed category items");
        Ok(stubs)
    }

    /// Fetches the stub's own page and merges it over the stub.
    ///
    /// Never fails: a fetch error yields a degraded record built from the stub.
    pub async fn get_item_detail(&self, stub: &ItemStub) -> ItemRecord {
        let target = match stub.page_id {
            Some(id) => PageRef::Id(id),
            None => PageRef::Title(stub.title.clone()),
        };

        match self.api.page(&target).await {
            Ok(page) => {
                let detail = extract_item_detail(&page.html, page.display_title.as_deref());
                self.merge(stub, &page, detail)
            }
            Err(err) => {
                warn!(title = %stub.title, target = %target, error = %err, "Item detail unavailable, using stub");
                self.degraded(stub)
            }
        }
    }

    /// Landing stubs enriched by every detail page, in discovery order
    pub async fn build_catalog(&self, landing: &str) -> Result<Vec<ItemRecord>, FetchError> {
        let stubs = self.list_landing_stubs(landing).await?;
        Ok(self.details(&stubs).await)
    }

    /// Category members enriched by every detail page, in listing order
    pub async fn build_category_catalog(
        &self,
        category: &str,
    ) -> Result<Vec<ItemRecord>, FetchError> {
        let stubs = self.list_category_stubs(category).await?;
        Ok(self.details(&stubs).await)
    }

    // * Settle-all: join_all keeps input order
    async fn details(&self, stubs: &[ItemStub]) -> Vec<ItemRecord> {
        let records = join_all(stubs.iter().map(|stub| self.get_item_detail(stub))).await;
        info!(items = records.len(), "Catalog built");
        records
    }

    fn merge(&self, stub: &ItemStub, page: &RenderedPage, detail: ItemDetail) -> ItemRecord {
        let title = detail
            .display_title
            .unwrap_or_else(|| stub.title.clone());
        let page_title = page.title.as_deref().unwrap_or(&stub.title);

        let image = detail.image.as_deref().or(stub.image.as_deref());
        let ingredients = if detail.ingredients.is_empty() {
            stub.ingredients.clone()
        } else {
            detail.ingredients
        };

        ItemRecord {
            id: item_id(page.page_id.or(stub.page_id), &stub.title),
            image: self.image_url(image),
            cost: prefer_cost(&detail.cost, &stub.cost),
            ingredients,
            url: self.page_url(page_title),
            title,
        }
    }

    fn degraded(&self, stub: &ItemStub) -> ItemRecord {
        let cost = if is_unknown_cost(&stub.cost) {
            COST_UNAVAILABLE.to_string()
        } else {
            stub.cost.clone()
        };

        ItemRecord {
            id: item_id(stub.page_id, &stub.title),
            title: stub.title.clone(),
            image: self.image_url(stub.image.as_deref()),
            cost,
            ingredients: Vec::new(),
            url: self.page_url(&stub.title),
        }
    }

    fn image_url(&self, src: Option<&str>) -> String {
        resolve_image_url(src, &self.config.origin, &self.config.placeholder_image)
    }

    fn page_url(&self, title: &str) -> String {
        page_url(&self.config.origin, title).unwrap_or_else(|| {
            format!(
                "{}/{}",
                self.config.origin.trim_end_matches('/'),
                title.trim().replace(' ', "_")
            )
        })
    }
}

fn item_id(page_id: Option<u64>, title: &str) -> ItemId {
    match page_id {
        Some(id) => ItemId::PageId(id),
        None => ItemId::Title(title.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(ItemId::PageId(42)).unwrap(), 42);
        assert_eq!(
            serde_json::to_value(ItemId::Title("Widget".into())).unwrap(),
            "Widget"
        );
    }

    #[test]
    fn test_item_id_prefers_page_id() {
        assert_eq!(item_id(Some(7), "Widget"), ItemId::PageId(7));
        assert_eq!(item_id(None, "Widget"), ItemId::Title("Widget".into()));
    }
}
