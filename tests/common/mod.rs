// * In-memory WikiApi for orchestration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use wikelo_catalog::network::{
    CategoryMember, FetchError, PageRef, RawSection, RenderedPage, WikiApi,
};

#[derive(Default)]
pub struct FakeWiki {
    pub sections: HashMap<String, Vec<RawSection>>,
    pub section_html: HashMap<(String, String), String>,
    pub pages: HashMap<PageRef, RenderedPage>,
    pub categories: HashMap<String, Vec<CategoryMember>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(mut self, page: &str, sections: &[(&str, &str)]) -> Self {
        self.sections.insert(
            page.to_string(),
            sections
                .iter()
                .map(|(name, index)| RawSection::new(*name, *index))
                .collect(),
        );
        self
    }

    pub fn with_section_html(mut self, page: &str, index: &str, html: &str) -> Self {
        self.section_html
            .insert((page.to_string(), index.to_string()), html.to_string());
        self
    }

    pub fn with_page(mut self, target: PageRef, page: RenderedPage) -> Self {
        self.pages.insert(target, page);
        self
    }

    pub fn with_titled_page(self, title: &str, html: &str) -> Self {
        let page = RenderedPage {
            page_id: None,
            title: Some(title.to_string()),
            display_title: Some(title.to_string()),
            html: html.to_string(),
        };
        self.with_page(PageRef::Title(title.to_string()), page)
    }

    pub fn with_category(mut self, category: &str, members: &[(u64, &str)]) -> Self {
        self.categories.insert(
            category.to_string(),
            members
                .iter()
                .map(|(pageid, title)| CategoryMember {
                    pageid: *pageid,
                    title: title.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

fn missing(what: String) -> FetchError {
    FetchError::Api {
        code: "missingtitle".to_string(),
        info: what,
    }
}

#[async_trait]
impl WikiApi for FakeWiki {
    async fn sections(&self, page: &str) -> Result<Vec<RawSection>, FetchError> {
        self.record(format!("sections:{page}"));
        self.sections
            .get(page)
            .cloned()
            .ok_or_else(|| missing(page.to_string()))
    }

    async fn section_html(&self, page: &str, index: &str) -> Result<String, FetchError> {
        self.record(format!("section:{page}#{index}"));
        self.section_html
            .get(&(page.to_string(), index.to_string()))
            .cloned()
            .ok_or_else(|| missing(format!("{page}#{index}")))
    }

    async fn page(&self, target: &PageRef) -> Result<RenderedPage, FetchError> {
        self.record(format!("page:{target}"));
        self.pages
            .get(target)
            .cloned()
            .ok_or_else(|| missing(target.to_string()))
    }

    async fn category_members(&self, category: &str) -> Result<Vec<CategoryMember>, FetchError> {
        self.record(format!("category:{category}"));
        self.categories
            .get(category)
            .cloned()
            .ok_or_else(|| missing(category.to_string()))
    }
}
