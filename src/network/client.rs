use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::WikiConfig;
use crate::network::api::{
    ApiResponse, CategoryMember, PageRef, ParsePayload, RawSection, RenderedPage, WikiApi,
};
use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;

// * The HTTP engine for every MediaWiki API call.
#[derive(Debug, Clone)]
pub struct WikiClient {
    inner: Client,
    api_base: Url,
    category_limit: u32,
}

impl WikiClient {
    // * Initializes the client from runtime config (timeout, User-Agent, endpoint).
    pub fn new(config: &WikiConfig) -> Result<Self, FetchError> {
        let api_base = Url::parse(&config.api_base)?;
        let identity = IdentityProfile::new(config.user_agent.clone());

        let inner = Client::builder()
            .default_headers(identity.headers())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner,
            api_base,
            category_limit: config.category_limit,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    // * GETs api.php with the shared format params and decodes the envelope.
    async fn get(&self, params: &[(&str, &str)]) -> Result<ApiResponse, FetchError> {
        let mut url = self.api_base.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .extend_pairs(params);

        debug!(url = %url, "Wiki API request");
        let resp = self.inner.get(url.clone()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&body)?;
        parsed.into_result()
    }

    async fn parse(&self, params: &[(&str, &str)]) -> Result<ParsePayload, FetchError> {
        let mut full = vec![("action", "parse")];
        full.extend_from_slice(params);
        self.get(&full)
            .await?
            .parse
            .ok_or_else(|| FetchError::Malformed("response has no `parse` payload".to_string()))
    }
}

#[async_trait]
impl WikiApi for WikiClient {
    async fn sections(&self, page: &str) -> Result<Vec<RawSection>, FetchError> {
        let payload = self.parse(&[("page", page), ("prop", "sections")]).await?;
        debug!(page, count = payload.sections.len(), "Fetched section listing");
        Ok(payload.sections)
    }

    async fn section_html(&self, page: &str, index: &str) -> Result<String, FetchError> {
        let payload = self
            .parse(&[("page", page), ("section", index), ("prop", "text")])
            .await?;
        Ok(payload.html().to_string())
    }

    async fn page(&self, target: &PageRef) -> Result<RenderedPage, FetchError> {
        let id;
        let key = match target {
            PageRef::Title(title) => ("page", title.as_str()),
            PageRef::Id(page_id) => {
                id = page_id.to_string();
                ("pageid", id.as_str())
            }
        };
        let payload = self.parse(&[key, ("prop", "text|displaytitle")]).await?;
        Ok(RenderedPage::from(payload))
    }

    async fn category_members(&self, category: &str) -> Result<Vec<CategoryMember>, FetchError> {
        let limit = self.category_limit.to_string();
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        // * Follow cmcontinue until the wiki stops sending one
        loop {
            let mut params = vec![
                ("action", "query"),
                ("list", "categorymembers"),
                ("cmtitle", category),
                ("cmlimit", limit.as_str()),
            ];
            if let Some(cursor) = cursor.as_deref() {
                params.push(("cmcontinue", cursor));
            }

            let response = self.get(&params).await?;
            let next = response.next_cmcontinue().map(str::to_string);
            let query = response.query.ok_or_else(|| {
                FetchError::Malformed("response has no `query` payload".to_string())
            })?;

            debug!(
                category,
                batch = query.categorymembers.len(),
                "Fetched category members"
            );
            members.extend(query.categorymembers);

            // ! A repeated cursor would loop forever
            match next {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                Some(next) => {
                    warn!(category, cursor = %next, "Wiki repeated a continuation cursor, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(members)
    }
}
