// * MediaWiki API surface: response schema and the `WikiApi` seam.
// * Every field the wiki may omit is an explicit Option/default with an accessor.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::errors::FetchError;

/// A named, indexable subsection of a page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawSection {
    #[serde(alias = "line", default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_index", default)]
    pub index: String,
}

impl RawSection {
    pub fn new(name: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: index.into(),
        }
    }
}

// * Section indexes are strings ("3", "T-1") but older wikis send numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Text(String),
    Number(i64),
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawIndex::deserialize(deserializer)? {
        RawIndex::Text(s) => s,
        RawIndex::Number(n) => n.to_string(),
    })
}

/// `parse.text`: a plain string (formatversion=2) or `{"*": html}` (formatversion=1)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ParseText {
    Html(String),
    Legacy {
        #[serde(rename = "*")]
        html: String,
    },
}

impl ParseText {
    pub fn html(&self) -> &str {
        match self {
            ParseText::Html(html) => html,
            ParseText::Legacy { html } => html,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParsePayload {
    pub title: Option<String>,
    pub pageid: Option<u64>,
    pub displaytitle: Option<String>,
    pub text: Option<ParseText>,
    pub sections: Vec<RawSection>,
}

impl ParsePayload {
    /// Rendered HTML, empty when the wiki sent none
    pub fn html(&self) -> &str {
        self.text.as_ref().map(ParseText::html).unwrap_or_default()
    }
}

/// One page of a category listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryMember {
    #[serde(default)]
    pub pageid: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryPayload {
    pub categorymembers: Vec<CategoryMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Continuation {
    pub cmcontinue: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub code: String,
    pub info: String,
}

/// Top-level envelope shared by `action=parse` and `action=query`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    pub parse: Option<ParsePayload>,
    pub query: Option<QueryPayload>,
    #[serde(rename = "continue")]
    pub continuation: Option<Continuation>,
    pub error: Option<ApiErrorBody>,
}

impl ApiResponse {
    /// Converts the MediaWiki error envelope into a `FetchError`
    pub fn into_result(self) -> Result<Self, FetchError> {
        match self.error {
            Some(err) => Err(FetchError::Api {
                code: err.code,
                info: err.info,
            }),
            None => Ok(self),
        }
    }

    /// Next `cmcontinue` cursor, if the listing has more pages
    pub fn next_cmcontinue(&self) -> Option<&str> {
        self.continuation
            .as_ref()
            .and_then(|c| c.cmcontinue.as_deref())
            .filter(|cursor| !cursor.is_empty())
    }
}

/// How a page is addressed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageRef {
    Title(String),
    Id(u64),
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Title(title) => write!(f, "{title}"),
            PageRef::Id(id) => write!(f, "pageid:{id}"),
        }
    }
}

/// A page's rendered HTML and identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub page_id: Option<u64>,
    pub title: Option<String>,
    pub display_title: Option<String>,
    pub html: String,
}

impl From<ParsePayload> for RenderedPage {
    fn from(payload: ParsePayload) -> Self {
        Self {
            html: payload.html().to_string(),
            page_id: payload.pageid,
            title: payload.title,
            display_title: payload.displaytitle,
        }
    }
}

/// Read-only access to a MediaWiki instance
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Ordered section listing of a page
    async fn sections(&self, page: &str) -> Result<Vec<RawSection>, FetchError>;

    /// Rendered HTML of one section
    async fn section_html(&self, page: &str, index: &str) -> Result<String, FetchError>;

    /// Rendered HTML of a whole page with its display title and id
    async fn page(&self, target: &PageRef) -> Result<RenderedPage, FetchError>;

    /// Every member of a category, following continuation cursors
    async fn category_members(&self, category: &str) -> Result<Vec<CategoryMember>, FetchError>;
}
