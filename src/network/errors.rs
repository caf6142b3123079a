use thiserror::Error;

// * Unified Error type for every upstream wiki call.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Wiki API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Invalid JSON from wiki: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed wiki response: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// * Timeouts get their own variant so callers can tell them apart
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let url = err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "<unknown>".to_string());
            FetchError::Timeout(url)
        } else {
            FetchError::Request(err)
        }
    }
}
