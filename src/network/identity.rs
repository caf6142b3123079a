use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

// * IdentityProfile defines the headers every wiki request carries.
// * Wikimedia-style wikis reject or throttle anonymous User-Agents.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub user_agent: String,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept_language: "en-US,en;q=0.9",
        }
    }

    // * Builds the default header set for the client.
    // * An unusable User-Agent string falls back to the crate's own.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&self.user_agent).unwrap_or_else(|_| {
            HeaderValue::from_static(crate::config::constants::DEFAULT_USER_AGENT)
        });
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.accept_language),
        );
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_carry_user_agent() {
        let headers = IdentityProfile::new("wikelo-test/1.0").headers();
        assert_eq!(headers.get(USER_AGENT).unwrap(), "wikelo-test/1.0");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_user_agent_falls_back() {
        let headers = IdentityProfile::new("bad\nagent").headers();
        assert_eq!(
            headers.get(USER_AGENT).unwrap(),
            crate::config::constants::DEFAULT_USER_AGENT
        );
    }
}
