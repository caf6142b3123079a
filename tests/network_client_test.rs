use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikelo_catalog::network::{FetchError, PageRef, RawSection, WikiApi, WikiClient};
use wikelo_catalog::WikiConfig;

async fn client_for(server: &MockServer) -> WikiClient {
    let config = WikiConfig::default()
        .with_api_base(format!("{}/api.php", server.uri()))
        .with_timeout(Duration::from_secs(5));
    WikiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_sections_request_and_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Wikelo"))
        .and(query_param("prop", "sections"))
        .and(query_param("format", "json"))
        .and(query_param("formatversion", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {
                "title": "Wikelo",
                "pageid": 1234,
                "sections": [
                    {"toclevel": 1, "line": "Rewards", "number": "1", "index": "1"},
                    {"toclevel": 1, "line": "References", "number": "2", "index": "2"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let sections = client.sections("Wikelo").await.unwrap();
    assert_eq!(
        sections,
        vec![RawSection::new("Rewards", "1"), RawSection::new("References", "2")]
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "wikelo-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"parse": {"sections": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = WikiConfig::default().with_api_base(format!("{}/api.php", server.uri()));
    config.user_agent = "wikelo-test/0.1".to_string();
    let client = WikiClient::new(&config).unwrap();
    assert!(client.sections("Any").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_section_html_legacy_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("section", "3"))
        .and(query_param("prop", "text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {"text": {"*": "<p>Role: Corvette</p>"}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let html = client.section_html("Polaris", "3").await.unwrap();
    assert_eq!(html, "<p>Role: Corvette</p>");
}

#[tokio::test]
async fn test_page_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("pageid", "42"))
        .and(query_param("prop", "text|displaytitle"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {
                "title": "Polaris",
                "pageid": 42,
                "displaytitle": "<i>Polaris</i>",
                "text": "<div class=\"mw-parser-output\"></div>"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client.page(&PageRef::Id(42)).await.unwrap();
    assert_eq!(page.page_id, Some(42));
    assert_eq!(page.title.as_deref(), Some("Polaris"));
    assert_eq!(page.display_title.as_deref(), Some("<i>Polaris</i>"));
    assert!(page.html.contains("mw-parser-output"));
}

#[tokio::test]
async fn test_api_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.sections("Nope").await {
        Err(FetchError::Api { code, info }) => {
            assert_eq!(code, "missingtitle");
            assert!(info.contains("doesn't exist"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.page(&PageRef::Title("Wikelo".into())).await {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(matches!(
        client.sections("Wikelo").await,
        Err(FetchError::Decode(_))
    ));
}

#[tokio::test]
async fn test_missing_parse_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"batchcomplete": true})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(matches!(
        client.sections("Wikelo").await,
        Err(FetchError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_timeout_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"parse": {"sections": []}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = WikiConfig::default()
        .with_api_base(format!("{}/api.php", server.uri()))
        .with_timeout(Duration::from_millis(200));
    let client = WikiClient::new(&config).unwrap();
    assert!(matches!(
        client.sections("Slow").await,
        Err(FetchError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_category_members_follow_continuation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("list", "categorymembers"))
        .and(query_param("cmtitle", "Category:Wikelo"))
        .and(query_param("cmlimit", "50"))
        .and(query_param_is_missing("cmcontinue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continue": {"cmcontinue": "page|BETA|2", "continue": "-||"},
            "query": {"categorymembers": [{"pageid": 1, "ns": 0, "title": "Alpha"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("list", "categorymembers"))
        .and(query_param("cmcontinue", "page|BETA|2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"categorymembers": [{"pageid": 2, "ns": 0, "title": "Beta"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let members = client.category_members("Category:Wikelo").await.unwrap();
    let titles: Vec<&str> = members.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta"]);
    assert_eq!(members[1].pageid, 2);
}

#[tokio::test]
async fn test_category_members_stop_on_repeated_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("list", "categorymembers"))
        .and(query_param_is_missing("cmcontinue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continue": {"cmcontinue": "page|SAME|1"},
            "query": {"categorymembers": [{"pageid": 1, "title": "Alpha"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("cmcontinue", "page|SAME|1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "continue": {"cmcontinue": "page|SAME|1"},
            "query": {"categorymembers": [{"pageid": 2, "title": "Beta"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let members = client.category_members("Category:Wikelo").await.unwrap();
    let titles: Vec<&str> = members.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta"]);
}

#[test]
fn test_invalid_api_base_rejected() {
    let config = WikiConfig::default().with_api_base("not a url");
    assert!(matches!(
        WikiClient::new(&config),
        Err(FetchError::InvalidUrl(_))
    ));
}
