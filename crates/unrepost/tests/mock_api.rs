//! Mock API tests for the signed request client.
//!
//! These use wiremock to simulate the platform's web API and a stub signing
//! driver, testing the client's request shapes and failure normalization
//! without network access or a real signing service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unrepost::{
    Browser, Cursor, Error, PageFetcher, RepostDeleter, RunConfig, SecUid, Session, SessionDriver,
    TikTokClient,
};

/// Signs by appending a marker param; sessions carry a fixed odin cookie.
struct StubDriver;

#[async_trait]
impl SessionDriver for StubDriver {
    async fn create_session(&self, _browser: Browser, _ms_token: &str) -> Result<Session, Error> {
        Ok(Session {
            params: HashMap::from([("app_language".to_string(), "en".to_string())]),
            cookies: HashMap::from([("odin_tt".to_string(), "odin-cookie".to_string())]),
        })
    }

    async fn sign_url(&self, url: &str) -> Result<String, Error> {
        Ok(format!("{url}&X-Bogus=stub"))
    }
}

async fn client_for(server: &MockServer) -> TikTokClient {
    let mut config = RunConfig::new(
        "ms-token-value",
        "sid-secret",
        "http://127.0.0.1:1/".parse().unwrap(),
    );
    config.api_base = server.uri().parse().unwrap();
    TikTokClient::connect(config, Arc::new(StubDriver), "alice")
        .await
        .unwrap()
}

// ============================================================================
// User lookup
// ============================================================================

#[tokio::test]
async fn resolve_user_extracts_sec_uid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/detail/"))
        .and(query_param("uniqueId", "alice"))
        .and(query_param("X-Bogus", "stub"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userInfo": {"user": {"secUid": "MS4wLjABAAAAalice"}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let sec_uid = client.resolve_user("alice").await.unwrap();
    assert_eq!(sec_uid.as_str(), "MS4wLjABAAAAalice");
}

#[tokio::test]
async fn resolve_user_without_sec_uid_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/detail/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userInfo": {}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.resolve_user("ghost").await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound { username } if username == "ghost"));
}

// ============================================================================
// Repost listing
// ============================================================================

#[tokio::test]
async fn list_reposts_sends_fixed_params_and_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repost/item_list/"))
        .and(query_param("secUid", "MS4wLjABAAAAalice"))
        .and(query_param("cursor", "0"))
        .and(query_param("count", "30"))
        .and(query_param("coverFormat", "0"))
        .and(query_param("needPinnedItemIds", "true"))
        .and(query_param("user_is_login", "true"))
        .and(query_param("odinId", "odin-cookie"))
        .and(query_param("msToken", "ms-token-value"))
        .and(header("cookie", "odin_tt=odin-cookie; sid_tt=sid-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 0,
            "itemList": [{"video": {"id": "111"}}, {"video": {"id": "222"}}],
            "cursor": "30",
            "hasMore": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let page = client
        .fetch_page(&SecUid::new("MS4wLjABAAAAalice"), &Cursor::start())
        .await;

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].video_id().as_deref(), Some("111"));
    assert_eq!(page.next_cursor.as_str(), "30");
    assert!(page.has_more);
}

#[tokio::test]
async fn fetch_page_folds_http_failure_into_end_of_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repost/item_list/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream sad"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cursor = Cursor::new("90");
    let page = client.fetch_page(&SecUid::new("sec"), &cursor).await;

    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, cursor, "failure keeps the input cursor");
}

#[tokio::test]
async fn fetch_page_folds_api_error_into_end_of_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repost/item_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 10000,
            "statusMsg": "verify required"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cursor = Cursor::new("30");
    let page = client.fetch_page(&SecUid::new("sec"), &cursor).await;

    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, cursor);
}

#[tokio::test]
async fn missing_cursor_in_response_defaults_to_request_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repost/item_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 0,
            "itemList": [{"video": {"id": "1"}}],
            "hasMore": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let cursor = Cursor::new("60");
    let page = client.fetch_page(&SecUid::new("sec"), &cursor).await;

    assert_eq!(page.next_cursor, cursor);
    assert!(!page.has_more, "absent hasMore reads as complete");
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn delete_repost_success_on_zero_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tiktok/v1/upvote/delete"))
        .and(query_param("item_id", "12345"))
        .and(query_param("odinId", "odin-cookie"))
        .and(query_param("user_is_login", "true"))
        .and(header("origin", "https://www.tiktok.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 0,
            "status_msg": ""
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.delete_repost("12345").await);
}

#[tokio::test]
async fn delete_repost_nonzero_status_code_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tiktok/v1/upvote/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 3,
            "status_msg": "item not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    // "Already deleted" is not distinguished from any other failure.
    assert!(!client.delete_repost("12345").await);
}

#[tokio::test]
async fn delete_repost_http_failure_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tiktok/v1/upvote/delete"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(!client.delete_repost("12345").await);
}

// ============================================================================
// Sign server driver
// ============================================================================

#[tokio::test]
async fn sign_server_creates_session_and_signs() {
    use unrepost::SignServer;

    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "params": {"app_language": "en"},
            "cookies": {"odin_tt": "odin-from-browser"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signed_url": "https://www.tiktok.com/api/x?signed=1"
        })))
        .mount(&server)
        .await;

    let driver = SignServer::new(server.uri().parse().unwrap());
    let session = driver
        .create_session(Browser::Chromium, "ms-token")
        .await
        .unwrap();
    assert_eq!(session.odin_id(), Some("odin-from-browser"));

    let signed = driver.sign_url("https://www.tiktok.com/api/x").await.unwrap();
    assert_eq!(signed, "https://www.tiktok.com/api/x?signed=1");
}

#[tokio::test]
async fn sign_server_error_body_surfaces_as_signing_error() {
    use unrepost::SignServer;

    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "browser context lost"
        })))
        .mount(&server)
        .await;

    let driver = SignServer::new(server.uri().parse().unwrap());
    let err = driver.sign_url("https://www.tiktok.com/api/x").await.unwrap_err();
    assert!(matches!(err, Error::Signing(msg) if msg.contains("browser context lost")));
}

#[tokio::test]
async fn delete_repost_missing_status_code_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tiktok/v1/upvote/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(!client.delete_repost("12345").await);
}
