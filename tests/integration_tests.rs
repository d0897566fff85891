//! Integration tests using mock HTTP server
//!
//! Tests the full flow: token exchange → bearer-authenticated lookups →
//! cursor pagination, plus the CLI runner on top of it.

use base64::Engine;
use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use twitter_graph::auth::Credentials;
use twitter_graph::cli::{Cli, Runner};
use twitter_graph::{Client, ClientConfig, Error, Subject};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn gzipped(status: u16, body: serde_json::Value) -> ResponseTemplate {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body.to_string().as_bytes()).unwrap();
    ResponseTemplate::new(status)
        .insert_header("content-encoding", "gzip")
        .set_body_bytes(encoder.finish().unwrap())
}

fn profile_json() -> serde_json::Value {
    json!({
        "id": 12,
        "id_str": "12",
        "name": "jack",
        "screen_name": "jack",
        "location": "California",
        "description": "",
        "url": null,
        "protected": false,
        "verified": true,
        "followers_count": 6_400_000,
        "friends_count": 4_200,
        "listed_count": 30_000,
        "favourites_count": 35_000,
        "statuses_count": 28_000,
        "created_at": "Tue Mar 21 20:50:14 +0000 2006",
        "time_zone": null,
        "lang": null,
        "profile_image_url": "http://pbs.twimg.com/profile_images/1/a_normal.jpeg"
    })
}

fn timeline_json() -> serde_json::Value {
    json!([
        {
            "id": 20,
            "text": "just setting up my twttr",
            "retweeted": false,
            "retweet_count": 120_000,
            "created_at": "Tue Mar 21 20:50:14 +0000 2006"
        },
        {
            "id": 21,
            "text": "inviting coworkers",
            "retweeted": false,
            "retweet_count": 3,
            "possibly_sensitive": true,
            "created_at": "Tue Mar 21 21:02:56 +0000 2006"
        }
    ])
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(format!("{}/1.1", server.uri()))
        .auth_url(format!("{}/oauth2/token", server.uri()))
        .user_agent("twitter-graph-test/1.0")
        .build()
}

async fn mount_token(server: &MockServer) {
    let basic = base64::engine::general_purpose::STANDARD.encode("key:secret");
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("authorization", format!("Basic {basic}").as_str()))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(gzipped(
            200,
            json!({"token_type": "bearer", "access_token": "app-token"}),
        ))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_id_pages(server: &MockServer, endpoint: &str) {
    for (cursor, ids, next) in [
        ("-1", vec![1, 2], 111),
        ("111", vec![3, 4], 222),
        ("222", vec![5], 0),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("cursor", cursor))
            .and(header("authorization", "Bearer app-token"))
            .respond_with(gzipped(
                200,
                json!({"ids": ids, "next_cursor": next, "previous_cursor": 0}),
            ))
            .mount(server)
            .await;
    }
}

async fn authenticated_client(server: &MockServer) -> Client {
    mount_token(server).await;
    let mut client = Client::with_config(Credentials::new("key", "secret"), config_for(server)).unwrap();
    client.authenticate().await.unwrap();
    client
}

// ============================================================================
// Client Integration Tests
// ============================================================================

#[tokio::test]
async fn test_authenticate_then_lookup_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param("screen_name", "jack"))
        .and(header("authorization", "Bearer app-token"))
        .and(header("accept-encoding", "gzip"))
        .and(header("user-agent", "twitter-graph-test/1.0"))
        .respond_with(gzipped(200, profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authenticated_client(&mock_server).await;
    assert!(client.is_authenticated());
    assert_eq!(client.bearer_token().unwrap().as_str(), "app-token");

    let profile = client.get_profile("jack").await.unwrap();
    assert_eq!(profile.id, 12);
    assert_eq!(profile.screen_name, "jack");
    assert!(profile.verified);
    assert_eq!(profile.url, "");
    assert_eq!(profile.followers_count, 6_400_000);
    assert_eq!(profile.created_at.to_utc().timestamp(), 1_142_974_214);
}

#[tokio::test]
async fn test_profile_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param("user_id", "12"))
        .respond_with(gzipped(200, profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authenticated_client(&mock_server).await;
    let profile = client.get_profile_by_id(12).await.unwrap();
    assert_eq!(profile.name, "jack");
}

#[tokio::test]
async fn test_timeline_query_and_decode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(gzipped(200, timeline_json()))
        .mount(&mock_server)
        .await;

    let client = authenticated_client(&mock_server).await;
    let posts = client.get_timeline("jack", 2).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "just setting up my twttr");
    assert!(!posts[0].sensitive);
    assert!(posts[1].sensitive);

    let posts = client.get_timeline_by_id(12, 2).await.unwrap();
    assert_eq!(posts[1].id, 21);

    let requests = mock_server.received_requests().await.unwrap();
    let queries: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/1.1/statuses/user_timeline.json")
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(queries, vec!["screen_name=jack&count=2", "user_id=12&count=2"]);
}

#[tokio::test]
async fn test_protected_timeline_is_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(gzipped(
            401,
            json!({"request": "/1.1/statuses/user_timeline.json", "error": "Not authorized."}),
        ))
        .mount(&mock_server)
        .await;

    let client = authenticated_client(&mock_server).await;
    let err = client.get_timeline("private", 20).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert_eq!(err.to_string(), "Authorization Required");
}

#[tokio::test]
async fn test_followers_and_friends_walk() {
    let mock_server = MockServer::start().await;
    mount_id_pages(&mock_server, "/1.1/followers/ids.json").await;
    mount_id_pages(&mock_server, "/1.1/friends/ids.json").await;

    let client = authenticated_client(&mock_server).await;

    let mut followers = client.followers_iter(Subject::id(12), 2);
    let mut friends = client.friends_iter("jack", 2);
    let mut all = Vec::new();
    let mut page = Vec::new();
    loop {
        match followers.next(&mut page).await {
            Ok(()) => all.extend_from_slice(&page),
            Err(e) if e.is_end_of_list() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(all, vec![1, 2, 3, 4, 5]);

    // Independent iterators over one client keep their own cursors
    assert_eq!(friends.cursor(), -1);
    assert_eq!(friends.next_ids().await.unwrap(), vec![1, 2]);
    assert_eq!(friends.cursor(), 111);
}

#[tokio::test]
async fn test_friends_stream() {
    let mock_server = MockServer::start().await;
    mount_id_pages(&mock_server, "/1.1/friends/ids.json").await;

    let client = authenticated_client(&mock_server).await;
    let ids: Vec<i64> = client
        .friends_iter(Subject::id(12), 2)
        .into_stream()
        .map(|p| p.unwrap())
        .collect::<Vec<_>>()
        .await
        .concat();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_failed_authentication_leaves_client_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(gzipped(403, json!({"errors": [{"code": 99}]})))
        .mount(&mock_server)
        .await;

    let mut client =
        Client::with_config(Credentials::new("key", "wrong"), config_for(&mock_server)).unwrap();
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, Error::MissingAccessToken));
    assert!(!client.is_authenticated());

    // Lookups fail locally without reaching the server
    let err = client.get_profile("jack").await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_preissued_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(header("authorization", "Bearer preissued"))
        .respond_with(gzipped(200, profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_config(Credentials::new("key", "secret"), config_for(&mock_server))
        .unwrap()
        .with_bearer_token("preissued");
    assert!(client.is_authenticated());
    assert_eq!(client.get_profile_by_id(12).await.unwrap().id, 12);
}

#[test]
fn test_invalid_endpoint_urls() {
    let config = ClientConfig::builder().base_url("not a url").build();
    let err = Client::with_config(Credentials::new("k", "s"), config).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));

    let config = ClientConfig::builder().auth_url("::").build();
    assert!(Client::with_config(Credentials::new("k", "s"), config).is_err());
}

#[test]
fn test_client_debug_redacts_secrets() {
    let client = Client::new("visible-key", "hidden-secret")
        .unwrap()
        .with_bearer_token("hidden-token");
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("visible-key"));
    assert!(!debug_str.contains("hidden-secret"));
    assert!(!debug_str.contains("hidden-token"));
}

// ============================================================================
// CLI Runner Integration Tests
// ============================================================================

fn settings_file(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "consumer_key: key\nconsumer_secret: secret\nbase_url: {}/1.1\nauth_url: {}/oauth2/token\ntimeout_secs: 5",
        server.uri(),
        server.uri()
    )
    .unwrap();
    file
}

#[tokio::test]
async fn test_runner_profile() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param("screen_name", "jack"))
        .respond_with(gzipped(200, profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = settings_file(&mock_server);
    let cli = Cli::try_parse_from([
        "twitter-graph",
        "--config",
        settings.path().to_str().unwrap(),
        "profile",
        "@jack",
    ])
    .unwrap();

    Runner::with_lookup(cli, |_| None).run().await.unwrap();
}

#[tokio::test]
async fn test_runner_overrides_come_from_its_lookup() {
    let mock_server = MockServer::start().await;

    let basic = base64::engine::general_purpose::STANDARD.encode("lookup-key:secret");
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("authorization", format!("Basic {basic}").as_str()))
        .respond_with(gzipped(
            200,
            json!({"token_type": "bearer", "access_token": "app-token"}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .respond_with(gzipped(200, profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = settings_file(&mock_server);
    let cli = Cli::try_parse_from([
        "twitter-graph",
        "--config",
        settings.path().to_str().unwrap(),
        "profile",
        "jack",
    ])
    .unwrap();

    // The file says "key"; the lookup wins
    let runner = Runner::with_lookup(cli, |name| {
        (name == "TWITTER_CONSUMER_KEY").then(|| "lookup-key".to_string())
    });
    runner.run().await.unwrap();
}

#[tokio::test]
async fn test_runner_waits_on_rate_limit_and_retries_same_page() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    // Reset instant already passed, so the wait is zero
    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .and(query_param("cursor", "111"))
        .respond_with(ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_id_pages(&mock_server, "/1.1/followers/ids.json").await;

    let settings = settings_file(&mock_server);
    let cli = Cli::try_parse_from([
        "twitter-graph",
        "--config",
        settings.path().to_str().unwrap(),
        "followers",
        "12",
        "--page-size",
        "2",
        "--wait-on-rate-limit",
    ])
    .unwrap();

    Runner::with_lookup(cli, |_| None).run().await.unwrap();

    let cursors: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/1.1/followers/ids.json")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "cursor")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(cursors, vec!["-1", "111", "111", "222"]);
}

#[tokio::test]
async fn test_runner_fails_on_rate_limit_without_wait() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/1.1/friends/ids.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1700000000"))
        .mount(&mock_server)
        .await;

    let settings = settings_file(&mock_server);
    let cli = Cli::try_parse_from([
        "twitter-graph",
        "--config",
        settings.path().to_str().unwrap(),
        "friends",
        "jack",
    ])
    .unwrap();

    let err = Runner::with_lookup(cli, |_| None).run().await.unwrap_err();
    assert_eq!(err.rate_limit_reset().unwrap().timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn test_runner_max_pages() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_id_pages(&mock_server, "/1.1/friends/ids.json").await;

    let settings = settings_file(&mock_server);
    let cli = Cli::try_parse_from([
        "twitter-graph",
        "--config",
        settings.path().to_str().unwrap(),
        "friends",
        "jack",
        "--page-size",
        "2",
        "--max-pages",
        "1",
    ])
    .unwrap();

    Runner::with_lookup(cli, |_| None).run().await.unwrap();

    let list_requests = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/1.1/friends/ids.json")
        .count();
    assert_eq!(list_requests, 1);
}
