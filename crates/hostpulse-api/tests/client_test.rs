#![allow(clippy::unwrap_used)]
// Integration tests for `MonitorClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hostpulse_api::{Error, HostStatus, MonitorClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MonitorClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MonitorClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Group configuration tests ───────────────────────────────────────

#[tokio::test]
async fn test_fetch_groups() {
    let (server, client) = setup().await;

    let body = json!({
        "groups": {
            "prod": {
                "order": 1,
                "hosts": [
                    { "address": "10.0.0.1", "label": "gateway" },
                    { "address": "10.0.0.2", "label": "dns" }
                ]
            },
            "lab": { "order": 2, "hosts": [] }
        }
    });

    Mock::given(method("GET"))
        .and(path("/hosts/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let response = client.fetch_groups().await.unwrap();

    assert_eq!(response.groups.len(), 2);
    let prod = &response.groups["prod"];
    assert_eq!(prod.order, 1);
    assert_eq!(prod.hosts.len(), 2);
    assert_eq!(prod.hosts[0].address, "10.0.0.1");
    assert_eq!(prod.hosts[0].label, "gateway");
    assert!(response.groups["lab"].hosts.is_empty());
}

#[tokio::test]
async fn test_add_group_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/groups/add"))
        .and(body_json(json!({ "name": "prod" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    client.add_group("prod").await.unwrap();
}

#[tokio::test]
async fn test_add_group_rejected_by_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/groups/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "msg": "group already exists"
        })))
        .mount(&server)
        .await;

    let result = client.add_group("prod").await;

    match result {
        Err(Error::Rejected { ref message }) => {
            assert!(
                message.contains("already exists"),
                "expected rejection reason, got: {message}"
            );
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_remove_group_ignores_body() {
    let (server, client) = setup().await;

    // Acknowledgement body is deliberately junk — only the 2xx matters.
    Mock::given(method("POST"))
        .and(path("/groups/remove"))
        .and(body_json(json!({ "name": "lab" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("gone"))
        .mount(&server)
        .await;

    client.remove_group("lab").await.unwrap();
}

// ── Host configuration tests ────────────────────────────────────────

#[tokio::test]
async fn test_add_host_wire_keys() {
    let (server, client) = setup().await;

    // `/add_ip` speaks the legacy `ip`/`name` keys.
    Mock::given(method("POST"))
        .and(path("/add_ip"))
        .and(body_json(json!({
            "ip": "10.0.0.1",
            "name": "gateway",
            "group": "prod"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    client.add_host("10.0.0.1", "gateway", "prod").await.unwrap();
}

#[tokio::test]
async fn test_remove_host() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/remove_ip"))
        .and(body_json(json!({ "address": "10.0.0.1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    client.remove_host("10.0.0.1").await.unwrap();
}

#[tokio::test]
async fn test_add_host_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/add_ip"))
        .respond_with(ResponseTemplate::new(400).set_body_string("limit reached"))
        .mount(&server)
        .await;

    let result = client.add_host("10.0.0.99", "spare", "prod").await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error for HTTP 400, got: {result:?}"
    );
}

// ── Time-series tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_data() {
    let (server, client) = setup().await;

    let body = json!({
        "10.0.0.1": [
            { "ts": 1700000000, "latency": 12.5, "status": "UP" },
            { "ts": 1700000002, "latency": 48.0, "status": "INSTAVEL" },
            { "ts": 1700000004, "latency": null, "status": "DOWN" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let data = client.fetch_data().await.unwrap();

    let history = &data["10.0.0.1"];
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].latency, Some(12.5));
    assert_eq!(history[1].status, HostStatus::Unstable);
    assert_eq!(history[2].latency, None);
    assert_eq!(history[2].status, HostStatus::Down);
}

#[tokio::test]
async fn test_fetch_data_unknown_status_folds_to_down() {
    let (server, client) = setup().await;

    let body = json!({
        "10.0.0.1": [
            { "ts": 1700000000, "latency": 3.1, "status": "FLAPPING" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let data = client.fetch_data().await.unwrap();
    assert_eq!(data["10.0.0.1"][0].status, HostStatus::Down);
}

#[tokio::test]
async fn test_fetch_data_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.fetch_data().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "not json");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
