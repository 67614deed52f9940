#![allow(clippy::unwrap_used)]

//! Integration tests for [`Session`] against a mock monitoring service.

use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hostpulse_core::{Command, Session, SessionConfig, SessionEvent};

/// Session against `server` with polling effectively disabled.
async fn setup(server: &MockServer) -> (Session, mpsc::UnboundedReceiver<SessionEvent>) {
    let url = Url::parse(&server.uri()).unwrap();
    let mut config = SessionConfig::new(url);
    config.poll_interval = Duration::from_secs(3600);

    let (session, events) = Session::new(config).unwrap();
    session.start().await;
    (session, events)
}

async fn recv(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("event channel closed")
}

fn mock_empty_groups() -> Mock {
    Mock::given(method("GET"))
        .and(path("/hosts/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "groups": {}
        })))
}

#[tokio::test]
async fn seeds_group_configuration_on_start() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosts/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "groups": {
                "prod": {
                    "order": 1,
                    "hosts": [
                        {"address": "10.0.0.1", "label": "gateway"},
                        {"address": "10.0.0.2", "label": ""}
                    ]
                },
                "lab": {"order": 2, "hosts": []}
            }
        })))
        .mount(&server)
        .await;

    let (session, mut events) = setup(&server).await;

    let SessionEvent::Seeded(groups) = recv(&mut events).await else {
        panic!("expected Seeded event");
    };
    assert_eq!(groups.len(), 2);
    let prod = groups.iter().find(|g| g.name == "prod").unwrap();
    assert_eq!(prod.order, 1);
    assert_eq!(prod.hosts.len(), 2);
    // Empty labels fall back to the address on the way in.
    assert_eq!(prod.hosts[1].label, "10.0.0.2");

    session.shutdown().await;
}

#[tokio::test]
async fn seed_failure_is_reported_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosts/groups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (session, mut events) = setup(&server).await;

    assert!(matches!(
        recv(&mut events).await,
        SessionEvent::SeedFailed(_)
    ));

    session.shutdown().await;
}

#[tokio::test]
async fn commands_resolve_in_submission_order() {
    let server = MockServer::start().await;
    mock_empty_groups().mount(&server).await;

    // Make the add slow: if the commands ran concurrently, the remove
    // would overtake it.
    Mock::given(method("POST"))
        .and(path("/add_ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(serde_json::json!({"status": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/remove_ip"))
        .and(body_json(serde_json::json!({"address": "10.0.0.9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let (session, mut events) = setup(&server).await;
    assert!(matches!(recv(&mut events).await, SessionEvent::Seeded(_)));

    session
        .execute(Command::AddHost {
            address: "10.0.0.9".into(),
            label: String::new(),
            group: "prod".into(),
        })
        .await
        .unwrap();
    session
        .execute(Command::RemoveHost {
            address: "10.0.0.9".into(),
        })
        .await
        .unwrap();

    // The add confirmation arrives first despite its slower round trip.
    assert!(matches!(
        recv(&mut events).await,
        SessionEvent::HostAdded { ref address, .. } if address == "10.0.0.9"
    ));
    assert!(matches!(
        recv(&mut events).await,
        SessionEvent::HostRemoved { ref address } if address == "10.0.0.9"
    ));

    session.shutdown().await;
}

#[tokio::test]
async fn failed_command_surfaces_an_error_event() {
    let server = MockServer::start().await;
    mock_empty_groups().mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/groups/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "msg": "group exists"
        })))
        .mount(&server)
        .await;

    let (session, mut events) = setup(&server).await;
    assert!(matches!(recv(&mut events).await, SessionEvent::Seeded(_)));

    session
        .execute(Command::AddGroup { name: "prod".into() })
        .await
        .unwrap();

    let SessionEvent::CommandFailed { description, error } = recv(&mut events).await else {
        panic!("expected CommandFailed event");
    };
    assert!(description.contains("prod"));
    assert!(error.contains("group exists"));

    session.shutdown().await;
}

#[tokio::test]
async fn polling_emits_data_snapshots() {
    let server = MockServer::start().await;
    mock_empty_groups().mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "10.0.0.1": [
                {"ts": 100, "latency": 12.5, "status": "UP"},
                {"ts": 102, "latency": null, "status": "DOWN"}
            ]
        })))
        .mount(&server)
        .await;

    let url = Url::parse(&server.uri()).unwrap();
    let mut config = SessionConfig::new(url);
    config.poll_interval = Duration::from_millis(50);

    let (session, mut events) = Session::new(config).unwrap();
    session.start().await;

    let data = loop {
        match recv(&mut events).await {
            SessionEvent::DataUpdated(data) => break data,
            _ => continue,
        }
    };
    let samples = data.get("10.0.0.1").unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].latency, None);

    session.shutdown().await;
}

#[tokio::test]
async fn execute_after_shutdown_fails() {
    let server = MockServer::start().await;
    mock_empty_groups().mount(&server).await;

    let (session, mut events) = setup(&server).await;
    assert!(matches!(recv(&mut events).await, SessionEvent::Seeded(_)));
    session.shutdown().await;

    let result = session
        .execute(Command::RemoveHost {
            address: "10.0.0.1".into(),
        })
        .await;
    assert!(result.is_err());
}
