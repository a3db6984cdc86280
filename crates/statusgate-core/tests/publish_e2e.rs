//! E2E tests for the publish sequence and the consumer viewer against a
//! mock HTTP store.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use indoc::indoc;
use statusgate_core::{publish_at, DraftFields, HttpStore, Mode, Viewer};

fn fixed_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 19, 0, 0)
        .unwrap()
}

const STORED: &str = indoc! {r#"
    {
      "active": true,
      "mode": "info",
      "modes": {
        "info": { "title": "Old title", "message": "Old message", "ok_delay_seconds": 5 }
      }
    }
"#};

#[tokio::test]
async fn publish_reads_then_writes_with_the_read_token() {
    let mut server = mockito::Server::new_async().await;

    let read = server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_header("etag", "\"v42\"")
        .with_body(STORED)
        .create_async()
        .await;

    let write = server
        .mock("PUT", "/status.json")
        .match_header("if-match", "\"v42\"")
        .match_header("content-type", "application/json")
        .with_status(200)
        .create_async()
        .await;

    let store = HttpStore::new(&format!("{}/status.json", server.url()), None).unwrap();
    let draft = DraftFields {
        title: Some("New title".to_string()),
        ..Default::default()
    };

    let published = publish_at(&store, &draft, fixed_now()).await.unwrap();

    read.assert_async().await;
    write.assert_async().await;
    assert_eq!(published.modes.info.title, "New title");
    assert_eq!(published.last_update, "2024-01-01T19:00:00+01:00");
}

#[tokio::test]
async fn publish_surfaces_conflict_without_retrying() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_header("etag", "\"stale\"")
        .with_body(STORED)
        .create_async()
        .await;

    let write = server
        .mock("PUT", "/status.json")
        .with_status(412)
        .expect(1)
        .create_async()
        .await;

    let store = HttpStore::new(&format!("{}/status.json", server.url()), None).unwrap();
    let err = publish_at(&store, &DraftFields::default(), fixed_now())
        .await
        .unwrap_err();

    write.assert_async().await;
    assert!(err.to_string().contains("stale"), "got: {err}");
}

#[tokio::test]
async fn publish_rejects_read_without_version_token() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body(STORED)
        .create_async()
        .await;

    let write = server
        .mock("PUT", "/status.json")
        .expect(0)
        .create_async()
        .await;

    let store = HttpStore::new(&format!("{}/status.json", server.url()), None).unwrap();
    let result = publish_at(&store, &DraftFields::default(), fixed_now()).await;

    assert!(result.is_err());
    write.assert_async().await;
}

#[tokio::test]
async fn publish_rebuilds_a_garbled_stored_document() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_header("etag", "\"v1\"")
        .with_body("not json at all {{{")
        .create_async()
        .await;

    server
        .mock("PUT", "/status.json")
        .match_header("if-match", "\"v1\"")
        .with_status(200)
        .create_async()
        .await;

    let store = HttpStore::new(&format!("{}/status.json", server.url()), None).unwrap();
    let draft = DraftFields {
        active: Some(true),
        mode: Some(Mode::Info),
        title: Some("Fresh".to_string()),
        ..Default::default()
    };

    let published = publish_at(&store, &draft, fixed_now()).await.unwrap();
    assert!(published.active);
    assert_eq!(published.modes.info.title, "Fresh");
    assert_eq!(published.modes.info.ok_delay_seconds, 5);
}

#[tokio::test]
async fn publish_sends_bearer_token_when_configured() {
    let mut server = mockito::Server::new_async().await;

    let read = server
        .mock("GET", "/status.json")
        .match_header("authorization", "Bearer sekrit")
        .with_status(200)
        .with_header("etag", "\"v1\"")
        .with_body(STORED)
        .create_async()
        .await;

    server
        .mock("PUT", "/status.json")
        .match_header("authorization", "Bearer sekrit")
        .with_status(200)
        .create_async()
        .await;

    let store = HttpStore::new(
        &format!("{}/status.json", server.url()),
        Some("sekrit".to_string()),
    )
    .unwrap();
    publish_at(&store, &DraftFields::default(), fixed_now())
        .await
        .unwrap();
    read.assert_async().await;
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn viewer_decides_from_a_live_document() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body(STORED)
        .create_async()
        .await;

    let viewer = Viewer::new(format!("{}/status.json", server.url()));
    let decision = viewer.decision_at(noon()).await;
    assert!(decision.show);
    assert_eq!(decision.content.title, "Old title");
    assert!(decision.order_enabled);
}

#[tokio::test]
async fn viewer_fails_open_on_http_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(500)
        .create_async()
        .await;

    let viewer = Viewer::new(format!("{}/status.json", server.url()));
    let decision = viewer.decision_at(noon()).await;
    assert!(!decision.show);
    assert!(decision.order_enabled);
}

#[tokio::test]
async fn viewer_fails_open_on_garbage_body() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body("<html>definitely not json</html>")
        .create_async()
        .await;

    let viewer = Viewer::new(format!("{}/status.json", server.url()));
    let decision = viewer.decision_at(noon()).await;
    assert!(!decision.show);
    assert!(decision.order_enabled);
}

#[tokio::test]
async fn viewer_fails_open_when_nothing_listens() {
    // Reserved port, nothing bound.
    let viewer = Viewer::new("http://127.0.0.1:1/status.json");
    let decision = viewer.decision_at(noon()).await;
    assert!(!decision.show);
    assert!(decision.order_enabled);
}
