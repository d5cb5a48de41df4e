//! End-to-end export runs: live client, real orchestrator, mock upstream.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use product_hunt_exporter::cli::export::ExportArgs;
use product_hunt_exporter::config::Config;
use product_hunt_exporter::fetcher::GraphQlClient;
use product_hunt_exporter::pipeline::{ExportOutcome, Exporter, NullSink, ProgressEvent, ProgressSink};
use product_hunt_exporter::shutdown::CancelToken;
use serde_json::json;
use std::sync::Mutex;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn node(id: &str, name: &str, featured_at: &str) -> serde_json::Value {
    json!({"node": {
        "id": id,
        "name": name,
        "tagline": format!("{name} tagline"),
        "url": format!("https://www.producthunt.com/posts/{name}"),
        "website": format!("https://{name}.example"),
        "votesCount": 12,
        "featuredAt": featured_at,
        "makers": [{"name": "Ada", "username": "ada"}],
        "user": {"name": "Grace", "username": "grace"}
    }})
}

fn page_body(edges: Vec<serde_json::Value>, cursor: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "posts": {
                "pageInfo": {"hasNextPage": cursor.is_some(), "endCursor": cursor},
                "edges": edges
            }
        }
    })
}

fn healthy(template: ResponseTemplate) -> ResponseTemplate {
    template
        .insert_header("x-rate-limit-limit", "6250")
        .insert_header("x-rate-limit-remaining", "6000")
        .insert_header("x-rate-limit-reset", "300")
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    fn take(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn exports_a_two_page_day_to_csv() {
    let server = MockServer::start().await;

    // First page: no cursor in the request, two in-window posts and one
    // straggler from the day before.
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"after": null}})))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                node("1", "widget", "2024-03-15T20:00:00Z"),
                node("2", "gadget", "2024-03-15T09:30:00Z"),
                node("3", "gizmo", "2024-03-14T23:59:00Z"),
            ],
            Some("cursor-1"),
        ))))
        .expect(1)
        .mount(&server)
        .await;

    // Second page: resumed from cursor-1, one more match, then the feed ends.
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"after": "cursor-1"}})))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![node("4", "doohickey", "2024-03-15T00:15:00Z")],
            None,
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphQlClient::new(server.uri(), "test-token");
    let sink = CollectingSink::default();

    let outcome = Exporter::new(&client, &sink).run(date()).await.unwrap();

    let (filename, csv, rows) = match outcome {
        ExportOutcome::Csv { filename, csv, rows } => (filename, csv, rows),
        other => panic!("expected CSV outcome, got {other:?}"),
    };
    assert_eq!(rows, 3);
    assert_eq!(filename, "product-hunt-posts-2024-03-15.csv");

    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "\u{feff}Name,Tagline,Description,Votes,Makers,Hunter,Website,Product Hunt URL"
    );
    let first = lines.next().unwrap();
    assert!(first.starts_with("widget,"));
    assert!(first.contains("Ada (@ada)"));
    assert!(first.contains("Grace (@grace)"));
    // gizmo launched the day before and must not appear.
    assert!(!csv.contains("gizmo"));

    let events = sink.take();
    assert!(matches!(events.first(), Some(ProgressEvent::Start { .. })));
    match events.last() {
        Some(ProgressEvent::Complete { count, csv: payload, .. }) => {
            assert_eq!(*count, 3);
            assert_eq!(payload, &csv);
        }
        other => panic!("expected complete event, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_feed_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(healthy(
            ResponseTemplate::new(200).set_body_json(page_body(vec![], None)),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphQlClient::new(server.uri(), "test-token");
    let sink = CollectingSink::default();

    let outcome = Exporter::new(&client, &sink).run(date()).await.unwrap();
    assert_eq!(outcome, ExportOutcome::Empty);

    let events = sink.take();
    match events.last() {
        Some(ProgressEvent::Error { message, details }) => {
            assert!(message.contains("No posts found for 2024-03-15"));
            assert!(details.is_none());
        }
        other => panic!("expected not-found event, got {other:?}"),
    }
}

#[tokio::test]
async fn recovers_from_a_transient_429_mid_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![node("1", "widget", "2024-03-15T12:00:00Z")],
            None,
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphQlClient::new(server.uri(), "test-token");
    let outcome = Exporter::new(&client, &NullSink).run(date()).await.unwrap();

    match outcome {
        ExportOutcome::Csv { rows, .. } => assert_eq!(rows, 1),
        other => panic!("expected CSV outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn stops_early_once_pages_predate_the_day() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"after": null}})))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                node("1", "widget", "2024-03-14T10:00:00Z"),
                node("2", "gadget", "2024-03-14T08:00:00Z"),
            ],
            Some("cursor-1"),
        ))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"after": "cursor-1"}})))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                node("3", "gizmo", "2024-03-13T22:00:00Z"),
                node("4", "doohickey", "2024-03-13T21:00:00Z"),
            ],
            Some("cursor-2"),
        ))))
        .expect(1)
        .mount(&server)
        .await;
    // A third page exists upstream but must never be requested.
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"after": "cursor-2"}})))
        .respond_with(healthy(
            ResponseTemplate::new(200).set_body_json(page_body(vec![], None)),
        ))
        .expect(0)
        .mount(&server)
        .await;

    let client = GraphQlClient::new(server.uri(), "test-token");
    let outcome = Exporter::new(&client, &NullSink).run(date()).await.unwrap();

    assert_eq!(outcome, ExportOutcome::Empty);
}

#[tokio::test]
async fn export_command_writes_the_csv_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(healthy(ResponseTemplate::new(200).set_body_json(page_body(
            vec![node("1", "widget", "2024-03-15T12:00:00Z")],
            None,
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let config = Config {
        api_token: Some("test-token".into()),
        api_url: server.uri(),
        bind_address: "127.0.0.1:0".parse().unwrap(),
    };
    let args = ExportArgs {
        date: "2024-03-15".into(),
        output: Some(path.clone()),
    };

    args.execute(&config, CancelToken::new()).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with('\u{feff}'));
    assert!(written.contains("widget"));
    assert_eq!(written.lines().count(), 2);
}
