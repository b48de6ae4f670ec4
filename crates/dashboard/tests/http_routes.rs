mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use common::{all_day_event, calendar, ymd, FakeSource};
use family_dashboard::handlers::AppState;
use family_dashboard::routes::create_app;
use family_dashboard::{build_snapshot, SnapshotPublisher};
use family_types::{FamilySnapshot, RefreshReport};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    publisher: SnapshotPublisher,
    _static_dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let source = FakeSource::new();
    source.set_events(
        "a1",
        vec![all_day_event("e1", "Dentist & <checkup>", ymd(2024, 6, 12))],
    );
    source.set_failure("b2", "token expired");
    let calendars = vec![calendar("Alice", "a1"), calendar("Bob", "b2")];
    let now = Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap();

    let publisher = SnapshotPublisher::new(build_snapshot(&calendars, &source, &now).await);

    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("style.css"), "body { margin: 0; }").unwrap();

    let state = AppState::new(publisher.reader(), "style.css");
    TestApp {
        router: create_app(state, static_dir.path()),
        publisher,
        _static_dir: static_dir,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "http://kitchen-display.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_json_endpoint_serves_snapshot_with_cors() {
    let app = test_app().await;
    let (status, headers, body) = get(&app.router, "/json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let snapshot: FamilySnapshot = serde_json::from_slice(&body).unwrap();
    assert_eq!(snapshot.calendars.len(), 2);
    let wednesday = snapshot.calendars[0].day("Wednesday").unwrap();
    assert_eq!(wednesday.events[0].title, "Dentist & <checkup>");

    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw["memberCalendars"][1]["memberName"], "Bob");
    assert_eq!(raw["memberCalendars"][1]["days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_json_endpoint_follows_publishes() {
    let app = test_app().await;

    let source = FakeSource::new();
    let now = Utc.with_ymd_and_hms(2024, 6, 19, 12, 0, 0).unwrap();
    app.publisher
        .publish(build_snapshot(&[calendar("Carol", "c3")], &source, &now).await);

    let (_, _, body) = get(&app.router, "/json").await;
    let snapshot: FamilySnapshot = serde_json::from_slice(&body).unwrap();
    assert_eq!(snapshot.week_start, ymd(2024, 6, 16));
    assert_eq!(snapshot.calendars[0].calendar_name, "Carol");
}

#[tokio::test]
async fn test_html_view() {
    let app = test_app().await;
    let (status, headers, body) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("href=\"/static/style.css\""));
    assert!(html.contains("<th class=\"member\">Alice</th>"));
    assert!(html.contains("Dentist &amp; &lt;checkup&gt;"));
}

#[tokio::test]
async fn test_status_reports_failed_calendar() {
    let app = test_app().await;
    let (status, _, body) = get(&app.router, "/status").await;

    assert_eq!(status, StatusCode::OK);
    let report: RefreshReport = serde_json::from_slice(&body).unwrap();
    assert_eq!(report.total_events(), 1);
    assert_eq!(report.failed_calendars(), 1);
    assert_eq!(report.calendars[1].name, "Bob");
    assert!(report.calendars[1].error.as_deref().unwrap().contains("token expired"));
}

#[tokio::test]
async fn test_static_files_served_verbatim() {
    let app = test_app().await;

    let (status, _, body) = get(&app.router, "/static/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"body { margin: 0; }");

    let (status, _, _) = get(&app.router, "/static/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = test_app().await;

    let (status, _, _) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = get(&app.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
