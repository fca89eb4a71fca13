use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, ORIGIN,
        },
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use camino::Utf8PathBuf as PathBuf;
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use chronicle_core::{
    model::repository::db::{self, Database},
    storage::UploadStorage,
};

use crate::{
    app_state::AppState,
    schema::{FuturePlan, MessageResponse, TimelineEvent},
};

const BOUNDARY: &str = "chronicle-test-boundary";

struct TestApp {
    _dir: tempfile::TempDir,
    upload_dir: PathBuf,
    app: Router,
}

async fn test_app() -> TestApp {
    test_app_with_body_limit(None).await
}

async fn test_app_with_body_limit(max_body_size: Option<u64>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let root = PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let upload_dir = root.join("uploads");
    let uploads = UploadStorage::new(upload_dir.clone());
    uploads.create_root().await.unwrap();
    let db = Database::new(root.join("test.db"));
    db.interact(db::migrate).await.unwrap();
    let app = super::app_router(Arc::new(AppState { db, uploads }), max_body_size);
    TestApp {
        _dir: dir,
        upload_dir,
        app,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> T {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_event(
        &self,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/timeline")
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(fields, image)))
                .unwrap(),
        )
        .await
    }

    async fn post_plan(&self, json: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/futureplans")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
        )
        .await
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn read_body(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    serde_json::from_slice(&read_body(response).await).unwrap()
}

fn event_fields<'a>(title: &'a str, date: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("description", "something happened"),
        ("date", date),
    ]
}

#[tokio::test]
async fn home_reports_running() {
    let app = test_app().await;
    let body: MessageResponse = app.get_json("/").await;
    assert_eq!(body, MessageResponse::new("Backend running"));
}

#[tokio::test]
async fn created_events_are_listed_latest_date_first() {
    let app = test_app().await;
    for (title, date) in [
        ("graduation", "2021-06-30"),
        ("first job", "2022-01-10"),
        ("born", "1995-03-02"),
    ] {
        let response = app.post_event(&event_fields(title, date), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = read_json(response).await;
        assert_eq!(body.message, "Event added successfully!");
    }
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let listed: Vec<(&str, &str)> = events
        .iter()
        .map(|e| (e.title.as_str(), e.date.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("first job", "2022-01-10"),
            ("graduation", "2021-06-30"),
            ("born", "1995-03-02"),
        ]
    );
    assert!(events.iter().all(|e| e.image_url.is_none()));
    assert!(events.iter().all(|e| e.description == "something happened"));
}

#[tokio::test]
async fn timeline_json_uses_column_names() {
    let app = test_app().await;
    app.post_event(&event_fields("moved", "2020-02-02"), None)
        .await;
    let events: serde_json::Value = app.get_json("/api/timeline").await;
    let event = &events[0];
    assert!(event["id"].is_i64());
    assert_eq!(event["title"], "moved");
    assert_eq!(event["date"], "2020-02-02");
    assert!(event["image_url"].is_null());
}

#[tokio::test]
async fn uppercase_extension_is_accepted_and_served() {
    let app = test_app().await;
    let response = app
        .post_event(
            &event_fields("holiday", "2023-08-01"),
            Some(("photo.PNG", b"\x89PNG fake image data".as_slice())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let image_url = events[0].image_url.clone().expect("image should be stored");
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".png"));

    let response = app.get(&image_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(read_body(response).await, b"\x89PNG fake image data".to_vec());
}

#[tokio::test]
async fn disallowed_extension_is_dropped() {
    let app = test_app().await;
    let response = app
        .post_event(
            &event_fields("notes", "2023-08-01"),
            Some(("notes.txt", b"plain text".as_slice())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].image_url, None);
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn same_file_name_twice_gives_distinct_files() {
    let app = test_app().await;
    app.post_event(
        &event_fields("a", "2023-01-01"),
        Some(("cat.jpg", b"first cat".as_slice())),
    )
    .await;
    app.post_event(
        &event_fields("b", "2023-01-02"),
        Some(("cat.jpg", b"second cat".as_slice())),
    )
    .await;
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let urls: Vec<String> = events.into_iter().filter_map(|e| e.image_url).collect();
    assert_eq!(urls.len(), 2);
    assert_ne!(urls[0], urls[1]);
    assert_eq!(read_body(app.get(&urls[0]).await).await, b"second cat".to_vec());
    assert_eq!(read_body(app.get(&urls[1]).await).await, b"first cat".to_vec());
}

#[tokio::test]
async fn missing_form_field_is_rejected() {
    let app = test_app().await;
    let response = app
        .post_event(&[("description", "no title"), ("date", "2023-01-01")], None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    assert!(events.is_empty());
}

#[tokio::test]
async fn delete_event() {
    let app = test_app().await;
    app.post_event(&event_fields("keep", "2020-01-01"), None)
        .await;
    app.post_event(&event_fields("remove", "2021-01-01"), None)
        .await;
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let remove = events.iter().find(|e| e.title == "remove").unwrap().id;

    let response = app.delete(&format!("/api/timeline/{}", remove)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(
        body.message,
        format!("Event {} deleted successfully!", remove)
    );
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "keep");
}

#[tokio::test]
async fn delete_missing_ids_succeeds_without_changes() {
    let app = test_app().await;
    app.post_event(&event_fields("keep", "2020-01-01"), None)
        .await;
    app.post_plan(r#"{"plan": "Learn Go"}"#).await;
    let events_before: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let plans_before: Vec<FuturePlan> = app.get_json("/api/futureplans").await;

    let response = app.delete("/api/timeline/999").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(body.message, "Event 999 deleted successfully!");

    let response = app.delete("/api/futureplans/999").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(body.message, "Plan 999 deleted successfully!");

    let events_after: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    let plans_after: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert_eq!(events_before, events_after);
    assert_eq!(plans_before, plans_after);
}

#[tokio::test]
async fn plans_default_importance_and_newest_first() {
    let app = test_app().await;
    let response = app.post_plan(r#"{"plan": "Learn Go"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = read_json(response).await;
    assert_eq!(body.message, "Plan added successfully!");
    let response = app
        .post_plan(r#"{"plan": "Run a marathon", "importance": 3}"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].plan, "Run a marathon");
    assert_eq!(plans[0].importance, 3);
    assert_eq!(plans[1].plan, "Learn Go");
    assert_eq!(plans[1].importance, 0);
    assert!(plans[0].id > plans[1].id);
}

#[tokio::test]
async fn delete_plan() {
    let app = test_app().await;
    app.post_plan(r#"{"plan": "Learn Go"}"#).await;
    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    let response = app
        .delete(&format!("/api/futureplans/{}", plans[0].id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert!(plans.is_empty());
}

#[tokio::test]
async fn invalid_plans_are_rejected() {
    let app = test_app().await;
    let response = app.post_plan(r#"{"importance": 2}"#).await;
    assert!(response.status().is_client_error());
    let response = app
        .post_plan(r#"{"plan": "Learn Go", "importance": "very"}"#)
        .await;
    assert!(response.status().is_client_error());
    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert!(plans.is_empty());
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let app = test_app().await;
    let response = app.get("/uploads/0123456789abcdef.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.get("/uploads/..").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = test_app().await;
    app.post_event(&event_fields("keep", "2020-01-01"), None)
        .await;
    app.post_plan(r#"{"plan": "Learn Go"}"#).await;
    for uri in [
        "/api/timeline/-1",
        "/api/timeline/abc",
        "/api/futureplans/-1",
        "/api/futureplans/abc",
        "/api/futureplans/99999999999999999999",
    ] {
        let response = app.delete(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    assert_eq!(events.len(), 1);
    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert_eq!(plans.len(), 1);
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = test_app().await;
    let response = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/timeline")
                .header(ORIGIN, "http://localhost:3000")
                .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert!(response.status().is_success());
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let response = app
        .send(
            Request::builder()
                .uri("/api/futureplans")
                .header(ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn bodies_over_limit_are_rejected() {
    let app = test_app_with_body_limit(Some(16)).await;
    let response = app
        .post_plan(r#"{"plan": "a plan much longer than sixteen bytes"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = app
        .post_event(
            &event_fields("holiday", "2023-08-01"),
            Some(("photo.png", [0u8; 256].as_slice())),
        )
        .await;
    assert!(response.status().is_client_error());

    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert!(plans.is_empty());
    let events: Vec<TimelineEvent> = app.get_json("/api/timeline").await;
    assert!(events.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_requests_share_the_database() {
    let app = test_app().await;
    let mut tasks = Vec::new();
    for i in 0..32 {
        let router = app.app.clone();
        tasks.push(tokio::spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/api/futureplans")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"plan": "plan {}", "importance": {}}}"#, i, i)))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }));
        let router = app.app.clone();
        tasks.push(tokio::spawn(async move {
            let request = Request::builder()
                .uri("/api/futureplans")
                .body(Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
    let plans: Vec<FuturePlan> = app.get_json("/api/futureplans").await;
    assert_eq!(plans.len(), 32);
    let mut importances: Vec<i64> = plans.iter().map(|p| p.importance).collect();
    importances.sort();
    assert_eq!(importances, (0..32).collect::<Vec<i64>>());
}
