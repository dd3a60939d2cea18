mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::TempDb;
use hirelink::Hiring;
use hirelink::server::{HirelinkState, hirelink_router};
use hirelink_schema::{ResumeRelVacanciesRepliedDto, WorkerRelDto};
use tower::ServiceExt;

async fn app(db: &TempDb) -> (axum::Router, Hiring) {
    let hiring = Hiring::connect(&db.config()).await.unwrap();
    hiring.seed_all().await.unwrap();
    (hirelink_router(HirelinkState::new(hiring.clone())), hiring)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn workers_route_returns_workers_with_resumes() {
    let db = TempDb::new("http_workers");
    let (app, hiring) = app(&db).await;

    let (status, body) = get(app, "/workers").await;
    assert_eq!(status, StatusCode::OK);

    let workers: Vec<WorkerRelDto> = serde_json::from_slice(&body).unwrap();
    assert_eq!(workers.len(), 5);
    assert_eq!(workers[0].username, "Bobr");
    let titles: Vec<&str> = workers[0].resumes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Python Junior Developer", "Python Разработчик"]);
    hiring.close().await;
}

#[tokio::test]
async fn resumes_route_flattens_resume_fields() {
    let db = TempDb::new("http_resumes");
    let (app, hiring) = app(&db).await;

    let (status, body) = get(app, "/resumes").await;
    assert_eq!(status, StatusCode::OK);

    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(raw[0]["id"], 1);
    assert_eq!(raw[0]["workload"], "fulltime");
    assert_eq!(raw[0]["worker"]["username"], "Bobr");
    assert_eq!(raw[0]["vacancies_replied"][0]["title"], "Python программист");
    assert!(raw[0]["vacancies_replied"][0].get("compensation").is_none());

    let typed: Vec<ResumeRelVacanciesRepliedDto> = serde_json::from_slice(&body).unwrap();
    assert_eq!(typed.len(), 9);
    hiring.close().await;
}

#[tokio::test]
async fn healthz_unknown_routes_and_cors() {
    let db = TempDb::new("http_misc");
    let (app, hiring) = app(&db).await;

    let (status, body) = get(app.clone(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, _) = get(app.clone(), "/vacancies").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    hiring.close().await;
}
