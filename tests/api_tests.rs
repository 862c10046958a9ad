use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use cinelog::{AppState, db, omdb::PosterLookup, routes, store::MovieStore};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct StubPosters {
    poster: Option<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl PosterLookup for StubPosters {
    async fn resolve_poster(&self, _title: &str, _year: Option<i32>) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.poster.clone()
    }
}

async fn spawn_app(poster: Option<&str>) -> (Router, Arc<StubPosters>) {
    let db = db::connect_and_migrate("sqlite::memory:")
        .await
        .expect("failed to set up in-memory database");

    let posters =
        Arc::new(StubPosters { poster: poster.map(String::from), calls: AtomicUsize::new(0) });

    let state = Arc::new(AppState { store: MovieStore::new(db), posters: posters.clone() });
    (routes::router(state), posters)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn create_movie_returns_enriched_movie() {
    let (app, posters) = spawn_app(Some("http://img/inception.jpg")).await;

    let response = app
        .oneshot(post_json("/api/movies", json!({"title": "Inception", "year": 2010})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"id": 1, "title": "Inception", "year": 2010, "image_url": "http://img/inception.jpg"})
    );
    assert_eq!(posters.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_movie_without_year_stores_null() {
    let (app, _) = spawn_app(None).await;

    let response = app.oneshot(post_json("/api/movies", json!({"title": "Pi"}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"id": 1, "title": "Pi", "year": null, "image_url": null})
    );
}

#[tokio::test]
async fn missing_title_rejects_before_any_lookup() {
    let (app, posters) = spawn_app(Some("http://img/unused.jpg")).await;

    let response = app.clone().oneshot(post_json("/api/movies", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "title is required"}));

    let response =
        app.oneshot(post_json("/api/movies", json!({"title": "", "year": 2020}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(posters.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn movies_list_in_creation_order() {
    let (app, _) = spawn_app(None).await;

    for title in ["First", "Second", "Third"] {
        let response =
            app.clone().oneshot(post_json("/api/movies", json!({"title": title}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let movies = body_json(response).await;
    let ids: Vec<i64> = movies
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    let titles: Vec<&str> = movies
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn create_and_list_reviews() {
    let (app, _) = spawn_app(None).await;

    app.clone().oneshot(post_json("/api/movies", json!({"title": "Inception"}))).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/movies/1/review", json!({"review_text": "Great", "rating": 5})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"id": 1, "movie_id": 1, "review_text": "Great", "rating": 5})
    );

    let response = app.oneshot(get("/api/movies/1/reviews")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reviews = body_json(response).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["review_text"], "Great");
}

#[tokio::test]
async fn reviews_for_unknown_movie_read_empty() {
    let (app, _) = spawn_app(None).await;

    let response = app.oneshot(get("/api/movies/999/reviews")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn review_for_unknown_movie_fails_and_writes_nothing() {
    let (app, _) = spawn_app(None).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/movies/999/review", json!({"review_text": "x", "rating": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"error": "internal server error"}));

    let response = app.oneshot(get("/api/movies/999/reviews")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn review_requires_text_and_rating() {
    let (app, _) = spawn_app(None).await;

    app.clone().oneshot(post_json("/api/movies", json!({"title": "Inception"}))).await.unwrap();

    for body in [
        json!({}),
        json!({"review_text": "Great"}),
        json!({"rating": 5}),
        json!({"review_text": "", "rating": 5}),
        json!({"review_text": "Great", "rating": 0}),
    ] {
        let response =
            app.clone().oneshot(post_json("/api/movies/1/review", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "review_text and rating required"})
        );
    }

    let response = app.oneshot(get("/api/movies/1/reviews")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn rating_range_is_not_enforced() {
    let (app, _) = spawn_app(None).await;

    app.clone().oneshot(post_json("/api/movies", json!({"title": "Inception"}))).await.unwrap();

    let response = app
        .oneshot(post_json("/api/movies/1/review", json!({"review_text": "weird", "rating": 9})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 9);
}

#[tokio::test]
async fn non_integer_id_rejects_before_store_access() {
    let (app, _) = spawn_app(None).await;

    let response = app.clone().oneshot(get("/api/movies/abc/reviews")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "invalid id"}));

    let response = app
        .oneshot(post_json("/api/movies/abc/review", json!({"review_text": "x", "rating": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "invalid id"}));
}

#[tokio::test]
async fn admin_report_renders_placeholders() {
    let (app, _) = spawn_app(None).await;

    app.clone().oneshot(post_json("/api/movies", json!({"title": "Inception"}))).await.unwrap();

    let response = app.oneshot(get("/admin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Inception"));
    assert!(html.contains("(N/A)"));
    assert!(html.contains("No Image"));
    assert!(html.contains("No reviews yet."));
}

#[tokio::test]
async fn admin_report_renders_reviews_with_stars() {
    let (app, _) = spawn_app(Some("http://img/inception.jpg")).await;

    app.clone()
        .oneshot(post_json("/api/movies", json!({"title": "Inception", "year": 2010})))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/api/movies/1/review", json!({"review_text": "Great", "rating": 5})))
        .await
        .unwrap();

    let response = app.oneshot(get("/admin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("(2010)"));
    assert!(html.contains("http://img/inception.jpg"));
    assert!(html.contains("★★★★★ 5/5"));
    assert!(html.contains("Great"));
    assert!(!html.contains("No reviews yet."));
}
