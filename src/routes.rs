use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tracing::debug;

use crate::{
    AppState,
    entities::{movie, review},
    error::{AppError, AppResult},
    models::{CreateMovieRequest, CreateReviewRequest, MovieWithReviews},
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/movies", get(list_movies).post(create_movie))
        .route("/api/movies/{id}/reviews", get(list_reviews))
        .route("/api/movies/{id}/review", post(create_review))
        .route("/admin", get(admin_report))
        .with_state(state)
}

async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<movie::Model>>> {
    Ok(Json(state.store.list_movies().await?))
}

async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMovieRequest>,
) -> AppResult<Json<movie::Model>> {
    let title = match req.title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => return Err(AppError::validation("title is required")),
    };

    let image_url = state.posters.resolve_poster(title, req.year).await;
    debug!(title = %title, image_url = ?image_url, "poster lookup finished");

    let created = state.store.insert_movie(title, req.year, image_url).await?;
    Ok(Json(created))
}

async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<review::Model>>> {
    let movie_id = parse_id(&id)?;
    Ok(Json(state.store.list_reviews(movie_id).await?))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<Json<review::Model>> {
    let movie_id = parse_id(&id)?;

    // Presence checks only; the rating range is left to the client.
    let (review_text, rating) = match (req.review_text.as_deref(), req.rating) {
        (Some(text), Some(rating)) if !text.is_empty() && rating != 0 => (text, rating),
        _ => return Err(AppError::validation("review_text and rating required")),
    };

    let created = state.store.insert_review(movie_id, review_text, rating).await?;
    Ok(Json(created))
}

async fn admin_report(State(state): State<Arc<AppState>>) -> Response {
    let result = async {
        let movies = state.store.list_movies().await?;

        // One reviews query per movie, in listing order.
        let mut entries = Vec::with_capacity(movies.len());
        for movie in movies {
            let reviews = state.store.list_reviews(movie.id).await?;
            entries.push(MovieWithReviews { movie, reviews });
        }

        Ok::<_, AppError>(templates::report_page(&entries))
    }
    .await;

    match result {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to build admin report");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(templates::error_page())).into_response()
        },
    }
}

fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse().map_err(|_| AppError::validation("invalid id"))
}
