use serde::Deserialize;

use crate::entities::{movie, review};

/// Fields are optional so the handlers own the presence checks and their
/// error bodies, rather than the deserializer.
#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub review_text: Option<String>,
    pub rating: Option<i32>,
}

pub struct MovieWithReviews {
    pub movie: movie::Model,
    pub reviews: Vec<review::Model>,
}
