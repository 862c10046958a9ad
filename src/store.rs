use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    entities::{movie, review},
    error::AppResult,
};

/// Handle over the pooled connection. Cheap to clone; all operations are
/// single statements, ordered reads ascending by id.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list_movies(&self) -> AppResult<Vec<movie::Model>> {
        let movies =
            movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?;
        Ok(movies)
    }

    pub async fn insert_movie(
        &self,
        title: &str,
        year: Option<i32>,
        image_url: Option<String>,
    ) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(title.to_string()),
            year: Set(year),
            image_url: Set(image_url),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_reviews(&self, movie_id: i32) -> AppResult<Vec<review::Model>> {
        let reviews = review::Entity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await?;
        Ok(reviews)
    }

    /// Fails with a persistence error when `movie_id` does not reference an
    /// existing movie (foreign key violation).
    pub async fn insert_review(
        &self,
        movie_id: i32,
        review_text: &str,
        rating: i32,
    ) -> AppResult<review::Model> {
        let model = review::ActiveModel {
            id: Default::default(),
            movie_id: Set(movie_id),
            review_text: Set(review_text.to_string()),
            rating: Set(rating),
        };
        Ok(model.insert(&self.db).await?)
    }
}
