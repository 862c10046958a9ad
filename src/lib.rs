pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod omdb;
pub mod routes;
pub mod store;
pub mod templates;

use std::sync::Arc;

use crate::{omdb::PosterLookup, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub store: MovieStore,
    pub posters: Arc<dyn PosterLookup>,
}
