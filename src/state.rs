//! Shared application state threaded through module routers.

use std::sync::Arc;

use bookshelf_auth::TokenService;
use bookshelf_kernel::settings::{PaginationSettings, Settings};
use bookshelf_store::{BookRepository, MemoryStore, ReviewRepository, UserRepository};

use crate::modules::books::service::BookCatalog;
use crate::modules::reviews::service::ReviewService;

/// Handles to the services and collaborators the modules need.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<BookCatalog>,
    pub reviews: Arc<ReviewService>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<TokenService>,
    pub pagination: PaginationSettings,
}

impl AppState {
    /// Wire services against a fresh in-memory store.
    pub fn from_settings(settings: &Settings) -> Self {
        let store = Arc::new(MemoryStore::new());

        let books: Arc<dyn BookRepository> = store.clone();
        let reviews: Arc<dyn ReviewRepository> = store.clone();
        let users: Arc<dyn UserRepository> = store;

        let catalog = Arc::new(BookCatalog::new(books, reviews.clone()));
        let review_service = Arc::new(ReviewService::new(reviews, catalog.clone()));
        let tokens = Arc::new(TokenService::new(
            &settings.auth.jwt_secret,
            settings.auth.access_ttl_secs,
            settings.auth.refresh_ttl_secs,
        ));

        Self {
            catalog,
            reviews: review_service,
            users,
            tokens,
            pagination: settings.pagination.clone(),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state with default settings for router-level tests.
    pub(crate) fn for_tests() -> Self {
        Self::from_settings(&Settings::default())
    }
}
