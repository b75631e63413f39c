//! Storage layer for the Bookshelf service.
//!
//! Entities are plain records; persistence goes through the narrow
//! repository traits below, each call returning a record or a typed
//! [`StoreError`]. The traits keep the rest of the system independent of
//! the storage engine; [`MemoryStore`] is the engine used here, and it is
//! the layer that owns the `(book, reviewer)` uniqueness constraint and the
//! cascade-delete of reviews with their book.

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

pub mod memory;

pub use memory::MemoryStore;

/// A catalogued book with its cached average rating.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publishing_date: Date,
    pub category: String,
    pub url: String,
    /// Derived from the book's reviews; only the rating aggregator writes it.
    pub average_rating: Decimal,
    pub created_at: OffsetDateTime,
}

/// Fields required to catalogue a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publishing_date: Date,
    pub category: String,
    pub url: String,
}

/// A single user's review of a single book.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_id: i64,
    pub rating: i64,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

/// Fields required to persist a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub book_id: i64,
    pub reviewer_id: i64,
    pub rating: i64,
    pub comment: String,
}

/// Partial update applied to an existing review.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// A registered account. `password_hash` is a PHC string and never leaves
/// the auth module.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Fields required to persist a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Typed failures surfaced by the storage layer.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("book {0} not found")]
    BookNotFound(i64),

    #[error("review {0} not found")]
    ReviewNotFound(i64),

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("user {0} has already reviewed book {1}")]
    DuplicateReview(i64, i64),

    #[error("username {0} is already taken")]
    DuplicateUsername(String),
}

/// Durable create/read/update/delete for books.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Adds a book to the catalog, returning the stored record with its id
    async fn create_book(&self, book: NewBook) -> Result<BookRecord, StoreError>;

    /// Retrieves a single book
    async fn get_book(&self, id: i64) -> Result<BookRecord, StoreError>;

    /// Lists all books in insertion order
    async fn list_books(&self) -> Result<Vec<BookRecord>, StoreError>;

    /// Overwrites the cached average rating of a book
    async fn set_average_rating(&self, id: i64, rating: Decimal) -> Result<(), StoreError>;

    /// Removes a book and, by cascade, all of its reviews
    async fn delete_book(&self, id: i64) -> Result<(), StoreError>;
}

/// Durable create/read/update/delete for reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persists a review; the `(book, reviewer)` pair must be unique
    async fn create_review(&self, review: NewReview) -> Result<ReviewRecord, StoreError>;

    /// Retrieves a single review
    async fn get_review(&self, id: i64) -> Result<ReviewRecord, StoreError>;

    /// Lists reviews in insertion order, optionally filtered to one book
    async fn list_reviews(&self, book_id: Option<i64>) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Looks up the review a user left on a book, if any
    async fn find_review(
        &self,
        book_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<ReviewRecord>, StoreError>;

    /// Applies a partial update and returns the new record
    async fn update_review(&self, id: i64, patch: ReviewPatch) -> Result<ReviewRecord, StoreError>;

    /// Removes a review, returning the removed record
    async fn delete_review(&self, id: i64) -> Result<ReviewRecord, StoreError>;
}

/// Durable storage for registered accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a user; usernames must be unique
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Retrieves a single user
    async fn get_user(&self, id: i64) -> Result<UserRecord, StoreError>;

    /// Looks up a user by username
    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, StoreError>;
}
