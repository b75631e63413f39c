//! In-memory storage engine.
//!
//! Keeps every table in a `BTreeMap` keyed by a monotonically increasing
//! id, so iteration order is insertion order. A single `RwLock` guards the
//! whole store; each repository call holds it for the duration of the call,
//! which is what makes the check-then-write sequences (uniqueness, cascade)
//! atomic with respect to other requests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    BookRecord, BookRepository, NewBook, NewReview, NewUser, ReviewPatch, ReviewRecord,
    ReviewRepository, StoreError, UserRecord, UserRepository,
};

/// In-memory engine implementing all repository traits.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    books: BTreeMap<i64, BookRecord>,
    reviews: BTreeMap<i64, ReviewRecord>,
    users: BTreeMap<i64, UserRecord>,
    next_book_id: i64,
    next_review_id: i64,
    next_user_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn create_book(&self, book: NewBook) -> Result<BookRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.next_book_id);
        let record = BookRecord {
            id,
            title: book.title,
            author: book.author,
            publishing_date: book.publishing_date,
            category: book.category,
            url: book.url,
            average_rating: Decimal::new(0, 2),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.books.insert(id, record.clone());
        Ok(record)
    }

    async fn get_book(&self, id: i64) -> Result<BookRecord, StoreError> {
        let inner = self.inner.read().await;
        inner
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))
    }

    async fn list_books(&self) -> Result<Vec<BookRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.books.values().cloned().collect())
    }

    async fn set_average_rating(&self, id: i64, rating: Decimal) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let book = inner
            .books
            .get_mut(&id)
            .ok_or(StoreError::BookNotFound(id))?;
        book.average_rating = rating;
        Ok(())
    }

    async fn delete_book(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.books.remove(&id).is_none() {
            return Err(StoreError::BookNotFound(id));
        }
        // Reviews do not outlive their book.
        let before = inner.reviews.len();
        inner.reviews.retain(|_, review| review.book_id != id);
        let cascaded = before - inner.reviews.len();
        if cascaded > 0 {
            tracing::debug!(book_id = id, cascaded, "cascade-deleted reviews");
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create_review(&self, review: NewReview) -> Result<ReviewRecord, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.books.contains_key(&review.book_id) {
            return Err(StoreError::BookNotFound(review.book_id));
        }
        let duplicate = inner.reviews.values().any(|existing| {
            existing.book_id == review.book_id && existing.reviewer_id == review.reviewer_id
        });
        if duplicate {
            return Err(StoreError::DuplicateReview(
                review.reviewer_id,
                review.book_id,
            ));
        }

        let id = next_id(&mut inner.next_review_id);
        let record = ReviewRecord {
            id,
            book_id: review.book_id,
            reviewer_id: review.reviewer_id,
            rating: review.rating,
            comment: review.comment,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.reviews.insert(id, record.clone());
        Ok(record)
    }

    async fn get_review(&self, id: i64) -> Result<ReviewRecord, StoreError> {
        let inner = self.inner.read().await;
        inner
            .reviews
            .get(&id)
            .cloned()
            .ok_or(StoreError::ReviewNotFound(id))
    }

    async fn list_reviews(&self, book_id: Option<i64>) -> Result<Vec<ReviewRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .filter(|review| book_id.is_none_or(|book_id| review.book_id == book_id))
            .cloned()
            .collect())
    }

    async fn find_review(
        &self,
        book_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<ReviewRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .find(|review| review.book_id == book_id && review.reviewer_id == reviewer_id)
            .cloned())
    }

    async fn update_review(&self, id: i64, patch: ReviewPatch) -> Result<ReviewRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let review = inner
            .reviews
            .get_mut(&id)
            .ok_or(StoreError::ReviewNotFound(id))?;
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(comment) = patch.comment {
            review.comment = comment;
        }
        Ok(review.clone())
    }

    async fn delete_review(&self, id: i64) -> Result<ReviewRecord, StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .reviews
            .remove(&id)
            .ok_or(StoreError::ReviewNotFound(id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .users
            .values()
            .any(|existing| existing.username == user.username);
        if taken {
            return Err(StoreError::DuplicateUsername(user.username));
        }

        let id = next_id(&mut inner.next_user_id);
        let record = UserRecord {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: i64) -> Result<UserRecord, StoreError> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound(id))
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}
