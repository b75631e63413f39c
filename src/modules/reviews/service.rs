//! Guarded review operations.
//!
//! Every mutating operation takes the authenticated principal explicitly,
//! checks uniqueness/ownership before touching storage, and ends by asking
//! the book catalog to recompute the affected book's cached average —
//! including on delete, so the average never goes stale.

use std::sync::Arc;

use validator::Validate;

use bookshelf_http::AppError;
use bookshelf_store::{NewReview, ReviewPatch, ReviewRecord, ReviewRepository};

use crate::modules::books::service::BookCatalog;
use crate::modules::store_error;

use super::models::{CreateReviewRequest, UpdateReviewRequest};

/// Fixed message surfaced when a user reviews the same book twice.
pub const DUPLICATE_REVIEW_MESSAGE: &str = "You have already reviewed this book.";

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    catalog: Arc<BookCatalog>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, catalog: Arc<BookCatalog>) -> Self {
        Self { reviews, catalog }
    }

    /// Create a review on behalf of `principal`.
    pub async fn create(
        &self,
        principal: i64,
        request: CreateReviewRequest,
    ) -> Result<ReviewRecord, AppError> {
        request.validate()?;
        self.catalog.get(request.book_id).await?;

        let already_reviewed = self
            .reviews
            .find_review(request.book_id, principal)
            .await
            .map_err(store_error)?
            .is_some();
        if already_reviewed {
            return Err(AppError::bad_request(DUPLICATE_REVIEW_MESSAGE));
        }

        let record = self
            .reviews
            .create_review(NewReview {
                book_id: request.book_id,
                reviewer_id: principal,
                rating: request.rating,
                comment: request.comment,
            })
            .await
            .map_err(store_error)?;

        self.catalog.recompute_average(record.book_id).await?;
        Ok(record)
    }

    /// Update a review; only its reviewer may do so.
    pub async fn update(
        &self,
        principal: i64,
        id: i64,
        request: UpdateReviewRequest,
    ) -> Result<ReviewRecord, AppError> {
        let existing = self.reviews.get_review(id).await.map_err(store_error)?;
        if existing.reviewer_id != principal {
            return Err(AppError::forbidden(
                "You do not have permission to edit this review.",
            ));
        }
        request.validate()?;

        let updated = self
            .reviews
            .update_review(
                id,
                ReviewPatch {
                    rating: request.rating,
                    comment: request.comment,
                },
            )
            .await
            .map_err(store_error)?;

        self.catalog.recompute_average(updated.book_id).await?;
        Ok(updated)
    }

    /// Delete a review; only its reviewer may do so.
    pub async fn delete(&self, principal: i64, id: i64) -> Result<(), AppError> {
        let existing = self.reviews.get_review(id).await.map_err(store_error)?;
        if existing.reviewer_id != principal {
            return Err(AppError::forbidden(
                "You do not have permission to delete this review.",
            ));
        }

        let removed = self.reviews.delete_review(id).await.map_err(store_error)?;
        self.catalog.recompute_average(removed.book_id).await?;
        Ok(())
    }

    /// Fetch a single review.
    pub async fn get(&self, id: i64) -> Result<ReviewRecord, AppError> {
        self.reviews.get_review(id).await.map_err(store_error)
    }

    /// List reviews in insertion order, optionally filtered to one book.
    pub async fn list(&self, book_id: Option<i64>) -> Result<Vec<ReviewRecord>, AppError> {
        self.reviews.list_reviews(book_id).await.map_err(store_error)
    }

    /// Book-scoped listing: 404 when the book itself is unknown.
    pub async fn list_for_book(&self, book_id: i64) -> Result<Vec<ReviewRecord>, AppError> {
        self.catalog.get(book_id).await?;
        self.list(Some(book_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_store::{MemoryStore, NewBook};
    use time::macros::date;

    struct Fixture {
        catalog: Arc<BookCatalog>,
        service: ReviewService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(BookCatalog::new(store.clone(), store.clone()));
        let service = ReviewService::new(store, catalog.clone());
        Fixture { catalog, service }
    }

    async fn add_book(fixture: &Fixture) -> i64 {
        fixture
            .catalog
            .add(NewBook {
                title: "Test Book".to_string(),
                author: "Test Author".to_string(),
                publishing_date: date!(2024 - 01 - 01),
                category: "Fiction".to_string(),
                url: "http://test.com".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn create_request(book_id: i64, rating: i64, comment: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            book_id,
            rating,
            comment: comment.to_string(),
        }
    }

    async fn average(fixture: &Fixture, book_id: i64) -> String {
        fixture
            .catalog
            .get(book_id)
            .await
            .unwrap()
            .average_rating
            .to_string()
    }

    #[tokio::test]
    async fn create_sets_reviewer_and_updates_average() {
        let fx = fixture();
        let book_id = add_book(&fx).await;

        let review = fx
            .service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();

        assert_eq!(review.reviewer_id, 1);
        assert_eq!(average(&fx, book_id).await, "4.00");
    }

    #[tokio::test]
    async fn second_review_updates_average_to_midpoint() {
        let fx = fixture();
        let book_id = add_book(&fx).await;

        fx.service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();
        fx.service
            .create(2, create_request(book_id, 5, "Excellent read!"))
            .await
            .unwrap();

        assert_eq!(average(&fx, book_id).await, "4.50");
    }

    #[tokio::test]
    async fn duplicate_review_is_rejected_with_fixed_message() {
        let fx = fixture();
        let book_id = add_book(&fx).await;

        fx.service
            .create(1, create_request(book_id, 5, "Great book!"))
            .await
            .unwrap();

        let err = fx
            .service
            .create(1, create_request(book_id, 4, "Good read!"))
            .await
            .unwrap_err();

        match err {
            AppError::BadRequest { message, .. } => {
                assert_eq!(message, DUPLICATE_REVIEW_MESSAGE);
            }
            other => panic!("Expected BadRequest, got {other:?}"),
        }

        assert_eq!(fx.service.list(Some(book_id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_a_validation_error() {
        let fx = fixture();
        let book_id = add_book(&fx).await;

        let err = fx
            .service
            .create(1, create_request(book_id, 6, "Too high rating!"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        // Validation failed before persistence, so the average is untouched.
        assert_eq!(average(&fx, book_id).await, "0.00");
        assert!(fx.service.list(Some(book_id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn review_for_unknown_book_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .create(1, create_request(42, 4, "Good book!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn only_the_owner_may_update() {
        let fx = fixture();
        let book_id = add_book(&fx).await;
        let review = fx
            .service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();

        let err = fx
            .service
            .update(
                2,
                review.id,
                UpdateReviewRequest {
                    rating: Some(5),
                    comment: Some("Not my review!".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        // Content unchanged.
        let unchanged = fx.service.get(review.id).await.unwrap();
        assert_eq!(unchanged.rating, 4);
        assert_eq!(unchanged.comment, "Good book!");
    }

    #[tokio::test]
    async fn owner_update_recomputes_the_average() {
        let fx = fixture();
        let book_id = add_book(&fx).await;
        let review = fx
            .service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();
        fx.service
            .create(2, create_request(book_id, 5, "Excellent read!"))
            .await
            .unwrap();

        fx.service
            .update(
                1,
                review.id,
                UpdateReviewRequest {
                    rating: Some(2),
                    comment: None,
                },
            )
            .await
            .unwrap();

        // (2 + 5) / 2
        assert_eq!(average(&fx, book_id).await, "3.50");
    }

    #[tokio::test]
    async fn only_the_owner_may_delete() {
        let fx = fixture();
        let book_id = add_book(&fx).await;
        let review = fx
            .service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();

        let err = fx.service.delete(2, review.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
        assert!(fx.service.get(review.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_recomputes_the_average() {
        let fx = fixture();
        let book_id = add_book(&fx).await;
        fx.service
            .create(1, create_request(book_id, 4, "Good book!"))
            .await
            .unwrap();
        let second = fx
            .service
            .create(2, create_request(book_id, 5, "Excellent read!"))
            .await
            .unwrap();
        assert_eq!(average(&fx, book_id).await, "4.50");

        fx.service.delete(2, second.id).await.unwrap();
        assert_eq!(average(&fx, book_id).await, "4.00");
    }

    #[tokio::test]
    async fn deleting_the_last_review_resets_the_average() {
        let fx = fixture();
        let book_id = add_book(&fx).await;
        let review = fx
            .service
            .create(1, create_request(book_id, 5, "Great book!"))
            .await
            .unwrap();

        fx.service.delete(1, review.id).await.unwrap();
        assert_eq!(average(&fx, book_id).await, "0.00");
    }

    #[tokio::test]
    async fn missing_review_is_not_found_for_update_and_delete() {
        let fx = fixture();

        assert!(matches!(
            fx.service
                .update(1, 42, UpdateReviewRequest::default())
                .await
                .unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            fx.service.delete(1, 42).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn listing_filters_by_book_and_preserves_order() {
        let fx = fixture();
        let first_book = add_book(&fx).await;
        let second_book = add_book(&fx).await;

        fx.service
            .create(1, create_request(first_book, 4, "Good book!"))
            .await
            .unwrap();
        fx.service
            .create(1, create_request(second_book, 3, "Fine."))
            .await
            .unwrap();
        fx.service
            .create(2, create_request(first_book, 5, "Excellent book!"))
            .await
            .unwrap();

        let all = fx.service.list(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let comments: Vec<String> = fx
            .service
            .list(Some(first_book))
            .await
            .unwrap()
            .into_iter()
            .map(|review| review.comment)
            .collect();
        assert_eq!(comments, ["Good book!", "Excellent book!"]);
    }

    #[tokio::test]
    async fn book_scoped_listing_requires_the_book() {
        let fx = fixture();
        assert!(matches!(
            fx.service.list_for_book(42).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
