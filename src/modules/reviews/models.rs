use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use bookshelf_store::ReviewRecord;

/// A review as returned by the API. `reviewer_id` is always the account
/// that created the review; it is never taken from the request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_id: i64,
    pub rating: i64,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(record: ReviewRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            reviewer_id: record.reviewer_id,
            rating: record.rating,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}

/// Payload for creating a review.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub book_id: i64,
    #[validate(range(min = 1, max = 5, message = "Ensure this value is between 1 and 5."))]
    pub rating: i64,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub comment: String,
}

/// Payload for updating a review; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Ensure this value is between 1 and 5."))]
    pub rating: Option<i64>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub comment: Option<String>,
}
