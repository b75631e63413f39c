use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use bookshelf_store::BookRecord;

/// A catalogued book as returned by the API.
///
/// `average_rating` serializes as a 2-decimal string ("4.50"), the wire
/// form clients of this API expect.
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publishing_date: Date,
    pub category: String,
    pub url: String,
    pub average_rating: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<BookRecord> for BookResponse {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            publishing_date: record.publishing_date,
            category: record.category,
            url: record.url,
            average_rating: record.average_rating,
            created_at: record.created_at,
        }
    }
}
