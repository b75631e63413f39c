//! Book catalog operations and the rating aggregator.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use bookshelf_http::AppError;
use bookshelf_store::{BookRecord, BookRepository, NewBook, ReviewRepository};

use crate::modules::store_error;

/// Read access to the book catalog plus the cached-average maintenance the
/// review operations call into.
pub struct BookCatalog {
    books: Arc<dyn BookRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

/// One entry of the administrative seed file.
#[derive(Debug, Deserialize)]
struct SeedBook {
    title: String,
    author: String,
    publishing_date: Date,
    category: String,
    url: String,
}

impl BookCatalog {
    pub fn new(books: Arc<dyn BookRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { books, reviews }
    }

    /// List all books in catalog order.
    pub async fn list(&self) -> Result<Vec<BookRecord>, AppError> {
        self.books.list_books().await.map_err(store_error)
    }

    /// Fetch a single book.
    pub async fn get(&self, id: i64) -> Result<BookRecord, AppError> {
        self.books.get_book(id).await.map_err(store_error)
    }

    /// Catalogue a new book. Administrative path only; not exposed over HTTP.
    pub async fn add(&self, book: NewBook) -> Result<BookRecord, AppError> {
        self.books.create_book(book).await.map_err(store_error)
    }

    /// Recompute and persist the cached average rating of a book.
    ///
    /// The mean is rescaled to exactly two decimal places with
    /// round-half-to-even; a book with no reviews averages 0.00.
    pub async fn recompute_average(&self, book_id: i64) -> Result<Decimal, AppError> {
        let reviews = self
            .reviews
            .list_reviews(Some(book_id))
            .await
            .map_err(store_error)?;

        let average = if reviews.is_empty() {
            Decimal::new(0, 2)
        } else {
            let total: i64 = reviews.iter().map(|review| review.rating).sum();
            // round_dp rounds half-to-even; rescale then pads to two decimals.
            let mut mean =
                (Decimal::from(total) / Decimal::from(reviews.len() as i64)).round_dp(2);
            mean.rescale(2);
            mean
        };

        self.books
            .set_average_rating(book_id, average)
            .await
            .map_err(store_error)?;

        Ok(average)
    }

    /// Load books from a JSON seed file into the catalog.
    pub async fn seed_from_file(&self, path: &Path) -> anyhow::Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let seeds: Vec<SeedBook> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        let count = seeds.len();
        for seed in seeds {
            self.add(NewBook {
                title: seed.title,
                author: seed.author,
                publishing_date: seed.publishing_date,
                category: seed.category,
                url: seed.url,
            })
            .await?;
        }

        Ok(count)
    }
}
