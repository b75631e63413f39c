//! HTTP routes for the book catalog. Read-only: books enter the catalog
//! through administrative seeding, not this API.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    routing::get,
    Json, Router,
};

use bookshelf_http::{paginate, AppError, PageParams, Paginated};

use crate::modules::reviews::models::ReviewResponse;
use crate::state::AppState;

use super::models::BookResponse;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/{id}", get(get_book))
        .route("/{id}/reviews", get(list_book_reviews))
        .with_state(state)
}

/// List books, paginated
async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Paginated<BookResponse>>, AppError> {
    let books: Vec<BookResponse> = state
        .catalog
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let page = paginate(books, &params, &state.pagination, uri.path())?;
    Ok(Json(page))
}

/// Fetch a single book
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookResponse>, AppError> {
    let book = state.catalog.get(id).await?;
    Ok(Json(book.into()))
}

/// List the reviews of one book, paginated; 404 when the book is unknown
async fn list_book_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Paginated<ReviewResponse>>, AppError> {
    let reviews: Vec<ReviewResponse> = state
        .reviews
        .list_for_book(id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let page = paginate(reviews, &params, &state.pagination, uri.path())?;
    Ok(Json(page))
}
