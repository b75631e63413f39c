//! HTTP routes for reviews: public reads, authenticated writes.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;

use bookshelf_auth::AuthUser;
use bookshelf_http::{paginate, AppError, PageParams, Paginated};

use crate::state::AppState;

use super::models::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .layer(Extension(state.tokens.clone()))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ReviewFilter {
    book_id: Option<i64>,
}

/// List reviews, optionally filtered by book, paginated
async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
    Query(params): Query<PageParams>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Paginated<ReviewResponse>>, AppError> {
    let reviews: Vec<ReviewResponse> = state
        .reviews
        .list(filter.book_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let page = paginate(reviews, &params, &state.pagination, uri.path())?;
    Ok(Json(page))
}

/// Fetch a single review
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.reviews.get(id).await?;
    Ok(Json(review.into()))
}

/// Create a review as the authenticated user
async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let review = state.reviews.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Update a review; only its author may do so
async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.reviews.update(user.id, id, request).await?;
    Ok(Json(review.into()))
}

/// Delete a review; only its author may do so
async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.reviews.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
