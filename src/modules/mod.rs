pub mod auth;
pub mod books;
pub mod reviews;

use bookshelf_http::AppError;
use bookshelf_kernel::ModuleRegistry;
use bookshelf_store::StoreError;

use crate::state::AppState;

/// Register all Bookshelf modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState) {
    registry.register(books::create_module(state));
    registry.register(reviews::create_module(state));
    registry.register(auth::create_module(state));
}

/// Map storage-layer failures onto API errors.
///
/// The duplicate-review mapping is the backstop for the constraint; the
/// review service normally surfaces the same message before storage is hit.
pub(crate) fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::BookNotFound(_)
        | StoreError::ReviewNotFound(_)
        | StoreError::UserNotFound(_) => AppError::not_found("Not found."),
        StoreError::DuplicateReview(..) => {
            AppError::bad_request(reviews::service::DUPLICATE_REVIEW_MESSAGE)
        }
        StoreError::DuplicateUsername(_) => {
            AppError::bad_request("A user with that username already exists.")
        }
    }
}
