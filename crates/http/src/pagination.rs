//! Page-number pagination for collection endpoints.
//!
//! Every list endpoint accepts `page` and `page_size` query parameters and
//! responds with the same envelope: `links` to the adjacent pages, the
//! `total_count` across all pages, the effective `page_size`, and the
//! `results` slice. `page_size` is clamped to the configured maximum; a page
//! past the end of the collection is a not-found error, matching the
//! paginator this API grew up with.

use serde::{Deserialize, Serialize};

use bookshelf_kernel::settings::PaginationSettings;

use crate::error::AppError;

/// Raw pagination query parameters as supplied by the client.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
}

/// Links to the neighboring pages, `null` at either end of the collection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Response envelope shared by all paginated endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub links: PageLinks,
    pub total_count: usize,
    pub page_size: usize,
    pub results: Vec<T>,
}

/// Slice `items` according to `params` and build the response envelope.
///
/// `path` is the request path used to render the `next`/`previous` links.
/// Returns a not-found error for page zero or a page past the last one;
/// page 1 of an empty collection is valid and empty.
pub fn paginate<T>(
    items: Vec<T>,
    params: &PageParams,
    limits: &PaginationSettings,
    path: &str,
) -> Result<Paginated<T>, AppError> {
    let page_size = params
        .page_size
        .filter(|size| *size > 0)
        .unwrap_or(limits.default_page_size)
        .min(limits.max_page_size) as usize;

    let page = params.page.unwrap_or(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size).max(1) as u64;

    if page == 0 || page > total_pages {
        return Err(AppError::not_found("Invalid page."));
    }

    let start = (page as usize - 1) * page_size;
    let results: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    let link = |target: u64| format!("{path}?page={target}&page_size={page_size}");
    let links = PageLinks {
        next: (page < total_pages).then(|| link(page + 1)),
        previous: (page > 1).then(|| link(page - 1)),
    };

    Ok(Paginated {
        links,
        total_count,
        page_size,
        results,
    })
}
