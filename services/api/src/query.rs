//! Movie query engine: free-text filtering and pagination

use common::error::DatabaseResult;

use crate::{models::Movie, repositories::MovieStore};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Predicate over movies built from an optional search text
///
/// A non-empty filter matches a movie when any of title, overview, actors,
/// producers or genre contains the search text, ignoring case. An empty
/// filter matches every movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    search: Option<String>,
}

impl MovieFilter {
    /// Build a filter; blank search text yields the empty filter
    pub fn build(search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self { search }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Evaluate the filter against a movie
    pub fn matches(&self, movie: &Movie) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();

        [
            Some(movie.title.as_str()),
            movie.overview.as_deref(),
            movie.actors.as_deref(),
            movie.producers.as_deref(),
            movie.genre.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// `ILIKE` pattern matching the search text literally anywhere in a column
    pub fn like_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(s)))
    }
}

fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Page window over a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl Pagination {
    /// Number of items before the window
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Resolve page and limit, applying defaults and the page size cap
pub fn paginate(page: Option<u32>, limit: Option<u32>, max_limit: u32) -> Pagination {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max_limit.max(1));

    Pagination { page, limit }
}

/// Number of pages needed for `total` items
pub fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}

/// One page of movies plus the full count under the filter
#[derive(Debug, Clone)]
pub struct MoviePage {
    pub items: Vec<Movie>,
    pub total: u64,
}

/// Fetch the page window and the total count for a filter
pub async fn list(
    store: &dyn MovieStore,
    filter: &MovieFilter,
    pagination: Pagination,
) -> DatabaseResult<MoviePage> {
    let items = store.find(filter, pagination).await?;
    let total = store.count(filter).await?;

    Ok(MoviePage { items, total })
}
