//! Page envelope primitives shared by list endpoints.
//!
//! The city events API paginates list responses with a
//! `{count, next, previous, results}` envelope, while a few endpoints (for
//! example the featured events feed) return bare arrays. [`Listing`] accepts
//! either shape so callers stay agnostic of the server's pagination settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Query parameter carrying the page number in page links.
pub const PAGE_PARAM: &str = "page";

/// Errors raised while reading page links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The link could not be parsed as an absolute URL.
    #[error("invalid page link '{link}': {message}")]
    InvalidLink {
        /// Raw link returned by the server.
        link: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The page parameter is present but is not a positive integer.
    #[error("invalid page number '{value}'")]
    InvalidPageNumber {
        /// Raw parameter value.
        value: String,
    },
}

/// One page of results.
///
/// ## Invariants
/// - `results.len()` never exceeds `count`.
/// - A missing `next` link marks the last page.
///
/// # Examples
/// ```
/// use pagination::Page;
///
/// let page: Page<u32> = serde_json::from_str(
///     r#"{"count": 3, "next": "http://api/events/?page=2", "previous": null, "results": [1, 2]}"#,
/// )
/// .unwrap();
/// assert_eq!(page.next_page().unwrap(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute link to the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Page number referenced by the `next` link.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when the link or its page number is
    /// malformed.
    pub fn next_page(&self) -> Result<Option<u32>, PaginationError> {
        self.next.as_deref().map(link_page_number).transpose()
    }

    /// Page number referenced by the `previous` link.
    ///
    /// The server omits the page parameter when linking back to the first
    /// page, so a link without one resolves to page `1`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when the link or its page number is
    /// malformed.
    pub fn previous_page(&self) -> Result<Option<u32>, PaginationError> {
        self.previous.as_deref().map(link_page_number).transpose()
    }
}

/// Extract the page number carried by an absolute page link.
///
/// Links without a page parameter point at the first page.
///
/// # Errors
///
/// Returns [`PaginationError`] when the link is not an absolute URL or the
/// page parameter is not a positive integer.
pub fn link_page_number(link: &str) -> Result<u32, PaginationError> {
    let url = Url::parse(link).map_err(|error| PaginationError::InvalidLink {
        link: link.to_owned(),
        message: error.to_string(),
    })?;
    let Some((_, value)) = url.query_pairs().find(|(name, _)| name == PAGE_PARAM) else {
        return Ok(1);
    };
    match value.parse::<u32>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(PaginationError::InvalidPageNumber {
            value: value.into_owned(),
        }),
    }
}

/// List response that is either paginated or a bare array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// Paginated envelope.
    Paged(Page<T>),
    /// Unpaginated array.
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    /// Items contained in this listing.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paged(page) => page.results.as_slice(),
            Self::Plain(items) => items.as_slice(),
        }
    }

    /// Consume the listing and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.results,
            Self::Plain(items) => items,
        }
    }

    /// Total number of items the server reports, across pages.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Paged(page) => page.count,
            Self::Plain(items) => u64::try_from(items.len()).unwrap_or(u64::MAX),
        }
    }

    /// Page envelope, when the server paginated the response.
    #[must_use]
    pub const fn page(&self) -> Option<&Page<T>> {
        match self {
            Self::Paged(page) => Some(page),
            Self::Plain(_) => None,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::Plain(Vec::new())
    }
}
