use axum::http::Uri;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::api::PaginatedDto,
    server::{
        error::Error,
        service::pagination::{Page, PageRequest},
    },
};

pub static PAGE_PARAM: &str = "page";

/// `page` and `limit` query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// One-based page number
    pub page: Option<String>,
    /// Page size, the server default applies when absent or not a positive integer
    pub limit: Option<String>,
}

/// Parses pagination parameters
///
/// `limit` is clamped to `max_size`; an absent or unparsable `limit` uses `default_size`.
///
/// # Returns
/// - `Ok(PageRequest)`: Requested page
/// - `Err(Error::InvalidPage)`: `page` is not a positive integer, or its offset doesn't fit
///   a database offset
pub fn page_request(
    page: Option<&str>,
    limit: Option<&str>,
    default_size: u64,
    max_size: u64,
) -> Result<PageRequest, Error> {
    let number = match page.map(str::trim).filter(|page| !page.is_empty()) {
        None => 1,
        Some(page) => match page.parse::<u64>() {
            Ok(number) if number > 0 => number,
            _ => return Err(Error::InvalidPage(0)),
        },
    };

    let size = limit
        .and_then(|limit| limit.trim().parse::<u64>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(default_size)
        .min(max_size);

    let offset = (number - 1).checked_mul(size);
    if offset.map_or(true, |offset| offset > i64::MAX as u64) {
        return Err(Error::InvalidPage(number));
    }

    Ok(PageRequest::new(number, size))
}

/// Link to another page of the same request, keeping every other query parameter
pub fn page_link(uri: &Uri, number: u64) -> String {
    let mut pairs: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(PAGE_PARAM))
        .collect();

    let page_pair = format!("{}={}", PAGE_PARAM, number);
    if number > 1 {
        pairs.push(&page_pair);
    }

    if pairs.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), pairs.join("&"))
    }
}

/// Renders a service page with `next` and `previous` links relative to `uri`
pub fn paginated<T>(page: Page<T>, uri: &Uri) -> PaginatedDto<T> {
    let next = page.has_next().then(|| page_link(uri, page.number + 1));
    let previous = page.has_previous().then(|| page_link(uri, page.number - 1));

    PaginatedDto {
        count: page.count,
        next,
        previous,
        results: page.items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect defaults for absent parameters
    #[test]
    fn test_page_request_defaults() {
        let request = page_request(None, None, 6, 100).unwrap();

        assert_eq!(request, PageRequest::new(1, 6));
    }

    /// Expect an invalid limit to fall back to the default size
    #[test]
    fn test_page_request_invalid_limit() {
        let request = page_request(Some("2"), Some("lots"), 6, 100).unwrap();

        assert_eq!(request, PageRequest::new(2, 6));
    }

    /// Expect error for a non-numeric or zero page
    #[test]
    fn test_page_request_invalid_page() {
        assert!(matches!(
            page_request(Some("abc"), None, 6, 100),
            Err(Error::InvalidPage(_))
        ));
        assert!(matches!(
            page_request(Some("0"), None, 6, 100),
            Err(Error::InvalidPage(_))
        ));
    }

    /// Expect an oversized limit to be clamped to the maximum page size
    #[test]
    fn test_page_request_clamps_limit() {
        let request = page_request(Some("3"), Some("10000000000000000000"), 6, 100).unwrap();

        assert_eq!(request, PageRequest::new(3, 100));
    }

    /// Expect error for a page whose offset overflows
    #[test]
    fn test_page_request_offset_overflow() {
        assert!(matches!(
            page_request(Some("18446744073709551615"), Some("100"), 6, 100),
            Err(Error::InvalidPage(_))
        ));
    }

    /// Expect the page parameter replaced and other parameters kept
    #[test]
    fn test_page_link() {
        let uri: Uri = "/api/recipes/?tags=lunch&page=2&limit=3".parse().unwrap();

        assert_eq!(page_link(&uri, 3), "/api/recipes/?tags=lunch&limit=3&page=3");
        assert_eq!(page_link(&uri, 1), "/api/recipes/?tags=lunch&limit=3");
    }

    /// Expect links only where neighbouring pages exist
    #[test]
    fn test_paginated_links() {
        let uri: Uri = "/api/users/".parse().unwrap();
        let page = Page::new(PageRequest::new(1, 2), 3, vec!["a", "b"]).unwrap();

        let dto = paginated(page, &uri);

        assert_eq!(dto.count, 3);
        assert_eq!(dto.next.as_deref(), Some("/api/users/?page=2"));
        assert!(dto.previous.is_none());
    }
}
