//! Pagination controls for list pages.

use serde::Deserialize;

use crate::backend::types::Page;

/// `?page=` query accepted by list pages. Zero-based, matching the backend.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
}

/// Previous/next links under a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pager {
    /// One-based page number for display.
    pub current: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    /// Extra `&key=value` pairs carried by the page links.
    pub query: String,
}

impl Pager {
    /// Build controls from a backend page envelope.
    #[must_use]
    pub fn from_page<T>(page: &Page<T>) -> Self {
        let total_pages = page.total_pages.max(1);
        Self {
            current: page.number + 1,
            total_pages,
            total_elements: page.total_elements,
            prev: page.number.checked_sub(1),
            next: (page.number + 1 < page.total_pages).then_some(page.number + 1),
            query: String::new(),
        }
    }

    /// Carry `pairs` along on the previous/next links.
    #[must_use]
    pub fn with_query(mut self, pairs: &[(&str, &str)]) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.query = if encoded.is_empty() {
            encoded
        } else {
            format!("&{encoded}")
        };
        self
    }

    /// Returns `true` if there is more than one page.
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, total_pages: u32) -> Page<()> {
        Page {
            content: vec![],
            total_elements: u64::from(total_pages) * 10,
            total_pages,
            number,
            size: 10,
        }
    }

    #[test]
    fn test_first_page() {
        let pager = Pager::from_page(&page(0, 3));
        assert_eq!(pager.current, 1);
        assert_eq!(pager.prev, None);
        assert_eq!(pager.next, Some(1));
        assert!(pager.is_paged());
    }

    #[test]
    fn test_last_page() {
        let pager = Pager::from_page(&page(2, 3));
        assert_eq!(pager.prev, Some(1));
        assert_eq!(pager.next, None);
    }

    #[test]
    fn test_links_keep_filters() {
        let pager = Pager::from_page(&page(0, 3)).with_query(&[("title", "war & peace")]);
        assert_eq!(pager.query, "&title=war+%26+peace");
        assert_eq!(Pager::from_page(&page(0, 3)).with_query(&[]).query, "");
    }

    #[test]
    fn test_empty_result() {
        let pager = Pager::from_page(&page(0, 0));
        assert_eq!(pager.total_pages, 1);
        assert_eq!(pager.next, None);
        assert!(!pager.is_paged());
    }
}
