//! Offset pagination over in-memory listings

use serde::Serialize;

use crate::application::config::AffiliateConfig;

/// Normalized page request; `page` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Missing or zero values fall back to page 1 and the default size;
    /// the size is capped at `max_page_size`
    pub fn new(page: Option<u32>, limit: Option<u32>, config: &AffiliateConfig) -> Self {
        let limit = match limit {
            Some(0) | None => config.default_page_size,
            Some(limit) => limit,
        };
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.clamp(1, config.max_page_size.max(1)),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cut the requested page out of a full listing
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.limit as usize)
            .collect();
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
        }
    }

    /// `ceil(total / limit)`; zero for an empty listing
    pub fn total_pages(&self) -> u32 {
        self.total.div_ceil(self.limit.max(1) as usize) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::new(page, limit, &AffiliateConfig::default())
    }

    #[test]
    fn test_request_normalization() {
        assert_eq!(request(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(request(Some(0), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(request(Some(3), Some(500)), PageRequest { page: 3, limit: 100 });
        assert_eq!(request(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_slice_middle_page() {
        let page = Page::slice((1..=25).collect::<Vec<_>>(), request(Some(2), Some(10)));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_slice_last_and_past_end() {
        let last = Page::slice((1..=25).collect::<Vec<_>>(), request(Some(3), Some(10)));
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next());

        let past = Page::slice((1..=25).collect::<Vec<_>>(), request(Some(9), Some(10)));
        assert!(past.items.is_empty());
        assert!(!past.has_next());
        assert!(past.has_prev());
    }

    #[test]
    fn test_empty_listing() {
        let page = Page::<u8>::slice(Vec::new(), request(None, None));
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }
}
