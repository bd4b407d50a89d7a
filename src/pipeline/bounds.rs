use std::ops::Range;

use crate::error::{Error, Result};

/// Pages to visit and the record limit of one listing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub start: u32,
    /// Exclusive
    pub end: u32,
    pub limit: Option<usize>,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            start: 0,
            end: 1,
            limit: None,
        }
    }
}

impl PageBounds {
    /// Resolve the paging parameters of a listing request
    ///
    /// `page` selects exactly that page, otherwise pages `0..max_page` are
    /// visited, otherwise page 0 only. At least one parameter must be given.
    pub fn resolve(limit: Option<usize>, page: Option<u32>, max_page: Option<u32>) -> Result<Self> {
        if limit.is_none() && page.is_none() && max_page.is_none() {
            return Err(Error::InvalidRequest(
                "limit, page and max_page can't all be omitted".to_string(),
            ));
        }
        if limit == Some(0) {
            return Err(Error::InvalidRequest("limit must be at least 1".to_string()));
        }
        if max_page == Some(0) {
            return Err(Error::InvalidRequest("max_page must be at least 1".to_string()));
        }

        let (start, end) = match (page, max_page) {
            (Some(page), Some(max_page)) if max_page <= page => {
                return Err(Error::InvalidRequest(format!(
                    "max_page ({}) must be greater than page ({})",
                    max_page, page
                )));
            }
            (Some(page), _) => {
                let end = page.checked_add(1).ok_or_else(|| {
                    Error::InvalidRequest(format!("page {} is out of range", page))
                })?;
                (page, end)
            }
            (None, Some(max_page)) => (0, max_page),
            (None, None) => (0, 1),
        };

        Ok(Self { start, end, limit })
    }

    pub fn pages(&self) -> Range<u32> {
        self.start..self.end
    }

    /// True once `records` reached the limit
    pub fn is_full(&self, records: usize) -> bool {
        self.limit.is_some_and(|limit| records >= limit)
    }
}
