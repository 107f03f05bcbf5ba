use crate::server::error::Error;

/// A requested page, `number` is one-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Zero-based page index as used by the repositories
    pub fn index(&self) -> u64 {
        self.number - 1
    }
}

/// One page of results together with the total count across all pages
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub number: u64,
    pub size: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps fetched items, rejecting pages past the end
    ///
    /// The first page is always valid, even for an empty result set.
    ///
    /// # Returns
    /// - `Ok(Page)`: The requested page exists
    /// - `Err(Error::InvalidPage)`: The page number exceeds the number of pages
    pub fn new(request: PageRequest, count: u64, items: Vec<T>) -> Result<Self, Error> {
        let page = Self {
            count,
            number: request.number,
            size: request.size,
            items,
        };

        if page.number > page.num_pages() {
            return Err(Error::InvalidPage(page.number));
        }

        Ok(page)
    }

    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.size).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}
