//! Page/per-page resolution shared by every list endpoint.

use serde::Serialize;

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_PER_PAGE: u64 = 50;

/// Resolved pagination parameters (both always >= 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Resolve raw request values.
    ///
    /// `per_page` is honored only when present and positive, otherwise
    /// [`DEFAULT_PER_PAGE`]. `page` defaults to 1 under the same rule.
    pub fn resolve(page: Option<i64>, per_page: Option<i64>) -> Self {
        let per_page = match per_page {
            Some(n) if n > 0 => n as u64,
            _ => DEFAULT_PER_PAGE,
        };
        let page = match page {
            Some(n) if n > 0 => n as u64,
            _ => 1,
        };
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

/// One page of an ordered collection, in the paginator JSON shape clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    /// 1-based position of the first item on this page (`None` when empty).
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Slice an already ordered collection into the requested page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let last_page = total.div_ceil(request.per_page).max(1);
    let offset = request.offset();

    let data: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(request.per_page).unwrap_or(usize::MAX))
        .collect();

    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(offset + 1), Some(offset + data.len() as u64))
    };

    Page {
        current_page: request.page,
        per_page: request.per_page,
        total,
        last_page,
        from,
        to,
        data,
    }
}
