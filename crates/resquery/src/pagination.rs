//! Offset/limit pagination over a filtered, sorted sequence.

use std::ops::Range;

/// Page size used when a request supplies no positive limit.
pub const DEFAULT_LIMIT: usize = 10;

/// The "return everything" pagination.
pub const NO_PAGINATION: Pagination = Pagination::Unrestricted;

/// Which slice of the result set a query asks for.
///
/// The only way to get [`Pagination::Unrestricted`] is to ask for it
/// explicitly; [`Pagination::new`] never produces it, whatever the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pagination {
    /// No restriction: the whole filtered set.
    #[default]
    Unrestricted,
    /// A window of at most `limit` items starting at `offset`.
    Window { limit: usize, offset: usize },
}

impl Pagination {
    /// Builds a window from raw request values.
    ///
    /// Negative offsets clamp to zero. Non-positive limits become
    /// `default_limit`.
    pub fn new(limit: i64, offset: i64, default_limit: usize) -> Self {
        let limit = usize::try_from(limit)
            .ok()
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);
        let offset = usize::try_from(offset).unwrap_or(0);
        Pagination::Window { limit, offset }
    }

    /// Same as [`Pagination::new`] with [`DEFAULT_LIMIT`].
    pub fn with_default_limit(limit: i64, offset: i64) -> Self {
        Pagination::new(limit, offset, DEFAULT_LIMIT)
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Pagination::Unrestricted)
    }

    /// Returns the window size, or `None` when unrestricted.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Pagination::Unrestricted => None,
            Pagination::Window { limit, .. } => Some(*limit),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Pagination::Unrestricted => 0,
            Pagination::Window { offset, .. } => *offset,
        }
    }

    /// Returns the half-open `(start, end)` indices to slice out of `total`
    /// items.
    ///
    /// An offset past the end yields `(0, 0)`, while an offset equal to
    /// `total` yields `(total, total)`. Both are empty, but callers can tell
    /// them apart.
    ///
    /// ```
    /// use resquery::Pagination;
    ///
    /// let page = Pagination::with_default_limit(10, 10);
    /// assert_eq!(page.valid_range(10), (10, 10));
    /// assert_eq!(page.valid_range(5), (0, 0));
    /// assert_eq!(page.valid_range(15), (10, 15));
    /// ```
    pub fn valid_range(&self, total: usize) -> (usize, usize) {
        match *self {
            Pagination::Unrestricted => (0, total),
            Pagination::Window { offset, .. } if offset > total => (0, 0),
            Pagination::Window { limit, offset } => {
                (offset, offset.saturating_add(limit).min(total))
            }
        }
    }

    /// [`Pagination::valid_range`] as a `Range`.
    pub fn range(&self, total: usize) -> Range<usize> {
        let (start, end) = self.valid_range(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(limit: usize, offset: usize) -> Pagination {
        Pagination::Window { limit, offset }
    }

    #[test]
    fn valid_range_table() {
        // (limit, offset, total, start, end)
        let cases = [
            (1, 0, 1, 0, 1),
            (10, 1, 20, 1, 11),
            (1, 1, 1, 1, 1),
            (10, 10, 10, 10, 10),
            (10, 0, 1000, 0, 10),
            (10, 10, 5, 0, 0),
            (3, 5, 7, 5, 7),
        ];
        for (limit, offset, total, start, end) in cases {
            assert_eq!(
                window(limit, offset).valid_range(total),
                (start, end),
                "limit={limit} offset={offset} total={total}"
            );
        }
    }

    #[test]
    fn non_positive_limit_uses_default_not_unlimited() {
        let page = Pagination::with_default_limit(-1, 0);
        assert_eq!(page, window(DEFAULT_LIMIT, 0));
        assert_eq!(page.valid_range(1000), (0, 10));

        assert_eq!(Pagination::new(0, 0, 25), window(25, 0));
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        assert_eq!(Pagination::with_default_limit(-1, -1), window(DEFAULT_LIMIT, 0));
        assert_eq!(Pagination::with_default_limit(10, 10), window(10, 10));
    }

    #[test]
    fn over_range_offset_with_default_limit() {
        assert_eq!(Pagination::with_default_limit(-1, 10).valid_range(5), (0, 0));
    }

    #[test]
    fn unrestricted_returns_everything() {
        assert_eq!(NO_PAGINATION.valid_range(0), (0, 0));
        assert_eq!(NO_PAGINATION.valid_range(42), (0, 42));
        assert!(NO_PAGINATION.is_unrestricted());
        assert_eq!(NO_PAGINATION.limit(), None);
        assert_eq!(NO_PAGINATION.offset(), 0);
    }

    #[test]
    fn huge_limit_does_not_overflow() {
        assert_eq!(window(usize::MAX, 3).valid_range(10), (3, 10));
    }

    #[test]
    fn range_matches_tuple() {
        assert_eq!(window(5, 2).range(4), 2..4);
    }
}
