//! Cursor Pagination
//!
//! Listings are keyed on the monotonically increasing surrogate id of each row
//! and are always presented newest first. A page request carries at most one
//! effective cursor:
//!
//! - no cursor: the newest `per_page` rows;
//! - `after`: rows with `id <= after`, walking towards older rows;
//! - `before`: rows with `id >= before`, walking back towards newer rows.
//!
//! One extra row is fetched beyond `per_page` to detect whether a further page
//! exists in the walking direction.

/// Page size used when the caller supplies none (or a non-positive one).
pub const PER_PAGE_DEFAULT: i64 = 20;

/// Upper bound applied to caller supplied page sizes.
pub const PER_PAGE_MAX: i64 = 50;

/// Normalized pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    per_page: i64,
    before: i64,
    after: i64,
}

impl PageRequest {
    /// Normalize raw pagination parameters.
    ///
    /// Non-positive page sizes fall back to [`PER_PAGE_DEFAULT`], oversized
    /// ones are clamped to [`PER_PAGE_MAX`] and negative cursors are treated
    /// as absent.
    #[must_use]
    pub fn new(per_page: i64, before: i64, after: i64) -> Self {
        let per_page = if per_page <= 0 {
            PER_PAGE_DEFAULT
        } else {
            per_page.min(PER_PAGE_MAX)
        };

        Self {
            per_page,
            before: before.max(0),
            after: after.max(0),
        }
    }

    pub const fn per_page(&self) -> i64 {
        self.per_page
    }

    pub const fn before(&self) -> i64 {
        self.before
    }

    pub const fn after(&self) -> i64 {
        self.after
    }

    /// Number of rows to fetch, one more than the page size.
    pub const fn limit(&self) -> i64 {
        self.per_page + 1
    }

    /// The range query this request resolves to. `after` wins when both
    /// cursors are set.
    pub const fn query(&self) -> PageQuery {
        if self.after > 0 {
            PageQuery::Descending {
                upper: Some(self.after),
            }
        } else if self.before > 0 {
            PageQuery::Ascending { lower: self.before }
        } else {
            PageQuery::Descending { upper: None }
        }
    }

    const fn walk(&self) -> Walk {
        match self.query() {
            PageQuery::Descending { upper: None } => Walk::Initial,
            PageQuery::Descending { upper: Some(_) } => Walk::After,
            PageQuery::Ascending { .. } => Walk::Before,
        }
    }

    fn page_size(&self) -> usize {
        usize::try_from(self.per_page).unwrap_or(usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Range query selected by a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageQuery {
    /// `id <= upper` (or `id > 0` without a bound), ordered by id descending.
    Descending { upper: Option<i64> },

    /// `id >= lower`, ordered by id ascending.
    Ascending { lower: i64 },
}

impl PageQuery {
    /// Lower and upper id bounds as bound SQL parameters.
    ///
    /// Listing statements take `(lower, upper, ascending, limit)` and filter on
    /// `id >= lower AND id <= upper`.
    pub const fn bounds(&self) -> (i64, i64, bool) {
        match *self {
            Self::Descending { upper } => (
                1,
                match upper {
                    Some(upper) => upper,
                    None => i64::MAX,
                },
                false,
            ),
            Self::Ascending { lower } => (lower, i64::MAX, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Initial,
    After,
    Before,
}

/// Rows that can be paginated by their surrogate id.
pub trait Cursor {
    fn cursor(&self) -> i64;
}

/// Boundary ids for the neighbouring pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursors {
    /// Pass as `before` to fetch the newer neighbour.
    pub before: Option<i64>,

    /// Pass as `after` to fetch the older neighbour.
    pub after: Option<i64>,
}

/// A page of rows in descending id order plus its cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub cursors: Cursors,
}

impl<T> Page<T> {
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            cursors: self.cursors,
        }
    }
}

/// Trim the overflow row from a fetched result and compute its cursors.
///
/// `rows` must be ordered the way [`PageRequest::query`] prescribes:
/// descending for the initial load and `after` walks, ascending for `before`
/// walks.
#[must_use]
pub fn paginate<T: Cursor>(request: &PageRequest, mut rows: Vec<T>) -> Page<T> {
    let per_page = request.page_size();
    let overflow = rows.len() > per_page;
    let mut cursors = Cursors::default();

    match request.walk() {
        walk @ (Walk::Initial | Walk::After) => {
            if overflow {
                cursors.after = rows.get(per_page).map(Cursor::cursor);
                rows.truncate(per_page);
            }

            if walk == Walk::After {
                cursors.before = rows.first().map(|row| row.cursor().saturating_add(1));
            }
        }
        Walk::Before => {
            rows.truncate(per_page);
            rows.reverse();

            cursors.after = rows
                .last()
                .map(|row| row.cursor().saturating_sub(1))
                .filter(|after| *after > 0);

            if overflow {
                cursors.before = rows.first().map(|row| row.cursor().saturating_add(1));
            }
        }
    }

    Page { rows, cursors }
}
