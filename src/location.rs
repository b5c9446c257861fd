use std::fmt::{self, Display};
use std::ops::{Range, RangeBounds};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new_with_extent(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn new_spanning(range: impl RangeBounds<usize>) -> Self {
        use std::ops::Bound;

        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start + 1,
            Bound::Unbounded => 0,
        };

        let end = match range.end_bound() {
            Bound::Included(&end) => end + 1,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => start,
        };

        Self::new_with_extent(start, end.saturating_sub(start))
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn to_range(self) -> Range<usize> {
        self.start..self.end()
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new_spanning(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// A position in a source, captured when a byte or token is read.
///
/// `row` is 1-based. `column` counts the bytes read on the current row, so the
/// first byte of a row is at column 1, and the newline that starts a row is at
/// column 0. `span` is the byte range the location covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: Arc<str>,
    pub row: usize,
    pub column: usize,
    pub span: Span,
}

impl Location {
    pub fn new(path: Arc<str>) -> Self {
        Self {
            path,
            row: 1,
            column: 0,
            span: Span::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extends the location so that its span also covers `other`.
    pub fn through(&self, other: &Location) -> Location {
        Location {
            span: self.span.convex_hull(&other.span),
            ..self.clone()
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.row, self.column)
    }
}

pub trait ConvexHull<Rhs = Self> {
    type Result;

    fn convex_hull(&self, other: &Rhs) -> Self::Result;
}

impl ConvexHull for Span {
    type Result = Span;

    fn convex_hull(&self, other: &Self) -> Self {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());

        Self::new_spanning(start..end)
    }
}

impl ConvexHull<Span> for Location {
    type Result = Location;

    fn convex_hull(&self, other: &Span) -> Location {
        Location {
            span: self.span.convex_hull(other),
            ..self.clone()
        }
    }
}
