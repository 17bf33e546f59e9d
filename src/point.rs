//! Positions in a source: points and spans.

use std::fmt;

/// One place in a source: a 1-indexed line/column pair plus a 0-indexed byte
/// offset, attached to every token and signal for diagnostics.
///
/// `offset` is the offset into the *decoded* code point stream, not into the
/// original bytes (those can differ once multi-byte encodings are involved).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Point {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column. Reset to `1` after a line feed; a tab counts as a
    /// single column, per §4.4.
    pub column: usize,
    /// 0-indexed code point offset from the start of input.
    pub offset: usize,
}

impl Point {
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Point {
        Point {
            line,
            column,
            offset,
        }
    }

    /// The point at the very start of a document.
    #[must_use]
    pub fn start() -> Point {
        Point::new(1, 1, 0)
    }

    /// Advance past one code point, accounting for line feeds.
    #[must_use]
    pub fn advance(self, ch: char) -> Point {
        if ch == '\n' {
            Point::new(self.line + 1, 1, self.offset + 1)
        } else {
            Point::new(self.line, self.column + 1, self.offset + 1)
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span between two points, both inclusive-exclusive (`start..end`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

impl Span {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Span {
        Span { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Somewhere a diagnostic or signal applies: either a single point or a span
/// between two. Lives alongside `Point`/`Span` since every consumer of a
/// `Place` already depends on both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Place {
    Point(Point),
    Span(Span),
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Point(point) => write!(f, "{point}"),
            Place::Span(span) => write!(f, "{span}"),
        }
    }
}

impl From<Point> for Place {
    fn from(point: Point) -> Place {
        Place::Point(point)
    }
}

impl From<Span> for Place {
    fn from(span: Span) -> Place {
        Place::Span(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let p = Point::start();
        let p = p.advance('a');
        assert_eq!(p, Point::new(1, 2, 1), "should advance a column");
        let p = p.advance('\n');
        assert_eq!(p, Point::new(2, 1, 2), "should reset column after a line feed");
        let p = p.advance('\t');
        assert_eq!(p, Point::new(2, 2, 3), "should treat tab as width one");
    }
}
