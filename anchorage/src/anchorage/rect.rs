//! Axis-aligned rectangles on the anchorage grid.
use enumflags2::BitFlags;

use crate::anchorage::{AnchorageSize, Coordinate, Dimensions};

/// Edges of the anchorage a placement can cross.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Edge {
    /// `x < 0`.
    Left = 0b0001,
    /// `y < 0`.
    Top = 0b0010,
    /// `x + width > anchorage width`.
    Right = 0b0100,
    /// `y + height > anchorage height`.
    Bottom = 0b1000,
}

/// A rectangle given by its top-left cell and its [`Dimensions`].
///
/// Extents are computed in `i64`, so no combination of `i32` origin and `u32` size can
/// overflow.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rect {
    origin: Coordinate,
    dimensions: Dimensions,
}

impl Rect {
    /// Construct a [`Rect`] from its origin and size.
    pub fn new(origin: Coordinate, dimensions: Dimensions) -> Self {
        Self { origin, dimensions }
    }

    /// Top-left cell.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Size of the rectangle.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// First column covered.
    pub fn left(&self) -> i64 {
        i64::from(self.origin.x)
    }

    /// First row covered.
    pub fn top(&self) -> i64 {
        i64::from(self.origin.y)
    }

    /// One past the last column covered.
    pub fn right(&self) -> i64 {
        self.left() + i64::from(self.dimensions.width())
    }

    /// One past the last row covered.
    pub fn bottom(&self) -> i64 {
        self.top() + i64::from(self.dimensions.height())
    }

    /// Returns true if the two rectangles share a region of non-zero area.
    ///
    /// Rectangles are separate iff one lies entirely to the left of, right of, above or
    /// below the other. Rectangles that only touch along an edge or at a corner do not
    /// collide.
    pub fn collides(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }

    /// Get the set of anchorage edges this rectangle crosses. Empty if the rectangle lies
    /// fully inside. A rectangle ending exactly on the far edge is inside.
    pub fn crossed_edges(&self, bounds: AnchorageSize) -> BitFlags<Edge> {
        let mut edges = BitFlags::empty();
        if self.left() < 0 {
            edges.insert(Edge::Left);
        }
        if self.top() < 0 {
            edges.insert(Edge::Top);
        }
        if self.right() > i64::from(bounds.width()) {
            edges.insert(Edge::Right);
        }
        if self.bottom() > i64::from(bounds.height()) {
            edges.insert(Edge::Bottom);
        }
        edges
    }

    /// Returns true if the rectangle lies fully inside the anchorage.
    pub fn within(&self, bounds: AnchorageSize) -> bool {
        self.crossed_edges(bounds).is_empty()
    }

    /// Returns true if the given cell is covered by this rectangle.
    pub fn contains(&self, coord: Coordinate) -> bool {
        let (x, y) = (i64::from(coord.x), i64::from(coord.y));
        self.left() <= x && x < self.right() && self.top() <= y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect::new(Coordinate::new(x, y), Dimensions::new(w, h))
    }

    #[test]
    fn overlapping_rects_collide_both_ways() {
        let a = rect(2, 2, 4, 4);
        let b = rect(3, 3, 3, 3);
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn touching_rects_do_not_collide() {
        let a = rect(0, 0, 3, 3);
        // Shares the x = 3 edge.
        assert!(!a.collides(&rect(3, 0, 3, 3)));
        // Shares the y = 3 edge.
        assert!(!a.collides(&rect(0, 3, 3, 3)));
        // Corner only.
        assert!(!a.collides(&rect(3, 3, 1, 1)));
    }

    #[test]
    fn contained_rect_collides() {
        let outer = rect(0, 0, 10, 10);
        let inner = rect(4, 4, 1, 1);
        assert!(outer.collides(&inner));
        assert!(inner.collides(&outer));
    }

    #[test]
    fn collision_is_symmetric_over_a_sweep() {
        let fixed = rect(4, 4, 3, 2);
        for x in 0..10 {
            for y in 0..10 {
                for &(w, h) in &[(1, 1), (2, 3), (4, 1)] {
                    let other = rect(x, y, w, h);
                    assert_eq!(fixed.collides(&other), other.collides(&fixed));
                }
            }
        }
    }

    #[test]
    fn crossed_edges_reports_every_edge() {
        let bounds = AnchorageSize::new(10, 10);
        assert!(rect(7, 6, 3, 4).within(bounds));
        assert_eq!(rect(-1, 0, 3, 3).crossed_edges(bounds), BitFlags::from(Edge::Left));
        assert_eq!(rect(0, -2, 3, 3).crossed_edges(bounds), BitFlags::from(Edge::Top));
        assert_eq!(rect(8, 0, 3, 3).crossed_edges(bounds), BitFlags::from(Edge::Right));
        assert_eq!(rect(0, 8, 3, 3).crossed_edges(bounds), BitFlags::from(Edge::Bottom));
        assert_eq!(
            rect(-1, -1, 12, 12).crossed_edges(bounds),
            Edge::Left | Edge::Top | Edge::Right | Edge::Bottom
        );
    }

    #[test]
    fn extents_do_not_overflow() {
        let r = rect(i32::max_value(), 0, u32::max_value(), 1);
        assert_eq!(r.right(), i64::from(i32::max_value()) + i64::from(u32::max_value()));
        assert!(!r.within(AnchorageSize::new(10, 10)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(1, 1, 2, 2);
        assert!(r.contains(Coordinate::new(1, 1)));
        assert!(r.contains(Coordinate::new(2, 2)));
        assert!(!r.contains(Coordinate::new(3, 1)));
        assert!(!r.contains(Coordinate::new(0, 1)));
    }
}
