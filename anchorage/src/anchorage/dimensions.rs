use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchorage::Coordinate;

/// Error returned when a width or height is zero, or too large for an anchorage.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("invalid dimensions {width}x{height}")]
pub struct InvalidDimensions {
    width: u32,
    height: u32,
}

/// Width/height pair as it appears on the wire. Validated on conversion.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
struct RawSize {
    width: u32,
    height: u32,
}

/// Footprint of a vessel, in grid cells. Rotating produces a new value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSize", into = "RawSize")]
pub struct Dimensions {
    /// Extent along `x`.
    width: u32,
    /// Extent along `y`.
    height: u32,
}

impl Dimensions {
    /// Create new [`Dimensions`] with the specified width and height.
    /// Panics if `width` or `height` is 0.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Some(dim) => dim,
            None => panic!("Dimensions must be nonzero, got {}x{}", width, height),
        }
    }

    /// Create new [`Dimensions`] with the specified width and height.
    /// Returns `None` if `width` or `height` is 0.
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Get the width of these [`Dimensions`].
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of these [`Dimensions`].
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Get these dimensions turned by a quarter, with width and height swapped.
    pub fn rotate(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Rotate only if `rotated` is set.
    pub fn oriented(self, rotated: bool) -> Self {
        if rotated {
            self.rotate()
        } else {
            self
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl TryFrom<RawSize> for Dimensions {
    type Error = InvalidDimensions;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Self::try_new(raw.width, raw.height).ok_or(InvalidDimensions {
            width: raw.width,
            height: raw.height,
        })
    }
}

impl From<Dimensions> for RawSize {
    fn from(dim: Dimensions) -> Self {
        Self {
            width: dim.width,
            height: dim.height,
        }
    }
}

/// Bounds of the anchorage grid. Fixed for the lifetime of a puzzle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSize", into = "RawSize")]
pub struct AnchorageSize {
    /// Width of the anchorage. This cooresponds to the `x` [`Coordinate`].
    width: u32,
    /// Height of the anchorage. This cooresponds to the `y` [`Coordinate`].
    height: u32,
}

impl AnchorageSize {
    /// Largest width or height. Every cell must have a [`Coordinate`].
    pub const MAX_EXTENT: u32 = i32::MAX as u32;

    /// Create a new [`AnchorageSize`]. Panics if `width` or `height` is 0 or above
    /// [`MAX_EXTENT`][Self::MAX_EXTENT].
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Some(size) => size,
            None => panic!("invalid AnchorageSize {}x{}", width, height),
        }
    }

    /// Create a new [`AnchorageSize`]. Returns `None` if `width` or `height` is 0 or above
    /// [`MAX_EXTENT`][Self::MAX_EXTENT].
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        let valid = |n: u32| n > 0 && n <= Self::MAX_EXTENT;
        if !valid(width) || !valid(height) {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Get the width of the anchorage.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the anchorage.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells in the anchorage.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Check whether a vessel of the given [`Dimensions`] could fit in an empty anchorage,
    /// either as given or rotated.
    pub fn admits(&self, dim: Dimensions) -> bool {
        let fits = |d: Dimensions| d.width <= self.width && d.height <= self.height;
        fits(dim) || fits(dim.rotate())
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        // Both extents are at most MAX_EXTENT.
        let width = self.width as i32;
        (0..self.height as i32)
            .map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }
}

impl fmt::Display for AnchorageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl TryFrom<RawSize> for AnchorageSize {
    type Error = InvalidDimensions;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Self::try_new(raw.width, raw.height).ok_or(InvalidDimensions {
            width: raw.width,
            height: raw.height,
        })
    }
}

impl From<AnchorageSize> for RawSize {
    fn from(size: AnchorageSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_swaps_width_and_height() {
        let dim = Dimensions::new(3, 4);
        assert_eq!(dim.rotate(), Dimensions::new(4, 3));
        assert_eq!(dim.rotate().rotate(), dim);
        assert_eq!(dim.oriented(false), dim);
        assert_eq!(dim.oriented(true), Dimensions::new(4, 3));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert_eq!(Dimensions::try_new(0, 3), None);
        assert_eq!(Dimensions::try_new(3, 0), None);
        assert_eq!(AnchorageSize::try_new(0, 0), None);
    }

    #[test]
    fn anchorage_extent_fits_coordinates() {
        let max = AnchorageSize::MAX_EXTENT;
        assert_eq!(AnchorageSize::try_new(max + 1, 1), None);
        assert_eq!(AnchorageSize::try_new(1, 3_000_000_000), None);
        let widest = AnchorageSize::new(max, 1);
        assert_eq!(widest.rows().count(), 1);
        let cells: Vec<(i32, i32)> = widest.rows().flatten().take(2).map(Into::into).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0)]);
    }

    #[test]
    #[should_panic]
    fn new_panics_on_zero() {
        Dimensions::new(0, 1);
    }

    #[test]
    fn admits_checks_both_orientations() {
        let size = AnchorageSize::new(10, 4);
        assert!(size.admits(Dimensions::new(10, 4)));
        assert!(size.admits(Dimensions::new(4, 10)));
        assert!(!size.admits(Dimensions::new(5, 5)));
    }

    #[test]
    fn rows_cover_the_grid_in_reading_order() {
        let size = AnchorageSize::new(3, 2);
        let cells: Vec<(i32, i32)> = size.rows().flatten().map(Into::into).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn deserialize_rejects_zero() {
        let ok: Dimensions = serde_json::from_str(r#"{"width": 2, "height": 5}"#).unwrap();
        assert_eq!(ok, Dimensions::new(2, 5));
        assert!(serde_json::from_str::<Dimensions>(r#"{"width": 0, "height": 5}"#).is_err());
        assert!(serde_json::from_str::<AnchorageSize>(r#"{"width": -1, "height": 5}"#).is_err());
    }
}
