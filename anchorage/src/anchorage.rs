//! Types that make up the anchorage grid, and the validator and session built on them.

pub use self::{
    coordinate::Coordinate,
    dimensions::{AnchorageSize, Dimensions, InvalidDimensions},
    errors::{CannotPlaceReason, PlaceError, RemoveError},
    rect::{Edge, Rect},
    session::{Progress, PuzzleSession},
};

mod coordinate;
mod dimensions;
mod errors;
pub mod planner;
mod rect;
pub mod session;
