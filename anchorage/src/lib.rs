//! Placement validation and puzzle state for the anchorage bin-packing puzzle.
//!
//! A fleet of vessel types is packed onto a rectangular anchorage. Every placement is
//! checked against the anchorage bounds and against the vessels already placed, and a
//! [`PuzzleSession`] keeps track of how many vessels of each type are still waiting to
//! be placed.
//!
//! [`anchorage`] holds the geometry, the validator in [`anchorage::planner`] and the
//! session in [`anchorage::session`]. [`vessel`] defines vessel types and placed
//! vessels, and [`fleet`] defines the fleet definition format that sessions are
//! initialized from.

pub mod anchorage;
pub mod fleet;
pub mod vessel;

pub use crate::{
    anchorage::{
        AnchorageSize, CannotPlaceReason, Coordinate, Dimensions, Edge, PlaceError, Progress,
        PuzzleSession, Rect, RemoveError,
    },
    fleet::{FleetDefinition, FleetEntry, FleetError},
    vessel::{PlacedVessel, VesselId, VesselType},
};
