//! Errors used by the placement validator and the [`PuzzleSession`][super::PuzzleSession].

use std::fmt::{self, Debug};

use enumflags2::BitFlags;
use thiserror::Error;

use crate::{
    anchorage::{Coordinate, Edge},
    vessel::VesselId,
};

/// Reason why a vessel could not be placed at a given position.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// The session has no anchorage yet.
    #[error("no puzzle has been loaded")]
    NotInitialized,
    /// No vessel type with the requested designation exists.
    #[error("no vessel type with that designation")]
    UnknownDesignation,
    /// Every vessel of the requested type has already been placed.
    #[error("all vessels of this type have already been placed")]
    Exhausted,
    /// The vessel would extend past one or more edges of the anchorage.
    #[error("the vessel would cross the anchorage edge(s) {0:?}")]
    OutOfBounds(BitFlags<Edge>),
    /// The vessel would overlap the vessel with the given id.
    #[error("the requested position overlaps vessel {0}")]
    Collision(VesselId),
}

impl CannotPlaceReason {
    /// True for reasons that come from the geometry of the placement rather than from
    /// the state of the fleet.
    pub fn is_invalid_placement(&self) -> bool {
        match self {
            CannotPlaceReason::OutOfBounds(_) | CannotPlaceReason::Collision(_) => true,
            _ => false,
        }
    }
}

/// Error caused when attempting to place a vessel. The session is left unchanged.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("could not place {designation} at {origin}: {reason}")]
pub struct PlaceError {
    #[source]
    reason: CannotPlaceReason,
    designation: String,
    origin: Coordinate,
}

impl Debug for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PlaceError {
    /// Construct a placement error from a reason and the attempted placement.
    pub(super) fn new(reason: CannotPlaceReason, designation: String, origin: Coordinate) -> Self {
        Self {
            reason,
            designation,
            origin,
        }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> &CannotPlaceReason {
        &self.reason
    }

    /// Designation of the vessel type that placement was attempted for.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Cell where placement was attempted.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Extract the reason, designation and origin from this error.
    pub fn into_parts(self) -> (CannotPlaceReason, String, Coordinate) {
        (self.reason, self.designation, self.origin)
    }
}

/// Error returned when removing a vessel fails. The session is left unchanged.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum RemoveError {
    /// No vessel with this id is currently placed.
    #[error("no placed vessel with id {0}")]
    UnknownVessel(VesselId),
}
