//! Placement validation and fleet progress queries.
//!
//! Everything here is a pure function of its arguments. [`PuzzleSession`] runs
//! [`check_placement`] before committing any placement, but the functions are usable on
//! their own, for example to highlight legal drop targets before anything is placed.
//!
//! [`PuzzleSession`]: super::PuzzleSession

use crate::{
    anchorage::{AnchorageSize, CannotPlaceReason, Coordinate, Dimensions, Rect},
    vessel::{PlacedVessel, VesselType},
};

/// Returns true if a vessel of the given `dimensions` can be placed with its top-left
/// corner at `origin`: it lies fully inside the anchorage and overlaps none of the
/// `placed` vessels. Touching another vessel or the anchorage edge is allowed.
pub fn can_place_vessel(
    origin: Coordinate,
    dimensions: Dimensions,
    anchorage: AnchorageSize,
    placed: &[PlacedVessel],
) -> bool {
    check_placement(origin, dimensions, anchorage, placed).is_ok()
}

/// Same check as [`can_place_vessel`], reporting why a placement is illegal.
///
/// Bounds are checked first and report every crossed edge. Otherwise the first placed
/// vessel, in placement order, that the candidate overlaps is reported.
pub fn check_placement(
    origin: Coordinate,
    dimensions: Dimensions,
    anchorage: AnchorageSize,
    placed: &[PlacedVessel],
) -> Result<(), CannotPlaceReason> {
    let candidate = Rect::new(origin, dimensions);
    let edges = candidate.crossed_edges(anchorage);
    if !edges.is_empty() {
        return Err(CannotPlaceReason::OutOfBounds(edges));
    }
    match placed.iter().find(|vessel| candidate.collides(&vessel.rect())) {
        Some(vessel) => Err(CannotPlaceReason::Collision(vessel.id().clone())),
        None => Ok(()),
    }
}

/// Returns true if no vessel of any type remains to be placed. True for an empty fleet.
pub fn all_vessels_placed(vessel_types: &[VesselType]) -> bool {
    vessel_types.iter().all(VesselType::exhausted)
}

/// Number of vessels the fleet requires in total.
pub fn total_vessel_count(vessel_types: &[VesselType]) -> u64 {
    vessel_types
        .iter()
        .map(|vt| u64::from(vt.required_count()))
        .sum()
}

/// Number of vessels still waiting to be placed.
pub fn remaining_vessel_count(vessel_types: &[VesselType]) -> u64 {
    vessel_types
        .iter()
        .map(|vt| u64::from(vt.remaining_count()))
        .sum()
}
