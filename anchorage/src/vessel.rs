//! Vessel types in a fleet, and vessels placed on the anchorage.
use std::fmt;

use crate::anchorage::{Coordinate, Dimensions, Rect};

/// Identity of a single placed vessel. Unique among the vessels placed in a session.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VesselId(String);

impl VesselId {
    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VesselId {
    fn from(id: &str) -> Self {
        VesselId(id.to_owned())
    }
}

impl From<String> for VesselId {
    fn from(id: String) -> Self {
        VesselId(id)
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A category of vessel: its footprint, its label and how many of it must be placed.
///
/// The remaining count is only ever changed by the owning
/// [`PuzzleSession`][crate::PuzzleSession], which keeps it between zero and the required
/// count.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VesselType {
    dimensions: Dimensions,
    designation: String,
    required_count: u32,
    remaining_count: u32,
}

impl VesselType {
    /// Construct a vessel type with nothing placed yet.
    pub fn new<S: Into<String>>(dimensions: Dimensions, designation: S, required_count: u32) -> Self {
        Self {
            dimensions,
            designation: designation.into(),
            required_count,
            remaining_count: required_count,
        }
    }

    /// Unrotated footprint of a single vessel of this type.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Display label of this type.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// How many vessels of this type the puzzle requires.
    pub fn required_count(&self) -> u32 {
        self.required_count
    }

    /// How many vessels of this type still have to be placed.
    pub fn remaining_count(&self) -> u32 {
        self.remaining_count
    }

    /// How many vessels of this type are currently placed.
    pub fn placed_count(&self) -> u32 {
        self.required_count - self.remaining_count
    }

    /// True once every vessel of this type is placed.
    pub fn exhausted(&self) -> bool {
        self.remaining_count == 0
    }

    /// Take one vessel off the remaining count. Returns false, leaving the count alone,
    /// if none remain.
    pub(crate) fn take_one(&mut self) -> bool {
        match self.remaining_count.checked_sub(1) {
            Some(remaining) => {
                self.remaining_count = remaining;
                true
            }
            None => false,
        }
    }

    /// Return one vessel to the remaining count. Returns false, leaving the count alone,
    /// if the count is already at the required count.
    pub(crate) fn return_one(&mut self) -> bool {
        if self.remaining_count < self.required_count {
            self.remaining_count += 1;
            true
        } else {
            false
        }
    }

    /// Put every vessel of this type back into the remaining count.
    pub(crate) fn restore(&mut self) {
        self.remaining_count = self.required_count;
    }
}

/// One vessel committed to a position on the anchorage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlacedVessel {
    /// Unique id of this placement.
    id: VesselId,
    /// Designation of the vessel type this was placed from.
    designation: String,
    /// Top-left cell covered.
    origin: Coordinate,
    /// Footprint as placed, already rotated if `rotated` is set.
    dimensions: Dimensions,
    /// Whether the vessel type's footprint was rotated for this placement.
    rotated: bool,
    /// Position in the session's catalog of the vessel type this was placed from.
    type_index: usize,
}

impl PlacedVessel {
    pub(crate) fn new(
        id: VesselId,
        vessel_type: &VesselType,
        type_index: usize,
        origin: Coordinate,
        rotated: bool,
    ) -> Self {
        Self {
            id,
            designation: vessel_type.designation.clone(),
            origin,
            dimensions: vessel_type.dimensions.oriented(rotated),
            rotated,
            type_index,
        }
    }

    /// Get the id of this vessel.
    pub fn id(&self) -> &VesselId {
        &self.id
    }

    /// Designation of the vessel's type.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Top-left cell covered by the vessel.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Horizontal position of the vessel.
    pub fn x(&self) -> i32 {
        self.origin.x
    }

    /// Vertical position of the vessel.
    pub fn y(&self) -> i32 {
        self.origin.y
    }

    /// Footprint of the vessel as placed.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Whether the vessel was placed rotated.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Area of the anchorage covered by the vessel.
    pub fn rect(&self) -> Rect {
        Rect::new(self.origin, self.dimensions)
    }

    pub(crate) fn type_index(&self) -> usize {
        self.type_index
    }
}

impl fmt::Display for PlacedVessel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {} {}", self.designation, self.origin, self.dimensions)
    }
}
