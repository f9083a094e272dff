//! Fleet definitions: the anchorage size plus the vessel types a puzzle asks for.
//!
//! This is the shape served by the fleet API:
//!
//! ```json
//! {
//!   "anchorageSize": { "width": 12, "height": 15 },
//!   "fleets": [
//!     { "singleShipDimensions": { "width": 3, "height": 4 },
//!       "shipDesignation": "LNG Unit", "shipCount": 2 }
//!   ]
//! }
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    anchorage::{AnchorageSize, Dimensions},
    vessel::VesselType,
};

#[cfg(feature = "rng_gen")]
pub mod random;

/// Error returned when a fleet definition cannot be read.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The payload was `null`.
    #[error("empty fleet definition")]
    Empty,
    /// The payload was not a valid fleet definition.
    #[error("malformed fleet definition: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One vessel type requested by a fleet definition.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetEntry {
    /// Footprint of a single vessel, unrotated.
    pub single_ship_dimensions: Dimensions,
    /// Display label.
    pub ship_designation: String,
    /// How many vessels of this type must be placed.
    pub ship_count: u32,
}

impl FleetEntry {
    /// Construct an entry.
    pub fn new<S: Into<String>>(dimensions: Dimensions, designation: S, count: u32) -> Self {
        Self {
            single_ship_dimensions: dimensions,
            ship_designation: designation.into(),
            ship_count: count,
        }
    }

    /// Build the vessel type for this entry, with nothing placed yet.
    pub fn vessel_type(&self) -> VesselType {
        VesselType::new(
            self.single_ship_dimensions,
            self.ship_designation.clone(),
            self.ship_count,
        )
    }
}

/// Everything needed to start a puzzle.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetDefinition {
    /// Bounds of the anchorage.
    pub anchorage_size: AnchorageSize,
    /// Vessel types to place, in display order.
    pub fleets: Vec<FleetEntry>,
}

impl FleetDefinition {
    /// Construct a fleet definition.
    pub fn new(anchorage_size: AnchorageSize, fleets: Vec<FleetEntry>) -> Self {
        Self {
            anchorage_size,
            fleets,
        }
    }

    /// Parse a fleet definition from JSON. A JSON `null` is reported as
    /// [`FleetError::Empty`].
    pub fn from_json(json: &str) -> Result<Self, FleetError> {
        serde_json::from_str::<Option<Self>>(json)?.ok_or(FleetError::Empty)
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Build the vessel-type catalog for a new session.
    pub fn vessel_types(&self) -> Vec<VesselType> {
        self.fleets.iter().map(FleetEntry::vessel_type).collect()
    }

    /// Number of vessels over all entries.
    pub fn total_ship_count(&self) -> u64 {
        self.fleets.iter().map(|e| u64::from(e.ship_count)).sum()
    }

    /// Number of cells all vessels together cover.
    pub fn total_ship_area(&self) -> u64 {
        self.fleets
            .iter()
            .map(|e| e.single_ship_dimensions.area() * u64::from(e.ship_count))
            .sum()
    }
}
