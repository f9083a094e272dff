//! State of a single puzzle: the anchorage, the fleet catalog and the vessels placed so
//! far.
use std::fmt;

use tracing::{debug, warn};

use crate::{
    anchorage::{
        planner, AnchorageSize, CannotPlaceReason, Coordinate, PlaceError, RemoveError,
    },
    fleet::FleetDefinition,
    vessel::{PlacedVessel, VesselId, VesselType},
};

/// Summary of how far along a puzzle is.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Progress {
    /// Vessels the fleet requires.
    pub total: u64,
    /// Vessels not yet placed.
    pub remaining: u64,
}

impl Progress {
    /// Vessels currently placed.
    pub fn placed(&self) -> u64 {
        self.total - self.remaining
    }

    /// True if nothing remains to be placed.
    pub fn complete(&self) -> bool {
        self.remaining == 0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{} placed", self.placed(), self.total)
    }
}

/// A puzzle session. Owns the vessel catalog and the placed vessels; all changes go
/// through its methods, and callers only ever see shared views.
///
/// A session starts out uninitialized. [`initialize`][Self::initialize] loads a fleet,
/// after which vessels can be placed and removed until [`reset`][Self::reset] returns
/// the session to its initial state.
#[derive(Debug, Default, Clone)]
pub struct PuzzleSession {
    /// Bounds of the anchorage, if a puzzle is loaded.
    anchorage_size: Option<AnchorageSize>,

    /// Catalog of vessel types, in fleet order.
    vessel_types: Vec<VesselType>,

    /// Vessels on the anchorage, in placement order.
    placed_vessels: Vec<PlacedVessel>,

    /// Sequence number of the last id handed out. Never rewinds, so ids are not reused.
    last_id: u64,
}

impl PuzzleSession {
    /// Construct an uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a session and load the given fleet.
    pub fn with_fleet(fleet: &FleetDefinition) -> Self {
        let mut session = Self::new();
        session.initialize(fleet);
        session
    }

    /// Load a fleet, replacing whatever the session held before. Every vessel type
    /// starts with its full required count remaining and the anchorage is empty.
    pub fn initialize(&mut self, fleet: &FleetDefinition) {
        self.anchorage_size = Some(fleet.anchorage_size);
        self.vessel_types = fleet.vessel_types();
        self.placed_vessels.clear();

        let needed = fleet.total_ship_area();
        let available = fleet.anchorage_size.area();
        if needed > available {
            warn!(
                needed,
                available, "fleet covers more cells than the anchorage has; puzzle cannot be solved"
            );
        }
        for vt in &self.vessel_types {
            if vt.required_count() > 0 && !fleet.anchorage_size.admits(vt.dimensions()) {
                warn!(
                    designation = vt.designation(),
                    dimensions = %vt.dimensions(),
                    "vessel type does not fit the anchorage in either orientation"
                );
            }
        }
        debug!(
            anchorage = %fleet.anchorage_size,
            types = self.vessel_types.len(),
            vessels = fleet.total_ship_count(),
            "puzzle initialized"
        );
    }

    /// Drop the puzzle. The session is uninitialized afterwards.
    pub fn reset(&mut self) {
        self.placed_vessels.clear();
        self.vessel_types.clear();
        self.anchorage_size = None;
        debug!("puzzle reset");
    }

    /// Remove every placed vessel and restore every remaining count. The anchorage and
    /// catalog are kept.
    pub fn clear_placements(&mut self) {
        self.placed_vessels.clear();
        for vt in &mut self.vessel_types {
            vt.restore();
        }
        debug!("placements cleared");
    }

    /// Returns true if a puzzle is loaded.
    pub fn is_initialized(&self) -> bool {
        self.anchorage_size.is_some()
    }

    /// Bounds of the anchorage, if a puzzle is loaded.
    pub fn anchorage_size(&self) -> Option<AnchorageSize> {
        self.anchorage_size
    }

    /// The vessel catalog, in fleet order.
    pub fn vessel_types(&self) -> &[VesselType] {
        &self.vessel_types
    }

    /// The vessels on the anchorage, in placement order.
    pub fn placed_vessels(&self) -> &[PlacedVessel] {
        &self.placed_vessels
    }

    /// Get the first vessel type with the given designation.
    pub fn vessel_type(&self, designation: &str) -> Option<&VesselType> {
        self.vessel_types
            .iter()
            .find(|vt| vt.designation() == designation)
    }

    /// Get the placed vessel with the given id.
    pub fn placed_vessel(&self, id: &VesselId) -> Option<&PlacedVessel> {
        self.placed_vessels.iter().find(|v| v.id() == id)
    }

    /// Get the placed vessel covering the given cell, if any.
    pub fn vessel_at(&self, coord: Coordinate) -> Option<&PlacedVessel> {
        self.placed_vessels.iter().find(|v| v.rect().contains(coord))
    }

    /// Returns true if every vessel of every type is placed.
    pub fn all_vessels_placed(&self) -> bool {
        planner::all_vessels_placed(&self.vessel_types)
    }

    /// Current progress through the fleet.
    pub fn progress(&self) -> Progress {
        Progress {
            total: planner::total_vessel_count(&self.vessel_types),
            remaining: planner::remaining_vessel_count(&self.vessel_types),
        }
    }

    /// Check whether a vessel of the given designation could be placed at `origin`,
    /// without placing it.
    pub fn check_placement<C: Into<Coordinate>>(
        &self,
        designation: &str,
        origin: C,
        rotated: bool,
    ) -> Result<(), PlaceError> {
        let origin = origin.into();
        self.resolve(designation)
            .and_then(|index| self.check_type(index, origin, rotated))
            .map_err(|reason| PlaceError::new(reason, designation.to_owned(), origin))
    }

    /// Place a vessel of the given designation with its top-left corner at `origin`,
    /// rotated if requested. On success the vessel is recorded and its type's remaining
    /// count drops by one. On failure nothing changes.
    ///
    /// If several vessel types share the designation, the first one with vessels
    /// remaining is used.
    pub fn place_vessel<C: Into<Coordinate>>(
        &mut self,
        designation: &str,
        origin: C,
        rotated: bool,
    ) -> Result<&PlacedVessel, PlaceError> {
        let origin = origin.into();
        match self.resolve(designation) {
            Ok(index) => self.place_vessel_of_type(index, origin, rotated),
            Err(reason) => Err(PlaceError::new(reason, designation.to_owned(), origin)),
        }
    }

    /// Place a vessel of the type at position `index` in [`vessel_types`][Self::vessel_types].
    pub fn place_vessel_of_type<C: Into<Coordinate>>(
        &mut self,
        index: usize,
        origin: C,
        rotated: bool,
    ) -> Result<&PlacedVessel, PlaceError> {
        let origin = origin.into();
        if let Err(reason) = self.check_type(index, origin, rotated) {
            let designation = self
                .vessel_types
                .get(index)
                .map(|vt| vt.designation().to_owned())
                .unwrap_or_default();
            if reason == CannotPlaceReason::Exhausted {
                warn!(%designation, "attempted to place an exhausted vessel type");
            }
            return Err(PlaceError::new(reason, designation, origin));
        }

        self.last_id += 1;
        let id = VesselId::from(format!("v{}", self.last_id));
        let vessel_type = &mut self.vessel_types[index];
        let vessel = PlacedVessel::new(id, vessel_type, index, origin, rotated);
        // check_type rejected exhausted types above.
        vessel_type.take_one();
        debug!(
            id = %vessel.id(),
            designation = vessel.designation(),
            x = origin.x,
            y = origin.y,
            rotated,
            "vessel placed"
        );
        self.placed_vessels.push(vessel);
        let last = self.placed_vessels.len() - 1;
        Ok(&self.placed_vessels[last])
    }

    /// Remove the placed vessel with the given id, returning it to its type's remaining
    /// count. Placement order of the other vessels is preserved.
    pub fn remove_vessel(&mut self, id: &VesselId) -> Result<PlacedVessel, RemoveError> {
        let pos = self
            .placed_vessels
            .iter()
            .position(|v| v.id() == id)
            .ok_or_else(|| RemoveError::UnknownVessel(id.clone()))?;
        let vessel = self.placed_vessels.remove(pos);
        let returned = match self.vessel_types.get_mut(vessel.type_index()) {
            Some(vt) => vt.return_one(),
            None => false,
        };
        if !returned {
            warn!(id = %id, "removed vessel had no placement counted against its type");
        }
        debug!(id = %id, designation = vessel.designation(), "vessel removed");
        Ok(vessel)
    }

    /// Find the catalog index to place from for a designation.
    fn resolve(&self, designation: &str) -> Result<usize, CannotPlaceReason> {
        if !self.is_initialized() {
            return Err(CannotPlaceReason::NotInitialized);
        }
        let mut candidates = self
            .vessel_types
            .iter()
            .enumerate()
            .filter(|(_, vt)| vt.designation() == designation)
            .peekable();
        if candidates.peek().is_none() {
            return Err(CannotPlaceReason::UnknownDesignation);
        }
        candidates
            .find(|(_, vt)| !vt.exhausted())
            .map(|(index, _)| index)
            .ok_or(CannotPlaceReason::Exhausted)
    }

    /// Check that a vessel of the type at `index` can be placed at `origin`.
    fn check_type(
        &self,
        index: usize,
        origin: Coordinate,
        rotated: bool,
    ) -> Result<(), CannotPlaceReason> {
        let anchorage = self
            .anchorage_size
            .ok_or(CannotPlaceReason::NotInitialized)?;
        let vessel_type = self
            .vessel_types
            .get(index)
            .ok_or(CannotPlaceReason::UnknownDesignation)?;
        if vessel_type.exhausted() {
            return Err(CannotPlaceReason::Exhausted);
        }
        planner::check_placement(
            origin,
            vessel_type.dimensions().oriented(rotated),
            anchorage,
            &self.placed_vessels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        anchorage::Dimensions,
        fleet::{FleetDefinition, FleetEntry},
    };

    fn single_fleet() -> FleetDefinition {
        FleetDefinition::new(
            AnchorageSize::new(10, 10),
            vec![FleetEntry::new(Dimensions::new(3, 4), "A", 1)],
        )
    }

    fn mixed_fleet() -> FleetDefinition {
        FleetDefinition::new(
            AnchorageSize::new(10, 10),
            vec![
                FleetEntry::new(Dimensions::new(3, 4), "A", 2),
                FleetEntry::new(Dimensions::new(1, 5), "B", 1),
            ],
        )
    }

    #[test]
    fn new_session_is_uninitialized() {
        let mut session = PuzzleSession::new();
        assert!(!session.is_initialized());
        assert_eq!(session.anchorage_size(), None);
        assert!(session.all_vessels_placed());
        let err = session.place_vessel("A", (0, 0), false).unwrap_err();
        assert_eq!(err.reason(), &CannotPlaceReason::NotInitialized);
    }

    #[test]
    fn initialize_loads_the_fleet() {
        let session = PuzzleSession::with_fleet(&mixed_fleet());
        assert_eq!(session.anchorage_size(), Some(AnchorageSize::new(10, 10)));
        assert_eq!(session.vessel_types().len(), 2);
        assert!(session.placed_vessels().is_empty());
        assert_eq!(
            session.progress(),
            Progress {
                total: 3,
                remaining: 3
            }
        );
    }

    #[test]
    fn initialize_overwrites_previous_state() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("A", (0, 0), false).unwrap();
        session.initialize(&single_fleet());
        assert!(session.placed_vessels().is_empty());
        assert_eq!(session.vessel_types().len(), 1);
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 1);
        assert!(session.vessel_type("B").is_none());
    }

    #[test]
    fn placing_the_only_vessel_completes_the_puzzle() {
        let mut session = PuzzleSession::with_fleet(&single_fleet());
        let placed = session.place_vessel("A", (0, 0), false).unwrap().clone();
        assert_eq!(placed.designation(), "A");
        assert_eq!(placed.dimensions(), Dimensions::new(3, 4));
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 0);
        assert!(session.all_vessels_placed());
        assert!(session.progress().complete());

        let err = session.place_vessel("A", (5, 5), false).unwrap_err();
        assert_eq!(err.reason(), &CannotPlaceReason::Exhausted);
        assert_eq!(session.placed_vessels().len(), 1);
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 0);
    }

    #[test]
    fn failed_placements_change_nothing() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("A", (0, 0), false).unwrap();
        let before = session.clone();

        let collide = session.place_vessel("A", (2, 2), false).unwrap_err();
        assert_eq!(collide.reason(), &CannotPlaceReason::Collision("v1".into()));
        assert_eq!(collide.origin(), Coordinate::new(2, 2));
        let bounds = session.place_vessel("B", (9, 6), false).unwrap_err();
        assert!(bounds.reason().is_invalid_placement());
        let unknown = session.place_vessel("Z", (5, 5), false).unwrap_err();
        assert_eq!(unknown.reason(), &CannotPlaceReason::UnknownDesignation);

        assert_eq!(session.placed_vessels(), before.placed_vessels());
        assert_eq!(session.vessel_types(), before.vessel_types());
    }

    #[test]
    fn rotation_changes_the_footprint() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        // 1x5 does not fit vertically at y = 6 but 5x1 does.
        assert!(session.check_placement("B", (0, 6), false).is_err());
        let vessel = session.place_vessel("B", (0, 6), true).unwrap();
        assert!(vessel.is_rotated());
        assert_eq!(vessel.dimensions(), Dimensions::new(5, 1));
    }

    #[test]
    fn check_placement_does_not_mutate() {
        let session = PuzzleSession::with_fleet(&single_fleet());
        assert!(session.check_placement("A", (7, 6), false).is_ok());
        assert!(session.placed_vessels().is_empty());
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 1);
    }

    #[test]
    fn removal_is_the_inverse_of_placement() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("B", (9, 0), false).unwrap();
        let before = session.clone();

        let id = session.place_vessel("A", (0, 0), false).unwrap().id().clone();
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 1);
        let removed = session.remove_vessel(&id).unwrap();
        assert_eq!(removed.id(), &id);

        assert_eq!(session.placed_vessels(), before.placed_vessels());
        assert_eq!(session.vessel_types(), before.vessel_types());
    }

    #[test]
    fn removal_restores_exhausted_type() {
        let mut session = PuzzleSession::with_fleet(&single_fleet());
        let id = session.place_vessel("A", (0, 0), false).unwrap().id().clone();
        assert!(session.all_vessels_placed());

        session.remove_vessel(&id).unwrap();
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 1);
        assert!(session.placed_vessels().is_empty());
        assert!(!session.all_vessels_placed());
        assert!(session.place_vessel("A", (4, 4), true).is_ok());
    }

    #[test]
    fn removing_an_unknown_vessel_fails() {
        let mut session = PuzzleSession::with_fleet(&single_fleet());
        let id = VesselId::from("v42");
        assert_eq!(
            session.remove_vessel(&id),
            Err(RemoveError::UnknownVessel(id))
        );
        assert_eq!(session.vessel_type("A").unwrap().remaining_count(), 1);
    }

    #[test]
    fn ids_are_unique_and_not_reused() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        let first = session.place_vessel("A", (0, 0), false).unwrap().id().clone();
        session.remove_vessel(&first).unwrap();
        let second = session.place_vessel("A", (0, 0), false).unwrap().id().clone();
        let third = session.place_vessel("A", (3, 0), false).unwrap().id().clone();
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn duplicate_designations_use_the_next_available_type() {
        let fleet = FleetDefinition::new(
            AnchorageSize::new(10, 10),
            vec![
                FleetEntry::new(Dimensions::new(1, 1), "Dup", 1),
                FleetEntry::new(Dimensions::new(2, 2), "Dup", 1),
            ],
        );
        let mut session = PuzzleSession::with_fleet(&fleet);
        let small = session.place_vessel("Dup", (0, 0), false).unwrap().id().clone();
        let big = session.place_vessel("Dup", (5, 5), false).unwrap().clone();
        assert_eq!(big.dimensions(), Dimensions::new(2, 2));
        assert!(session.all_vessels_placed());

        // Removing the first returns it to the first type, not the second.
        session.remove_vessel(&small).unwrap();
        assert_eq!(session.vessel_types()[0].remaining_count(), 1);
        assert_eq!(session.vessel_types()[1].remaining_count(), 0);
    }

    #[test]
    fn place_by_index() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        let vessel = session.place_vessel_of_type(1, (4, 4), false).unwrap();
        assert_eq!(vessel.designation(), "B");
        let err = session.place_vessel_of_type(7, (0, 0), false).unwrap_err();
        assert_eq!(err.reason(), &CannotPlaceReason::UnknownDesignation);
    }

    #[test]
    fn vessel_at_finds_covering_vessel() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("A", (2, 3), false).unwrap();
        assert_eq!(
            session.vessel_at(Coordinate::new(4, 6)).map(|v| v.designation()),
            Some("A")
        );
        assert!(session.vessel_at(Coordinate::new(5, 6)).is_none());
        assert!(session.vessel_at(Coordinate::new(4, 7)).is_none());
    }

    #[test]
    fn clear_placements_restores_counts() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("A", (0, 0), false).unwrap();
        session.place_vessel("B", (9, 0), false).unwrap();
        session.clear_placements();
        assert!(session.is_initialized());
        assert!(session.placed_vessels().is_empty());
        assert_eq!(session.progress().remaining, 3);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut session = PuzzleSession::with_fleet(&mixed_fleet());
        session.place_vessel("A", (0, 0), false).unwrap();
        session.reset();
        assert!(!session.is_initialized());
        assert!(session.vessel_types().is_empty());
        assert!(session.placed_vessels().is_empty());
        let err = session.place_vessel("A", (0, 0), false).unwrap_err();
        assert_eq!(err.reason(), &CannotPlaceReason::NotInitialized);
    }
}
