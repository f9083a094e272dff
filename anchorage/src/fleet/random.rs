//! Random fleet generation. Requires the `rng_gen` feature.
//!
//! Fleets are made by cutting the anchorage into rectangles with straight cuts, so every
//! generated puzzle has at least one packing that fills the anchorage exactly.
use std::collections::BTreeMap;

use rand::Rng;

use crate::{
    anchorage::{AnchorageSize, Dimensions},
    fleet::{FleetDefinition, FleetEntry},
};

/// Largest vessel area the generator leaves uncut.
pub const MAX_VESSEL_AREA: u32 = 12;

/// Chance that a piece already small enough is kept rather than cut again.
const KEEP_PROBABILITY: f64 = 0.6;

/// Names handed out to vessel types, in order.
const DESIGNATIONS: &[&str] = &[
    "Tug",
    "Pilot Boat",
    "Trawler",
    "Ferry",
    "Coaster",
    "Bulk Carrier",
    "Tanker",
    "Container Ship",
    "Dredger",
    "Cable Layer",
    "Research Vessel",
    "Icebreaker",
];

/// Generate a random fleet that exactly tiles an anchorage of the given size.
///
/// Footprints that are rotations of each other are grouped into a single vessel type,
/// stored with the longer side as the width. Types are ordered largest area first.
pub fn random_fleet<R: Rng + ?Sized>(rng: &mut R, anchorage: AnchorageSize) -> FleetDefinition {
    let mut counts: BTreeMap<(u32, u32), u32> = BTreeMap::new();
    let mut pending = vec![(anchorage.width(), anchorage.height())];
    while let Some((width, height)) = pending.pop() {
        let small = u64::from(width) * u64::from(height) <= u64::from(MAX_VESSEL_AREA);
        let can_cut = width > 1 || height > 1;
        if !can_cut || (small && rng.gen_bool(KEEP_PROBABILITY)) {
            let key = (width.max(height), width.min(height));
            *counts.entry(key).or_insert(0) += 1;
            continue;
        }
        // Cut across the longer side to keep pieces from getting too thin.
        if width >= height {
            let cut = rng.gen_range(1, width);
            pending.push((cut, height));
            pending.push((width - cut, height));
        } else {
            let cut = rng.gen_range(1, height);
            pending.push((width, cut));
            pending.push((width, height - cut));
        }
    }

    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_by(|((aw, ah), _), ((bw, bh), _)| (bw * bh).cmp(&(aw * ah)));
    let fleets = entries
        .into_iter()
        .enumerate()
        .map(|(i, ((width, height), count))| {
            FleetEntry::new(Dimensions::new(width, height), designation(i), count)
        })
        .collect();
    FleetDefinition::new(anchorage, fleets)
}

/// Name for the `i`th vessel type. Names repeat with a numeric suffix once the list runs
/// out.
fn designation(i: usize) -> String {
    let name = DESIGNATIONS[i % DESIGNATIONS.len()];
    match i / DESIGNATIONS.len() {
        0 => name.to_owned(),
        n => format!("{} Mk{}", name, n + 1),
    }
}
