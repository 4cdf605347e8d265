#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wandering system that assigns destinations to roamers.
//!
//! The world owns every wanderer's timers; this system owns the decisions.
//! It answers restless and hidden wanderers with uniformly-random free
//! cells, draws randomized travel and dwell durations, and relocates any
//! wanderer standing on a cell that just gained a house. Destinations come
//! exclusively from the current free-cell list, so a wanderer never targets
//! an occupied cell; two wanderers sharing a cell is deliberately allowed.

use std::time::Duration;

use farmstead_core::{
    BoardGeometry, BoardLayout, CellIndex, Command, Event, WandererId, WandererView,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fraction of one cell footprint used as the relocation radius.
///
/// Must stay below half the spacing between adjacent plot centres so a
/// wanderer resting one cell away is never swept up.
const RELOCATION_RADIUS_FRACTION: f32 = 0.3;

const DEFAULT_TRAVEL_RANGE: (Duration, Duration) =
    (Duration::from_millis(1_500), Duration::from_millis(4_000));
const DEFAULT_DWELL_RANGE: (Duration, Duration) =
    (Duration::from_millis(800), Duration::from_millis(2_500));
const DEFAULT_RNG_SEED: u64 = 0x7c33_0ac5_19de_9d11;

/// Configuration parameters required to construct the wandering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    travel_range: (Duration, Duration),
    dwell_range: (Duration, Duration),
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from explicit duration ranges and seed.
    #[must_use]
    pub const fn new(
        travel_range: (Duration, Duration),
        dwell_range: (Duration, Duration),
        rng_seed: u64,
    ) -> Self {
        Self {
            travel_range,
            dwell_range,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            travel_range: DEFAULT_TRAVEL_RANGE,
            dwell_range: DEFAULT_DWELL_RANGE,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Pure system that deterministically emits wanderer commands.
#[derive(Clone, Debug)]
pub struct Wander {
    travel_range: (Duration, Duration),
    dwell_range: (Duration, Duration),
    rng: ChaCha8Rng,
}

impl Wander {
    /// Creates a new wandering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            travel_range: config.travel_range,
            dwell_range: config.dwell_range,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and immutable views to emit wanderer commands.
    ///
    /// `free_cells` must be queried after the events were applied, so a
    /// freshly committed house is already excluded from the draw pool.
    pub fn handle(
        &mut self,
        events: &[Event],
        wanderers: &WandererView,
        free_cells: &[CellIndex],
        layout: &BoardLayout,
        geometry: &BoardGeometry,
        out: &mut Vec<Command>,
    ) {
        if events.is_empty() {
            return;
        }

        let displaced = displaced_wanderers(events, wanderers, free_cells, layout, geometry);

        // Hidden wanderers draw without replacement from cells no other
        // wanderer claims, so a single free cell admits exactly one of them.
        // Travel destinations draw from the plain free list and may repeat.
        let mut placement_pool: Vec<CellIndex> = free_cells
            .iter()
            .copied()
            .filter(|cell| {
                !wanderers
                    .iter()
                    .any(|other| other.visible && other.cell == Some(*cell))
            })
            .collect();

        for wanderer in wanderers.iter() {
            if displaced.contains(&wanderer.id) {
                match self.pick_cell(free_cells) {
                    Some(destination) => out.push(Command::SendWanderer {
                        wanderer: wanderer.id,
                        destination,
                        travel: self.draw(self.travel_range),
                        dwell: self.draw(self.dwell_range),
                    }),
                    None => out.push(Command::RecallWanderer {
                        wanderer: wanderer.id,
                    }),
                }
                continue;
            }

            if !wanderer.restless {
                continue;
            }

            if wanderer.visible {
                if let Some(destination) = self.pick_cell(free_cells) {
                    out.push(Command::SendWanderer {
                        wanderer: wanderer.id,
                        destination,
                        travel: self.draw(self.travel_range),
                        dwell: self.draw(self.dwell_range),
                    });
                }
            } else if let Some(cell) = self.pick_from_pool(&mut placement_pool) {
                out.push(Command::PlaceWanderer {
                    wanderer: wanderer.id,
                    cell,
                    dwell: self.draw(self.dwell_range),
                });
            }
        }
    }

    fn pick_cell(&mut self, free_cells: &[CellIndex]) -> Option<CellIndex> {
        if free_cells.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..free_cells.len());
        Some(free_cells[index])
    }

    fn pick_from_pool(&mut self, pool: &mut Vec<CellIndex>) -> Option<CellIndex> {
        if pool.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..pool.len());
        Some(pool.swap_remove(index))
    }

    fn draw(&mut self, range: (Duration, Duration)) -> Duration {
        let min = range.0.min(range.1);
        let max = range.0.max(range.1);
        if min == max {
            return min;
        }
        let millis = self
            .rng
            .gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

/// Identifies wanderers that must leave their spot because a cell they are
/// standing on, or next to within the relocation radius, gained a house.
fn displaced_wanderers(
    events: &[Event],
    wanderers: &WandererView,
    free_cells: &[CellIndex],
    layout: &BoardLayout,
    geometry: &BoardGeometry,
) -> Vec<WandererId> {
    let radius = geometry.cell_length() * RELOCATION_RADIUS_FRACTION;
    let mut displaced = Vec::new();

    for event in events {
        match event {
            Event::HouseBuilt { house } => {
                let site = geometry.position(layout, house.cell);
                for wanderer in wanderers.iter() {
                    let Some(position) = wanderer.position else {
                        continue;
                    };
                    // Standing on the cell, or walking toward it.
                    let conflicting = position.distance(site) <= radius
                        || wanderer.cell == Some(house.cell);
                    if conflicting && !displaced.contains(&wanderer.id) {
                        displaced.push(wanderer.id);
                    }
                }
            }
            Event::HousesLoaded { .. } => {
                // A reload may drop houses onto claimed cells wholesale.
                for wanderer in wanderers.iter() {
                    let Some(cell) = wanderer.cell else {
                        continue;
                    };
                    if !free_cells.contains(&cell) && !displaced.contains(&wanderer.id) {
                        displaced.push(wanderer.id);
                    }
                }
            }
            _ => {}
        }
    }

    displaced
}
