//! Wanderer state and timing.
//!
//! Wanderers claim free cells only loosely: their occupancy is never written
//! into the board's slots. The world owns every timing accumulator so that
//! dropping the world releases all pending movement.

use std::time::Duration;

use farmstead_core::{
    BoardGeometry, BoardLayout, CellIndex, Event, WandererId, WandererSnapshot,
};
use glam::Vec2;

/// Collection of roaming entities and their identifier counter.
#[derive(Clone, Debug)]
pub(crate) struct Fleet {
    wanderers: Vec<Wanderer>,
    next_id: u32,
}

impl Fleet {
    pub(crate) const fn new() -> Self {
        Self {
            wanderers: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.wanderers.clear();
        self.next_id = 0;
    }

    /// Creates a hidden wanderer and returns its identifier.
    pub(crate) fn spawn(&mut self) -> WandererId {
        let id = WandererId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.wanderers.push(Wanderer {
            id,
            phase: Phase::Hidden,
            restless_flagged: false,
        });
        id
    }

    /// Materializes a hidden wanderer onto a cell. Returns `false` when the
    /// wanderer is unknown or already visible.
    pub(crate) fn place(&mut self, id: WandererId, cell: CellIndex, dwell: Duration) -> bool {
        let Some(wanderer) = self.get_mut(id) else {
            return false;
        };
        if !matches!(wanderer.phase, Phase::Hidden) {
            return false;
        }

        wanderer.phase = Phase::Dwelling {
            cell,
            dwell,
            elapsed: Duration::ZERO,
        };
        wanderer.restless_flagged = false;
        true
    }

    /// Starts a trip toward `destination`, superseding any trip in flight.
    /// The new travel is anchored at the wanderer's current rendered
    /// position. Returns `false` for unknown or hidden wanderers.
    pub(crate) fn send(
        &mut self,
        id: WandererId,
        destination: CellIndex,
        travel: Duration,
        dwell: Duration,
        layout: BoardLayout,
        geometry: BoardGeometry,
    ) -> bool {
        let Some(wanderer) = self.get_mut(id) else {
            return false;
        };
        let Some(origin) = wanderer.position(layout, geometry) else {
            return false;
        };

        wanderer.phase = Phase::Traveling {
            origin,
            to: destination,
            travel,
            dwell,
            elapsed: Duration::ZERO,
        };
        wanderer.restless_flagged = false;
        true
    }

    /// Hides a wanderer. Returns `false` when it was already hidden.
    pub(crate) fn recall(&mut self, id: WandererId) -> bool {
        let Some(wanderer) = self.get_mut(id) else {
            return false;
        };
        if matches!(wanderer.phase, Phase::Hidden) {
            return false;
        }

        wanderer.phase = Phase::Hidden;
        wanderer.restless_flagged = false;
        true
    }

    /// Advances every accumulator, emitting arrival and idle events.
    pub(crate) fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for wanderer in &mut self.wanderers {
            match &mut wanderer.phase {
                Phase::Hidden => {}
                Phase::Traveling {
                    to,
                    travel,
                    dwell,
                    elapsed,
                    ..
                } => {
                    *elapsed = elapsed.saturating_add(dt);
                    if *elapsed >= *travel {
                        let cell = *to;
                        let carried = elapsed.saturating_sub(*travel);
                        let dwell = *dwell;
                        wanderer.phase = Phase::Dwelling {
                            cell,
                            dwell,
                            elapsed: carried,
                        };
                        out_events.push(Event::WandererArrived {
                            wanderer: wanderer.id,
                            cell,
                        });
                        if carried >= dwell && wanderer.mark_restless() {
                            out_events.push(Event::WandererIdle {
                                wanderer: wanderer.id,
                            });
                        }
                    }
                }
                Phase::Dwelling { dwell, elapsed, .. } => {
                    *elapsed = elapsed.saturating_add(dt);
                    if *elapsed >= *dwell && wanderer.mark_restless() {
                        out_events.push(Event::WandererIdle {
                            wanderer: wanderer.id,
                        });
                    }
                }
            }
        }
    }

    pub(crate) fn snapshots(
        &self,
        layout: BoardLayout,
        geometry: BoardGeometry,
    ) -> Vec<WandererSnapshot> {
        self.wanderers
            .iter()
            .map(|wanderer| WandererSnapshot {
                id: wanderer.id,
                cell: wanderer.claimed_cell(),
                position: wanderer.position(layout, geometry),
                visible: !matches!(wanderer.phase, Phase::Hidden),
                restless: wanderer.is_restless(),
            })
            .collect()
    }

    fn get_mut(&mut self, id: WandererId) -> Option<&mut Wanderer> {
        self.wanderers.iter_mut().find(|wanderer| wanderer.id == id)
    }
}

#[derive(Clone, Debug)]
struct Wanderer {
    id: WandererId,
    phase: Phase,
    restless_flagged: bool,
}

impl Wanderer {
    fn claimed_cell(&self) -> Option<CellIndex> {
        match self.phase {
            Phase::Hidden => None,
            Phase::Dwelling { cell, .. } => Some(cell),
            Phase::Traveling { to, .. } => Some(to),
        }
    }

    fn position(&self, layout: BoardLayout, geometry: BoardGeometry) -> Option<Vec2> {
        match &self.phase {
            Phase::Hidden => None,
            Phase::Dwelling { cell, .. } => Some(geometry.position(&layout, *cell)),
            Phase::Traveling {
                origin,
                to,
                travel,
                elapsed,
                ..
            } => {
                let target = geometry.position(&layout, *to);
                let progress = if travel.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / travel.as_secs_f32()).min(1.0)
                };
                Some(origin.lerp(target, progress))
            }
        }
    }

    fn is_restless(&self) -> bool {
        match &self.phase {
            Phase::Hidden => true,
            Phase::Dwelling { dwell, elapsed, .. } => elapsed >= dwell,
            Phase::Traveling { .. } => false,
        }
    }

    /// Flags restlessness, reporting whether the flag was newly set.
    fn mark_restless(&mut self) -> bool {
        let was_flagged = self.restless_flagged;
        self.restless_flagged = true;
        !was_flagged
    }
}

#[derive(Clone, Debug)]
enum Phase {
    Hidden,
    Dwelling {
        cell: CellIndex,
        dwell: Duration,
        elapsed: Duration,
    },
    Traveling {
        origin: Vec2,
        to: CellIndex,
        travel: Duration,
        dwell: Duration,
        elapsed: Duration,
    },
}
