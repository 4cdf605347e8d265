#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scene-facing contracts for Farmstead adapters.
//!
//! This crate owns the UI boundary: the typed notifications the interface
//! consumes, the publish/subscribe bus that carries them, the world-space
//! scene snapshot a renderer draws from, and the cursor hit test that turns
//! a click back into a cell. The engine itself never learns who subscribes.

use farmstead_core::{
    BoardGeometry, BoardLayout, BuildError, CellIndex, Event, House, HouseView, WandererId,
    WandererView,
};
use glam::Vec2;

/// Typed notifications consumed by the user interface.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// The board is initialized and playable.
    SceneReady,
    /// A house was committed; carries the payload the sidebar refreshes from.
    HouseBuilt {
        /// The house exactly as committed.
        house: House,
    },
    /// A build attempt ended without a new house.
    BuildFailed {
        /// Cell the attempt targeted.
        cell: CellIndex,
        /// User-presentable reason.
        reason: BuildError,
    },
}

/// Maps a batch of world events onto interface notifications.
#[must_use]
pub fn notifications(events: &[Event]) -> Vec<Notification> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::SceneReady => Some(Notification::SceneReady),
            Event::HouseBuilt { house } => Some(Notification::HouseBuilt {
                house: house.clone(),
            }),
            Event::BuildRejected { cell, reason } => Some(Notification::BuildFailed {
                cell: *cell,
                reason: reason.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Receiver registered with the [`NotificationBus`].
pub trait NotificationSink {
    /// Delivers a single notification to the subscriber.
    fn deliver(&mut self, notification: &Notification);
}

/// Explicit publish/subscribe channel between the engine and the interface.
#[derive(Default)]
pub struct NotificationBus {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl NotificationBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Registers a subscriber for every future publication.
    pub fn subscribe(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Converts the event batch into notifications and delivers each one to
    /// every subscriber, returning the batch.
    pub fn publish(&mut self, events: &[Event]) -> Vec<Notification> {
        let batch = notifications(events);
        for notification in &batch {
            for sink in &mut self.sinks {
                sink.deliver(notification);
            }
        }
        batch
    }
}

/// Renderable description of a placed house.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneHouse {
    /// The committed house record.
    pub house: House,
    /// World-space center of the occupied cell.
    pub position: Vec2,
}

/// Renderable description of a visible wanderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneWanderer {
    /// Identifier of the wanderer.
    pub id: WandererId,
    /// World-space position, interpolated mid-walk.
    pub position: Vec2,
}

/// Complete world-space snapshot a renderer draws in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneView {
    houses: Vec<SceneHouse>,
    wanderers: Vec<SceneWanderer>,
}

impl SceneView {
    /// Houses to draw, in deterministic cell order.
    #[must_use]
    pub fn houses(&self) -> &[SceneHouse] {
        &self.houses
    }

    /// Visible wanderers to draw, in deterministic identifier order.
    #[must_use]
    pub fn wanderers(&self) -> &[SceneWanderer] {
        &self.wanderers
    }
}

/// Projects the world's views into a renderable scene snapshot.
#[must_use]
pub fn scene_view(
    layout: &BoardLayout,
    geometry: &BoardGeometry,
    houses: &HouseView,
    wanderers: &WandererView,
) -> SceneView {
    SceneView {
        houses: houses
            .iter()
            .map(|house| SceneHouse {
                house: house.clone(),
                position: geometry.position(layout, house.cell),
            })
            .collect(),
        wanderers: wanderers
            .iter()
            .filter_map(|snapshot| {
                snapshot.position.map(|position| SceneWanderer {
                    id: snapshot.id,
                    position,
                })
            })
            .collect(),
    }
}

/// Maps a world-space position back onto the cell whose footprint covers it.
///
/// Returns the nearest cell center within half a footprint, or `None` when
/// the position lies outside every plot. The inverse of the projection used
/// for placement and movement.
#[must_use]
pub fn cell_at_position(
    layout: &BoardLayout,
    geometry: &BoardGeometry,
    position: Vec2,
) -> Option<CellIndex> {
    let reach = geometry.cell_length() / 2.0;

    layout
        .cells()
        .map(|cell| (cell, geometry.position(layout, cell).distance(position)))
        .filter(|(_, distance)| *distance <= reach)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use farmstead_core::{
        BoardGeometry, BoardLayout, BuildError, CellIndex, Event, House, HouseId, HouseKind,
        HouseView, SkinId, Viewport, WandererId, WandererSnapshot, WandererView,
    };

    use super::{
        cell_at_position, notifications, scene_view, Notification, NotificationBus,
        NotificationSink,
    };

    fn layout() -> BoardLayout {
        BoardLayout::new(4, 4)
    }

    fn geometry() -> BoardGeometry {
        BoardGeometry::new(Viewport::new(1024.0, 768.0))
    }

    fn sample_house(cell: u32) -> House {
        House {
            id: HouseId::new("h1"),
            kind: HouseKind::Farm,
            level: 1,
            skin: SkinId::new("basic"),
            cell: CellIndex::new(cell),
        }
    }

    #[test]
    fn engine_events_map_onto_interface_notifications() {
        let events = vec![
            Event::SceneReady,
            Event::HouseBuilt {
                house: sample_house(5),
            },
            Event::WandererIdle {
                wanderer: WandererId::new(0),
            },
            Event::BuildRejected {
                cell: CellIndex::new(2),
                reason: BuildError::ConfigurationMissing,
            },
        ];

        let batch = notifications(&events);
        assert_eq!(batch.len(), 3, "internal wanderer events stay internal");
        assert_eq!(batch[0], Notification::SceneReady);
        assert!(matches!(batch[1], Notification::HouseBuilt { .. }));
        assert!(matches!(batch[2], Notification::BuildFailed { .. }));
    }

    #[test]
    fn bus_delivers_each_notification_to_every_subscriber() {
        struct Counter {
            delivered: std::rc::Rc<std::cell::Cell<u32>>,
        }

        impl NotificationSink for Counter {
            fn deliver(&mut self, _notification: &Notification) {
                self.delivered.set(self.delivered.get() + 1);
            }
        }

        let first = std::rc::Rc::new(std::cell::Cell::new(0));
        let second = std::rc::Rc::new(std::cell::Cell::new(0));

        let mut bus = NotificationBus::new();
        bus.subscribe(Box::new(Counter {
            delivered: first.clone(),
        }));
        bus.subscribe(Box::new(Counter {
            delivered: second.clone(),
        }));

        let batch = bus.publish(&[
            Event::SceneReady,
            Event::HouseBuilt {
                house: sample_house(3),
            },
        ]);

        assert_eq!(batch.len(), 2);
        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn scene_view_positions_houses_and_skips_hidden_wanderers() {
        let layout = layout();
        let geometry = geometry();
        let houses = HouseView::from_houses(vec![sample_house(5)]);
        let wanderers = WandererView::from_snapshots(vec![
            WandererSnapshot {
                id: WandererId::new(0),
                cell: Some(CellIndex::new(2)),
                position: Some(geometry.position(&layout, CellIndex::new(2))),
                visible: true,
                restless: false,
            },
            WandererSnapshot {
                id: WandererId::new(1),
                cell: None,
                position: None,
                visible: false,
                restless: true,
            },
        ]);

        let scene = scene_view(&layout, &geometry, &houses, &wanderers);

        assert_eq!(scene.houses().len(), 1);
        assert_eq!(
            scene.houses()[0].position,
            geometry.position(&layout, CellIndex::new(5)),
        );
        assert_eq!(scene.wanderers().len(), 1, "hidden wanderers are not drawn");
    }

    #[test]
    fn hit_test_inverts_the_projection() {
        let layout = layout();
        let geometry = geometry();

        for cell in layout.cells() {
            let center = geometry.position(&layout, cell);
            assert_eq!(cell_at_position(&layout, &geometry, center), Some(cell));
        }
    }

    #[test]
    fn hit_test_rejects_positions_off_the_board() {
        let layout = layout();
        let geometry = geometry();

        assert_eq!(
            cell_at_position(&layout, &geometry, glam::Vec2::new(-10_000.0, -10_000.0)),
            None,
        );
    }
}
