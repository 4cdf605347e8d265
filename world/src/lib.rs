#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Farmstead.
//!
//! The world owns the board, the build-transaction latch and every wanderer
//! accumulator. It is mutated exclusively through [`apply`] and read through
//! [`query`]. Board mutations from a committed build are performed before
//! the corresponding [`Event::HouseBuilt`] is pushed, so systems reacting to
//! the event always observe the post-commit board.

use farmstead_core::authority::AuthorityError;
use farmstead_core::{BoardGeometry, BoardLayout, BuildConfig, BuildError, Command, Event, Viewport};
use tracing::warn;

mod board;
mod session;
mod wanderers;

pub use session::BuildState;

use board::Board;
use session::BuildSession;
use wanderers::Fleet;

const DEFAULT_COLUMNS: u32 = 4;
const DEFAULT_ROWS: u32 = 4;
const DEFAULT_VIEWPORT: Viewport = Viewport::new(1024.0, 768.0);

/// Represents the authoritative Farmstead world state.
#[derive(Clone, Debug)]
pub struct World {
    geometry: BoardGeometry,
    board: Board,
    session: BuildSession,
    build_config: Option<BuildConfig>,
    wanderers: Fleet,
}

impl World {
    /// Creates a new world with the default board, empty and idle.
    #[must_use]
    pub fn new() -> Self {
        let layout = BoardLayout::new(DEFAULT_COLUMNS, DEFAULT_ROWS);
        Self {
            geometry: BoardGeometry::new(DEFAULT_VIEWPORT),
            board: Board::new(layout),
            session: BuildSession::new(),
            build_config: None,
            wanderers: Fleet::new(),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard {
            columns,
            rows,
            viewport,
        } => {
            world.board = Board::new(BoardLayout::new(columns, rows));
            world.geometry = BoardGeometry::new(viewport);
            world.session = BuildSession::new();
            world.wanderers.clear();
            out_events.push(Event::BoardConfigured { columns, rows });
        }
        Command::SetBuildConfig { config } => {
            world.build_config = Some(config);
        }
        Command::RequestBuild { cell } => {
            if world.session.is_pending() {
                // Single-flight guard: the request is dropped, not queued.
                return;
            }

            let Some(config) = world.build_config.clone() else {
                out_events.push(Event::BuildRejected {
                    cell,
                    reason: BuildError::ConfigurationMissing,
                });
                return;
            };

            if !world.board.layout().contains(cell) || world.board.is_occupied(cell) {
                out_events.push(Event::BuildRejected {
                    cell,
                    reason: BuildError::InvalidCell(cell),
                });
                return;
            }

            world.session.begin(config.clone(), cell);
            out_events.push(Event::BuildRequested { config, cell });
        }
        Command::ResolveBuild { outcome } => {
            // The latch is released before the outcome is inspected.
            let BuildState::Pending { cell: requested, .. } = world.session.take() else {
                warn!("dropping build resolution without a pending request");
                return;
            };

            match outcome {
                Ok(house) => {
                    if world.board.layout().contains(house.cell)
                        && !world.board.is_occupied(house.cell)
                    {
                        let committed = house.clone();
                        world.board.place(house);
                        out_events.push(Event::HouseBuilt { house: committed });
                    } else {
                        warn!(
                            requested = requested.get(),
                            returned = house.cell.get(),
                            "authority confirmed a build onto an invalid cell"
                        );
                        out_events.push(Event::BuildRejected {
                            cell: requested,
                            reason: BuildError::InconsistentResponse(house.cell),
                        });
                    }
                }
                Err(AuthorityError::Rejected(message)) => {
                    out_events.push(Event::BuildRejected {
                        cell: requested,
                        reason: BuildError::RemoteRejected(message),
                    });
                }
                Err(AuthorityError::Transport(message)) => {
                    out_events.push(Event::BuildRejected {
                        cell: requested,
                        reason: BuildError::TransportFailure(message),
                    });
                }
            }
        }
        Command::LoadHouses { houses } => {
            let (placed, skipped) = world.board.bulk_load(houses);
            out_events.push(Event::HousesLoaded { placed, skipped });
            out_events.push(Event::SceneReady);
        }
        Command::SpawnWanderers { count } => {
            for _ in 0..count {
                let wanderer = world.wanderers.spawn();
                out_events.push(Event::WandererSpawned { wanderer });
            }
        }
        Command::PlaceWanderer {
            wanderer,
            cell,
            dwell,
        } => {
            if !world.board.layout().contains(cell) || world.board.is_occupied(cell) {
                warn!(
                    wanderer = wanderer.get(),
                    cell = cell.get(),
                    "refusing to place a wanderer onto an unavailable cell"
                );
                return;
            }
            if world.wanderers.place(wanderer, cell, dwell) {
                out_events.push(Event::WandererPlaced { wanderer, cell });
            } else {
                warn!(wanderer = wanderer.get(), "cannot place this wanderer");
            }
        }
        Command::SendWanderer {
            wanderer,
            destination,
            travel,
            dwell,
        } => {
            if !world.board.layout().contains(destination)
                || world.board.is_occupied(destination)
            {
                warn!(
                    wanderer = wanderer.get(),
                    destination = destination.get(),
                    "refusing to send a wanderer onto an unavailable cell"
                );
                return;
            }

            let layout = world.board.layout();
            let geometry = world.geometry;
            if world
                .wanderers
                .send(wanderer, destination, travel, dwell, layout, geometry)
            {
                out_events.push(Event::WandererDeparted {
                    wanderer,
                    to: destination,
                    travel,
                });
            } else {
                warn!(wanderer = wanderer.get(), "cannot send this wanderer");
            }
        }
        Command::RecallWanderer { wanderer } => {
            if world.wanderers.recall(wanderer) {
                out_events.push(Event::WandererHidden { wanderer });
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.wanderers.tick(dt, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use farmstead_core::{
        BoardGeometry, BoardLayout, BuildConfig, CellIndex, House, HouseView, WandererView,
    };

    use super::{BuildState, World};

    /// Provides the board's plot layout.
    #[must_use]
    pub fn layout(world: &World) -> BoardLayout {
        world.board.layout()
    }

    /// Provides the board's world-space projection.
    #[must_use]
    pub fn geometry(world: &World) -> BoardGeometry {
        world.geometry
    }

    /// Current state of the build transaction latch.
    #[must_use]
    pub fn build_state(world: &World) -> BuildState {
        world.session.state()
    }

    /// Current build selection, if the shop configured one.
    #[must_use]
    pub fn build_config(world: &World) -> Option<&BuildConfig> {
        world.build_config.as_ref()
    }

    /// Reports whether the cell currently holds a house.
    #[must_use]
    pub fn is_occupied(world: &World, cell: CellIndex) -> bool {
        world.board.is_occupied(cell)
    }

    /// Returns the house occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellIndex) -> Option<&House> {
        world.board.occupant(cell)
    }

    /// Enumerates the cells without an occupant.
    #[must_use]
    pub fn free_cells(world: &World) -> Vec<CellIndex> {
        world.board.free_cells()
    }

    /// Captures a read-only view of the houses placed on the board.
    #[must_use]
    pub fn house_view(world: &World) -> HouseView {
        HouseView::from_houses(world.board.houses().cloned().collect())
    }

    /// Captures a read-only view of the wanderers roaming the board.
    #[must_use]
    pub fn wanderer_view(world: &World) -> WandererView {
        WandererView::from_snapshots(
            world
                .wanderers
                .snapshots(world.board.layout(), world.geometry),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use farmstead_core::authority::AuthorityError;
    use farmstead_core::{
        BuildConfig, BuildError, CellIndex, Command, Event, House, HouseId, HouseKind, SkinId,
        Viewport, WandererId,
    };

    use super::{apply, query, BuildState, World};

    fn configured_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                columns: 4,
                rows: 4,
                viewport: Viewport::new(1024.0, 768.0),
            },
            &mut events,
        );
        world
    }

    fn farm_config() -> BuildConfig {
        BuildConfig::new(HouseKind::Farm, SkinId::new("basic"))
    }

    fn house(id: &str, cell: u32) -> House {
        House {
            id: HouseId::new(id),
            kind: HouseKind::Farm,
            level: 1,
            skin: SkinId::new("basic"),
            cell: CellIndex::new(cell),
        }
    }

    fn request_build(world: &mut World, cell: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::RequestBuild {
                cell: CellIndex::new(cell),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn configure_emits_board_dimensions() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                columns: 5,
                rows: 3,
                viewport: Viewport::new(800.0, 600.0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BoardConfigured {
                columns: 5,
                rows: 3,
            }],
        );
        assert_eq!(query::layout(&world).total_cells(), 15);
        assert_eq!(query::free_cells(&world).len(), 15);
    }

    #[test]
    fn request_without_config_is_rejected_immediately() {
        let mut world = configured_world();
        let events = request_build(&mut world, 5);

        assert_eq!(
            events,
            vec![Event::BuildRejected {
                cell: CellIndex::new(5),
                reason: BuildError::ConfigurationMissing,
            }],
        );
        assert_eq!(query::build_state(&world), BuildState::Idle);
    }

    #[test]
    fn request_on_occupied_cell_is_rejected() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadHouses {
                houses: vec![house("h1", 5)],
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetBuildConfig {
                config: farm_config(),
            },
            &mut events,
        );

        let events = request_build(&mut world, 5);
        assert_eq!(
            events,
            vec![Event::BuildRejected {
                cell: CellIndex::new(5),
                reason: BuildError::InvalidCell(CellIndex::new(5)),
            }],
        );
    }

    #[test]
    fn request_enters_pending_and_announces_once() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBuildConfig {
                config: farm_config(),
            },
            &mut events,
        );

        let first = request_build(&mut world, 5);
        assert_eq!(
            first,
            vec![Event::BuildRequested {
                config: farm_config(),
                cell: CellIndex::new(5),
            }],
        );
        assert!(matches!(
            query::build_state(&world),
            BuildState::Pending { .. }
        ));

        // A second request while one is in flight is dropped silently.
        let second = request_build(&mut world, 6);
        assert!(second.is_empty());
    }

    #[test]
    fn successful_resolution_commits_and_notifies_exactly_once() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBuildConfig {
                config: farm_config(),
            },
            &mut events,
        );
        let _ = request_build(&mut world, 5);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResolveBuild {
                outcome: Ok(house("h1", 5)),
            },
            &mut events,
        );

        assert!(query::is_occupied(&world, CellIndex::new(5)));
        let occupant = query::occupant(&world, CellIndex::new(5)).expect("occupant");
        assert_eq!(occupant.id.as_str(), "h1");
        assert_eq!(occupant.cell, CellIndex::new(5));

        let built: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::HouseBuilt { .. }))
            .collect();
        assert_eq!(built.len(), 1);
        assert_eq!(query::build_state(&world), BuildState::Idle);
    }

    #[test]
    fn out_of_range_response_rejects_without_mutation() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBuildConfig {
                config: farm_config(),
            },
            &mut events,
        );
        let _ = request_build(&mut world, 5);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResolveBuild {
                outcome: Ok(house("h1", 99)),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BuildRejected {
                cell: CellIndex::new(5),
                reason: BuildError::InconsistentResponse(CellIndex::new(99)),
            }],
        );
        assert_eq!(query::free_cells(&world).len(), 16, "board must stay empty");
        assert_eq!(query::build_state(&world), BuildState::Idle);
    }

    #[test]
    fn transport_failure_releases_the_latch() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetBuildConfig {
                config: farm_config(),
            },
            &mut events,
        );
        let _ = request_build(&mut world, 5);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResolveBuild {
                outcome: Err(AuthorityError::Transport("connection reset".into())),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BuildRejected {
                cell: CellIndex::new(5),
                reason: BuildError::TransportFailure("connection reset".into()),
            }],
        );
        assert_eq!(query::build_state(&world), BuildState::Idle);

        // The latch must accept a fresh request afterwards.
        let retry = request_build(&mut world, 5);
        assert_eq!(retry.len(), 1);
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ResolveBuild {
                outcome: Ok(house("h1", 5)),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(!query::is_occupied(&world, CellIndex::new(5)));
    }

    #[test]
    fn bulk_load_skips_malformed_entries_without_aborting() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadHouses {
                houses: vec![
                    house("h1", 2),
                    house("h2", 99),
                    house("h3", 2),
                    house("h1", 7),
                    house("h4", 11),
                ],
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::HousesLoaded {
                    placed: 2,
                    skipped: 3,
                },
                Event::SceneReady,
            ],
        );
        assert!(query::is_occupied(&world, CellIndex::new(2)));
        assert!(query::is_occupied(&world, CellIndex::new(11)));
        assert!(!query::is_occupied(&world, CellIndex::new(7)));
    }

    #[test]
    fn every_occupant_claims_its_own_cell() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadHouses {
                houses: vec![house("h1", 0), house("h2", 9), house("h3", 15)],
            },
            &mut events,
        );

        for cell in query::layout(&world).cells() {
            if let Some(occupant) = query::occupant(&world, cell) {
                assert_eq!(occupant.cell, cell);
            }
        }
    }

    #[test]
    fn free_cells_is_idempotent_without_mutation() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadHouses {
                houses: vec![house("h1", 3)],
            },
            &mut events,
        );

        assert_eq!(query::free_cells(&world), query::free_cells(&world));
    }

    #[test]
    fn wanderer_travels_arrives_and_turns_restless() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnWanderers { count: 1 }, &mut events);
        let id = WandererId::new(0);
        apply(
            &mut world,
            Command::PlaceWanderer {
                wanderer: id,
                cell: CellIndex::new(0),
                dwell: Duration::from_millis(100),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SendWanderer {
                wanderer: id,
                destination: CellIndex::new(6),
                travel: Duration::from_millis(300),
                dwell: Duration::from_millis(200),
            },
            &mut events,
        );

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(150),
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::TimeAdvanced {
            dt: Duration::from_millis(150),
        }]);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(150),
            },
            &mut events,
        );
        assert!(events.contains(&Event::WandererArrived {
            wanderer: id,
            cell: CellIndex::new(6),
        }));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        assert!(events.contains(&Event::WandererIdle { wanderer: id }));

        let view = query::wanderer_view(&world);
        let snapshot = view.iter().next().expect("snapshot");
        assert_eq!(snapshot.cell, Some(CellIndex::new(6)));
        assert!(snapshot.visible);
        assert!(snapshot.restless);
    }

    #[test]
    fn wanderer_is_never_sent_onto_an_occupied_cell() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadHouses {
                houses: vec![house("h1", 6)],
            },
            &mut events,
        );
        apply(&mut world, Command::SpawnWanderers { count: 1 }, &mut events);
        let id = WandererId::new(0);
        apply(
            &mut world,
            Command::PlaceWanderer {
                wanderer: id,
                cell: CellIndex::new(0),
                dwell: Duration::ZERO,
            },
            &mut events,
        );

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SendWanderer {
                wanderer: id,
                destination: CellIndex::new(6),
                travel: Duration::from_millis(300),
                dwell: Duration::from_millis(200),
            },
            &mut events,
        );

        assert!(events.is_empty(), "occupied destination must be refused");
        let view = query::wanderer_view(&world);
        let snapshot = view.iter().next().expect("snapshot");
        assert_eq!(snapshot.cell, Some(CellIndex::new(0)));
    }

    #[test]
    fn recalled_wanderer_leaves_the_scene() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnWanderers { count: 1 }, &mut events);
        let id = WandererId::new(0);
        apply(
            &mut world,
            Command::PlaceWanderer {
                wanderer: id,
                cell: CellIndex::new(4),
                dwell: Duration::from_secs(1),
            },
            &mut events,
        );

        let mut events = Vec::new();
        apply(&mut world, Command::RecallWanderer { wanderer: id }, &mut events);

        assert_eq!(events, vec![Event::WandererHidden { wanderer: id }]);
        let view = query::wanderer_view(&world);
        let snapshot = view.iter().next().expect("snapshot");
        assert!(!snapshot.visible);
        assert!(snapshot.restless, "hidden wanderers wait for a free cell");
        assert_eq!(snapshot.position, None);
    }
}
