#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Farmstead engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod authority;
mod grid;

pub use grid::{BoardGeometry, BoardLayout};

use authority::AuthorityError;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the board's plot grid and world-space projection.
    ConfigureBoard {
        /// Number of plot columns laid out on the board.
        columns: u32,
        /// Number of plot rows laid out on the board.
        rows: u32,
        /// Dimensions of the scene the board is projected into.
        viewport: Viewport,
    },
    /// Stores the player's build selection for subsequent build requests.
    ///
    /// The selection is sticky: every following request reads it, none
    /// consumes it.
    SetBuildConfig {
        /// Selection forwarded from the shop.
        config: BuildConfig,
    },
    /// Requests construction of the configured house at the given cell.
    RequestBuild {
        /// Cell the player tapped.
        cell: CellIndex,
    },
    /// Delivers the remote authority's answer to the pending build request.
    ResolveBuild {
        /// Committed house on success, structured failure otherwise.
        outcome: Result<House, AuthorityError>,
    },
    /// Replaces the board contents with a freshly fetched authoritative list.
    LoadHouses {
        /// Houses reported by the remote authority.
        houses: Vec<House>,
    },
    /// Creates the given number of wanderers in the hidden state.
    SpawnWanderers {
        /// Number of wanderers to create.
        count: u32,
    },
    /// Materializes a hidden wanderer onto a free cell.
    PlaceWanderer {
        /// Identifier of the wanderer to place.
        wanderer: WandererId,
        /// Cell the wanderer should appear on.
        cell: CellIndex,
        /// Time the wanderer rests before its first trip.
        dwell: Duration,
    },
    /// Sends a visible wanderer toward a new destination cell.
    ///
    /// Supersedes any trip already in flight; the new travel starts from the
    /// wanderer's current rendered position.
    SendWanderer {
        /// Identifier of the wanderer to move.
        wanderer: WandererId,
        /// Cell the wanderer should walk to.
        destination: CellIndex,
        /// Time the walk takes.
        travel: Duration,
        /// Time the wanderer rests after arriving.
        dwell: Duration,
    },
    /// Hides a wanderer until a free cell becomes available again.
    RecallWanderer {
        /// Identifier of the wanderer to hide.
        wanderer: WandererId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the board was reconfigured with new dimensions.
    BoardConfigured {
        /// Number of plot columns on the reconfigured board.
        columns: u32,
        /// Number of plot rows on the reconfigured board.
        rows: u32,
    },
    /// Reports the outcome of a bulk load from the remote authority.
    HousesLoaded {
        /// Number of houses committed onto the board.
        placed: u32,
        /// Number of malformed entries that were skipped.
        skipped: u32,
    },
    /// Announces that the board is initialized and playable.
    SceneReady,
    /// Signals that a build request was accepted and awaits the authority.
    ///
    /// Consumed by the build driver, which performs the remote call and
    /// answers with [`Command::ResolveBuild`].
    BuildRequested {
        /// Selection the request carries.
        config: BuildConfig,
        /// Cell the house should be built on.
        cell: CellIndex,
    },
    /// Confirms that a house was committed onto the board.
    HouseBuilt {
        /// The house exactly as committed.
        house: House,
    },
    /// Reports that a build request ended without mutating the board.
    BuildRejected {
        /// Cell the request targeted.
        cell: CellIndex,
        /// Specific reason the build failed.
        reason: BuildError,
    },
    /// Confirms that a wanderer was created.
    WandererSpawned {
        /// Identifier assigned to the new wanderer.
        wanderer: WandererId,
    },
    /// Confirms that a hidden wanderer appeared on a cell.
    WandererPlaced {
        /// Identifier of the placed wanderer.
        wanderer: WandererId,
        /// Cell the wanderer appeared on.
        cell: CellIndex,
    },
    /// Confirms that a wanderer started walking toward a new cell.
    WandererDeparted {
        /// Identifier of the departing wanderer.
        wanderer: WandererId,
        /// Cell the wanderer is walking to.
        to: CellIndex,
        /// Time the walk will take.
        travel: Duration,
    },
    /// Confirms that a wanderer finished its walk.
    WandererArrived {
        /// Identifier of the arriving wanderer.
        wanderer: WandererId,
        /// Cell the wanderer now rests on.
        cell: CellIndex,
    },
    /// Reports that a wanderer finished resting and wants a destination.
    WandererIdle {
        /// Identifier of the restless wanderer.
        wanderer: WandererId,
    },
    /// Confirms that a wanderer was hidden for lack of a free cell.
    WandererHidden {
        /// Identifier of the hidden wanderer.
        wanderer: WandererId,
    },
}

/// Linear address of a single plot on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(u32);

impl CellIndex {
    /// Creates a new cell index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier the remote authority assigns to a house.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseId(String);

impl HouseId {
    /// Creates a new house identifier from the authority-provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier assigned to a wanderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WandererId(u32);

impl WandererId {
    /// Creates a new wanderer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Categories of houses that can be built on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HouseKind {
    /// Resource-producing farm plot.
    Farm,
    /// Storage building.
    Storage,
    /// Decorative structure.
    Decor,
}

/// Texture identifier selecting a house's appearance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkinId(String);

impl SkinId {
    /// Creates a new skin identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A built structure occupying exactly one board cell.
///
/// Field names mirror the authority's wire payload; the remote side is the
/// source of truth and may supersede local state on reload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Identifier assigned by the remote authority.
    pub id: HouseId,
    /// Category of the structure.
    #[serde(rename = "type")]
    pub kind: HouseKind,
    /// Upgrade level reported by the authority.
    pub level: u32,
    /// Appearance applied to the structure.
    pub skin: SkinId,
    /// Cell the structure occupies.
    pub cell: CellIndex,
}

/// Player-selected build intent forwarded from the shop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    kind: HouseKind,
    skin: SkinId,
}

impl BuildConfig {
    /// Creates a new build selection.
    #[must_use]
    pub const fn new(kind: HouseKind, skin: SkinId) -> Self {
        Self { kind, skin }
    }

    /// Category of house the player wants to build.
    #[must_use]
    pub const fn kind(&self) -> HouseKind {
        self.kind
    }

    /// Appearance the player selected.
    #[must_use]
    pub const fn skin(&self) -> &SkinId {
        &self.skin
    }
}

/// Dimensions of the scene the board is projected into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the scene in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the scene in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Reasons a build request may end without mutating the board.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BuildError {
    /// No build selection was configured before the request.
    #[error("no build selection is configured")]
    ConfigurationMissing,
    /// The requested cell is outside the board or already occupied.
    #[error("cell {} is outside the board or already occupied", .0.get())]
    InvalidCell(CellIndex),
    /// The authority answered with an application-level rejection.
    #[error("authority rejected the build: {0}")]
    RemoteRejected(String),
    /// The authority could not be reached or answered unintelligibly.
    #[error("build request failed in transport: {0}")]
    TransportFailure(String),
    /// The authority confirmed the build with a structurally invalid cell.
    #[error("authority returned invalid cell {}", .0.get())]
    InconsistentResponse(CellIndex),
}

/// Read-only snapshot describing all houses placed on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HouseView {
    snapshots: Vec<House>,
}

impl HouseView {
    /// Creates a new house view from the provided snapshots.
    #[must_use]
    pub fn from_houses(mut snapshots: Vec<House>) -> Self {
        snapshots.sort_by_key(|house| house.cell);
        Self { snapshots }
    }

    /// Iterator over the captured houses in deterministic cell order.
    pub fn iter(&self) -> impl Iterator<Item = &House> {
        self.snapshots.iter()
    }

    /// Number of houses captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` when the view holds no houses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<House> {
        self.snapshots
    }
}

/// Immutable representation of a single wanderer's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WandererSnapshot {
    /// Unique identifier assigned to the wanderer.
    pub id: WandererId,
    /// Cell the wanderer claims, the destination included while walking.
    pub cell: Option<CellIndex>,
    /// Rendered world-space position, absent while hidden.
    pub position: Option<Vec2>,
    /// Indicates whether the wanderer is shown in the scene.
    pub visible: bool,
    /// Indicates whether the wanderer awaits a destination decision.
    pub restless: bool,
}

/// Read-only snapshot describing all wanderers roaming the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WandererView {
    snapshots: Vec<WandererSnapshot>,
}

impl WandererView {
    /// Creates a new wanderer view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WandererSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &WandererSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WandererSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildError, CellIndex, House, HouseId, HouseKind, HouseView, SkinId};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_index_round_trips_through_bincode() {
        assert_round_trip(&CellIndex::new(11));
    }

    #[test]
    fn house_round_trips_through_bincode() {
        let house = House {
            id: HouseId::new("h42"),
            kind: HouseKind::Storage,
            level: 2,
            skin: SkinId::new("simpleHouse"),
            cell: CellIndex::new(7),
        };
        assert_round_trip(&house);
    }

    #[test]
    fn build_error_round_trips_through_bincode() {
        assert_round_trip(&BuildError::InconsistentResponse(CellIndex::new(99)));
    }

    #[test]
    fn house_wire_shape_matches_authority_payload() {
        let payload = r#"{"id":"h1","type":"FARM","level":1,"skin":"basic","cell":5}"#;
        let house: House = serde_json::from_str(payload).expect("parse house");
        assert_eq!(house.id, HouseId::new("h1"));
        assert_eq!(house.kind, HouseKind::Farm);
        assert_eq!(house.cell, CellIndex::new(5));

        let encoded = serde_json::to_string(&house).expect("encode house");
        assert_eq!(encoded, payload);
    }

    #[test]
    fn house_view_orders_by_cell() {
        let view = HouseView::from_houses(vec![
            House {
                id: HouseId::new("b"),
                kind: HouseKind::Farm,
                level: 1,
                skin: SkinId::new("basic"),
                cell: CellIndex::new(9),
            },
            House {
                id: HouseId::new("a"),
                kind: HouseKind::Decor,
                level: 1,
                skin: SkinId::new("housAnims"),
                cell: CellIndex::new(2),
            },
        ]);

        let cells: Vec<u32> = view.iter().map(|house| house.cell.get()).collect();
        assert_eq!(cells, vec![2, 9]);
    }
}
