#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Farmstead scene.
//!
//! Produces the command batch that configures the board, performs the
//! initial bulk load from the remote authority and spawns the wanderers. A
//! failed initial fetch is logged and the scene starts with an empty board,
//! exactly like a failed load in the browser client.

use farmstead_core::authority::BuildAuthority;
use farmstead_core::{Command, Viewport};
use tracing::warn;

/// Configuration parameters required to construct the bootstrap system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    columns: u32,
    rows: u32,
    viewport: Viewport,
    wanderer_count: u32,
}

impl Config {
    /// Creates a new configuration with explicit field values.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, viewport: Viewport, wanderer_count: u32) -> Self {
        Self {
            columns,
            rows,
            viewport,
            wanderer_count,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
            viewport: Viewport::new(1024.0, 768.0),
            wanderer_count: 3,
        }
    }
}

/// Produces the command batch that boots the experience.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    /// Creates a new bootstrap system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Derives the commands that initialize the scene.
    ///
    /// The returned batch is applied in order: configure, load, spawn. The
    /// world announces `SceneReady` once the load commits.
    pub fn commands<A>(&self, authority: &mut A) -> Vec<Command>
    where
        A: BuildAuthority,
    {
        let houses = match authority.fetch_houses() {
            Ok(houses) => houses,
            Err(error) => {
                warn!(%error, "initial house load failed, starting with an empty board");
                Vec::new()
            }
        };

        vec![
            Command::ConfigureBoard {
                columns: self.config.columns,
                rows: self.config.rows,
                viewport: self.config.viewport,
            },
            Command::LoadHouses { houses },
            Command::SpawnWanderers {
                count: self.config.wanderer_count,
            },
        ]
    }
}
