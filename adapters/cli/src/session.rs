//! Scripted headless session: boot, build, roam, report.

use std::time::Duration;

use farmstead_core::{BuildConfig, Command, Event, HouseKind, SkinId, Viewport};
use farmstead_presentation::{notifications, Notification};
use farmstead_system_bootstrap::{Bootstrap, Config as BootstrapConfig};
use farmstead_system_build::BuildDriver;
use farmstead_system_wander::{Config as WanderConfig, Wander};
use farmstead_world::{self as world, query, World};
use tracing::info;

use crate::authority::LocalAuthority;
use crate::tuning::Tuning;

const VIEWPORT: Viewport = Viewport::new(1024.0, 768.0);
const TICK: Duration = Duration::from_millis(100);

/// Everything a session run needs to know.
#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    /// Board and wanderer tuning.
    pub tuning: Tuning,
    /// Seed for the wander system's generator.
    pub seed: u64,
    /// Number of 100 ms simulation ticks to run after building.
    pub ticks: u32,
    /// Number of farms the script attempts to build.
    pub builds: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            seed: 2_024,
            ticks: 40,
            builds: 2,
        }
    }
}

/// Outcome summary of a completed session.
#[derive(Clone, Debug)]
pub struct SessionReport {
    /// Houses standing on the board when the session ended.
    pub houses: usize,
    /// Wanderers visible in the scene.
    pub visible_wanderers: usize,
    /// Wanderers hidden for lack of a free cell.
    pub hidden_wanderers: usize,
    /// Every notification the interface would have received, in order.
    pub notifications: Vec<Notification>,
}

/// Runs a scripted session against a fresh in-process authority.
#[must_use]
pub fn run(options: &SessionOptions) -> SessionReport {
    let mut authority = LocalAuthority::new();
    let bootstrap = Bootstrap::new(BootstrapConfig::new(
        options.tuning.board.columns,
        options.tuning.board.rows,
        VIEWPORT,
        options.tuning.wanderers.count,
    ));
    let boot_commands = bootstrap.commands(&mut authority);

    let mut world = World::new();
    let mut driver = BuildDriver::new(authority);
    let mut wander = Wander::new(WanderConfig::new(
        options.tuning.wanderers.travel_range(),
        options.tuning.wanderers.dwell_range(),
        options.seed,
    ));
    let mut log: Vec<Notification> = Vec::new();

    let mut events = Vec::new();
    for command in boot_commands {
        world::apply(&mut world, command, &mut events);
    }
    drain(&mut world, &mut wander, &mut driver, events, &mut log);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetBuildConfig {
            config: BuildConfig::new(HouseKind::Farm, SkinId::new("basic")),
        },
        &mut events,
    );
    drain(&mut world, &mut wander, &mut driver, events, &mut log);

    for _ in 0..options.builds {
        let Some(cell) = query::free_cells(&world).first().copied() else {
            info!("board is full, stopping the build script");
            break;
        };

        let mut events = Vec::new();
        world::apply(&mut world, Command::RequestBuild { cell }, &mut events);
        drain(&mut world, &mut wander, &mut driver, events, &mut log);
    }

    for _ in 0..options.ticks {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        drain(&mut world, &mut wander, &mut driver, events, &mut log);
    }

    let wanderers = query::wanderer_view(&world);
    let visible = wanderers.iter().filter(|snapshot| snapshot.visible).count();
    let hidden = wanderers.iter().filter(|snapshot| !snapshot.visible).count();

    SessionReport {
        houses: query::house_view(&world).len(),
        visible_wanderers: visible,
        hidden_wanderers: hidden,
        notifications: log,
    }
}

/// Feeds system reactions back into the world until no commands remain,
/// logging the notifications each event batch produces.
fn drain(
    world: &mut World,
    wander: &mut Wander,
    driver: &mut BuildDriver<LocalAuthority>,
    mut events: Vec<Event>,
    log: &mut Vec<Notification>,
) {
    loop {
        log.extend(notifications(&events));

        let mut commands = Vec::new();
        driver.handle(&events, &mut commands);

        let view = query::wanderer_view(world);
        let free = query::free_cells(world);
        let layout = query::layout(world);
        let geometry = query::geometry(world);
        wander.handle(&events, &view, &free, &layout, &geometry, &mut commands);

        if commands.is_empty() {
            break;
        }

        events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}
