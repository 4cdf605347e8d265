//! Build transaction latch.

use farmstead_core::{BuildConfig, CellIndex};

/// Externally visible state of the build transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildState {
    /// No build request is in flight.
    Idle,
    /// A request was forwarded to the authority and awaits resolution.
    Pending {
        /// Selection the pending request carries.
        config: BuildConfig,
        /// Cell the pending request targets.
        cell: CellIndex,
    },
}

/// Single-flight guard around the remote build call.
///
/// A boolean latch, not a queue: a second request while one is pending is
/// dropped, never buffered.
#[derive(Clone, Debug)]
pub(crate) struct BuildSession {
    state: BuildState,
}

impl BuildSession {
    pub(crate) const fn new() -> Self {
        Self {
            state: BuildState::Idle,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self.state, BuildState::Pending { .. })
    }

    pub(crate) fn begin(&mut self, config: BuildConfig, cell: CellIndex) {
        self.state = BuildState::Pending { config, cell };
    }

    /// Releases the latch and yields the state it held.
    ///
    /// Called unconditionally on resolution so no outcome can leave the
    /// session wedged in `Pending`.
    pub(crate) fn take(&mut self) -> BuildState {
        std::mem::replace(&mut self.state, BuildState::Idle)
    }

    pub(crate) fn state(&self) -> BuildState {
        self.state.clone()
    }
}
