#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Build driver that carries accepted build requests to the remote authority.
//!
//! The world's single-flight latch guarantees at most one
//! [`Event::BuildRequested`] is outstanding, so the driver performs exactly
//! one remote call per accepted request and answers with
//! [`Command::ResolveBuild`] whatever the authority said. No timeout is
//! imposed on the call; resolution is owned by the transport behind the
//! [`BuildAuthority`] implementation.

use farmstead_core::authority::{BuildAuthority, BuildRequest};
use farmstead_core::{Command, Event};

/// System that resolves pending build requests against the authority.
#[derive(Debug)]
pub struct BuildDriver<A> {
    authority: A,
}

impl<A> BuildDriver<A>
where
    A: BuildAuthority,
{
    /// Creates a new driver around the provided authority port.
    #[must_use]
    pub const fn new(authority: A) -> Self {
        Self { authority }
    }

    /// Borrows the wrapped authority, mainly for inspection in tests.
    #[must_use]
    pub const fn authority(&self) -> &A {
        &self.authority
    }

    /// Consumes world events and emits a resolution for every accepted
    /// build request.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::BuildRequested { config, cell } = event {
                let request =
                    BuildRequest::new(config.kind(), config.skin().clone(), *cell);
                let outcome = self.authority.build_house(&request);
                out.push(Command::ResolveBuild { outcome });
            }
        }
    }
}
