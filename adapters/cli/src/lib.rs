#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless adapter that drives a Farmstead session end to end.
//!
//! Boots a scene against an in-process authority, pumps the build and
//! wander systems the way an interactive adapter would every frame, and
//! reports what happened through the presentation boundary.

pub mod authority;
pub mod session;
pub mod tuning;
