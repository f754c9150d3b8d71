//! Availability detection and the degradation state machine.
//!
//! # Invariants
//! - Exactly one transition Loading -> {Ready | Degraded*} per session; no
//!   further transitions, no retries. A failure is terminal until restart.
//! - The three failure kinds are mutually exclusive and checked in order:
//!   resource load, library presence, context creation.
//! - Every outcome updates the status reporter exactly once.

pub mod availability;
pub mod loader;
pub mod report;
pub mod startup;

pub use availability::{Availability, AvailabilityState};
pub use loader::{BlockedLoader, LoadError, ResourceLoader, StaticLoader};
pub use report::{LogReporter, RecordingReporter, StatusReporter};
pub use startup::{LIBRARY_RESOURCE, ProbeError, Startup, probe, startup};

pub fn crate_info() -> &'static str {
    "glowrig-probe v0.1.0"
}
