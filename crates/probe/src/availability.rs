use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the session stands with the 3D stack.
///
/// Degraded states are terminal: the scene never appears and only the status
/// text tells the user why. Reloading the app is the only recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityState {
    Loading,
    Ready,
    DegradedNoLibrary,
    DegradedNoGpu,
    DegradedNetworkBlocked,
}

impl AvailabilityState {
    /// The fixed human-readable string for this state. These five strings are
    /// the only text the core ever writes to the status surface.
    pub fn message(&self) -> &'static str {
        match self {
            AvailabilityState::Loading => "3D: loading\u{2026}",
            AvailabilityState::Ready => "3D: ready",
            AvailabilityState::DegradedNoLibrary => {
                "3D: render library missing. Check the install and reload."
            }
            AvailabilityState::DegradedNoGpu => {
                "3D: hardware acceleration unavailable. Enable it and reload."
            }
            AvailabilityState::DegradedNetworkBlocked => {
                "3D: render resources blocked by the network. Unblock them and reload."
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(
            self,
            AvailabilityState::Loading | AvailabilityState::Ready
        )
    }
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Default for AvailabilityState {
    fn default() -> Self {
        AvailabilityState::Loading
    }
}

/// Single-settle holder for the session's availability.
///
/// Starts in Loading and accepts exactly one terminal state; later settles
/// are ignored.
#[derive(Debug, Default)]
pub struct Availability {
    state: AvailabilityState,
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AvailabilityState {
        self.state
    }

    /// Settle into a terminal state. Returns whether the transition was
    /// taken; a second settle (or settling back to Loading) is refused.
    pub fn settle(&mut self, state: AvailabilityState) -> bool {
        if self.state != AvailabilityState::Loading || state == AvailabilityState::Loading {
            tracing::debug!(current = %self.state, refused = %state, "availability transition refused");
            return false;
        }
        self.state = state;
        true
    }
}
