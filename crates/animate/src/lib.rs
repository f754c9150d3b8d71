//! Per-frame animation of the glowrig scene.
//!
//! # Invariants
//! - Scene entities, camera state and the clock are written only from within
//!   a tick; the resize path is the single externally-triggered mutation and
//!   never runs concurrently with one (same thread).
//! - Once running, the loop never stops on its own; there is no pause/resume.
//! - Only the rings and the GPU block are mutated per frame.

pub mod clock;
pub mod driver;

pub use clock::{AnimationClock, TICK_INCREMENT};
pub use driver::{AnimationLoop, LoopState, gpu_glow_intensity, ring_spin_delta};

pub fn crate_info() -> &'static str {
    "glowrig-animate v0.1.0"
}
