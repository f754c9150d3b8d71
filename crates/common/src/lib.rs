//! Shared leaf types for the glowrig scene.
//!
//! # Invariants
//! - `ring_color` is pure: same (t, ring index) always yields the same color.
//! - Packed colors are 24-bit, R<<16 | G<<8 | B, channels rounded to [0, 255].

pub mod color;
pub mod types;

pub use color::{PackedRgb, hsv_to_rgb, ring_color};
pub use types::{EntityId, Transform};

pub fn crate_info() -> &'static str {
    "glowrig-common v0.1.0"
}
