//! Rendering capability seam.
//!
//! # Invariants
//! - The rendering library lives entirely behind `RenderBackend`; nothing it
//!   owns crosses this boundary. Contexts read plain material values from the
//!   scene each frame.
//! - `acquire` failures carry the library-missing / context-creation
//!   distinction the availability machine needs; a backend reports at most
//!   one of them per acquire.
//!
//! The headless backend renders to frame summaries instead of pixels. It is
//! the reference implementation for tests and CLI tooling; swap in the wgpu
//! backend without changing consumers.

mod backend;
mod headless;

pub use backend::{AcquireError, RenderBackend, RenderContext, SurfaceSpec};
pub use headless::{FrameSummary, HeadlessBackend, HeadlessContext};

pub fn crate_info() -> &'static str {
    "glowrig-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
