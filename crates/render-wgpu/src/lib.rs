//! wgpu render backend for the glowrig backdrop.
//!
//! Implements the capability seam: `WgpuBackend::acquire` maps the wgpu
//! stack's failure modes onto the probe taxonomy, and `WgpuContext` draws the
//! scene each frame.
//!
//! # Invariants
//! - The backend never mutates the scene; it reads geometry once (cached on
//!   first sight) and material values every frame.
//! - Adapter discovery is checked before any surface or device is attempted,
//!   so a missing driver stack always reports as the library being absent.

mod backend;
mod gpu;
mod mesh;
mod shaders;

pub use backend::WgpuBackend;
pub use gpu::WgpuContext;
