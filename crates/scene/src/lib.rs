//! Scene graph and camera rig for the glowrig backdrop.
//!
//! # Invariants
//! - Entity iteration order is deterministic (BTreeMap).
//! - Building a scene never touches the animation clock or the camera; those
//!   belong to the frame driver.
//! - While a rig is active, all camera motion is rig-mediated.

pub mod builder;
pub mod camera;
pub mod geometry;
pub mod graph;
pub mod material;
pub mod rig;

pub use builder::SceneBuilder;
pub use camera::CameraState;
pub use geometry::Geometry;
pub use graph::{Light, RING_COUNT, Scene, SceneEntity, SceneHandles};
pub use material::MaterialState;
pub use rig::CameraRig;

pub fn crate_info() -> &'static str {
    "glowrig-scene v0.1.0"
}
