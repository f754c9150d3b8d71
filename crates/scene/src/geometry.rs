use serde::{Deserialize, Serialize};

/// Immutable shape of an entity.
///
/// `Points` carries its positions inline: the starfield is sampled once at
/// build time and never resampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Points {
        positions: Vec<[f32; 3]>,
        size: f32,
    },
}
