use glowrig_common::PackedRgb;
use serde::{Deserialize, Serialize};

/// Mutable surface state of an entity.
///
/// Geometry is immutable after construction; this is the part the frame
/// driver is allowed to rewrite. Values are plain data; nothing from the
/// rendering library leaks through here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialState {
    pub color: PackedRgb,
    pub emissive: PackedRgb,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            color: PackedRgb(0xcccccc),
            emissive: PackedRgb(0x000000),
            emissive_intensity: 0.0,
            metalness: 0.0,
            roughness: 1.0,
            opacity: 1.0,
            transparent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_opaque() {
        let m = MaterialState::default();
        assert!(!m.transparent);
        assert_eq!(m.opacity, 1.0);
        assert_eq!(m.emissive_intensity, 0.0);
    }
}
