use crate::geometry::Geometry;
use crate::material::MaterialState;
use glam::{Quat, Vec3};
use glowrig_common::{EntityId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of emissive rings on the tower front.
pub const RING_COUNT: usize = 3;

/// A renderable entity: immutable geometry plus mutable material state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntity {
    pub name: String,
    pub transform: Transform,
    /// Orientation before any accumulated spin is applied.
    pub base_rotation: Quat,
    pub geometry: Geometry,
    pub material: MaterialState,
}

/// Scene lighting. Fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient { intensity: f32 },
    Directional { intensity: f32, position: Vec3 },
}

/// Typed handles into the entity map for the few entities the frame driver
/// mutates or the renderer treats specially.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneHandles {
    pub tower: EntityId,
    pub glass: EntityId,
    pub rings: [EntityId; RING_COUNT],
    pub gpu_block: EntityId,
    pub starfield: EntityId,
}

/// The scene graph: all renderable entities plus lights.
///
/// Created once after a successful capability probe; lives for the process.
/// Stored in a BTreeMap so iteration order is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    entities: BTreeMap<EntityId, SceneEntity>,
    lights: Vec<Light>,
    handles: SceneHandles,
}

impl Scene {
    pub fn new(
        entities: BTreeMap<EntityId, SceneEntity>,
        lights: Vec<Light>,
        handles: SceneHandles,
    ) -> Self {
        Self {
            entities,
            lights,
            handles,
        }
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, SceneEntity> {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn material(&self, id: EntityId) -> Option<&MaterialState> {
        self.entities.get(&id).map(|e| &e.material)
    }

    /// The one sanctioned mutation path for surface state.
    pub fn material_mut(&mut self, id: EntityId) -> Option<&mut MaterialState> {
        self.entities.get_mut(&id).map(|e| &mut e.material)
    }

    /// Set an entity's accumulated spin about its local z axis, composed onto
    /// its base orientation. Used by the frame driver for the rings.
    pub fn set_spin_z(&mut self, id: EntityId, angle: f32) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.transform.rotation = entity.base_rotation * Quat::from_rotation_z(angle);
        }
    }

    /// Total ambient intensity, summed over ambient lights.
    pub fn ambient_intensity(&self) -> f32 {
        self.lights
            .iter()
            .map(|l| match l {
                Light::Ambient { intensity } => *intensity,
                _ => 0.0,
            })
            .sum()
    }

    /// The key light, if any: (direction toward the scene origin, intensity).
    pub fn key_light(&self) -> Option<(Vec3, f32)> {
        self.lights.iter().find_map(|l| match l {
            Light::Directional {
                intensity,
                position,
            } => Some((position.normalize_or_zero(), *intensity)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SceneBuilder;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spin_composes_on_base_rotation() {
        let mut scene = SceneBuilder::build();
        let ring = scene.handles().rings[0];
        let base = scene.entity(ring).unwrap().base_rotation;

        scene.set_spin_z(ring, FRAC_PI_2);
        let spun = scene.entity(ring).unwrap().transform.rotation;
        assert!((spun * Quat::from_rotation_z(FRAC_PI_2).inverse() - base).length() < 1e-5);

        // Setting an absolute spin is not cumulative.
        scene.set_spin_z(ring, FRAC_PI_2);
        assert_eq!(scene.entity(ring).unwrap().transform.rotation, spun);
    }

    #[test]
    fn material_mut_targets_one_entity() {
        let mut scene = SceneBuilder::build();
        let ring = scene.handles().rings[1];
        let tower = scene.handles().tower;
        let tower_before = *scene.material(tower).unwrap();

        scene.material_mut(ring).unwrap().emissive_intensity = 9.0;
        assert_eq!(scene.material(ring).unwrap().emissive_intensity, 9.0);
        assert_eq!(*scene.material(tower).unwrap(), tower_before);
    }

    #[test]
    fn lights_expose_ambient_and_key() {
        let scene = SceneBuilder::build();
        assert_eq!(scene.ambient_intensity(), 0.6);
        let (dir, intensity) = scene.key_light().unwrap();
        assert_eq!(intensity, 0.9);
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }
}
