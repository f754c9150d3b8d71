use crate::camera::CameraState;
use crate::geometry::Geometry;
use crate::graph::{Light, RING_COUNT, Scene, SceneEntity, SceneHandles};
use crate::material::MaterialState;
use glam::{Quat, Vec3};
use glowrig_common::{EntityId, PackedRgb, Transform};
use rand::Rng;
use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;

// Fixed layout. All of these are design parameters, not derived values.
pub const TOWER_SIZE: [f32; 3] = [1.1, 2.0, 0.75];
pub const TOWER_HEIGHT: f32 = 1.0;
pub const GLASS_SIZE: [f32; 2] = [1.05, 1.9];
pub const GLASS_OFFSET: f32 = 0.56;
pub const RING_YS: [f32; RING_COUNT] = [1.55, 1.10, 0.65];
pub const RING_RADIUS: f32 = 0.23;
pub const RING_TUBE: f32 = 0.03;
pub const RING_FORWARD: f32 = 0.39;
pub const GPU_BLOCK_SIZE: [f32; 3] = [0.7, 0.08, 0.18];
pub const GPU_BLOCK_POS: [f32; 3] = [0.12, 1.05, 0.05];
pub const ASSEMBLY_YAW: f32 = -0.45;
pub const ASSEMBLY_DROP: f32 = 0.1;

pub const STAR_COUNT: usize = 600;
pub const STAR_HALF_EXTENTS: [f32; 3] = [10.0, 6.0, 10.0];
pub const STAR_SIZE: f32 = 0.012;
pub const STAR_OPACITY: f32 = 0.6;

pub const AMBIENT_INTENSITY: f32 = 0.6;
pub const KEY_INTENSITY: f32 = 0.9;
pub const KEY_POSITION: [f32; 3] = [3.0, 4.0, 2.0];

const CHASSIS_COLOR: PackedRgb = PackedRgb(0x0b1220);
const RING_INITIAL_COLOR: PackedRgb = PackedRgb(0x4cc9f0);
const GPU_BODY_COLOR: PackedRgb = PackedRgb(0x111827);
const GPU_GLOW_COLOR: PackedRgb = PackedRgb(0x7c3aed);

/// Builds the static scene graph: tower, glass panel, rings, GPU block,
/// starfield and lights. Pure construction, no animation state.
///
/// Deterministic except for starfield sampling, which draws from the thread
/// RNG by default. Each run produces a visually distinct but statistically
/// identical starfield; pass a seeded RNG to `build_with_rng` when
/// reproducibility matters.
pub struct SceneBuilder;

impl SceneBuilder {
    pub fn build() -> Scene {
        Self::build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng>(rng: &mut R) -> Scene {
        let mut entities = BTreeMap::new();
        let mut insert = |entity: SceneEntity| {
            let id = EntityId::new();
            entities.insert(id, entity);
            id
        };

        let tower = insert(assembly_entity(
            "tower",
            Vec3::new(0.0, TOWER_HEIGHT, 0.0),
            Quat::IDENTITY,
            Geometry::Box {
                width: TOWER_SIZE[0],
                height: TOWER_SIZE[1],
                depth: TOWER_SIZE[2],
            },
            MaterialState {
                color: CHASSIS_COLOR,
                metalness: 0.4,
                roughness: 0.35,
                ..MaterialState::default()
            },
        ));

        let glass = insert(assembly_entity(
            "glass",
            Vec3::new(GLASS_OFFSET, TOWER_HEIGHT, 0.0),
            Quat::from_rotation_y(-FRAC_PI_2),
            Geometry::Plane {
                width: GLASS_SIZE[0],
                height: GLASS_SIZE[1],
            },
            MaterialState {
                color: CHASSIS_COLOR,
                transparent: true,
                opacity: 0.25,
                ..MaterialState::default()
            },
        ));

        let rings = RING_YS.map(|y| {
            insert(assembly_entity(
                "ring",
                Vec3::new(0.0, y, RING_FORWARD),
                Quat::from_rotation_x(FRAC_PI_2),
                Geometry::Torus {
                    radius: RING_RADIUS,
                    tube: RING_TUBE,
                    radial_segments: 16,
                    tubular_segments: 80,
                },
                MaterialState {
                    color: RING_INITIAL_COLOR,
                    emissive: RING_INITIAL_COLOR,
                    emissive_intensity: 2.2,
                    metalness: 0.2,
                    roughness: 0.25,
                    ..MaterialState::default()
                },
            ))
        });

        let gpu_block = insert(assembly_entity(
            "gpu_block",
            Vec3::from_array(GPU_BLOCK_POS),
            Quat::IDENTITY,
            Geometry::Box {
                width: GPU_BLOCK_SIZE[0],
                height: GPU_BLOCK_SIZE[1],
                depth: GPU_BLOCK_SIZE[2],
            },
            MaterialState {
                color: GPU_BODY_COLOR,
                emissive: GPU_GLOW_COLOR,
                emissive_intensity: 1.6,
                ..MaterialState::default()
            },
        ));

        let starfield = insert(SceneEntity {
            name: "starfield".into(),
            transform: Transform::default(),
            base_rotation: Quat::IDENTITY,
            geometry: Geometry::Points {
                positions: sample_starfield(rng),
                size: STAR_SIZE,
            },
            material: MaterialState {
                color: PackedRgb(0xffffff),
                transparent: true,
                opacity: STAR_OPACITY,
                ..MaterialState::default()
            },
        });

        let lights = vec![
            Light::Ambient {
                intensity: AMBIENT_INTENSITY,
            },
            Light::Directional {
                intensity: KEY_INTENSITY,
                position: Vec3::from_array(KEY_POSITION),
            },
        ];

        let handles = SceneHandles {
            tower,
            glass,
            rings,
            gpu_block,
            starfield,
        };

        tracing::debug!(
            entities = entities.len(),
            stars = STAR_COUNT,
            "scene graph built"
        );
        Scene::new(entities, lights, handles)
    }

    /// Camera defaults matching the scene layout. The builder never touches
    /// live camera state; callers hand this to a `CameraRig`.
    pub fn initial_camera() -> CameraState {
        CameraState::default()
    }
}

/// Place a part in tower-local coordinates, then apply the whole-assembly
/// yaw and drop.
fn assembly_entity(
    name: &str,
    local_pos: Vec3,
    local_rot: Quat,
    geometry: Geometry,
    material: MaterialState,
) -> SceneEntity {
    let yaw = Quat::from_rotation_y(ASSEMBLY_YAW);
    let rotation = yaw * local_rot;
    SceneEntity {
        name: name.into(),
        transform: Transform {
            position: yaw * local_pos + Vec3::new(0.0, -ASSEMBLY_DROP, 0.0),
            rotation,
            scale: Vec3::ONE,
        },
        base_rotation: rotation,
        geometry,
        material,
    }
}

fn sample_starfield<R: Rng>(rng: &mut R) -> Vec<[f32; 3]> {
    let [hx, hy, hz] = STAR_HALF_EXTENTS;
    (0..STAR_COUNT)
        .map(|_| {
            [
                rng.gen_range(-hx..hx),
                rng.gen_range(-hy..hy),
                rng.gen_range(-hz..hz),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn builds_fixed_entity_set() {
        let scene = SceneBuilder::build();
        // tower + glass + 3 rings + gpu block + starfield
        assert_eq!(scene.entity_count(), 6);
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn ring_layout_matches_design() {
        let scene = SceneBuilder::build();
        for (i, id) in scene.handles().rings.iter().enumerate() {
            let ring = scene.entity(*id).unwrap();
            match ring.geometry {
                Geometry::Torus { radius, tube, .. } => {
                    assert_eq!(radius, RING_RADIUS);
                    assert_eq!(tube, RING_TUBE);
                }
                _ => panic!("ring {i} is not a torus"),
            }
            // Ring height survives the assembly transform up to the drop;
            // the yaw is about Y so it leaves heights alone.
            assert!((ring.transform.position.y - (RING_YS[i] - ASSEMBLY_DROP)).abs() < 1e-6);
        }
    }

    #[test]
    fn starfield_sampling_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let scene = SceneBuilder::build_with_rng(&mut rng);
        let star = scene.entity(scene.handles().starfield).unwrap();
        match &star.geometry {
            Geometry::Points { positions, size } => {
                assert_eq!(positions.len(), STAR_COUNT);
                assert_eq!(*size, STAR_SIZE);
                let [hx, hy, hz] = STAR_HALF_EXTENTS;
                for p in positions {
                    assert!(p[0].abs() <= hx && p[1].abs() <= hy && p[2].abs() <= hz);
                }
            }
            _ => panic!("starfield is not a point cloud"),
        }
    }

    #[test]
    fn seeded_builds_are_identical() {
        let a = SceneBuilder::build_with_rng(&mut ChaCha8Rng::seed_from_u64(42));
        let b = SceneBuilder::build_with_rng(&mut ChaCha8Rng::seed_from_u64(42));
        let star = |s: &Scene| match &s.entity(s.handles().starfield).unwrap().geometry {
            Geometry::Points { positions, .. } => positions.clone(),
            _ => unreachable!(),
        };
        assert_eq!(star(&a), star(&b));
    }

    #[test]
    fn glass_is_transparent() {
        let scene = SceneBuilder::build();
        let glass = scene.material(scene.handles().glass).unwrap();
        assert!(glass.transparent);
        assert_eq!(glass.opacity, 0.25);
    }
}
