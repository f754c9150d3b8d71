use crate::clock::AnimationClock;
use glowrig_common::ring_color;
use glowrig_render::RenderContext;
use glowrig_scene::{CameraRig, CameraState, RING_COUNT, Scene};

/// Z-spin added to ring 0 each tick.
pub const BASE_SPIN_DELTA: f32 = 0.02;
/// Extra spin per ring index; outer indices turn faster.
pub const SPIN_DELTA_STEP: f32 = 0.005;

pub const GLOW_BASE: f32 = 1.2;
pub const GLOW_AMPLITUDE: f32 = 0.5;
pub const GLOW_RATE: f32 = 2.0;

/// Per-tick z-rotation for ring `ring_index`. Strictly increasing in the
/// index, so the three rings visibly drift apart.
pub fn ring_spin_delta(ring_index: usize) -> f32 {
    BASE_SPIN_DELTA + ring_index as f32 * SPIN_DELTA_STEP
}

/// GPU block emissive intensity at animation time `t`. Oscillates in
/// [GLOW_BASE - GLOW_AMPLITUDE, GLOW_BASE + GLOW_AMPLITUDE].
pub fn gpu_glow_intensity(t: f32) -> f32 {
    GLOW_BASE + (t * GLOW_RATE).sin() * GLOW_AMPLITUDE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
}

/// Owns the scene, the camera rig and the clock, and performs one
/// update-and-render pass per tick.
///
/// Running is terminal: nothing in here stops the loop, only process
/// teardown does.
#[derive(Debug)]
pub struct AnimationLoop {
    scene: Scene,
    rig: CameraRig,
    clock: AnimationClock,
    ring_spin: [f32; RING_COUNT],
    state: LoopState,
    frames: u64,
}

impl AnimationLoop {
    pub fn new(scene: Scene, rig: CameraRig) -> Self {
        Self {
            scene,
            rig,
            clock: AnimationClock::new(),
            ring_spin: [0.0; RING_COUNT],
            state: LoopState::NotStarted,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn time(&self) -> f32 {
        self.clock.value()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraState {
        self.rig.camera()
    }

    pub fn ring_spin(&self) -> &[f32; RING_COUNT] {
        &self.ring_spin
    }

    /// One tick: advance the clock, recolor and spin the rings, pulse the
    /// GPU glow, advance the orbit, render.
    pub fn tick<C: RenderContext>(&mut self, ctx: &mut C) {
        if self.state == LoopState::NotStarted {
            self.state = LoopState::Running;
            tracing::info!("animation loop running");
        }

        let t = self.clock.advance();

        let rings = self.scene.handles().rings;
        for (i, id) in rings.iter().enumerate() {
            let color = ring_color(t, i);
            if let Some(material) = self.scene.material_mut(*id) {
                material.color = color;
                material.emissive = color;
            }
            self.ring_spin[i] += ring_spin_delta(i);
            self.scene.set_spin_z(*id, self.ring_spin[i]);
        }

        let gpu_block = self.scene.handles().gpu_block;
        if let Some(material) = self.scene.material_mut(gpu_block) {
            material.emissive_intensity = gpu_glow_intensity(t);
        }

        self.rig.advance();
        ctx.render(&self.scene, self.rig.camera());
        self.frames += 1;
    }

    /// React to a surface resize: renderer output dimensions and camera
    /// aspect both follow the new size. Safe to call redundantly.
    pub fn resize<C: RenderContext>(&mut self, ctx: &mut C, width: u32, height: u32) {
        tracing::debug!(width, height, "surface resized");
        ctx.resize(width, height);
        self.rig.set_viewport(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowrig_render::{HeadlessBackend, RenderBackend, SurfaceSpec};
    use glowrig_scene::SceneBuilder;

    fn fixture() -> (AnimationLoop, glowrig_render::HeadlessContext) {
        let ctx = HeadlessBackend::ready()
            .acquire(&SurfaceSpec::new(640, 480))
            .unwrap();
        let scene = SceneBuilder::build();
        let rig = CameraRig::new(SceneBuilder::initial_camera());
        (AnimationLoop::new(scene, rig), ctx)
    }

    #[test]
    fn glow_is_bounded() {
        let mut t = 0.0_f32;
        while t < 20.0 {
            let glow = gpu_glow_intensity(t);
            assert!((0.7..=1.7).contains(&glow), "glow {glow} at t {t}");
            t += 0.013;
        }
    }

    #[test]
    fn glow_at_rest_points() {
        assert!((gpu_glow_intensity(0.0) - GLOW_BASE).abs() < 1e-6);
        // sin(2t) = 0 again at t = pi/2
        assert!((gpu_glow_intensity(std::f32::consts::FRAC_PI_2) - GLOW_BASE).abs() < 1e-5);
    }

    #[test]
    fn spin_deltas_increase_with_ring_index() {
        for i in 0..RING_COUNT - 1 {
            assert!(ring_spin_delta(i + 1) > ring_spin_delta(i));
        }
    }

    #[test]
    fn loop_state_becomes_running_and_stays() {
        let (mut driver, mut ctx) = fixture();
        assert_eq!(driver.state(), LoopState::NotStarted);
        driver.tick(&mut ctx);
        assert_eq!(driver.state(), LoopState::Running);
        driver.tick(&mut ctx);
        assert_eq!(driver.state(), LoopState::Running);
    }

    #[test]
    fn tick_renders_exactly_once() {
        let (mut driver, mut ctx) = fixture();
        for _ in 0..7 {
            driver.tick(&mut ctx);
        }
        assert_eq!(ctx.frames_rendered(), 7);
        assert_eq!(driver.frames(), 7);
    }

    #[test]
    fn ring_colors_follow_the_cycle() {
        let (mut driver, mut ctx) = fixture();
        for _ in 0..5 {
            driver.tick(&mut ctx);
        }
        let t = driver.time();
        let frame = ctx.last_frame().unwrap();
        for i in 0..RING_COUNT {
            assert_eq!(frame.ring_colors[i], ring_color(t, i));
        }
    }

    #[test]
    fn emissive_matches_base_color() {
        let (mut driver, mut ctx) = fixture();
        driver.tick(&mut ctx);
        for id in driver.scene().handles().rings {
            let m = driver.scene().material(id).unwrap();
            assert_eq!(m.color, m.emissive);
        }
    }

    #[test]
    fn ring_spin_accumulates_at_distinct_rates() {
        let (mut driver, mut ctx) = fixture();
        for _ in 0..10 {
            driver.tick(&mut ctx);
        }
        let spin = driver.ring_spin();
        for i in 0..RING_COUNT - 1 {
            assert!(spin[i + 1] > spin[i]);
        }
        assert!((spin[0] - 10.0 * ring_spin_delta(0)).abs() < 1e-5);
    }

    #[test]
    fn glow_applied_to_gpu_block() {
        let (mut driver, mut ctx) = fixture();
        driver.tick(&mut ctx);
        let expected = gpu_glow_intensity(driver.time());
        let frame = ctx.last_frame().unwrap();
        assert!((frame.glow_intensity - expected).abs() < 1e-6);
    }

    #[test]
    fn camera_orbits_during_ticks() {
        let (mut driver, mut ctx) = fixture();
        let start = driver.camera().position;
        for _ in 0..120 {
            driver.tick(&mut ctx);
        }
        assert!((driver.camera().position - start).length() > 1e-4);
    }

    #[test]
    fn resize_is_idempotent() {
        let (mut driver, mut ctx) = fixture();
        driver.resize(&mut ctx, 1280, 720);
        let once = driver.camera().aspect;
        driver.resize(&mut ctx, 1280, 720);
        assert_eq!(driver.camera().aspect, once);
        assert_eq!(ctx.size(), (1280, 720));

        driver.tick(&mut ctx);
        let frame = ctx.last_frame().unwrap();
        assert!((frame.camera_aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn only_rings_and_gpu_block_mutate() {
        let (mut driver, mut ctx) = fixture();
        let handles = *driver.scene().handles();
        let tower_before = driver.scene().entity(handles.tower).unwrap().clone();
        let glass_before = driver.scene().entity(handles.glass).unwrap().clone();
        for _ in 0..30 {
            driver.tick(&mut ctx);
        }
        let tower_after = driver.scene().entity(handles.tower).unwrap();
        let glass_after = driver.scene().entity(handles.glass).unwrap();
        assert_eq!(tower_before.material, tower_after.material);
        assert_eq!(tower_before.transform, tower_after.transform);
        assert_eq!(glass_before.material, glass_after.material);
        assert_eq!(glass_before.transform, glass_after.transform);
    }
}
