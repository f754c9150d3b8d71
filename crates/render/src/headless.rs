use crate::backend::{AcquireError, RenderBackend, RenderContext, SurfaceSpec};
use glowrig_common::PackedRgb;
use glowrig_scene::{CameraState, RING_COUNT, Scene};
use std::fmt;

/// Backend that renders to frame summaries instead of pixels.
///
/// Used by tests and the CLI to exercise the full availability and animation
/// paths without a GPU, including forcing each acquire failure kind.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    failure: Option<AcquireError>,
}

impl HeadlessBackend {
    /// A backend whose acquire always succeeds.
    pub fn ready() -> Self {
        Self { failure: None }
    }

    /// Simulates a host without the 3D library stack.
    pub fn missing_library() -> Self {
        Self {
            failure: Some(AcquireError::LibraryMissing(
                "library symbol not resolvable".into(),
            )),
        }
    }

    /// Simulates a host whose context creation fails (no hardware
    /// acceleration).
    pub fn without_gpu() -> Self {
        Self {
            failure: Some(AcquireError::ContextCreation(
                "hardware acceleration disabled".into(),
            )),
        }
    }
}

impl RenderBackend for HeadlessBackend {
    type Context = HeadlessContext;

    fn acquire(&self, surface: &SurfaceSpec) -> Result<HeadlessContext, AcquireError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => {
                tracing::debug!(width = surface.width, height = surface.height, "headless context acquired");
                Ok(HeadlessContext::new(surface.width, surface.height))
            }
        }
    }
}

/// One rendered frame, reduced to the values tests and tooling care about.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub entity_count: usize,
    pub ring_colors: [PackedRgb; RING_COUNT],
    pub glow_intensity: f32,
    pub camera_position: [f32; 3],
    pub camera_aspect: f32,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rings=[{} {} {}] glow={:.3} cam=({:.2}, {:.2}, {:.2})",
            self.ring_colors[0],
            self.ring_colors[1],
            self.ring_colors[2],
            self.glow_intensity,
            self.camera_position[0],
            self.camera_position[1],
            self.camera_position[2],
        )
    }
}

/// Recording context: counts frames and keeps the latest summary.
#[derive(Debug)]
pub struct HeadlessContext {
    width: u32,
    height: u32,
    frames: u64,
    last: Option<FrameSummary>,
}

impl HeadlessContext {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: 0,
            last: None,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last.as_ref()
    }
}

impl RenderContext for HeadlessContext {
    fn render(&mut self, scene: &Scene, camera: &CameraState) {
        let handles = scene.handles();
        let ring_colors = handles
            .rings
            .map(|id| scene.material(id).map(|m| m.color).unwrap_or(PackedRgb(0)));
        let glow_intensity = scene
            .material(handles.gpu_block)
            .map(|m| m.emissive_intensity)
            .unwrap_or(0.0);

        self.frames += 1;
        self.last = Some(FrameSummary {
            entity_count: scene.entity_count(),
            ring_colors,
            glow_intensity,
            camera_position: camera.position.to_array(),
            camera_aspect: camera.aspect,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowrig_scene::SceneBuilder;

    #[test]
    fn ready_backend_hands_out_context() {
        let backend = HeadlessBackend::ready();
        let ctx = backend.acquire(&SurfaceSpec::new(640, 480)).unwrap();
        assert_eq!(ctx.size(), (640, 480));
        assert_eq!(ctx.frames_rendered(), 0);
    }

    #[test]
    fn failure_kinds_are_distinct() {
        let lib = HeadlessBackend::missing_library()
            .acquire(&SurfaceSpec::new(1, 1))
            .unwrap_err();
        assert!(matches!(lib, AcquireError::LibraryMissing(_)));

        let gpu = HeadlessBackend::without_gpu()
            .acquire(&SurfaceSpec::new(1, 1))
            .unwrap_err();
        assert!(matches!(gpu, AcquireError::ContextCreation(_)));
    }

    #[test]
    fn render_records_frame_summary() {
        let backend = HeadlessBackend::ready();
        let mut ctx = backend.acquire(&SurfaceSpec::new(320, 200)).unwrap();
        let scene = SceneBuilder::build();
        let camera = SceneBuilder::initial_camera();

        ctx.render(&scene, &camera);
        ctx.render(&scene, &camera);

        assert_eq!(ctx.frames_rendered(), 2);
        let frame = ctx.last_frame().unwrap();
        assert_eq!(frame.entity_count, scene.entity_count());
        assert_eq!(frame.camera_position, camera.position.to_array());
    }

    #[test]
    fn resize_tracks_surface() {
        let backend = HeadlessBackend::ready();
        let mut ctx = backend.acquire(&SurfaceSpec::new(100, 100)).unwrap();
        ctx.resize(300, 150);
        assert_eq!(ctx.size(), (300, 150));
        ctx.resize(300, 150);
        assert_eq!(ctx.size(), (300, 150));
    }
}
