use glowrig_scene::{CameraState, Scene};

/// What the core needs from the host's drawable region: pixel dimensions.
/// The attachment point (window handle) is captured by backend constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Why a backend could not hand out a render context.
///
/// The two variants map onto distinct degraded states; backends must pick the
/// one that actually happened. Library absence is checked before any context
/// is attempted, so a single acquire reports at most one of these.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AcquireError {
    #[error("3D library unavailable: {0}")]
    LibraryMissing(String),
    #[error("render context creation failed: {0}")]
    ContextCreation(String),
}

/// A source of render contexts. Acquisition happens once at startup and is
/// the only fallible step; everything after it is infallible per frame.
pub trait RenderBackend {
    type Context: RenderContext;

    fn acquire(&self, surface: &SurfaceSpec) -> Result<Self::Context, AcquireError>;
}

/// A live rendering context bound to a surface.
pub trait RenderContext {
    /// Draw one frame of the scene through the camera.
    fn render(&mut self, scene: &Scene, camera: &CameraState);

    /// Match the output dimensions to the surface's current size. Idempotent;
    /// redundant calls with the same dimensions are harmless.
    fn resize(&mut self, width: u32, height: u32);
}
