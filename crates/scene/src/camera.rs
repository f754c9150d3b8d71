use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Orbit camera state: position, orbit target and projection parameters.
///
/// Owned by a `CameraRig` while animation runs; everything outside the rig
/// reads it through `CameraRig::camera`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub auto_rotate: bool,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.2, 1.2, 3.2),
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            auto_rotate: true,
            rotate_speed: 0.8,
            min_distance: 2.2,
            max_distance: 6.0,
        }
    }
}

impl CameraState {
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = CameraState::default();
        assert_eq!(cam.position, Vec3::new(2.2, 1.2, 3.2));
        assert_eq!(cam.target, Vec3::ZERO);
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn aspect_from_surface_size() {
        let mut cam = CameraState::default();
        cam.set_aspect(1920, 1080);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        // Degenerate heights never divide by zero.
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, 800.0);
    }
}
