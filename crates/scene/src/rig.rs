use crate::camera::CameraState;
use glam::Vec3;
use std::f32::consts::TAU;

/// Smoothing factor applied to pending orbit motion each frame.
pub const DAMPING_FACTOR: f32 = 0.05;

/// Wraps the camera with ambient auto-rotation and damped orbit motion.
///
/// While a rig is active it is the only writer of camera position: panning is
/// disabled (the target never moves) and the orbit distance is clamped to the
/// camera's [min_distance, max_distance] on every advance.
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: CameraState,
    /// Azimuth rotation not yet applied, eased out by the damping factor.
    pending_azimuth: f32,
}

impl CameraRig {
    pub fn new(camera: CameraState) -> Self {
        Self {
            camera,
            pending_azimuth: 0.0,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Update the camera aspect ratio for the current surface size.
    /// Idempotent: the same dimensions always produce the same aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Target orbit step per frame, orbit-controls convention: one full turn
    /// per 60 seconds at 60 fps for speed 1.0.
    fn auto_rotate_step(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.camera.rotate_speed
    }

    /// Advance the orbit by one frame: accumulate the ambient rotation, apply
    /// the damped share of it, and re-clamp the orbit distance.
    pub fn advance(&mut self) {
        if self.camera.auto_rotate {
            self.pending_azimuth += self.auto_rotate_step();
        }

        let offset = self.camera.position - self.camera.target;
        let len = offset.length();
        if len <= f32::EPSILON {
            return;
        }

        let radius = len.clamp(self.camera.min_distance, self.camera.max_distance);
        let applied = self.pending_azimuth * DAMPING_FACTOR;
        let theta = offset.x.atan2(offset.z) - applied;
        let phi = (offset.y / len).clamp(-1.0, 1.0).acos();

        self.camera.position = self.camera.target
            + radius
                * Vec3::new(
                    phi.sin() * theta.sin(),
                    phi.cos(),
                    phi.sin() * theta.cos(),
                );
        self.pending_azimuth *= 1.0 - DAMPING_FACTOR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_preserves_radius_and_height() {
        let mut rig = CameraRig::new(CameraState::default());
        let before = *rig.camera();
        for _ in 0..240 {
            rig.advance();
        }
        let after = rig.camera();
        assert!((after.distance() - before.distance()).abs() < 1e-3);
        assert!((after.position.y - before.position.y).abs() < 1e-3);
        assert_eq!(after.target, before.target);
    }

    #[test]
    fn orbit_actually_moves() {
        let mut rig = CameraRig::new(CameraState::default());
        let start = rig.camera().position;
        for _ in 0..120 {
            rig.advance();
        }
        assert!((rig.camera().position - start).length() > 1e-4);
    }

    #[test]
    fn distance_clamped_to_limits() {
        let camera = CameraState {
            position: Vec3::new(0.0, 0.0, 20.0),
            ..CameraState::default()
        };
        let mut rig = CameraRig::new(camera);
        rig.advance();
        assert!(rig.camera().distance() <= rig.camera().max_distance + 1e-5);

        let camera = CameraState {
            position: Vec3::new(0.0, 0.0, 0.5),
            ..CameraState::default()
        };
        let mut rig = CameraRig::new(camera);
        rig.advance();
        assert!(rig.camera().distance() >= rig.camera().min_distance - 1e-5);
    }

    #[test]
    fn disabled_auto_rotate_converges_to_rest() {
        let camera = CameraState {
            auto_rotate: false,
            ..CameraState::default()
        };
        let mut rig = CameraRig::new(camera);
        let start = rig.camera().position;
        for _ in 0..10 {
            rig.advance();
        }
        // No ambient input, nothing pending: the camera holds still.
        assert!((rig.camera().position - start).length() < 1e-5);
    }

    #[test]
    fn viewport_update_is_idempotent() {
        let mut rig = CameraRig::new(CameraState::default());
        rig.set_viewport(1280, 720);
        let once = rig.camera().aspect;
        rig.set_viewport(1280, 720);
        assert_eq!(rig.camera().aspect, once);
    }
}
