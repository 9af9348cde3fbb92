use glam::Vec3;

use crate::model::Camera;

/// Tuning for the orbital follow camera.
#[derive(Debug, Clone, Copy)]
pub struct OrbitTuning {
    /// Distance of the eye from the target.
    pub radius: f32,
    /// Extra height added to the eye above the spherical position.
    pub height_offset: f32,
    /// The camera aims this far above the target.
    pub look_height: f32,
    /// Radians per pixel of pointer drag.
    pub sensitivity: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            radius: 10.0,
            height_offset: 2.0,
            look_height: 5.0,
            sensitivity: 0.005,
            min_polar: 0.1,
            max_polar: std::f32::consts::FRAC_PI_2 - 0.1,
        }
    }
}

/// Orbital third-person camera: azimuth/polar around the target, driven by
/// pointer-drag deltas. No positional smoothing.
pub struct OrbitRig {
    pub azimuth: f32,
    pub polar: f32,
    pub tuning: OrbitTuning,
}

impl OrbitRig {
    pub fn new(tuning: OrbitTuning) -> Self {
        Self {
            azimuth: 0.0,
            polar: 0.3,
            tuning,
        }
    }

    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.tuning.sensitivity;
        // Clamp so the rig can never flip over the pole
        self.polar = (self.polar + dy * self.tuning.sensitivity)
            .clamp(self.tuning.min_polar, self.tuning.max_polar);
    }

    /// Place the camera on the orbit sphere and aim it above the target.
    pub fn update(&self, camera: &mut Camera, target: Vec3) {
        let r = self.tuning.radius;
        camera.eye = Vec3::new(
            target.x + r * self.azimuth.sin() * self.polar.cos(),
            target.y + r * self.polar.sin() + self.tuning.height_offset,
            target.z + r * self.azimuth.cos() * self.polar.cos(),
        );
        camera.set_look_at(target + Vec3::Y * self.tuning.look_height);
    }
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::new(OrbitTuning::default())
    }
}

/// Tuning for the shoulder (pointer-offset) follow camera.
#[derive(Debug, Clone, Copy)]
pub struct ShoulderTuning {
    /// Per-frame eye lerp factor.
    pub blend: f32,
    /// Per-frame fov ease factor.
    pub fov_blend: f32,
    pub fov_idle: f32,
    pub fov_run: f32,
    /// Trailing distance behind the target along +Z.
    pub distance: f32,
    pub height: f32,
    /// How far the pointer swings the eye sideways/vertically.
    pub swing: f32,
}

impl Default for ShoulderTuning {
    fn default() -> Self {
        Self {
            blend: 0.15,
            fov_blend: 0.05,
            fov_idle: 80f32.to_radians(),
            fov_run: 100f32.to_radians(),
            distance: 8.0,
            height: 3.0,
            swing: 4.0,
        }
    }
}

/// Alternate camera variant: the eye lerps toward an offset derived from the
/// pointer screen position and the fov eases toward a run-dependent target.
pub struct ShoulderRig {
    pub tuning: ShoulderTuning,
}

impl ShoulderRig {
    pub fn new(tuning: ShoulderTuning) -> Self {
        Self { tuning }
    }

    /// `pointer_ndc` is the pointer position normalized to [-1, 1] on both
    /// axes, +y pointing up the screen.
    pub fn update(&self, camera: &mut Camera, target: Vec3, pointer_ndc: (f32, f32), running: bool) {
        let t = self.tuning;
        let desired = target
            + Vec3::new(
                pointer_ndc.0 * t.swing,
                t.height + pointer_ndc.1 * t.swing * 0.5,
                t.distance,
            );
        camera.eye = camera.eye.lerp(desired, t.blend);

        let fov_target = if running { t.fov_run } else { t.fov_idle };
        camera.fov_y += (fov_target - camera.fov_y) * t.fov_blend;

        camera.set_look_at(target + Vec3::Y * 2.0);
    }
}

impl Default for ShoulderRig {
    fn default() -> Self {
        Self::new(ShoulderTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_stays_clamped_for_any_drag_sequence() {
        let mut rig = OrbitRig::default();
        let drags = [
            (0.0, 1e5),
            (0.0, -1e5),
            (300.0, 40.0),
            (-120.0, -900.0),
            (0.0, 17.3),
        ];
        for (dx, dy) in drags {
            rig.apply_drag(dx, dy);
            assert!(rig.polar >= rig.tuning.min_polar);
            assert!(rig.polar <= rig.tuning.max_polar);
        }
    }

    #[test]
    fn orbit_eye_sits_on_sphere_around_target() {
        let mut rig = OrbitRig::default();
        rig.apply_drag(123.0, -45.0);
        let mut cam = Camera::new(800, 600);
        let target = Vec3::new(3.0, 0.0, -7.0);
        rig.update(&mut cam, target);

        let spherical = cam.eye - Vec3::Y * rig.tuning.height_offset - target;
        assert!((spherical.length() - rig.tuning.radius).abs() < 1e-4);
    }

    #[test]
    fn orbit_camera_looks_above_target() {
        let rig = OrbitRig::default();
        let mut cam = Camera::new(800, 600);
        let target = Vec3::ZERO;
        rig.update(&mut cam, target);

        let aim = target + Vec3::Y * rig.tuning.look_height;
        let dir = (aim - cam.eye).normalize();
        assert!(cam.forward().dot(dir) > 0.999);
    }

    #[test]
    fn shoulder_fov_eases_toward_run_target() {
        let rig = ShoulderRig::default();
        let mut cam = Camera::new(800, 600);
        cam.fov_y = rig.tuning.fov_idle;
        for _ in 0..200 {
            rig.update(&mut cam, Vec3::ZERO, (0.0, 0.0), true);
        }
        assert!((cam.fov_y - rig.tuning.fov_run).abs() < 0.01);

        for _ in 0..200 {
            rig.update(&mut cam, Vec3::ZERO, (0.0, 0.0), false);
        }
        assert!((cam.fov_y - rig.tuning.fov_idle).abs() < 0.01);
    }

    #[test]
    fn shoulder_eye_converges_to_pointer_offset() {
        let rig = ShoulderRig::default();
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(50.0, 50.0, 50.0);
        let target = Vec3::ZERO;
        for _ in 0..300 {
            rig.update(&mut cam, target, (1.0, 0.0), false);
        }
        let t = rig.tuning;
        let expected = target + Vec3::new(t.swing, t.height, t.distance);
        assert!(cam.eye.distance(expected) < 0.01);
    }
}
