use glam::{Mat4, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 6.0, 12.0),
            yaw: 0.0,
            pitch: 0.0,
            up: Vec3::Y,
            fov_y: 60f32.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-1.5533, 1.5533); // Slightly less than π/2 to avoid gimbal lock
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    /// Camera forward projected onto the ground plane. Zero when looking
    /// straight down, callers must handle that case.
    pub fn flat_forward(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    }

    pub fn target(&self) -> Vec3 { self.eye + self.forward() }

    pub fn set_aspect(&mut self, width: u32, height: u32) { self.aspect = width as f32 / height as f32; }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target(), self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    pub fn set_look_at(&mut self, target: Vec3) {
        let dir = (target - self.eye).normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.asin().clamp(-1.4, 1.4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_forward_ignores_pitch() {
        let mut cam = Camera::new(800, 600);
        cam.yaw = 0.0;
        cam.pitch = -1.0;
        let f = cam.flat_forward();
        assert!(f.y.abs() < 1e-6);
        assert!((f.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn look_at_faces_target() {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(0.0, 0.0, 10.0);
        cam.set_look_at(Vec3::ZERO);
        let dir = cam.forward();
        assert!(dir.z < -0.99);
    }
}
