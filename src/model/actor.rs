use glam::Vec3;

/// A moving entity (the player in this demo): explicit state that the
/// per-frame systems mutate, instead of closures capturing refs.
pub struct Actor {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
}

impl Actor {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    /// Unit vector on the ground plane the actor currently faces.
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Point the actor along `dir` (ground-plane component only).
    pub fn face_towards(&mut self, dir: Vec3) {
        if dir.x.abs() > f32::EPSILON || dir.z.abs() > f32::EPSILON {
            self.yaw = dir.x.atan2(dir.z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_matches_face_towards() {
        let mut a = Actor::new(Vec3::ZERO);
        a.face_towards(Vec3::new(1.0, 0.0, 0.0));
        let f = a.facing();
        assert!((f.x - 1.0).abs() < 1e-6);
        assert!(f.z.abs() < 1e-6);
    }

    #[test]
    fn face_towards_ignores_zero_direction() {
        let mut a = Actor::new(Vec3::ZERO);
        a.yaw = 1.25;
        a.face_towards(Vec3::ZERO);
        assert_eq!(a.yaw, 1.25);
    }
}
