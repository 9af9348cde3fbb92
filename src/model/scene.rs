use glam::Vec3;

/// A static or slowly animated greybox prop. Everything in the demo scene is
/// a scaled/rotated unit cube instance.
pub struct Prop {
    pub position: Vec3,
    pub scale: Vec3,
    pub yaw: f32,
    /// Spin rate in rad/s, zero for static props.
    pub spin: f32,
    pub color: [f32; 4],
}

pub struct Scene {
    pub props: Vec<Prop>,
    pub ground_extent: f32,
}

impl Scene {
    pub fn new() -> Self {
        let mut props = Vec::new();

        // Ring of pillars marking the playable area
        let pillar_count = 8;
        let ring_radius = 18.0f32;
        for i in 0..pillar_count {
            let angle = i as f32 / pillar_count as f32 * std::f32::consts::TAU;
            props.push(Prop {
                position: Vec3::new(ring_radius * angle.sin(), 3.0, ring_radius * angle.cos()),
                scale: Vec3::new(1.0, 6.0, 1.0),
                yaw: angle,
                spin: 0.0,
                color: [0.55, 0.55, 0.6, 1.0],
            });
        }

        // Spinning marker cubes near the spawn
        for (x, z) in [(4.0, 0.0), (-4.0, 0.0), (0.0, 4.0)] {
            props.push(Prop {
                position: Vec3::new(x, 0.5, z),
                scale: Vec3::splat(1.0),
                yaw: 0.0,
                spin: 1.0,
                color: [0.9, 0.6, 0.2, 1.0],
            });
        }

        Self {
            props,
            ground_extent: 80.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for prop in &mut self.props {
            prop.yaw += prop.spin * dt;
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_props_do_not_spin() {
        let mut scene = Scene::new();
        let before: Vec<f32> = scene
            .props
            .iter()
            .filter(|p| p.spin == 0.0)
            .map(|p| p.yaw)
            .collect();
        scene.update(1.0);
        let after: Vec<f32> = scene
            .props
            .iter()
            .filter(|p| p.spin == 0.0)
            .map(|p| p.yaw)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn spinning_props_advance_by_rate() {
        let mut scene = Scene::new();
        let idx = scene.props.iter().position(|p| p.spin > 0.0).unwrap();
        let start = scene.props[idx].yaw;
        scene.update(0.5);
        assert!((scene.props[idx].yaw - start - 0.5 * scene.props[idx].spin).abs() < 1e-6);
    }
}
