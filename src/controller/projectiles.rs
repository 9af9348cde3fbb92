use glam::Vec3;
use tracing::warn;

/// Gameplay tuning for projectiles.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Speed in units per second.
    pub speed: f32,
    /// Lifetime in seconds before despawn; zero or negative disables the
    /// age check.
    pub lifetime: f32,
    /// Despawn when farther than this from the reference position.
    pub max_distance: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 15.0,
            lifetime: 5.0,
            max_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub id: u64,
    pub position: Vec3,
    /// Unit vector, fixed at spawn.
    pub direction: Vec3,
    /// Pool-clock timestamp at spawn, seconds.
    pub created_at: f64,
}

/// Bounded-lifetime, bounded-distance set of moving points. No object reuse:
/// shots allocate, expiry prunes. The clock only advances through `update`,
/// which keeps the pool deterministic.
pub struct ProjectilePool {
    pub tuning: ProjectileTuning,
    projectiles: Vec<Projectile>,
    next_id: u64,
    clock: f64,
}

impl ProjectilePool {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            projectiles: Vec::new(),
            next_id: 0,
            clock: 0.0,
        }
    }

    /// Spawn a projectile at `origin` heading along `direction`. Returns the
    /// id, or `None` for a degenerate direction.
    pub fn shoot(&mut self, origin: Vec3, direction: Vec3) -> Option<u64> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            warn!("ignoring shot with zero direction");
            return None;
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position: origin,
            direction: dir,
            created_at: self.clock,
        });
        Some(id)
    }

    /// Advance every projectile and prune the expired ones.
    pub fn update(&mut self, dt: f32, reference: Vec3) {
        self.clock += dt as f64;
        let now = self.clock;
        let t = self.tuning;

        self.projectiles.retain_mut(|p| {
            p.position += p.direction * t.speed * dt;

            let age = now - p.created_at;
            if t.lifetime > 0.0 && age > t.lifetime as f64 {
                return false;
            }
            p.position.distance(reference) <= t.max_distance
        });
    }

    /// Render scale that fades out over the projectile's lifetime.
    pub fn scale_of(&self, p: &Projectile) -> f32 {
        if self.tuning.lifetime <= 0.0 {
            return 1.0;
        }
        let age = (self.clock - p.created_at) as f32;
        (1.0 - age / self.tuning.lifetime).clamp(0.0, 1.0)
    }

    pub fn remove(&mut self, id: u64) {
        self.projectiles.retain(|p| p.id != id);
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(ProjectileTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_along_direction_and_survives_within_limits() {
        let mut pool = ProjectilePool::default();
        pool.shoot(Vec3::ZERO, Vec3::X).unwrap();

        pool.update(1.0, Vec3::ZERO);
        assert_eq!(pool.len(), 1);
        let p = pool.iter().next().unwrap();
        assert!(p.position.distance(Vec3::new(15.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn removed_after_lifetime_exceeded() {
        let mut pool = ProjectilePool::new(ProjectileTuning {
            // Keep it inside max_distance for the whole lifetime
            speed: 1.0,
            lifetime: 5.0,
            max_distance: 100.0,
        });
        pool.shoot(Vec3::ZERO, Vec3::X).unwrap();

        pool.update(1.0, Vec3::ZERO);
        assert_eq!(pool.len(), 1);
        pool.update(4.001, Vec3::ZERO);
        assert!(pool.is_empty());
    }

    #[test]
    fn removed_when_beyond_max_distance() {
        let mut pool = ProjectilePool::new(ProjectileTuning {
            speed: 15.0,
            lifetime: 0.0, // distance check only
            max_distance: 20.0,
        });
        pool.shoot(Vec3::ZERO, Vec3::X).unwrap();

        pool.update(1.0, Vec3::ZERO); // at 15, inside
        assert_eq!(pool.len(), 1);
        pool.update(1.0, Vec3::ZERO); // at 30, outside
        assert!(pool.is_empty());
    }

    #[test]
    fn distance_is_measured_from_reference_not_origin() {
        let mut pool = ProjectilePool::new(ProjectileTuning {
            speed: 15.0,
            lifetime: 0.0,
            max_distance: 20.0,
        });
        pool.shoot(Vec3::ZERO, Vec3::X).unwrap();

        // Reference follows the projectile, so it never expires by distance
        pool.update(1.0, Vec3::new(15.0, 0.0, 0.0));
        pool.update(1.0, Vec3::new(30.0, 0.0, 0.0));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn scale_decays_with_age() {
        let mut pool = ProjectilePool::default();
        pool.shoot(Vec3::ZERO, Vec3::X).unwrap();

        pool.update(2.5, Vec3::new(30.0, 0.0, 0.0));
        let p = *pool.iter().next().unwrap();
        assert!((pool.scale_of(&p) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn ids_are_unique_and_removable() {
        let mut pool = ProjectilePool::default();
        let a = pool.shoot(Vec3::ZERO, Vec3::X).unwrap();
        let b = pool.shoot(Vec3::ZERO, Vec3::Z).unwrap();
        assert_ne!(a, b);

        pool.remove(a);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().next().unwrap().id, b);

        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn zero_direction_shot_is_rejected() {
        let mut pool = ProjectilePool::default();
        assert!(pool.shoot(Vec3::ZERO, Vec3::ZERO).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn direction_is_normalized_at_spawn() {
        let mut pool = ProjectilePool::default();
        pool.shoot(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)).unwrap();
        let p = pool.iter().next().unwrap();
        assert!((p.direction.length() - 1.0).abs() < 1e-6);
    }
}
