use glam::Vec3;

use crate::controller::input::MoveInput;
use crate::model::Actor;

/// Gameplay tuning for normal (non-dodge) movement.
#[derive(Debug, Clone, Copy)]
pub struct MovementTuning {
    /// Walk speed in units per second.
    pub speed: f32,
    /// Speed multiplier while the run action is held.
    pub run_multiplier: f32,
    /// Per-frame velocity lerp factor, smooths starts and stops.
    pub blend: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            speed: 8.0,
            run_multiplier: 2.0,
            blend: 0.2,
        }
    }
}

/// Gameplay tuning for the dodge burst.
#[derive(Debug, Clone, Copy)]
pub struct DodgeTuning {
    /// Speed at the start of the dodge, units per second.
    pub start_speed: f32,
    /// Speed the ease-out decays to at the end of the dodge.
    pub end_speed: f32,
    /// Dodge duration in seconds.
    pub duration: f32,
    /// Seconds from dodge start before the next dodge may trigger.
    pub cooldown: f32,
}

impl Default for DodgeTuning {
    fn default() -> Self {
        Self {
            start_speed: 40.0,
            end_speed: 5.0,
            duration: 0.3,
            cooldown: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DodgeState {
    Ready,
    Dodging { dir: Vec3, elapsed: f32 },
    /// Normal movement has resumed but the cooldown (measured from dodge
    /// start) has not elapsed yet.
    Cooldown { since_start: f32 },
}

/// Converts held direction flags + camera facing into a smoothed velocity and
/// integrates the actor position each frame.
pub struct MovementIntegrator {
    pub tuning: MovementTuning,
    pub dodge: DodgeTuning,
    state: DodgeState,
}

impl MovementIntegrator {
    pub fn new(tuning: MovementTuning, dodge: DodgeTuning) -> Self {
        Self {
            tuning,
            dodge,
            state: DodgeState::Ready,
        }
    }

    pub fn is_dodging(&self) -> bool {
        matches!(self.state, DodgeState::Dodging { .. })
    }

    pub fn dodge_ready(&self) -> bool {
        self.state == DodgeState::Ready
    }

    /// Raw input direction on the ground plane, unnormalized.
    fn input_direction(input: &MoveInput, cam_forward: Vec3) -> Vec3 {
        let forward = Vec3::new(cam_forward.x, 0.0, cam_forward.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y);

        let mut dir = Vec3::ZERO;
        if input.forward {
            dir += forward;
        }
        if input.backward {
            dir -= forward;
        }
        if input.left {
            dir -= right;
        }
        if input.right {
            dir += right;
        }
        dir
    }

    pub fn update(&mut self, actor: &mut Actor, input: &MoveInput, cam_forward: Vec3, dt: f32) {
        let move_dir = Self::input_direction(input, cam_forward);

        // Dodge trigger: only from Ready; re-triggering during the dodge or
        // its cooldown is a no-op.
        if input.dodge && self.state == DodgeState::Ready {
            let dir = move_dir.normalize_or_zero();
            let dir = if dir == Vec3::ZERO { actor.facing() } else { dir };
            self.state = DodgeState::Dodging { dir, elapsed: 0.0 };
        }

        match self.state {
            DodgeState::Dodging { dir, elapsed } => {
                // Cubic ease-out from start_speed down to end_speed.
                let u = (elapsed / self.dodge.duration).clamp(0.0, 1.0);
                let falloff = (1.0 - u) * (1.0 - u) * (1.0 - u);
                let speed = self.dodge.end_speed
                    + (self.dodge.start_speed - self.dodge.end_speed) * falloff;

                actor.velocity = dir * speed;
                actor.position += actor.velocity * dt;
                actor.face_towards(dir);

                let elapsed = elapsed + dt;
                self.state = if elapsed >= self.dodge.duration {
                    DodgeState::Cooldown {
                        since_start: elapsed,
                    }
                } else {
                    DodgeState::Dodging { dir, elapsed }
                };
            }
            DodgeState::Cooldown { since_start } => {
                let since_start = since_start + dt;
                self.state = if since_start >= self.dodge.cooldown {
                    DodgeState::Ready
                } else {
                    DodgeState::Cooldown { since_start }
                };
                self.integrate_normal(actor, move_dir, input.run, dt);
            }
            DodgeState::Ready => {
                self.integrate_normal(actor, move_dir, input.run, dt);
            }
        }
    }

    fn integrate_normal(&self, actor: &mut Actor, move_dir: Vec3, run: bool, dt: f32) {
        let target = if move_dir.length_squared() > 0.0 {
            let mut speed = self.tuning.speed;
            if run {
                speed *= self.tuning.run_multiplier;
            }
            move_dir.normalize() * speed
        } else {
            Vec3::ZERO
        };

        actor.velocity = actor.velocity.lerp(target, self.tuning.blend);
        actor.position += actor.velocity * dt;

        if move_dir.length_squared() > 0.0 {
            actor.face_towards(move_dir);
        }
    }
}

impl Default for MovementIntegrator {
    fn default() -> Self {
        Self::new(MovementTuning::default(), DodgeTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn forward_input() -> MoveInput {
        MoveInput {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn velocity_decays_to_zero_without_input() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        actor.velocity = Vec3::new(5.0, 0.0, -3.0);

        let mut prev = actor.velocity;
        for _ in 0..240 {
            m.update(&mut actor, &MoveInput::default(), Vec3::NEG_Z, FRAME);
            // Monotone decay, no spurious sign flips
            assert!(actor.velocity.x >= 0.0 && actor.velocity.x <= prev.x);
            assert!(actor.velocity.z <= 0.0 && actor.velocity.z >= prev.z);
            prev = actor.velocity;
        }
        assert!(actor.velocity.length() < 1e-3);
    }

    #[test]
    fn velocity_approaches_walk_speed() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        for _ in 0..120 {
            m.update(&mut actor, &forward_input(), Vec3::NEG_Z, FRAME);
        }
        assert!((actor.velocity.length() - m.tuning.speed).abs() < 0.05);
        // Camera looks down -Z, so forward moves the actor toward -Z
        assert!(actor.position.z < 0.0);
    }

    #[test]
    fn run_doubles_target_speed() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        let input = MoveInput {
            forward: true,
            run: true,
            ..Default::default()
        };
        for _ in 0..240 {
            m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        }
        assert!((actor.velocity.length() - m.tuning.speed * m.tuning.run_multiplier).abs() < 0.05);
    }

    #[test]
    fn strafe_right_moves_screen_right() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..60 {
            m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        }
        // camera forward -Z gives right = forward × up = +X
        assert!(actor.position.x > 0.0);
        assert!(actor.position.z.abs() < 1e-3);
    }

    #[test]
    fn dodge_retrigger_is_noop_until_cooldown() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        let input = MoveInput {
            forward: true,
            dodge: true,
            ..Default::default()
        };

        m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        assert!(m.is_dodging());

        // Hold dodge through the whole burst and most of the cooldown: it
        // must not restart.
        let mut elapsed = FRAME;
        while elapsed < 0.9 {
            m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
            elapsed += FRAME;
            if elapsed > m.dodge.duration + FRAME {
                assert!(!m.is_dodging());
            }
        }
        assert!(!m.dodge_ready());

        // Past the 1 s cooldown a held dodge starts a fresh burst.
        while elapsed < 1.0 + FRAME {
            m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
            elapsed += FRAME;
        }
        m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        assert!(m.is_dodging());
    }

    #[test]
    fn dodge_speed_eases_out() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        let input = MoveInput {
            forward: true,
            dodge: true,
            ..Default::default()
        };

        m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        let first = actor.velocity.length();
        assert!((first - m.dodge.start_speed).abs() < 0.01);

        let mut last = first;
        let hold = MoveInput {
            forward: true,
            ..Default::default()
        };
        while m.is_dodging() {
            m.update(&mut actor, &hold, Vec3::NEG_Z, FRAME);
            if m.is_dodging() {
                let speed = actor.velocity.length();
                assert!(speed <= last + 1e-4);
                last = speed;
            }
        }
        // Final dodge frame is near the end speed
        assert!(last < m.dodge.start_speed * 0.5);
    }

    #[test]
    fn dodge_without_input_uses_facing() {
        let mut m = MovementIntegrator::default();
        let mut actor = Actor::new(Vec3::ZERO);
        actor.face_towards(Vec3::X);
        let input = MoveInput {
            dodge: true,
            ..Default::default()
        };
        m.update(&mut actor, &input, Vec3::NEG_Z, FRAME);
        assert!(actor.velocity.x > 0.0);
        assert!(actor.velocity.z.abs() < 1e-4);
    }
}
