// CONTROLLER: Input, game logic, and per-frame update
pub mod camera_controller;
pub mod input;
pub mod movement;
pub mod projectiles;

pub use camera_controller::{OrbitRig, OrbitTuning, ShoulderRig, ShoulderTuning};
pub use input::{Action, InputState, KeyBindings, MoveInput};
pub use movement::{DodgeTuning, MovementIntegrator, MovementTuning};
pub use projectiles::{Projectile, ProjectilePool, ProjectileTuning};
