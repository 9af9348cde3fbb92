// MODEL: Game state and data
pub mod actor;
pub mod camera;
pub mod scene;

pub use actor::Actor;
pub use camera::Camera;
pub use scene::{Prop, Scene};
