/// Key-state tracking: physical keys map to logical actions, the per-frame
/// update reads an immutable snapshot. The host loop owns the state; nothing
/// here is global.
use std::collections::HashSet;

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Run,
    Dodge,
}

/// Key mapping configuration
#[derive(Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub run: KeyCode,
    pub dodge: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            run: KeyCode::ShiftLeft,
            dodge: KeyCode::Space,
        }
    }
}

impl KeyBindings {
    /// Arrow keys double as movement aliases.
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        if code == self.forward || code == KeyCode::ArrowUp {
            Some(Action::Forward)
        } else if code == self.backward || code == KeyCode::ArrowDown {
            Some(Action::Backward)
        } else if code == self.left || code == KeyCode::ArrowLeft {
            Some(Action::Left)
        } else if code == self.right || code == KeyCode::ArrowRight {
            Some(Action::Right)
        } else if code == self.run {
            Some(Action::Run)
        } else if code == self.dodge {
            Some(Action::Dodge)
        } else {
            None
        }
    }
}

/// Immutable per-frame snapshot handed to the movement integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub dodge: bool,
}

impl MoveInput {
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

pub struct InputState {
    pressed: HashSet<Action>,
    look_delta: (f32, f32),
    pointer_pos: (f32, f32),
    pub pointer_locked: bool,
    shoot_queued: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            look_delta: (0.0, 0.0),
            pointer_pos: (0.0, 0.0),
            pointer_locked: false,
            shoot_queued: false,
        }
    }

    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Focus loss / lock loss: forget everything that could stick.
    pub fn clear_keys(&mut self) {
        self.pressed.clear();
    }

    pub fn reset_drag(&mut self) {
        self.look_delta = (0.0, 0.0);
    }

    pub fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    /// Drain the accumulated pointer-drag delta for this frame.
    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn set_pointer_pos(&mut self, x: f32, y: f32) {
        self.pointer_pos = (x, y);
    }

    pub fn pointer_pos(&self) -> (f32, f32) {
        self.pointer_pos
    }

    pub fn queue_shoot(&mut self) {
        self.shoot_queued = true;
    }

    /// Drain the click edge; at most one shot per click.
    pub fn take_shoot(&mut self) -> bool {
        std::mem::take(&mut self.shoot_queued)
    }

    pub fn move_input(&self) -> MoveInput {
        MoveInput {
            forward: self.is_pressed(Action::Forward),
            backward: self.is_pressed(Action::Backward),
            left: self.is_pressed(Action::Left),
            right: self.is_pressed(Action::Right),
            run: self.is_pressed(Action::Run),
            dodge: self.is_pressed(Action::Dodge),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_roundtrip() {
        let mut input = InputState::new();
        input.press(Action::Forward);
        assert!(input.move_input().forward);
        input.release(Action::Forward);
        assert!(!input.move_input().forward);
    }

    #[test]
    fn clear_keys_drops_everything() {
        let mut input = InputState::new();
        input.press(Action::Forward);
        input.press(Action::Run);
        input.clear_keys();
        let snapshot = input.move_input();
        assert!(!snapshot.any_direction());
        assert!(!snapshot.run);
    }

    #[test]
    fn look_delta_is_consumed_once() {
        let mut input = InputState::new();
        input.add_look(3.0, -2.0);
        input.add_look(1.0, 1.0);
        assert_eq!(input.consume_look(), (4.0, -1.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn shoot_edge_fires_once_per_click() {
        let mut input = InputState::new();
        input.queue_shoot();
        assert!(input.take_shoot());
        assert!(!input.take_shoot());
    }

    #[test]
    fn arrow_keys_alias_movement() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(KeyCode::ArrowUp), Some(Action::Forward));
        assert_eq!(bindings.action_for(KeyCode::KeyA), Some(Action::Left));
        assert_eq!(bindings.action_for(KeyCode::KeyQ), None);
    }
}
