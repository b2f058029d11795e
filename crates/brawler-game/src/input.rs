//! Input system with action-based mapping
//!
//! Provides an abstraction layer between raw input events and the logical
//! intents the controller consumes: a move vector, a look delta, and
//! edge-triggered jump/punch/kick presses.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Punch (Left mouse button by default)
    Punch,
    /// Kick (Right mouse button by default)
    Kick,
}

/// 2D movement intent: x strafes right, y moves forward, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent(pub Vec2);

impl MoveIntent {
    pub const ZERO: MoveIntent = MoveIntent(Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Length of the intent vector
    pub fn magnitude(&self) -> f32 {
        self.0.length()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Vec2::ZERO
    }
}

/// Current state of all inputs
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Presses not yet consumed by the controller
    pub pressed: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
    /// Whether the cursor is captured (invisible, locked)
    pub cursor_captured: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Consume a pending press of `action`
    pub fn take_pressed(&mut self, action: InputAction) -> bool {
        self.pressed.remove(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    fn press(&mut self, action: InputAction) {
        // Key repeat arrives as another Pressed event while held
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
    }

    fn release(&mut self, action: InputAction) {
        self.held.remove(&action);
    }
}

/// Binding of a physical key to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputBinding {
    fn from(button: MouseButton) -> Self {
        let id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };
        Self::Mouse(id)
    }
}

/// Maps physical inputs to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);
        bindings.bind(KeyCode::Space, InputAction::Jump);

        bindings.bind_mouse(0, InputAction::Punch);
        bindings.bind_mouse(1, InputAction::Kick);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: InputAction) {
        self.insert(InputBinding::Mouse(button), action);
    }

    fn insert(&mut self, binding: InputBinding, action: InputAction) {
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(bindings) = self.reverse.get_mut(&previous) {
                bindings.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        let binding = InputBinding::Key(key);
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// All bindings for an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Input handler that processes raw events and exposes controller intents
#[derive(Debug)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y axis
    pub invert_y: bool,
    /// Whether events are being processed
    enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Create a new, enabled input handler with default bindings
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
            mouse_sensitivity: 1.0,
            invert_y: false,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start processing events
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop processing events and drop anything held or pending
    pub fn disable(&mut self) {
        self.enabled = false;
        self.state.clear_all();
    }

    /// Restore the default bindings, dropping any custom ones
    pub fn reset_bindings(&mut self) {
        self.bindings = InputBindings::default();
        self.state.clear_all();
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.handle_binding(InputBinding::Key(key_code), element_state);
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.handle_binding(InputBinding::from(button), state);
    }

    fn handle_binding(&mut self, binding: InputBinding, element_state: ElementState) {
        if !self.enabled {
            return;
        }
        if let Some(action) = self.bindings.get_action(&binding) {
            match element_state {
                ElementState::Pressed => self.state.press(action),
                ElementState::Released => self.state.release(action),
            }
        }
    }

    /// Handle raw mouse movement
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.enabled && self.state.cursor_captured {
            let y_mult = if self.invert_y { -1.0 } else { 1.0 };
            // Device y grows downward; look delta y grows upward
            self.state.mouse_delta += Vec2::new(
                delta.0 as f32 * self.mouse_sensitivity,
                -(delta.1 as f32) * self.mouse_sensitivity * y_mult,
            );
        }
    }

    /// Composite WASD axis. Diagonals are normalized to unit length.
    pub fn move_intent(&self) -> MoveIntent {
        let axis = |positive: InputAction, negative: InputAction| {
            let mut value = 0.0;
            if self.state.is_held(positive) {
                value += 1.0;
            }
            if self.state.is_held(negative) {
                value -= 1.0;
            }
            value
        };

        let raw = Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBackward),
        );
        MoveIntent(raw.normalize_or_zero())
    }

    /// Accumulated look delta for this frame
    pub fn look_delta(&self) -> Vec2 {
        self.state.mouse_delta
    }

    /// True once per physical jump press
    pub fn take_jump_pressed(&mut self) -> bool {
        self.state.take_pressed(InputAction::Jump)
    }

    /// True once per physical punch press
    pub fn take_punch_pressed(&mut self) -> bool {
        self.state.take_pressed(InputAction::Punch)
    }

    /// True once per physical kick press
    pub fn take_kick_pressed(&mut self) -> bool {
        self.state.take_pressed(InputAction::Kick)
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    /// Set cursor capture state
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(handler: &mut InputHandler, code: KeyCode, state: ElementState) {
        handler.handle_keyboard(PhysicalKey::Code(code), state);
    }

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(
            bindings.get_key_action(KeyCode::KeyW),
            Some(InputAction::MoveForward)
        );
        assert_eq!(
            bindings.get_key_action(KeyCode::Space),
            Some(InputAction::Jump)
        );
        assert_eq!(
            bindings.get_action(&InputBinding::from(MouseButton::Right)),
            Some(InputAction::Kick)
        );
    }

    #[test]
    fn test_press_consumed_once() {
        let mut input = InputHandler::new();
        key(&mut input, KeyCode::Space, ElementState::Pressed);
        // Key repeat while held
        key(&mut input, KeyCode::Space, ElementState::Pressed);

        assert!(input.take_jump_pressed());
        assert!(!input.take_jump_pressed());

        key(&mut input, KeyCode::Space, ElementState::Released);
        key(&mut input, KeyCode::Space, ElementState::Pressed);
        assert!(input.take_jump_pressed());
    }

    #[test]
    fn test_mouse_buttons_map_to_attacks() {
        let mut input = InputHandler::new();
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.handle_mouse_button(MouseButton::Right, ElementState::Pressed);

        assert!(input.take_punch_pressed());
        assert!(input.take_kick_pressed());
        assert!(!input.take_punch_pressed());
    }

    #[test]
    fn test_move_intent_composite() {
        let mut input = InputHandler::new();
        assert!(input.move_intent().is_zero());

        key(&mut input, KeyCode::KeyW, ElementState::Pressed);
        assert_eq!(input.move_intent(), MoveIntent::new(0.0, 1.0));

        key(&mut input, KeyCode::KeyD, ElementState::Pressed);
        let diagonal = input.move_intent();
        assert!((diagonal.magnitude() - 1.0).abs() < 1e-6);
        assert!(diagonal.x() > 0.0 && diagonal.y() > 0.0);

        key(&mut input, KeyCode::KeyS, ElementState::Pressed);
        assert_eq!(input.move_intent(), MoveIntent::new(1.0, 0.0));
    }

    #[test]
    fn test_disable_drops_state_and_ignores_events() {
        let mut input = InputHandler::new();
        key(&mut input, KeyCode::KeyW, ElementState::Pressed);
        key(&mut input, KeyCode::Space, ElementState::Pressed);

        input.disable();
        assert!(input.move_intent().is_zero());
        assert!(!input.take_jump_pressed());

        key(&mut input, KeyCode::Space, ElementState::Pressed);
        assert!(!input.take_jump_pressed());

        input.enable();
        key(&mut input, KeyCode::Space, ElementState::Pressed);
        assert!(input.take_jump_pressed());
    }

    #[test]
    fn test_look_delta_requires_capture() {
        let mut input = InputHandler::new();
        input.handle_mouse_motion((4.0, 2.0));
        assert_eq!(input.look_delta(), Vec2::ZERO);

        input.set_cursor_captured(true);
        input.handle_mouse_motion((4.0, 2.0));
        assert_eq!(input.look_delta(), Vec2::new(4.0, -2.0));

        input.end_frame();
        assert_eq!(input.look_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_rebinding_keeps_reverse_lookup_clean() {
        let mut input = InputHandler::new();
        input.bindings.bind(KeyCode::KeyW, InputAction::Jump);
        assert!(input
            .bindings
            .bindings_for(InputAction::MoveForward)
            .is_empty());

        input.reset_bindings();
        assert_eq!(
            input.bindings.bindings_for(InputAction::MoveForward),
            &[InputBinding::Key(KeyCode::KeyW)]
        );
        assert_eq!(input.bindings.bindings_for(InputAction::Jump).len(), 1);
    }
}
