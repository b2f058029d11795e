//! Animation parameter signaling
//!
//! Projects controller state onto the named parameters an external animation
//! state machine reads. The projection is write-only: nothing here reads
//! values back from the animation side.

use std::collections::HashMap;

use crate::input::MoveIntent;
use crate::player::{CharacterState, LocomotionModel};

/// Parameter names understood by the character's animation graph
pub mod params {
    pub const DIRECTION: &str = "direction";
    pub const SPEED: &str = "speed";
    pub const IS_GROUNDED: &str = "isGrounded";
    pub const VERTICAL_VELOCITY: &str = "verticalVelocity";
    pub const IS_ATTACKING: &str = "isStandartCast";
    pub const IS_JUMPING: &str = "isJumping";
    pub const LANDING: &str = "isLanding";
    pub const JUMP: &str = "Jump";
}

/// Vertical speed beyond which an airborne character counts as rising or
/// falling
pub const JUMP_VELOCITY_THRESHOLD: f32 = 0.1;

/// Receiver of animation parameters (an animator, a network replicator, ...)
pub trait AnimationSink {
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_trigger(&mut self, name: &str);
}

/// A parameter value held by [`AnimationParameters`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

/// In-memory animation sink: last written value per parameter plus the
/// triggers fired since they were last drained
#[derive(Debug, Clone, Default)]
pub struct AnimationParameters {
    values: HashMap<String, AnimationValue>,
    triggers: Vec<String>,
}

impl AnimationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<AnimationValue> {
        self.values.get(name).copied()
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            AnimationValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            AnimationValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            AnimationValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Take the triggers fired since the last drain, oldest first
    pub fn drain_triggers(&mut self) -> Vec<String> {
        std::mem::take(&mut self.triggers)
    }
}

impl AnimationSink for AnimationParameters {
    fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_owned(), AnimationValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_owned(), AnimationValue::Float(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_owned(), AnimationValue::Bool(value));
    }

    fn set_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_owned());
    }
}

/// Classify a move intent into one of nine direction buckets.
///
/// 0 idle, 1 forward, 2 forward-right, 3 right, 4 back-right, 5 back,
/// 6 back-left, 7 left, 8 forward-left. Cardinal buckets need an exact ±1
/// on their axis; partial single-axis input falls through to idle.
pub fn direction_octant(intent: MoveIntent) -> i32 {
    let (x, y) = (intent.x(), intent.y());

    if y == 1.0 {
        1
    } else if x > 0.0 && y > 0.0 {
        2
    } else if x == 1.0 {
        3
    } else if y < 0.0 && x > 0.0 {
        4
    } else if y == -1.0 {
        5
    } else if y < 0.0 && x < 0.0 {
        6
    } else if x == -1.0 {
        7
    } else if y > 0.0 && x < 0.0 {
        8
    } else {
        0
    }
}

/// One frame's worth of animation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSignals {
    pub direction: i32,
    pub speed: f32,
    pub grounded: bool,
    pub vertical_velocity: f32,
    pub attacking: bool,
    /// `None` leaves the sink's current value untouched
    pub jumping: Option<bool>,
    pub landing_started: bool,
    pub jump_started: bool,
}

impl AnimationSignals {
    /// Project controller state and the current move intent
    pub fn project(state: &CharacterState, intent: MoveIntent, model: LocomotionModel) -> Self {
        let speed = match model {
            LocomotionModel::Kinematic => intent.magnitude(),
            LocomotionModel::Dynamic => state.horizontal_speed(),
        };

        Self {
            direction: direction_octant(intent),
            speed,
            grounded: state.grounded,
            vertical_velocity: state.velocity.y,
            attacking: state.attacking,
            jumping: jumping_signal(state.grounded, state.velocity.y),
            landing_started: false,
            jump_started: false,
        }
    }

    /// Attach the one-shot triggers raised since the last emission
    pub fn with_triggers(mut self, landing_started: bool, jump_started: bool) -> Self {
        self.landing_started = landing_started;
        self.jump_started = jump_started;
        self
    }

    /// Write every signal to the sink
    pub fn emit(&self, sink: &mut dyn AnimationSink) {
        sink.set_int(params::DIRECTION, self.direction);
        sink.set_float(params::SPEED, self.speed);
        sink.set_bool(params::IS_GROUNDED, self.grounded);
        sink.set_float(params::VERTICAL_VELOCITY, self.vertical_velocity);
        sink.set_bool(params::IS_ATTACKING, self.attacking);
        if let Some(jumping) = self.jumping {
            sink.set_bool(params::IS_JUMPING, jumping);
        }
        if self.landing_started {
            sink.set_trigger(params::LANDING);
        }
        if self.jump_started {
            sink.set_trigger(params::JUMP);
        }
    }
}

/// Rising while airborne sets the flag, falling clears it, and the band in
/// between keeps whatever was last written
fn jumping_signal(grounded: bool, vertical_velocity: f32) -> Option<bool> {
    if grounded {
        Some(false)
    } else if vertical_velocity > JUMP_VELOCITY_THRESHOLD {
        Some(true)
    } else if vertical_velocity < -JUMP_VELOCITY_THRESHOLD {
        Some(false)
    } else {
        None
    }
}
