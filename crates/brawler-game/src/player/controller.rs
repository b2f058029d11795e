//! Third-person character controller
//!
//! Owns one character's sensors, movement model, camera and attack handling
//! and drives them from two entry points: `on_frame` once per rendered frame
//! and `on_physics_step` once per fixed physics step.

use brawler_core::Countdown;
use brawler_physics::{
    CharacterController, CharacterControllerConfig, DynamicCharacter, PhysicsWorld,
    RigidBodyHandle,
};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::animation::{AnimationSignals, AnimationSink};
use crate::camera::CameraRig;
use crate::combat::{AttackKind, HitResult, MeleeResolver};
use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::ground::{GroundSensor, GroundTransition};
use crate::input::InputHandler;

use super::{CharacterState, Locomotion, LocomotionModel, Motion};

/// The physics body behind the character
enum CharacterBody {
    Kinematic(CharacterController),
    Dynamic(DynamicCharacter),
}

impl CharacterBody {
    fn new(model: LocomotionModel, capsule: CharacterControllerConfig) -> Self {
        match model {
            LocomotionModel::Kinematic => Self::Kinematic(CharacterController::with_config(capsule)),
            LocomotionModel::Dynamic => Self::Dynamic(DynamicCharacter::new(capsule)),
        }
    }

    fn is_spawned(&self) -> bool {
        match self {
            Self::Kinematic(body) => body.collider_handle.is_some(),
            Self::Dynamic(body) => body.body_handle.is_some(),
        }
    }

    fn rigid_body(&self) -> Option<RigidBodyHandle> {
        match self {
            Self::Kinematic(_) => None,
            Self::Dynamic(body) => body.body_handle,
        }
    }
}

/// Third-person controller for one character
pub struct ThirdPersonController {
    config: ControllerConfig,
    state: CharacterState,
    body: CharacterBody,
    locomotion: Locomotion,
    camera: CameraRig,
    ground: GroundSensor,
    melee: MeleeResolver,
    landing_timer: Countdown,
    attack_timer: Countdown,
    /// Triggers raised since the last animation emission
    landing_triggered: bool,
    jump_triggered: bool,
    last_hits: Vec<HitResult>,
    /// The kinematic body ended its last move resting on geometry
    supported: bool,
    warned_unspawned: bool,
}

impl ThirdPersonController {
    /// Create an unspawned controller from a validated configuration
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = CharacterState {
            grounded: true,
            ..Default::default()
        };

        Ok(Self {
            body: CharacterBody::new(config.movement.model, CharacterControllerConfig::default()),
            locomotion: Locomotion::new(config.movement.clone()),
            camera: CameraRig::new(config.camera.clone()),
            ground: GroundSensor::new(config.ground.clone()),
            melee: MeleeResolver::new(config.combat.clone()),
            landing_timer: Countdown::idle(),
            attack_timer: Countdown::idle(),
            landing_triggered: false,
            jump_triggered: false,
            last_hits: Vec::new(),
            supported: false,
            warned_unspawned: false,
            state,
            config,
        })
    }

    /// Create the character body with its feet at `position`
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.camera.place(position);
        self.state.position = position;
        self.state.velocity = Vec3::ZERO;
        self.state.facing = self.camera.heading();
        self.supported = false;

        match &mut self.body {
            CharacterBody::Kinematic(body) => {
                body.spawn(physics, position);
            }
            CharacterBody::Dynamic(body) => {
                body.spawn(physics, position);
                body.set_facing(physics, self.state.facing);
            }
        }
        physics.update_queries();

        info!(
            model = ?self.locomotion.model(),
            "Spawned character at ({:.1}, {:.1}, {:.1})",
            position.x,
            position.y,
            position.z
        );
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn ground(&self) -> &GroundSensor {
        &self.ground
    }

    /// Bodies pushed by attacks during the latest frame
    pub fn last_hits(&self) -> &[HitResult] {
        &self.last_hits
    }

    /// Rigid body of a dynamic character
    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        self.body.rigid_body()
    }

    /// Per-frame update: timers, discrete actions, camera, animation.
    ///
    /// Without a sink the animation projection is skipped for the frame.
    pub fn on_frame(
        &mut self,
        dt: f32,
        input: &mut InputHandler,
        physics: &mut PhysicsWorld,
        sink: Option<&mut dyn AnimationSink>,
    ) {
        if !self.ensure_spawned() {
            return;
        }
        self.sync_from_body(physics);
        self.last_hits.clear();

        if self.landing_timer.tick(dt) {
            self.finish_landing();
        }
        if self.attack_timer.tick(dt) {
            self.state.attacking = false;
        }

        if input.take_jump_pressed() {
            self.jump(physics);
        }
        if input.take_punch_pressed() {
            self.attack(AttackKind::Punch, physics);
        }
        if input.take_kick_pressed() {
            self.attack(AttackKind::Kick, physics);
        }

        self.camera.update(input.look_delta(), self.state.position, dt);
        if self.config.syncs_character_yaw() {
            self.state.facing = self.camera.heading();
            if let CharacterBody::Dynamic(body) = &self.body {
                body.set_facing(physics, self.state.facing);
            }
        }

        let landing_started = std::mem::take(&mut self.landing_triggered);
        let jump_started = std::mem::take(&mut self.jump_triggered);
        if let Some(sink) = sink {
            AnimationSignals::project(&self.state, input.move_intent(), self.locomotion.model())
                .with_triggers(landing_started, jump_started)
                .emit(sink);
        }
    }

    /// Fixed-step update: ground sensing and movement
    pub fn on_physics_step(&mut self, dt: f32, input: &InputHandler, physics: &mut PhysicsWorld) {
        if !self.ensure_spawned() {
            return;
        }
        self.sync_from_body(physics);

        let transition = self
            .ground
            .update_with_support(&*physics, self.state.position, self.supported);
        match transition {
            GroundTransition::JustLanded => self.begin_landing(physics),
            GroundTransition::JustLeftGround => {
                if self.config.ground.cancel_landing_when_airborne && self.landing_timer.is_running() {
                    self.landing_timer.cancel();
                    self.finish_landing();
                }
            }
            GroundTransition::None => {}
        }
        self.state.grounded = self.ground.is_grounded();

        let motion = self.locomotion.step(
            &mut self.state,
            input.move_intent(),
            self.camera.flat_forward(),
            self.camera.flat_right(),
            dt,
        );
        self.apply_motion(motion, physics, dt);
    }

    fn ensure_spawned(&mut self) -> bool {
        if self.body.is_spawned() {
            return true;
        }
        if !self.warned_unspawned {
            warn!("Character has no physics body; call spawn first");
            self.warned_unspawned = true;
        }
        false
    }

    /// Mirror the solver's result for a dynamic body
    fn sync_from_body(&mut self, physics: &PhysicsWorld) {
        if let CharacterBody::Dynamic(body) = &self.body {
            if let Some(position) = body.position(physics) {
                self.state.position = position;
            }
            if let Some(velocity) = body.velocity(physics) {
                self.state.velocity = velocity;
            }
            if let Some(facing) = body.facing(physics) {
                self.state.facing = facing;
            }
        }
    }

    fn apply_motion(&mut self, motion: Motion, physics: &mut PhysicsWorld, dt: f32) {
        match (&mut self.body, motion) {
            (CharacterBody::Kinematic(body), Motion::Translate(translation)) => {
                let applied = body.move_character(physics, translation, dt);
                // Blocked overhead: stop rising
                if translation.y > 0.0 && applied.y < translation.y * 0.5 {
                    self.state.velocity.y = 0.0;
                }
                // Blocked below, possibly on an edge the ground ray misses: stop falling
                let blocked_below = translation.y < 0.0 && applied.y > translation.y * 0.5;
                self.supported = body.grounded || blocked_below;
                if self.supported {
                    let stick = self.locomotion.config().ground_stick_velocity;
                    self.state.velocity.y = self.state.velocity.y.max(stick);
                }
                self.state.position = body.position;
            }
            (CharacterBody::Dynamic(body), Motion::Drive { acceleration, facing }) => {
                body.set_acceleration(physics, acceleration);
                body.set_facing(physics, facing);
                self.state.facing = facing;
            }
            (CharacterBody::Dynamic(body), Motion::Impulse(impulse)) => {
                body.apply_impulse(physics, impulse);
            }
            (_, Motion::None) => {}
            (_, motion) => debug!(?motion, "Motion does not apply to this body"),
        }
    }

    fn begin_landing(&mut self, physics: &mut PhysicsWorld) {
        debug!("Landed");
        self.ground.set_landing(true);
        self.state.landing = true;
        self.landing_triggered = true;
        self.landing_timer.start(self.config.ground.land_animation_duration);

        if let CharacterBody::Dynamic(body) = &self.body {
            body.clear_horizontal_velocity(physics);
            self.state.velocity.x = 0.0;
            self.state.velocity.z = 0.0;
        }
    }

    fn finish_landing(&mut self) {
        self.ground.set_landing(false);
        self.state.landing = false;
    }

    fn jump(&mut self, physics: &mut PhysicsWorld) {
        let Some(motion) = self.locomotion.jump(&mut self.state) else {
            return;
        };
        self.apply_motion(motion, physics, 0.0);
        // Stays off the ground until the next ground check says otherwise
        self.state.grounded = false;
        self.jump_triggered = true;
    }

    fn attack(&mut self, kind: AttackKind, physics: &mut PhysicsWorld) {
        debug!("{kind}!");
        let exclude = self.body.rigid_body();
        let hits = self
            .melee
            .resolve(kind, self.state.position, self.state.forward(), physics, exclude);
        self.last_hits.extend(hits);

        if kind == AttackKind::Punch {
            self.state.attacking = true;
            self.attack_timer.start(self.melee.profile().attack_flag_duration);
        }
    }
}
