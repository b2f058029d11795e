//! Brawler - headless driver for the third-person character controller
//!
//! Builds a small physics arena, spawns one character and plays a scripted
//! input session through the same frame/fixed-step loop a game would run.
//!
//! Usage: `brawler [SETTINGS.toml]` or `brawler --save-defaults PATH`

mod arena;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use brawler_core::{GameTime, Vec3};
use brawler_game::{AnimationParameters, InputHandler, LocomotionModel, ThirdPersonController};
use brawler_physics::{PhysicsConfig, PhysicsWorld};

use crate::arena::Arena;
use crate::settings::Settings;

/// One raw input event at a point in simulated time
struct ScriptEvent {
    at: f32,
    input: ScriptInput,
}

enum ScriptInput {
    Key(KeyCode, ElementState),
    Mouse(MouseButton, ElementState),
    Look(f64, f64),
}

impl ScriptEvent {
    fn apply(&self, input: &mut InputHandler) {
        match self.input {
            ScriptInput::Key(key, state) => input.handle_keyboard(PhysicalKey::Code(key), state),
            ScriptInput::Mouse(button, state) => input.handle_mouse_button(button, state),
            ScriptInput::Look(dx, dy) => input.handle_mouse_motion((dx, dy)),
        }
    }
}

/// Walk toward the crates, look around, jump, punch, kick, strafe
fn script() -> Vec<ScriptEvent> {
    use ElementState::{Pressed, Released};
    use ScriptInput::{Key, Look, Mouse};

    let event = |at, input| ScriptEvent { at, input };
    vec![
        event(0.2, Key(KeyCode::KeyW, Pressed)),
        event(1.0, Look(6.0, 0.0)),
        event(1.1, Look(-6.0, 0.0)),
        event(1.5, Look(0.0, -3.0)),
        event(2.0, Key(KeyCode::Space, Pressed)),
        event(2.05, Key(KeyCode::Space, Released)),
        event(3.0, Key(KeyCode::KeyW, Released)),
        event(3.2, Mouse(MouseButton::Left, Pressed)),
        event(3.3, Mouse(MouseButton::Left, Released)),
        event(3.8, Mouse(MouseButton::Right, Pressed)),
        event(3.9, Mouse(MouseButton::Right, Released)),
        event(4.2, Key(KeyCode::KeyD, Pressed)),
        event(5.0, Key(KeyCode::KeyD, Released)),
    ]
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let mut args = std::env::args_os().skip(1);
    let settings = match args.next() {
        Some(flag) if flag == "--save-defaults" => {
            let Some(path) = args.next() else {
                bail!("--save-defaults needs a file path");
            };
            return Settings::default().save(&PathBuf::from(path));
        }
        Some(path) => Settings::load_from(&PathBuf::from(path))?,
        None => Settings::load(),
    };
    let frame_rate = settings.session.frame_rate;
    if frame_rate.is_nan() || frame_rate <= 0.0 {
        bail!("session.frame_rate must be positive");
    }
    settings.time.validate().context("Invalid time settings")?;

    info!("Starting Brawler ({:?} locomotion)", settings.controller.model());

    let mut physics_config = PhysicsConfig {
        timestep: settings.time.fixed_timestep,
        ..Default::default()
    };
    if settings.controller.model() == LocomotionModel::Dynamic {
        physics_config.gravity = Vec3::NEG_Y * settings.controller.movement.gravity;
    }
    let mut physics = PhysicsWorld::with_config(physics_config);
    let arena = Arena::build(&mut physics);

    let mut controller = ThirdPersonController::new(settings.controller.clone())
        .context("Invalid controller configuration")?;
    controller.spawn(&mut physics, Vec3::ZERO);

    let mut input = InputHandler::new();
    input.set_cursor_captured(true);
    let mut animator = AnimationParameters::new();
    let mut time = GameTime::new(settings.time.clone());

    let frame_dt = 1.0 / settings.session.frame_rate;
    let frames = (settings.session.duration * settings.session.frame_rate).ceil() as u32;
    let mut script = script().into_iter().peekable();

    for _ in 0..frames {
        time.update(frame_dt);
        let now = time.total_time as f32;
        while let Some(event) = script.next_if(|e| e.at <= now) {
            event.apply(&mut input);
        }

        for _ in 0..time.fixed_steps() {
            controller.on_physics_step(time.fixed_delta(), &input, &mut physics);
            physics.step();
        }
        controller.on_frame(time.delta_time, &mut input, &mut physics, Some(&mut animator));

        for trigger in animator.drain_triggers() {
            info!("[{:.2}s] Animation trigger: {}", now, trigger);
        }
        for hit in controller.last_hits() {
            info!("[{:.2}s] Pushed {:?} with {:?}", now, hit.body, hit.impulse);
        }
        input.end_frame();
    }

    let state = controller.state();
    info!(
        "Finished after {} frames: character at ({:.2}, {:.2}, {:.2}), yaw {:.1}, grounded {}",
        time.frame_count,
        state.position.x,
        state.position.y,
        state.position.z,
        state.yaw(),
        state.grounded
    );
    for (i, position) in arena.crate_positions(&physics).enumerate() {
        info!("Crate {} at ({:.2}, {:.2}, {:.2})", i, position.x, position.y, position.z);
    }

    Ok(())
}
