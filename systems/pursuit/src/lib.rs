#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit agent that replays the player's recorded trail.
//!
//! Once the world arms the pursuer, the system waits out the pursuit delay in
//! simulated time and then asks the world to activate it. While active it
//! steps toward the current waypoint at a fixed speed each tick, requests the
//! next waypoint on arrival and reports contact when its region overlaps the
//! player's. Everything stops at the first tick after the attempt leaves the
//! running state.

use std::time::Duration;

use maze_chase_core::{Command, Delay, Event, GameSettings, PursuitPhase, RunState, Vec2};
use maze_chase_world::query::PursuerSnapshot;
use tracing::debug;

/// Distance below which the pursuer counts as standing on its target.
pub const ARRIVAL_EPSILON: f32 = 1e-4;

/// Contact geometry used by the pursuit system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    player_radius: f32,
    pursuer_radius: f32,
}

impl Config {
    /// Creates a configuration from explicit contact radii.
    #[must_use]
    pub const fn new(player_radius: f32, pursuer_radius: f32) -> Self {
        Self {
            player_radius,
            pursuer_radius,
        }
    }

    /// Extracts the contact radii from the process-wide defaults.
    #[must_use]
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(settings.player_radius, settings.pursuer_radius)
    }

    /// Centre distance below which the two regions overlap.
    #[must_use]
    pub fn contact_distance(&self) -> f32 {
        self.player_radius + self.pursuer_radius
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default())
    }
}

/// Pure system that reacts to world events and emits pursuit commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    config: Config,
    delay: Option<Delay>,
    speed: f32,
}

impl Pursuit {
    /// Creates a pursuit system using the provided contact geometry.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            delay: None,
            speed: 0.0,
        }
    }

    /// Consumes world events and the pursuer snapshot to emit pursuit commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        run_state: RunState,
        pursuer: &PursuerSnapshot,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.on_tick(*dt, run_state, pursuer, player, out);
                }
                Event::PursuitArmed { delay, speed } => {
                    self.delay = Some(Delay::new(*delay));
                    self.speed = *speed;
                }
                Event::AttemptStarted { .. }
                | Event::GoalReached { .. }
                | Event::AttemptCancelled { .. } => self.reset(),
                _ => {}
            }
        }
    }

    fn reset(&mut self) {
        self.delay = None;
    }

    fn on_tick(
        &mut self,
        dt: Duration,
        run_state: RunState,
        pursuer: &PursuerSnapshot,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        if !run_state.is_running() {
            self.reset();
            return;
        }

        match pursuer.phase {
            PursuitPhase::Inactive => {}
            PursuitPhase::Armed => {
                let Some(delay) = self.delay.as_mut() else {
                    return;
                };
                if delay.advance(dt) {
                    debug!(waited = ?delay.elapsed(), "pursuer_activation_requested");
                    out.push(Command::ActivatePursuer);
                }
            }
            PursuitPhase::Active => self.step(dt, pursuer, player, out),
        }
    }

    fn step(
        &self,
        dt: Duration,
        pursuer: &PursuerSnapshot,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        let Some(target) = pursuer.target else {
            out.push(Command::AdvancePursuerTarget);
            return;
        };

        let position = move_towards(pursuer.position, target, self.speed * dt.as_secs_f32());
        if position != pursuer.position {
            out.push(Command::StepPursuer { position });
        }
        if position.distance(target) <= ARRIVAL_EPSILON {
            out.push(Command::AdvancePursuerTarget);
        }
        if position.distance(player) < self.config.contact_distance() {
            debug!(x = position.x, y = position.y, "pursuer_contact");
            out.push(Command::ReportContact);
        }
    }
}

/// Moves `from` toward `to` by at most `max_delta`, landing exactly on `to`.
///
/// Non-positive deltas leave the position unchanged.
#[must_use]
pub fn move_towards(from: Vec2, to: Vec2, max_delta: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        return to;
    }
    if max_delta <= 0.0 {
        return from;
    }
    from + offset / distance * max_delta
}
