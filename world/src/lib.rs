#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod layout;
mod run;
mod trail;

use std::time::Duration;

use maze_chase_core::{
    AttemptError, Command, Event, GameSettings, LevelConfig, LevelId, Maze, PursuitPhase,
    RunState, Vec2, WELCOME_BANNER,
};
use tracing::{debug, info, warn};

pub use layout::{LevelLayout, TRIGGER_TOLERANCE};
pub use run::{AttemptSummary, FinishCallback};
pub use trail::PathTrail;

use run::{IntroProgress, RunAttempt};

/// Level registered with the world together with its generated maze.
#[derive(Clone, Debug)]
struct Level {
    id: LevelId,
    config: LevelConfig,
    maze: Maze,
}

#[derive(Clone, Copy, Debug, Default)]
struct Pursuer {
    phase: PursuitPhase,
    position: Vec2,
    target: Option<Vec2>,
    speed: f32,
}

impl Pursuer {
    fn parked(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    settings: GameSettings,
    levels: Vec<Level>,
    attempt: Option<RunAttempt>,
    trail: PathTrail,
    player: Vec2,
    pursuer: Pursuer,
    clock: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a new world that resolves level configuration against `settings`.
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            banner: WELCOME_BANNER,
            settings,
            levels: Vec::new(),
            attempt: None,
            trail: PathTrail::new(),
            player: Vec2::ZERO,
            pursuer: Pursuer::default(),
            clock: Duration::ZERO,
            tick_index: 0,
        }
    }

    fn level_index(&self, level: LevelId) -> Option<usize> {
        self.levels.iter().position(|entry| entry.id == level)
    }

    fn running(&self) -> bool {
        self.attempt
            .as_ref()
            .is_some_and(|attempt| attempt.state().is_running())
    }

    fn advance_attempt(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };

        match attempt.advance_intro(dt, self.clock) {
            IntroProgress::Waiting => return,
            IntroProgress::Elapsed => {
                info!(level = attempt.level().get(), "attempt_running");
                out_events.push(Event::AttemptRunning {
                    level: attempt.level(),
                });
                return;
            }
            IntroProgress::NotInIntro => {}
        }

        if !attempt.state().is_running() {
            return;
        }

        let elapsed = attempt.update_elapsed(self.clock);
        out_events.push(Event::ElapsedUpdated { elapsed });

        let layout = *attempt.layout();
        if self.player.distance(layout.goal()) < attempt.resolved().goal_distance {
            if let Some(summary) = attempt.finish() {
                self.pursuer = Pursuer::parked(self.pursuer.position);
                info!(
                    level = summary.level.get(),
                    elapsed = %summary.elapsed,
                    "goal_reached"
                );
                out_events.push(Event::GoalReached {
                    level: summary.level,
                    elapsed: summary.elapsed,
                });
            }
            return;
        }

        if layout.on_trigger_line(self.player) && attempt.take_trigger() {
            let resolved = attempt.resolved();
            self.pursuer.phase = PursuitPhase::Armed;
            self.pursuer.speed = resolved.pursuit_speed;
            info!(
                delay_secs = resolved.pursuit_delay.as_secs_f32(),
                speed = resolved.pursuit_speed,
                "pursuit_armed"
            );
            out_events.push(Event::PursuitArmed {
                delay: resolved.pursuit_delay,
                speed: resolved.pursuit_speed,
            });
        }
    }

    fn retarget_pursuer(&mut self, out_events: &mut Vec<Event>) {
        let target = self.trail.take_next(self.player);
        self.pursuer.target = Some(target);
        out_events.push(Event::PursuerTargetChanged { target });
    }

    fn move_player(&mut self, to: Vec2, out_events: &mut Vec<Event>) {
        let from = self.player;
        if from == to {
            return;
        }
        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RegisterLevel { config, maze } => {
            let Ok(raw) = u32::try_from(world.levels.len()) else {
                warn!(name = %config.name, "level_registry_full");
                return;
            };
            let level = LevelId::new(raw);
            info!(
                level = raw,
                name = %config.name,
                width = maze.width(),
                height = maze.height(),
                "level_registered"
            );
            world.levels.push(Level {
                id: level,
                config,
                maze,
            });
            out_events.push(Event::LevelRegistered { level });
        }
        Command::StartAttempt { level } => start_attempt(world, level, None, out_events),
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_attempt(dt, out_events);
        }
        Command::SetPlayerPosition { position } => world.move_player(position, out_events),
        Command::MovePlayer { motion } => {
            if !world.running() {
                let state = query::run_state(world);
                debug!(?state, "movement_ignored");
                out_events.push(Event::MovementIgnored { state });
                return;
            }
            let point = world.player;
            world.trail.append(point);
            out_events.push(Event::WaypointRecorded { point });
            world.move_player(motion.destination(point), out_events);
        }
        Command::ActivatePursuer => {
            if !world.running() || world.pursuer.phase != PursuitPhase::Armed {
                debug!(phase = ?world.pursuer.phase, "activation_ignored");
                return;
            }
            let Some(attempt) = world.attempt.as_ref() else {
                return;
            };
            let position = attempt.layout().spawn();
            world.pursuer.phase = PursuitPhase::Active;
            world.pursuer.position = position;
            info!(x = position.x, y = position.y, "pursuer_activated");
            out_events.push(Event::PursuerActivated { position });
            world.retarget_pursuer(out_events);
        }
        Command::AdvancePursuerTarget => {
            if world.running() && world.pursuer.phase == PursuitPhase::Active {
                world.retarget_pursuer(out_events);
            }
        }
        Command::StepPursuer { position } => {
            if !world.running() || world.pursuer.phase != PursuitPhase::Active {
                return;
            }
            let from = world.pursuer.position;
            world.pursuer.position = position;
            out_events.push(Event::PursuerMoved { from, to: position });
        }
        Command::ReportContact => {
            let Some(summary) = world.attempt.as_mut().and_then(|attempt| attempt.cancel()) else {
                debug!("contact_ignored");
                return;
            };
            world.pursuer = Pursuer::parked(world.pursuer.position);
            info!(
                level = summary.level.get(),
                elapsed = %summary.elapsed,
                "attempt_cancelled"
            );
            out_events.push(Event::AttemptCancelled {
                level: summary.level,
                elapsed: summary.elapsed,
            });
        }
        Command::NextLevel => {
            let Some(attempt) = world.attempt.as_ref() else {
                debug!("next_level_ignored");
                return;
            };
            if attempt.state() != RunState::Finished {
                debug!(state = ?attempt.state(), "next_level_ignored");
                return;
            }
            let next = (attempt.index() + 1) % world.levels.len();
            if let Some(level) = world.levels.get(next).map(|entry| entry.id) {
                start_attempt(world, level, None, out_events);
            }
        }
        Command::Retry => {
            let Some(attempt) = world.attempt.as_ref() else {
                debug!("retry_ignored");
                return;
            };
            if attempt.state() != RunState::Cancelled {
                debug!(state = ?attempt.state(), "retry_ignored");
                return;
            }
            let level = attempt.level();
            start_attempt(world, level, None, out_events);
        }
    }
}

/// Starts a fresh attempt of `level`, replacing any attempt in progress.
///
/// The trail is cleared, the player and the pursuer are placed at the spawn
/// point and the attempt enters its intro. `on_finish` is invoked exactly once
/// if the attempt reaches the goal. Requests naming an unregistered level are
/// discarded and reported through [`Event::AttemptRejected`].
pub fn start_attempt(
    world: &mut World,
    level: LevelId,
    on_finish: Option<FinishCallback>,
    out_events: &mut Vec<Event>,
) {
    let Some(index) = world.level_index(level) else {
        warn!(level = level.get(), "attempt_rejected");
        out_events.push(Event::AttemptRejected {
            level,
            reason: AttemptError::NotRegistered,
        });
        return;
    };

    let entry = &world.levels[index];
    let resolved = entry.config.resolve(&world.settings);
    let layout = LevelLayout::new(&entry.maze, resolved.trigger_line);
    info!(
        level = level.get(),
        name = %entry.config.name,
        intro_secs = resolved.intro_duration.as_secs_f32(),
        pursuit = resolved.pursuit_enabled,
        "attempt_started"
    );

    world.trail.clear();
    world.player = layout.spawn();
    world.pursuer = Pursuer::parked(layout.spawn());
    world.attempt = Some(RunAttempt::begin(level, index, resolved, layout, on_finish));
    out_events.push(Event::AttemptStarted {
        level,
        spawn: layout.spawn(),
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        Color, ElapsedTime, GameSettings, LevelId, Maze, Palette, PursuitPhase, RunState,
        TerminalAction, Vec2,
    };

    use super::{LevelLayout, PathTrail, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the process-wide defaults.
    #[must_use]
    pub fn settings(world: &World) -> &GameSettings {
        &world.settings
    }

    /// Number of registered levels.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Level of the current attempt, if any attempt was started.
    #[must_use]
    pub fn current_level(world: &World) -> Option<LevelId> {
        world.attempt.as_ref().map(|attempt| attempt.level())
    }

    /// State of the current attempt.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world
            .attempt
            .as_ref()
            .map_or(RunState::Idle, |attempt| attempt.state())
    }

    /// Run time of the current attempt.
    #[must_use]
    pub fn elapsed(world: &World) -> ElapsedTime {
        world
            .attempt
            .as_ref()
            .map_or(ElapsedTime::ZERO, |attempt| attempt.elapsed())
    }

    /// Maze of a registered level.
    #[must_use]
    pub fn maze(world: &World, level: LevelId) -> Option<&Maze> {
        world
            .levels
            .iter()
            .find(|entry| entry.id == level)
            .map(|entry| &entry.maze)
    }

    /// Geometry of the current attempt.
    #[must_use]
    pub fn layout(world: &World) -> Option<&LevelLayout> {
        world.attempt.as_ref().map(|attempt| attempt.layout())
    }

    /// Live player position.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player
    }

    /// Captures the pursuer state for rendering and for the pursuit system.
    #[must_use]
    pub fn pursuer(world: &World) -> PursuerSnapshot {
        PursuerSnapshot {
            phase: world.pursuer.phase,
            position: world.pursuer.position,
            target: world.pursuer.target,
            speed: world.pursuer.speed,
        }
    }

    /// Waypoints not yet consumed by the pursuer.
    #[must_use]
    pub fn trail(world: &World) -> &PathTrail {
        &world.trail
    }

    /// Action available to the player once the attempt ended.
    #[must_use]
    pub fn terminal_action(world: &World) -> Option<TerminalAction> {
        run_state(world).terminal_action()
    }

    /// Resolved palette of the current attempt, or the global palette when idle.
    #[must_use]
    pub fn palette(world: &World) -> Palette {
        world
            .attempt
            .as_ref()
            .map_or(world.settings.palette, |attempt| attempt.resolved().palette)
    }

    /// Scene background: lights off while running, on otherwise.
    #[must_use]
    pub fn background(world: &World) -> Color {
        let palette = palette(world);
        if run_state(world).is_running() {
            palette.light_off
        } else {
            palette.light_on
        }
    }

    /// Immutable representation of the pursuer's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PursuerSnapshot {
        /// Lifecycle phase of the pursuer.
        pub phase: PursuitPhase,
        /// Current position of the pursuer.
        pub position: Vec2,
        /// Waypoint the pursuer heads toward, if it has one.
        pub target: Option<Vec2>,
        /// Speed in world units per second.
        pub speed: f32,
    }
}
