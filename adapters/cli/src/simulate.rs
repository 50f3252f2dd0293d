//! Headless autopilot that plays the configured levels through the real tick loop.

use std::{collections::VecDeque, fmt, iter, time::Duration};

use anyhow::{bail, Context, Result};
use maze_chase_core::{
    CellCoord, Color, Command, ElapsedTime, Event, GameSettings, LevelConfig, LevelId, Maze,
    PlayerMotion, RunState, Vec2,
};
use maze_chase_system_hud::{Hud, HudView};
use maze_chase_system_maze_generation::{generate, solve};
use maze_chase_system_pursuit::{move_towards, Config, Pursuit, ARRIVAL_EPSILON};
use maze_chase_world::{self as world, query, LevelLayout, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Tunables of a simulation run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Options {
    pub(crate) tick_rate: u32,
    pub(crate) max_ticks: u64,
    pub(crate) retries: u32,
    pub(crate) stall_ticks: u32,
}

/// Result of a single attempt.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Report {
    pub(crate) level: String,
    pub(crate) attempt: u32,
    pub(crate) outcome: RunState,
    pub(crate) elapsed: ElapsedTime,
    pub(crate) hud: HudView,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            RunState::Finished => "finished",
            RunState::Cancelled => "caught",
            RunState::Idle | RunState::Intro | RunState::Running => "unfinished",
        };
        write!(
            f,
            "{} attempt {}: {outcome} after {}",
            self.level, self.attempt, self.elapsed
        )
    }
}

/// Generates one maze per level, seeding unseeded levels from `base_seed`.
pub(crate) fn build_levels(
    levels: Vec<LevelConfig>,
    base_seed: u64,
) -> Result<Vec<(LevelConfig, Maze)>> {
    levels
        .into_iter()
        .zip(0_u64..)
        .map(|(config, index)| {
            let seed = config.seed.unwrap_or_else(|| base_seed.wrapping_add(index));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let maze = generate(config.width, config.height, &mut rng)
                .with_context(|| format!("failed to generate maze for level `{}`", config.name))?;
            debug!(level = %config.name, seed, "maze_generated");
            Ok((config, maze))
        })
        .collect()
}

/// Formats a color as `#rrggbb`.
fn hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        color.red(),
        color.green(),
        color.blue()
    )
}

/// World and systems wired together the way an interactive adapter would.
pub(crate) struct Simulation {
    world: World,
    pursuit: Pursuit,
    hud: Hud,
    names: Vec<String>,
    player_speed: f32,
}

impl Simulation {
    pub(crate) fn new(settings: GameSettings, levels: Vec<(LevelConfig, Maze)>) -> Result<Self> {
        if levels.is_empty() {
            bail!("simulation requires at least one level");
        }

        let mut simulation = Self {
            pursuit: Pursuit::new(Config::from_settings(&settings)),
            hud: Hud::new(&settings),
            player_speed: settings.player_speed,
            world: World::new(settings),
            names: Vec::with_capacity(levels.len()),
        };
        for (config, maze) in levels {
            simulation.names.push(config.name.clone());
            let _ = simulation.submit(Command::RegisterLevel { config, maze });
        }
        Ok(simulation)
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Plays every level once in order, retrying cancelled attempts.
    pub(crate) fn run(&mut self, options: Options) -> Result<Vec<Report>> {
        let dt = Duration::from_secs_f64(1.0 / f64::from(options.tick_rate.max(1)));
        let level_count = query::level_count(&self.world);
        let mut reports = Vec::new();
        let mut attempt = 1;

        let _ = self.submit(Command::StartAttempt {
            level: LevelId::new(0),
        });
        let mut pilot = self.plan()?;

        for _ in 0..options.max_ticks {
            if query::run_state(&self.world).is_running() {
                let from = query::player_position(&self.world);
                if let Some(to) = pilot.advance(from, self.player_speed * dt.as_secs_f32()) {
                    let _ = self.submit(Command::MovePlayer {
                        motion: PlayerMotion::To(to),
                    });
                }
            }

            let mut ended = None;
            for event in self.submit(Command::Tick { dt }) {
                match event {
                    Event::PursuitArmed { .. } => pilot.stall(options.stall_ticks),
                    Event::GoalReached { level, elapsed } => {
                        ended = Some((level, RunState::Finished, elapsed));
                    }
                    Event::AttemptCancelled { level, elapsed } => {
                        ended = Some((level, RunState::Cancelled, elapsed));
                    }
                    _ => {}
                }
            }
            let Some((level, outcome, elapsed)) = ended else {
                continue;
            };

            let report = Report {
                level: self.name(level),
                attempt,
                outcome,
                elapsed,
                hud: self.hud.view(),
            };
            info!(
                level = %report.level,
                attempt,
                outcome = ?outcome,
                score = ?report.hud.score,
                score_tint = %hex(report.hud.score_tint),
                "attempt_ended"
            );
            reports.push(report);

            if outcome == RunState::Finished {
                if reports
                    .iter()
                    .filter(|report| report.outcome == RunState::Finished)
                    .count()
                    == level_count
                {
                    return Ok(reports);
                }
                attempt = 1;
                let _ = self.submit(Command::NextLevel);
            } else if attempt > options.retries {
                warn!(level = %self.name(level), attempt, "retries_exhausted");
                return Ok(reports);
            } else {
                attempt += 1;
                let _ = self.submit(Command::Retry);
            }
            pilot = self.plan()?;
        }

        warn!(max_ticks = options.max_ticks, "tick_budget_exhausted");
        Ok(reports)
    }

    fn name(&self, level: LevelId) -> String {
        usize::try_from(level.get())
            .ok()
            .and_then(|index| self.names.get(index))
            .cloned()
            .unwrap_or_else(|| format!("level {}", level.get()))
    }

    fn plan(&self) -> Result<Autopilot> {
        let level = query::current_level(&self.world).context("no attempt in progress")?;
        let maze = query::maze(&self.world, level).context("current level has no maze")?;
        let layout = query::layout(&self.world).context("current attempt has no layout")?;
        Autopilot::plan(maze, layout)
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let mut emitted = events.clone();

        while !events.is_empty() {
            let mut commands = Vec::new();
            self.pursuit.handle(
                &events,
                query::run_state(&self.world),
                &query::pursuer(&self.world),
                query::player_position(&self.world),
                &mut commands,
            );
            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
            emitted.extend(events.iter().cloned());
        }

        self.hud.handle(&emitted, query::palette(&self.world));
        emitted
    }
}

/// Walks the unique route from the spawn point to the goal.
#[derive(Clone, Debug)]
struct Autopilot {
    route: VecDeque<Vec2>,
    stalled: u32,
}

impl Autopilot {
    fn plan(maze: &Maze, layout: &LevelLayout) -> Result<Self> {
        let path = solve(maze, maze.entrance(), maze.exit())
            .context("maze has no route from entrance to exit")?;
        let route = path
            .into_iter()
            .map(CellCoord::center)
            .chain(iter::once(layout.goal()))
            .collect();
        Ok(Self { route, stalled: 0 })
    }

    fn stall(&mut self, ticks: u32) {
        self.stalled = ticks;
    }

    /// Position reached after moving `step` units along the route from `from`.
    fn advance(&mut self, from: Vec2, step: f32) -> Option<Vec2> {
        if self.stalled > 0 {
            self.stalled -= 1;
            return None;
        }
        while let Some(next) = self.route.front() {
            if from.distance(*next) > ARRIVAL_EPSILON {
                break;
            }
            let _ = self.route.pop_front();
        }
        let target = *self.route.front()?;
        Some(move_towards(from, target, step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_settings() -> GameSettings {
        GameSettings {
            intro_duration: 0.0,
            disable_score: false,
            ..GameSettings::default()
        }
    }

    fn levels() -> Vec<LevelConfig> {
        let mut first = LevelConfig::new("first", 5, 4);
        first.seed = Some(1);
        let second = LevelConfig::new("second", 3, 6);
        vec![first, second]
    }

    const OPTIONS: Options = Options {
        tick_rate: 60,
        max_ticks: 20_000,
        retries: 1,
        stall_ticks: 0,
    };

    #[test]
    fn autopilot_finishes_every_level_in_order() {
        let mazes = build_levels(levels(), 7).expect("mazes");
        let mut simulation = Simulation::new(quick_settings(), mazes).expect("simulation");
        let reports = simulation.run(OPTIONS).expect("run");

        let names: Vec<&str> = reports.iter().map(|report| report.level.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        for report in &reports {
            assert_eq!(report.outcome, RunState::Finished);
            assert_eq!(report.attempt, 1);
            assert_eq!(report.hud.score, Some(report.elapsed.to_string()));
        }
    }

    #[test]
    fn stalling_after_the_trigger_gets_caught_until_retries_run_out() {
        let mazes = build_levels(levels(), 7).expect("mazes");
        let mut simulation = Simulation::new(quick_settings(), mazes).expect("simulation");
        let reports = simulation
            .run(Options {
                stall_ticks: 600,
                ..OPTIONS
            })
            .expect("run");

        assert_eq!(reports.len(), 2);
        for (index, report) in reports.iter().enumerate() {
            assert_eq!(report.level, "first");
            assert_eq!(report.outcome, RunState::Cancelled);
            assert_eq!(report.attempt, u32::try_from(index + 1).expect("small"));
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let run = || {
            let mazes = build_levels(levels(), 11).expect("mazes");
            Simulation::new(quick_settings(), mazes)
                .expect("simulation")
                .run(OPTIONS)
                .expect("run")
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn tints_format_as_hex_triplets() {
        assert_eq!(hex(Color::GREEN), "#00ff00");
        assert_eq!(hex(Color::YELLOW), "#ffeb04");
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert!(Simulation::new(quick_settings(), Vec::new()).is_err());
    }
}
