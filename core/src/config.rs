//! Global defaults and per-level overrides.
//!
//! [`GameSettings`] carries the process-wide defaults. Each [`LevelConfig`]
//! may override individual fields; unset fields inherit the default when the
//! level is resolved at attempt start.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Errors reported when configuration values fall outside their accepted ranges.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field lies outside its accepted range.
    #[error("{field} must lie within {min}..={max}, got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// A level requested an empty maze.
    #[error("level `{name}` must have positive dimensions, got {width}x{height}")]
    EmptyLevel {
        /// Name of the level.
        name: String,
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

const INTRO_RANGE: (f32, f32) = (0.0, 60.0);
const PURSUIT_DELAY_RANGE: (f32, f32) = (0.0, 10.0);
const PURSUIT_SPEED_RANGE: (f32, f32) = (0.0, 5.0);
const GOAL_DISTANCE_RANGE: (f32, f32) = (0.05, 1.0);

/// Colors applied to the scene while an attempt runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Background while the lights are on (intro and after the attempt).
    pub light_on: Color,
    /// Background while the attempt runs.
    pub light_off: Color,
    /// Tint of the player light and the running clock.
    pub player_light: Color,
    /// Tint of the maze walls.
    pub maze: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light_on: Color::WHITE,
            light_off: Color::BLACK,
            player_light: Color::YELLOW,
            maze: Color::BLACK,
        }
    }
}

/// Per-level palette overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOverrides {
    /// Overrides [`Palette::light_on`].
    pub light_on: Option<Color>,
    /// Overrides [`Palette::light_off`].
    pub light_off: Option<Color>,
    /// Overrides [`Palette::player_light`].
    pub player_light: Option<Color>,
    /// Overrides [`Palette::maze`].
    pub maze: Option<Color>,
}

impl PaletteOverrides {
    fn resolve(&self, defaults: &Palette) -> Palette {
        Palette {
            light_on: self.light_on.unwrap_or(defaults.light_on),
            light_off: self.light_off.unwrap_or(defaults.light_off),
            player_light: self.player_light.unwrap_or(defaults.player_light),
            maze: self.maze.unwrap_or(defaults.maze),
        }
    }
}

/// Process-wide defaults shared by every level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Seconds the intro lasts before the clock starts.
    pub intro_duration: f32,
    /// Seconds between crossing the trigger line and the pursuer appearing.
    pub pursuit_delay: f32,
    /// Pursuer speed in world units per second.
    pub pursuit_speed: f32,
    /// Player-to-goal distance below which the attempt finishes.
    pub goal_distance: f32,
    /// Height of the trigger line above the bottom edge of the maze.
    pub trigger_line: f32,
    /// Player speed in world units per second, used by input collaborators.
    pub player_speed: f32,
    /// Radius of the player's contact region.
    pub player_radius: f32,
    /// Radius of the pursuer's contact region.
    pub pursuer_radius: f32,
    /// Keeps the trigger line inactive so the pursuer never appears.
    pub disable_pursuit: bool,
    /// Hides the running clock.
    pub disable_score: bool,
    /// Exposes the recorded trail to presentation collaborators.
    pub show_player_trail: bool,
    /// Tint applied to rendered trail points.
    pub trail_color: Color,
    /// Default scene colors.
    pub palette: Palette,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            intro_duration: 5.0,
            pursuit_delay: 0.5,
            pursuit_speed: 3.0,
            goal_distance: 0.4,
            trigger_line: 1.0,
            player_speed: 5.0,
            player_radius: 0.3,
            pursuer_radius: 0.3,
            disable_pursuit: false,
            disable_score: true,
            show_player_trail: false,
            trail_color: Color::RED,
            palette: Palette::default(),
        }
    }
}

impl GameSettings {
    /// Checks that every tunable lies within its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("intro_duration", self.intro_duration, INTRO_RANGE)?;
        check("pursuit_delay", self.pursuit_delay, PURSUIT_DELAY_RANGE)?;
        check("pursuit_speed", self.pursuit_speed, PURSUIT_SPEED_RANGE)?;
        check("goal_distance", self.goal_distance, GOAL_DISTANCE_RANGE)?;
        Ok(())
    }
}

/// Configuration of a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Human-readable level name.
    pub name: String,
    /// Number of maze columns.
    pub width: u32,
    /// Number of maze rows.
    pub height: u32,
    /// Seed for reproducible maze generation.
    pub seed: Option<u64>,
    /// Overrides [`GameSettings::intro_duration`].
    pub intro_duration: Option<f32>,
    /// Overrides [`GameSettings::pursuit_delay`].
    pub pursuit_delay: Option<f32>,
    /// Overrides [`GameSettings::pursuit_speed`].
    pub pursuit_speed: Option<f32>,
    /// Overrides [`GameSettings::goal_distance`].
    pub goal_distance: Option<f32>,
    /// Overrides [`GameSettings::trigger_line`].
    pub trigger_line: Option<f32>,
    /// Overrides of [`GameSettings::palette`].
    pub palette: PaletteOverrides,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: String::from("level"),
            width: 10,
            height: 10,
            seed: None,
            intro_duration: None,
            pursuit_delay: None,
            pursuit_speed: None,
            goal_distance: None,
            trigger_line: None,
            palette: PaletteOverrides::default(),
        }
    }
}

impl LevelConfig {
    /// Creates a level configuration with the provided name and dimensions.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Checks the dimensions and every explicitly set override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyLevel {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
            });
        }

        let overrides = [
            ("intro_duration", self.intro_duration, INTRO_RANGE),
            ("pursuit_delay", self.pursuit_delay, PURSUIT_DELAY_RANGE),
            ("pursuit_speed", self.pursuit_speed, PURSUIT_SPEED_RANGE),
            ("goal_distance", self.goal_distance, GOAL_DISTANCE_RANGE),
        ];
        for (field, value, range) in overrides {
            if let Some(value) = value {
                check(field, value, range)?;
            }
        }
        Ok(())
    }

    /// Resolves every field against the global defaults.
    #[must_use]
    pub fn resolve(&self, settings: &GameSettings) -> ResolvedLevel {
        ResolvedLevel {
            intro_duration: seconds(self.intro_duration.unwrap_or(settings.intro_duration)),
            pursuit_delay: seconds(self.pursuit_delay.unwrap_or(settings.pursuit_delay)),
            pursuit_speed: self.pursuit_speed.unwrap_or(settings.pursuit_speed),
            goal_distance: self.goal_distance.unwrap_or(settings.goal_distance),
            trigger_line: self.trigger_line.unwrap_or(settings.trigger_line),
            pursuit_enabled: !settings.disable_pursuit,
            palette: self.palette.resolve(&settings.palette),
        }
    }
}

/// Effective configuration of a level once overrides were applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLevel {
    /// Intro wait before the attempt runs.
    pub intro_duration: Duration,
    /// Wait between the trigger firing and the pursuer appearing.
    pub pursuit_delay: Duration,
    /// Pursuer speed in world units per second.
    pub pursuit_speed: f32,
    /// Player-to-goal distance below which the attempt finishes.
    pub goal_distance: f32,
    /// Height of the trigger line above the bottom edge of the maze.
    pub trigger_line: f32,
    /// Whether crossing the trigger line arms the pursuer.
    pub pursuit_enabled: bool,
    /// Scene colors.
    pub palette: Palette,
}

/// Converts configured seconds to a duration rounded to whole microseconds.
fn seconds(value: f32) -> Duration {
    let micros = (f64::from(value.max(0.0)) * 1_000_000.0).round();
    if micros.is_finite() {
        Duration::from_micros(micros as u64)
    } else {
        Duration::ZERO
    }
}

fn check(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
