#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;
mod maze;
mod timing;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    ConfigError, GameSettings, LevelConfig, Palette, PaletteOverrides, ResolvedLevel,
};
pub use glam::Vec2;
pub use maze::{Cell, Grid, Maze, MazeError, Walls, MAX_CELLS};
pub use timing::{Delay, ElapsedTime};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a new level built from the provided configuration and maze.
    RegisterLevel {
        /// Per-level configuration, including overrides of the global defaults.
        config: LevelConfig,
        /// Generated maze topology the level is played on.
        maze: Maze,
    },
    /// Starts a fresh attempt of the provided level.
    StartAttempt {
        /// Level that should be run.
        level: LevelId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Feeds the live player position without recording a waypoint.
    SetPlayerPosition {
        /// Position reported by the input or physics collaborator.
        position: Vec2,
    },
    /// Movement command issued by the player.
    MovePlayer {
        /// Motion requested by the player.
        motion: PlayerMotion,
    },
    /// Requests that an armed pursuer becomes active.
    ActivatePursuer,
    /// Requests that the pursuer consumes its next waypoint from the trail.
    AdvancePursuerTarget,
    /// Moves the pursuer to the provided position.
    StepPursuer {
        /// Position reached by the pursuer in this step.
        position: Vec2,
    },
    /// Reports that the pursuer touched the player.
    ReportContact,
    /// Advances to the next registered level once the attempt finished.
    NextLevel,
    /// Restarts the current level once the attempt was cancelled.
    Retry,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level was registered with the world.
    LevelRegistered {
        /// Identifier assigned to the level.
        level: LevelId,
    },
    /// Announces that a new attempt entered its intro.
    AttemptStarted {
        /// Level being attempted.
        level: LevelId,
        /// Position the player was placed at.
        spawn: Vec2,
    },
    /// Reports that a start request was discarded.
    AttemptRejected {
        /// Level named in the request.
        level: LevelId,
        /// Reason the request was discarded.
        reason: AttemptError,
    },
    /// Announces that the intro elapsed and the attempt is running.
    AttemptRunning {
        /// Level being attempted.
        level: LevelId,
    },
    /// Reports the elapsed run time for external display.
    ElapsedUpdated {
        /// Time elapsed since the attempt started running.
        elapsed: ElapsedTime,
    },
    /// Confirms that a waypoint was appended to the path trail.
    WaypointRecorded {
        /// Recorded player position.
        point: Vec2,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
    },
    /// Reports that a movement command arrived outside of a run.
    MovementIgnored {
        /// State of the attempt when the command arrived.
        state: RunState,
    },
    /// Announces that the player crossed the trigger line.
    PursuitArmed {
        /// Delay before the pursuer becomes active.
        delay: Duration,
        /// Speed of the pursuer in world units per second.
        speed: f32,
    },
    /// Confirms that the pursuer became active.
    PursuerActivated {
        /// Position the pursuer starts from.
        position: Vec2,
    },
    /// Announces the waypoint the pursuer now heads toward.
    PursuerTargetChanged {
        /// Waypoint consumed from the trail, or the live player position.
        target: Vec2,
    },
    /// Confirms that the pursuer moved.
    PursuerMoved {
        /// Position before the step.
        from: Vec2,
        /// Position after the step.
        to: Vec2,
    },
    /// Announces that the player reached the goal and the attempt finished.
    GoalReached {
        /// Level that was completed.
        level: LevelId,
        /// Final run time.
        elapsed: ElapsedTime,
    },
    /// Announces that the pursuer caught the player and the attempt was cancelled.
    AttemptCancelled {
        /// Level that was cancelled.
        level: LevelId,
        /// Run time at the moment of contact.
        elapsed: ElapsedTime,
    },
}

/// Reasons an attempt start request may be discarded by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum AttemptError {
    /// No level with the requested identifier has been registered.
    #[error("level is not registered")]
    NotRegistered,
}

/// States of a single level attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// No attempt has been started yet.
    #[default]
    Idle,
    /// The attempt waits for the intro to elapse.
    Intro,
    /// The player is moving and the clock is running.
    Running,
    /// The player reached the goal.
    Finished,
    /// The pursuer caught the player.
    Cancelled,
}

impl RunState {
    /// Reports whether the attempt accepts player movement and pursuit.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Reports whether the attempt reached one of its terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Action exposed to the player once the attempt ended.
    #[must_use]
    pub const fn terminal_action(self) -> Option<TerminalAction> {
        match self {
            Self::Finished => Some(TerminalAction::Next),
            Self::Cancelled => Some(TerminalAction::Retry),
            Self::Idle | Self::Intro | Self::Running => None,
        }
    }
}

/// Command exposed to the player after an attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalAction {
    /// Advance to the next level.
    Next,
    /// Retry the current level.
    Retry,
}

/// Lifecycle of the pursuer within an attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitPhase {
    /// The pursuer is hidden and idle.
    #[default]
    Inactive,
    /// The trigger fired and the pursuer waits for its delay.
    Armed,
    /// The pursuer follows the path trail.
    Active,
}

/// Motion requested by a player movement command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerMotion {
    /// Move to an absolute position.
    To(Vec2),
    /// Move by a relative offset.
    By(Vec2),
}

impl PlayerMotion {
    /// Resolves the motion into the destination reached from `from`.
    #[must_use]
    pub fn destination(self, from: Vec2) -> Vec2 {
        match self {
            Self::To(position) => position,
            Self::By(delta) => from + delta,
        }
    }
}

/// Unique identifier assigned to a registered level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Cardinal directions between orthogonally adjacent cells.
///
/// Rows grow northward: row zero is the bottom boundary of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell, counted from the bottom.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// World-space centre of the unit square occupied by the cell.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Adjacent coordinate in the provided direction, if it does not underflow.
    ///
    /// Upper bounds are not checked; callers validate against their grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        if self.manhattan_distance(other) != 1 {
            return None;
        }

        if other.column > self.column {
            Some(Direction::East)
        } else if other.column < self.column {
            Some(Direction::West)
        } else if other.row > self.row {
            Some(Direction::North)
        } else {
            Some(Direction::South)
        }
    }
}

/// Opaque RGB color used for palette and feedback signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);
    /// Pure black.
    pub const BLACK: Self = Self::from_rgb(0x00, 0x00, 0x00);
    /// Yellow used for the player light.
    pub const YELLOW: Self = Self::from_rgb(0xff, 0xeb, 0x04);
    /// Red used for failure feedback.
    pub const RED: Self = Self::from_rgb(0xff, 0x00, 0x00);
    /// Green used for success feedback.
    pub const GREEN: Self = Self::from_rgb(0x00, 0xff, 0x00);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}
