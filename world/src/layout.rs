//! World-space placement of the spawn, goal and trigger line around a maze.

use maze_chase_core::{Maze, Vec2};

/// Distance between a maze opening and the spawn or goal point outside it.
const OPENING_OFFSET: f32 = 0.5;

/// Vertical tolerance within which the player counts as crossing the trigger line.
pub const TRIGGER_TOLERANCE: f32 = 0.1;

/// Geometry of a level attempt.
///
/// The maze spans `[0, width] x [0, height]` in world units with one unit per
/// cell and row zero at the bottom. The spawn sits just below the entrance and
/// the goal just above the exit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelLayout {
    spawn: Vec2,
    goal: Vec2,
    trigger_line: f32,
}

impl LevelLayout {
    pub(crate) fn new(maze: &Maze, trigger_line: f32) -> Self {
        let entrance = maze.entrance().center();
        let exit = maze.exit().center();
        let top = maze.height() as f32;

        Self {
            spawn: Vec2::new(entrance.x, -OPENING_OFFSET),
            goal: Vec2::new(exit.x, top + OPENING_OFFSET),
            trigger_line,
        }
    }

    /// Position the player and the pursuer start from.
    #[must_use]
    pub const fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Position the player must reach.
    #[must_use]
    pub const fn goal(&self) -> Vec2 {
        self.goal
    }

    /// Height of the horizontal trigger line.
    #[must_use]
    pub const fn trigger_line(&self) -> f32 {
        self.trigger_line
    }

    /// Reports whether `position` lies on the trigger line.
    #[must_use]
    pub fn on_trigger_line(&self, position: Vec2) -> bool {
        (position.y - self.trigger_line).abs() < TRIGGER_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::Grid;

    #[test]
    fn spawn_and_goal_sit_outside_the_openings() {
        let maze = Grid::new(4, 3).expect("grid").open(1, 3).expect("maze");
        let layout = LevelLayout::new(&maze, 1.0);

        assert_eq!(layout.spawn(), Vec2::new(1.5, -0.5));
        assert_eq!(layout.goal(), Vec2::new(3.5, 3.5));
    }

    #[test]
    fn trigger_line_uses_tolerance() {
        let maze = Grid::new(1, 1).expect("grid").open(0, 0).expect("maze");
        let layout = LevelLayout::new(&maze, 1.0);

        assert!(layout.on_trigger_line(Vec2::new(0.5, 1.05)));
        assert!(layout.on_trigger_line(Vec2::new(0.5, 0.95)));
        assert!(!layout.on_trigger_line(Vec2::new(0.5, 1.2)));
        assert!(!layout.on_trigger_line(layout.spawn()));
    }
}
