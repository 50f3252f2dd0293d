//! FIFO trail of recorded player positions replayed by the pursuer.

use std::collections::VecDeque;

use maze_chase_core::Vec2;

/// Ordered queue of waypoints recorded from player movement commands.
///
/// Points are consumed at most once and strictly in recording order.
#[derive(Clone, Debug, Default)]
pub struct PathTrail {
    points: VecDeque<Vec2>,
}

impl PathTrail {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a waypoint to the back of the trail.
    pub fn append(&mut self, point: Vec2) {
        self.points.push_back(point);
    }

    /// Dequeues the oldest waypoint, or returns `fallback` when the trail is empty.
    pub fn take_next(&mut self, fallback: Vec2) -> Vec2 {
        self.points.pop_front().unwrap_or(fallback)
    }

    /// Drops every recorded waypoint.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of waypoints not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether every waypoint has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over the pending waypoints, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }
}
