//! Simulated-time helpers shared by the world and the systems.

use std::{fmt, time::Duration};

/// Cooperative wait that resumes once a fixed amount of simulated time passed.
///
/// The owner feeds every tick's delta through [`Delay::advance`], which
/// reports completion exactly once: on the tick where the accumulated time
/// first reaches the configured duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delay {
    duration: Duration,
    elapsed: Duration,
    fired: bool,
}

impl Delay {
    /// Creates a wait that completes after `duration` of simulated time.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            fired: false,
        }
    }

    /// Accumulates `dt` and returns `true` on the tick the wait completes.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.fired {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.fired = true;
            return true;
        }
        false
    }

    /// Reports whether the wait already completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.fired
    }

    /// Simulated time accumulated so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Run time rendered as `mm:ss.mmm` for external display.
///
/// Only the minutes component is shown, so runs longer than an hour wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElapsedTime(Duration);

impl ElapsedTime {
    /// Zero elapsed time.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Wraps a simulated duration.
    #[must_use]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    /// Underlying simulated duration.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        let minutes = (millis / 60_000) % 60;
        let seconds = (millis / 1_000) % 60;
        let fraction = millis % 1_000;
        write!(f, "{minutes:02}:{seconds:02}.{fraction:03}")
    }
}
