//! Per-attempt run state machine.

use std::{fmt, time::Duration};

use maze_chase_core::{Delay, ElapsedTime, LevelId, ResolvedLevel, RunState};

use crate::layout::LevelLayout;

/// Outcome of an attempt that reached a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptSummary {
    /// Level that was attempted.
    pub level: LevelId,
    /// Run time when the attempt ended.
    pub elapsed: ElapsedTime,
    /// Terminal state the attempt ended in.
    pub outcome: RunState,
}

/// One-shot callback invoked when an attempt reaches the goal.
pub type FinishCallback = Box<dyn FnOnce(&AttemptSummary)>;

/// Progress of the intro wait after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IntroProgress {
    Waiting,
    Elapsed,
    NotInIntro,
}

pub(crate) struct RunAttempt {
    level: LevelId,
    index: usize,
    resolved: ResolvedLevel,
    layout: LevelLayout,
    state: RunState,
    intro: Delay,
    started_at: Duration,
    elapsed: Duration,
    trigger_pending: bool,
    on_finish: Option<FinishCallback>,
}

impl RunAttempt {
    pub(crate) fn begin(
        level: LevelId,
        index: usize,
        resolved: ResolvedLevel,
        layout: LevelLayout,
        on_finish: Option<FinishCallback>,
    ) -> Self {
        Self {
            level,
            index,
            intro: Delay::new(resolved.intro_duration),
            trigger_pending: resolved.pursuit_enabled,
            resolved,
            layout,
            state: RunState::Intro,
            started_at: Duration::ZERO,
            elapsed: Duration::ZERO,
            on_finish,
        }
    }

    pub(crate) const fn level(&self) -> LevelId {
        self.level
    }

    pub(crate) const fn index(&self) -> usize {
        self.index
    }

    pub(crate) const fn resolved(&self) -> &ResolvedLevel {
        &self.resolved
    }

    pub(crate) const fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub(crate) const fn state(&self) -> RunState {
        self.state
    }

    pub(crate) const fn elapsed(&self) -> ElapsedTime {
        ElapsedTime::from_duration(self.elapsed)
    }

    /// Feeds the intro wait and enters `Running` on the tick it completes.
    pub(crate) fn advance_intro(&mut self, dt: Duration, clock: Duration) -> IntroProgress {
        if self.state != RunState::Intro {
            return IntroProgress::NotInIntro;
        }
        if !self.intro.advance(dt) {
            return IntroProgress::Waiting;
        }

        self.state = RunState::Running;
        self.started_at = clock;
        self.elapsed = Duration::ZERO;
        IntroProgress::Elapsed
    }

    pub(crate) fn update_elapsed(&mut self, clock: Duration) -> ElapsedTime {
        if self.state.is_running() {
            self.elapsed = clock.saturating_sub(self.started_at);
        }
        self.elapsed()
    }

    /// Consumes the one-shot pursuit trigger.
    pub(crate) fn take_trigger(&mut self) -> bool {
        std::mem::replace(&mut self.trigger_pending, false)
    }

    /// Moves a running attempt to `Finished` and fires the completion callback.
    ///
    /// Returns `None` when the attempt is not running.
    pub(crate) fn finish(&mut self) -> Option<AttemptSummary> {
        let summary = self.end(RunState::Finished)?;
        if let Some(callback) = self.on_finish.take() {
            callback(&summary);
        }
        Some(summary)
    }

    /// Moves a running attempt to `Cancelled`.
    ///
    /// Returns `None` when the attempt is not running.
    pub(crate) fn cancel(&mut self) -> Option<AttemptSummary> {
        self.end(RunState::Cancelled)
    }

    fn end(&mut self, outcome: RunState) -> Option<AttemptSummary> {
        if !self.state.is_running() {
            return None;
        }
        self.state = outcome;
        self.trigger_pending = false;
        Some(AttemptSummary {
            level: self.level,
            elapsed: self.elapsed(),
            outcome,
        })
    }
}

impl fmt::Debug for RunAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunAttempt")
            .field("level", &self.level)
            .field("index", &self.index)
            .field("state", &self.state)
            .field("intro", &self.intro)
            .field("started_at", &self.started_at)
            .field("elapsed", &self.elapsed)
            .field("trigger_pending", &self.trigger_pending)
            .field("on_finish", &self.on_finish.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use maze_chase_core::{GameSettings, Grid, LevelConfig};

    use super::*;

    fn attempt(intro_secs: f32, on_finish: Option<FinishCallback>) -> RunAttempt {
        let maze = Grid::new(2, 2).expect("grid").open(0, 1).expect("maze");
        let mut config = LevelConfig::new("unit", 2, 2);
        config.intro_duration = Some(intro_secs);
        let resolved = config.resolve(&GameSettings::default());
        let layout = LevelLayout::new(&maze, resolved.trigger_line);
        RunAttempt::begin(LevelId::new(0), 0, resolved, layout, on_finish)
    }

    #[test]
    fn intro_elapses_exactly_at_duration() {
        let mut run = attempt(1.0, None);
        let half = Duration::from_millis(500);

        assert_eq!(run.state(), RunState::Intro);
        assert_eq!(run.advance_intro(half, half), IntroProgress::Waiting);
        assert_eq!(run.state(), RunState::Intro);
        assert_eq!(run.advance_intro(half, 2 * half), IntroProgress::Elapsed);
        assert_eq!(run.state(), RunState::Running);
        assert_eq!(run.advance_intro(half, 3 * half), IntroProgress::NotInIntro);
        assert_eq!(
            run.update_elapsed(3 * half),
            ElapsedTime::from_duration(half)
        );
    }

    #[test]
    fn finish_fires_callback_once_and_ignores_repeats() {
        let calls = Rc::new(Cell::new(0_u32));
        let observed = Rc::clone(&calls);
        let mut run = attempt(
            0.0,
            Some(Box::new(move |summary: &AttemptSummary| {
                assert_eq!(summary.outcome, RunState::Finished);
                observed.set(observed.get() + 1);
            })),
        );

        assert!(run.finish().is_none(), "intro attempts cannot finish");
        let _ = run.advance_intro(Duration::ZERO, Duration::ZERO);
        assert!(run.finish().is_some());
        assert!(run.finish().is_none());
        assert!(run.cancel().is_none());
        assert_eq!(run.state(), RunState::Finished);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn trigger_is_one_shot() {
        let mut run = attempt(0.0, None);
        assert!(run.take_trigger());
        assert!(!run.take_trigger());
    }
}
