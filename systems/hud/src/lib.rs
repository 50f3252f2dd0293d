#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives heads-up display signals from world events.

use maze_chase_core::{Color, ElapsedTime, Event, GameSettings, Palette, RunState, TerminalAction};

/// Tracks the clock text, feedback tints and terminal action of the current attempt.
#[derive(Clone, Debug)]
pub struct Hud {
    show_score: bool,
    trail_tint: Option<Color>,
    palette: Palette,
    state: RunState,
    elapsed: ElapsedTime,
    input_rejected: bool,
}

impl Hud {
    /// Creates a display model honouring the score and trail switches of `settings`.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            show_score: !settings.disable_score,
            trail_tint: settings.show_player_trail.then_some(settings.trail_color),
            palette: settings.palette,
            state: RunState::Idle,
            elapsed: ElapsedTime::ZERO,
            input_rejected: false,
        }
    }

    /// Consumes world events. `palette` is the resolved palette of the current attempt.
    pub fn handle(&mut self, events: &[Event], palette: Palette) {
        for event in events {
            match event {
                Event::AttemptStarted { .. } => {
                    self.palette = palette;
                    self.state = RunState::Intro;
                    self.elapsed = ElapsedTime::ZERO;
                    self.input_rejected = false;
                }
                Event::AttemptRunning { .. } => {
                    self.state = RunState::Running;
                    self.input_rejected = false;
                }
                Event::ElapsedUpdated { elapsed } => self.elapsed = *elapsed,
                Event::MovementIgnored { .. } => self.input_rejected = true,
                Event::GoalReached { elapsed, .. } => {
                    self.state = RunState::Finished;
                    self.elapsed = *elapsed;
                }
                Event::AttemptCancelled { elapsed, .. } => {
                    self.state = RunState::Cancelled;
                    self.elapsed = *elapsed;
                }
                _ => {}
            }
        }
    }

    /// Captures the current display signals.
    #[must_use]
    pub fn view(&self) -> HudView {
        let score_tint = match self.state {
            RunState::Finished => Color::GREEN,
            RunState::Cancelled => Color::RED,
            RunState::Idle | RunState::Intro | RunState::Running => self.palette.player_light,
        };
        let background = if self.state.is_running() {
            self.palette.light_off
        } else {
            self.palette.light_on
        };
        let player_light = if self.input_rejected {
            Color::RED
        } else {
            self.palette.player_light
        };

        HudView {
            score: (self.show_score && self.state != RunState::Idle)
                .then(|| self.elapsed.to_string()),
            score_tint,
            action: self.state.terminal_action(),
            background,
            player_light,
            maze_tint: self.palette.maze,
            trail_tint: self.trail_tint,
        }
    }
}

/// Display signals for presentation collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudView {
    /// Clock text formatted as `mm:ss.mmm`, absent when the score is disabled.
    pub score: Option<String>,
    /// Tint of the clock text.
    pub score_tint: Color,
    /// Action offered once the attempt ended.
    pub action: Option<TerminalAction>,
    /// Scene background.
    pub background: Color,
    /// Tint of the player light; red after input arrived outside a run.
    pub player_light: Color,
    /// Tint of the maze walls.
    pub maze_tint: Color,
    /// Tint of rendered trail points, absent when the trail is hidden.
    pub trail_tint: Option<Color>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{LevelId, Vec2};

    use super::*;

    fn started() -> Event {
        Event::AttemptStarted {
            level: LevelId::new(0),
            spawn: Vec2::ZERO,
        }
    }

    fn visible_score() -> GameSettings {
        GameSettings {
            disable_score: false,
            ..GameSettings::default()
        }
    }

    #[test]
    fn finished_attempt_turns_score_green_and_offers_next() {
        let mut hud = Hud::new(&visible_score());
        let palette = Palette::default();
        let elapsed = ElapsedTime::from_duration(Duration::from_millis(12_345));

        hud.handle(&[started()], palette);
        let intro = hud.view();
        assert_eq!(intro.score.as_deref(), Some("00:00.000"));
        assert_eq!(intro.background, palette.light_on);

        hud.handle(
            &[
                Event::AttemptRunning {
                    level: LevelId::new(0),
                },
                Event::ElapsedUpdated { elapsed },
            ],
            palette,
        );
        let running = hud.view();
        assert_eq!(running.background, palette.light_off);
        assert_eq!(running.score_tint, palette.player_light);
        assert!(running.action.is_none());

        hud.handle(
            &[Event::GoalReached {
                level: LevelId::new(0),
                elapsed,
            }],
            palette,
        );
        let done = hud.view();
        assert_eq!(done.score.as_deref(), Some("00:12.345"));
        assert_eq!(done.score_tint, Color::GREEN);
        assert_eq!(done.action, Some(TerminalAction::Next));
        assert_eq!(done.background, palette.light_on);
    }

    #[test]
    fn cancelled_attempt_turns_score_red_and_offers_retry() {
        let mut hud = Hud::new(&visible_score());
        hud.handle(
            &[
                started(),
                Event::AttemptCancelled {
                    level: LevelId::new(0),
                    elapsed: ElapsedTime::ZERO,
                },
            ],
            Palette::default(),
        );

        let view = hud.view();
        assert_eq!(view.score_tint, Color::RED);
        assert_eq!(view.action, Some(TerminalAction::Retry));
    }

    #[test]
    fn disabled_score_hides_text() {
        let mut hud = Hud::new(&GameSettings::default());
        hud.handle(&[started()], Palette::default());
        assert!(hud.view().score.is_none());
    }

    #[test]
    fn rejected_input_reddens_player_light_until_run_starts() {
        let mut hud = Hud::new(&GameSettings::default());
        let palette = Palette::default();
        hud.handle(
            &[
                started(),
                Event::MovementIgnored {
                    state: RunState::Intro,
                },
            ],
            palette,
        );
        assert_eq!(hud.view().player_light, Color::RED);

        hud.handle(
            &[Event::AttemptRunning {
                level: LevelId::new(0),
            }],
            palette,
        );
        assert_eq!(hud.view().player_light, palette.player_light);
    }
}
