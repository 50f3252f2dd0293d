use std::time::Duration;

use maze_chase_core::{
    Command, Event, GameSettings, LevelConfig, LevelId, PlayerMotion, PursuitPhase, RunState,
    Vec2,
};
use maze_chase_system_maze_generation::generate;
use maze_chase_system_pursuit::{Config, Pursuit};
use maze_chase_world::{self as world, query, World};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const STEP: Duration = Duration::from_millis(100);
const STRIDE: Vec2 = Vec2::new(0.0, 0.25);

struct Harness {
    world: World,
    pursuit: Pursuit,
    log: Vec<Event>,
}

impl Harness {
    fn corridor(settings: GameSettings) -> (Self, LevelId) {
        let mut rng = ChaCha8Rng::seed_from_u64(0xc0ff_ee);
        let maze = generate(1, 6, &mut rng).expect("maze");
        let mut config = LevelConfig::new("corridor", 1, 6);
        config.intro_duration = Some(0.0);

        let mut harness = Self {
            pursuit: Pursuit::new(Config::from_settings(&settings)),
            world: World::new(settings),
            log: Vec::new(),
        };
        let events = harness.submit(Command::RegisterLevel { config, maze });
        let level = events
            .iter()
            .find_map(|event| match event {
                Event::LevelRegistered { level } => Some(*level),
                _ => None,
            })
            .expect("level registered");
        (harness, level)
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let mut emitted = events.clone();

        loop {
            if events.is_empty() {
                break;
            }

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
                let mut generated = Vec::new();
                world::apply(&mut self.world, command, &mut generated);
                events.extend(generated);
            }
            emitted.extend(events.iter().cloned());
        }

        self.log.extend(emitted.iter().cloned());
        emitted
    }

    fn tick(&mut self) -> Vec<Event> {
        self.submit(Command::Tick { dt: STEP })
    }

    fn start_running(&mut self, level: LevelId) {
        let _ = self.submit(Command::StartAttempt { level });
        let _ = self.submit(Command::Tick { dt: Duration::ZERO });
        assert_eq!(query::run_state(&self.world), RunState::Running);
    }

    /// Walks the player up to the trigger line, one stride per tick.
    fn walk_to_trigger(&mut self) {
        while query::player_position(&self.world).y < 1.0 {
            let _ = self.submit(Command::MovePlayer {
                motion: PlayerMotion::By(STRIDE),
            });
            let _ = self.tick();
        }
        assert_eq!(query::pursuer(&self.world).phase, PursuitPhase::Armed);
    }
}

fn scripted_chase() -> Vec<Event> {
    let (mut harness, level) = Harness::corridor(GameSettings::default());
    harness.start_running(level);
    harness.walk_to_trigger();
    for _ in 0..40 {
        let _ = harness.tick();
    }
    harness.log
}

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = scripted_chase();
    let second = scripted_chase();

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::AttemptCancelled { .. })));
}

#[test]
fn activation_waits_for_the_pursuit_delay() {
    let (mut harness, level) = Harness::corridor(GameSettings::default());
    harness.start_running(level);
    harness.walk_to_trigger();

    let mut waited = 0;
    loop {
        let events = harness.tick();
        waited += 1;
        if events
            .iter()
            .any(|event| matches!(event, Event::PursuerActivated { .. }))
        {
            break;
        }
        assert!(waited < 5, "pursuer activated late");
    }

    assert_eq!(waited, 5, "0.5s delay at 100ms per tick");
    let snapshot = query::pursuer(&harness.world);
    assert_eq!(snapshot.phase, PursuitPhase::Active);
    assert_eq!(snapshot.position, Vec2::new(0.5, -0.5));
}

#[test]
fn inexact_decimal_delay_activates_on_its_final_tick() {
    let settings = GameSettings {
        pursuit_delay: 0.3,
        ..GameSettings::default()
    };
    let (mut harness, level) = Harness::corridor(settings);
    harness.start_running(level);
    harness.walk_to_trigger();

    for _ in 0..2 {
        let events = harness.tick();
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PursuerActivated { .. })));
    }
    let events = harness.tick();
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PursuerActivated { .. })));
}

#[test]
fn pursuer_replays_the_trail_in_recording_order() {
    let (mut harness, level) = Harness::corridor(GameSettings::default());
    harness.start_running(level);
    harness.walk_to_trigger();
    for _ in 0..40 {
        let _ = harness.tick();
    }

    let recorded: Vec<Vec2> = harness
        .log
        .iter()
        .filter_map(|event| match event {
            Event::WaypointRecorded { point } => Some(*point),
            _ => None,
        })
        .collect();
    let targets: Vec<Vec2> = harness
        .log
        .iter()
        .filter_map(|event| match event {
            Event::PursuerTargetChanged { target } => Some(*target),
            _ => None,
        })
        .collect();

    assert_eq!(recorded.len(), 6);
    assert!(!targets.is_empty());
    let replayed = targets.len().min(recorded.len());
    assert_eq!(targets[..replayed], recorded[..replayed]);
}

#[test]
fn contact_cancels_on_the_overlapping_tick() {
    let settings = GameSettings::default();
    let contact = settings.player_radius + settings.pursuer_radius;
    let (mut harness, level) = Harness::corridor(settings);
    harness.start_running(level);
    harness.walk_to_trigger();

    let mut cancelled_on = None;
    for tick in 0..60 {
        assert_eq!(query::run_state(&harness.world), RunState::Running);
        let events = harness.tick();

        let pursuer = query::pursuer(&harness.world).position;
        let player = query::player_position(&harness.world);
        let overlapping = pursuer.distance(player) < contact;
        let cancelled = events
            .iter()
            .any(|event| matches!(event, Event::AttemptCancelled { .. }));

        assert_eq!(overlapping, cancelled, "tick {tick}: overlap and cancel disagree");
        if cancelled {
            cancelled_on = Some(tick);
            break;
        }
    }

    assert!(cancelled_on.is_some(), "stationary player must be caught");
    assert_eq!(query::run_state(&harness.world), RunState::Cancelled);
    assert_eq!(query::pursuer(&harness.world).phase, PursuitPhase::Inactive);

    let events = harness.tick();
    assert_eq!(events, vec![Event::TimeAdvanced { dt: STEP }]);
}

#[test]
fn empty_trail_falls_back_to_the_live_position() {
    let (mut harness, level) = Harness::corridor(GameSettings::default());
    harness.start_running(level);

    let crossing = Vec2::new(0.5, 1.0);
    let _ = harness.submit(Command::SetPlayerPosition { position: crossing });
    let mut targets = Vec::new();
    for _ in 0..8 {
        for event in harness.tick() {
            if let Event::PursuerTargetChanged { target } = event {
                targets.push(target);
            }
        }
    }

    assert!(query::trail(&harness.world).is_empty());
    assert_eq!(targets.first(), Some(&crossing));
}

#[test]
fn disabled_pursuit_leaves_the_pursuer_parked() {
    let settings = GameSettings {
        disable_pursuit: true,
        ..GameSettings::default()
    };
    let (mut harness, level) = Harness::corridor(settings);
    harness.start_running(level);

    for _ in 0..6 {
        let _ = harness.submit(Command::MovePlayer {
            motion: PlayerMotion::By(STRIDE),
        });
        let _ = harness.tick();
    }
    for _ in 0..20 {
        let _ = harness.tick();
    }

    assert_eq!(query::pursuer(&harness.world).phase, PursuitPhase::Inactive);
    assert_eq!(query::run_state(&harness.world), RunState::Running);
    assert!(!harness
        .log
        .iter()
        .any(|event| matches!(event, Event::PursuerActivated { .. })));
}
