//! Tests for the lobby round clock.

use std::time::{Duration, Instant};

use mapquiz::{ClockEvent, RoundClock};
use mapquiz_core::{GameSession, NullView, Pacing, Region, RegionMap, Transition};

fn session() -> GameSession<NullView> {
    let map = RegionMap::new(
        "pair",
        "Pair",
        vec![Region::new("kano", "Kano"), Region::new("kogi", "Kogi")],
    )
    .expect("Valid map");
    GameSession::builder(map, NullView)
        .pacing(Pacing::default().with_correct_ms(500))
        .seed(1)
        .build()
}

#[test]
fn test_idle_clock_yields_nothing() {
    let mut clock = RoundClock::new();
    assert_eq!(clock.poll(Instant::now()), None);
    assert!(!clock.has_pending_tick());
    assert!(!clock.has_pending_advance());
}

#[test]
fn test_round_start_schedules_ticks_every_second() {
    let mut session = session();
    let mut clock = RoundClock::new();
    let t0 = Instant::now();

    let started = session.start().expect("Start failed");
    clock.observe(&started, t0);
    let token = session.timer_token().expect("Timer should run");

    assert_eq!(clock.poll(t0 + Duration::from_millis(999)), None);
    assert_eq!(
        clock.poll(t0 + Duration::from_secs(1)),
        Some(ClockEvent::Tick(token))
    );
    // The next tick is one interval later.
    assert_eq!(clock.poll(t0 + Duration::from_millis(1500)), None);
    assert_eq!(
        clock.poll(t0 + Duration::from_secs(2)),
        Some(ClockEvent::Tick(token))
    );
}

#[test]
fn test_resolution_replaces_tick_with_advance() {
    let mut session = session();
    let mut clock = RoundClock::new();
    let t0 = Instant::now();

    clock.observe(&session.start().expect("Start failed"), t0);
    let name = session
        .active_region()
        .expect("A round should be active")
        .display_name()
        .clone();
    let resolved = session.submit_guess(&name).expect("Guess failed");
    let Transition::Resolved { ticket, .. } = resolved else {
        panic!("Expected a resolution, got {:?}", resolved);
    };

    clock.observe(&resolved, t0);
    assert!(!clock.has_pending_tick());
    assert!(clock.has_pending_advance());

    assert_eq!(clock.poll(t0 + Duration::from_millis(499)), None);
    assert_eq!(
        clock.poll(t0 + Duration::from_millis(500)),
        Some(ClockEvent::Advance(ticket))
    );
    assert!(!clock.has_pending_advance(), "An advance fires once");

    let next = session.advance(ticket);
    assert!(matches!(next, Transition::RoundStarted { .. }));
    clock.observe(&next, t0 + Duration::from_millis(500));
    assert!(clock.has_pending_tick());
}

#[test]
fn test_cancel_all_drops_both() {
    let mut session = session();
    let mut clock = RoundClock::new();
    let t0 = Instant::now();

    clock.observe(&session.start().expect("Start failed"), t0);
    clock.cancel_all();
    assert_eq!(clock.poll(t0 + Duration::from_secs(10)), None);
}

#[test]
fn test_cancel_tick_keeps_pending_advance() {
    let mut session = session();
    let mut clock = RoundClock::new();
    let t0 = Instant::now();

    clock.observe(&session.start().expect("Start failed"), t0);
    let skipped = session.skip().expect("Skip failed");
    clock.observe(&skipped, t0);
    clock.cancel_tick();
    assert!(clock.has_pending_advance());
}

#[test]
fn test_ignored_transition_changes_nothing() {
    let mut clock = RoundClock::new();
    let t0 = Instant::now();
    clock.observe(&Transition::Ignored, t0);
    clock.observe(&Transition::Missed { attempts_left: 2 }, t0);
    assert!(!clock.has_pending_tick());
    assert!(!clock.has_pending_advance());
}
