//! End-to-end cycle test: the seeded Classic preset driven through a full
//! four-focus cycle, checking phase order, cycle counting, auto-start, and
//! the recorded session aggregates.

use std::cell::RefCell;
use std::rc::Rc;

use mindwell_core::{
    Event, MemoryStore, Phase, Session, SessionStats,
};

fn tick_to_completion(session: &mut Session) -> Event {
    for _ in 0..=3600 {
        if let Some(event) = session.tick() {
            return event;
        }
    }
    panic!("timer never completed");
}

#[test]
fn classic_preset_runs_a_full_cycle() {
    let mut session = Session::load(Box::new(MemoryStore::new()));
    let stats = Rc::new(RefCell::new(SessionStats::new()));
    session.set_recorder(Box::new(Rc::clone(&stats)));

    session.apply_preset("classic").unwrap();
    assert_eq!(session.engine().phase(), Phase::Focus);
    assert_eq!(session.engine().remaining_secs(), 1500);

    session.start().unwrap();

    // Three focus -> short rest rounds.
    for round in 1..=3u32 {
        let event = tick_to_completion(&mut session);
        match event {
            Event::PhaseCompleted {
                completed,
                next,
                focus_completed_in_cycle,
                auto_started,
                ..
            } => {
                assert_eq!(completed, Phase::Focus);
                assert_eq!(next, Phase::ShortRest);
                assert_eq!(focus_completed_in_cycle, round);
                assert!(auto_started, "auto_start_rest is on for Classic");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(session.engine().remaining_secs(), 300);

        let event = tick_to_completion(&mut session);
        match event {
            Event::PhaseCompleted {
                completed,
                next,
                focus_completed_in_cycle,
                ..
            } => {
                assert_eq!(completed, Phase::ShortRest);
                assert_eq!(next, Phase::Focus);
                // Short rests never reset the cycle count.
                assert_eq!(focus_completed_in_cycle, round);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(session.engine().remaining_secs(), 1500);
    }

    // Fourth focus completion hits the target and arms the long rest.
    let event = tick_to_completion(&mut session);
    match event {
        Event::PhaseCompleted {
            completed,
            next,
            focus_completed_in_cycle,
            ..
        } => {
            assert_eq!(completed, Phase::Focus);
            assert_eq!(next, Phase::LongRest);
            assert_eq!(focus_completed_in_cycle, 4);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(session.engine().remaining_secs(), 900);

    // Completing the long rest closes the cycle.
    let event = tick_to_completion(&mut session);
    match event {
        Event::PhaseCompleted {
            completed,
            next,
            focus_completed_in_cycle,
            ..
        } => {
            assert_eq!(completed, Phase::LongRest);
            assert_eq!(next, Phase::Focus);
            assert_eq!(focus_completed_in_cycle, 0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(session.engine().remaining_secs(), 1500);
    assert!(session.engine().is_running());

    let stats = stats.borrow();
    assert_eq!(stats.focus_sessions, 4);
    assert_eq!(stats.focus_minutes, 4 * 25);
    assert_eq!(stats.rests_completed, 4);
}

#[test]
fn pause_freezes_the_countdown_mid_cycle() {
    let mut session = Session::load(Box::new(MemoryStore::new()));
    session.start().unwrap();
    for _ in 0..10 {
        session.tick();
    }
    assert_eq!(session.engine().remaining_secs(), 1490);

    session.pause().unwrap();
    for _ in 0..100 {
        assert!(session.tick().is_none());
    }
    assert_eq!(session.engine().remaining_secs(), 1490);

    session.start().unwrap();
    session.tick();
    assert_eq!(session.engine().remaining_secs(), 1489);
}
