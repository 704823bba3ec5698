//! End-to-end session scenarios driven tick by tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;

use struggle_narrative::schema::node::Channel;
use struggle_narrative::{
    EndReason, Ending, NarrativeStore, Notification, Session, SessionConfig, SessionPhase,
};

fn store() -> Arc<NarrativeStore> {
    Arc::new(NarrativeStore::load_from_ron(Path::new("tests/fixtures/test_story.ron")).unwrap())
}

fn config() -> SessionConfig {
    SessionConfig::load_from_ron(Path::new("tests/fixtures/test_session.ron")).unwrap()
}

fn session(config: SessionConfig) -> Session<Vec<Notification>> {
    Session::new(store(), config, Vec::new())
}

fn count(s: &Session<Vec<Notification>>, wanted: &Notification) -> usize {
    s.presenter().iter().filter(|n| *n == wanted).count()
}

fn dialogue(s: &Session<Vec<Notification>>, name: &str) -> Notification {
    Notification::Dialogue(s.store().id_of(Channel::Dialogue, name).unwrap())
}

#[test]
fn meter_drains_to_losing_ending() {
    let mut s = session(config());
    s.skip_intro();

    s.tick(0.0);
    assert_eq!(s.meter().snapshot(), 25.0);
    assert_eq!(s.phase(), SessionPhase::MainLoop);

    s.tick(1.0);
    assert_eq!(s.meter().snapshot(), 0.0);
    assert_eq!(s.phase(), SessionPhase::Ended);
    assert_eq!(s.end_reason(), Some(EndReason::MeterExhausted));
    assert_eq!(s.final_meter(), Some(0.0));
    assert_eq!(s.ending(), Some(Ending::Losing));

    for _ in 0..10 {
        s.tick(1.0);
    }
    assert_eq!(count(&s, &Notification::Phase(SessionPhase::Ended)), 1);
    assert_eq!(count(&s, &Notification::Meter(0.0)), 1);
    assert_eq!(s.dialogue_cursor().active(), s.store().id_of(Channel::Dialogue, "losing"));
}

#[test]
fn ending_uses_value_at_transition_not_peak() {
    let mut s = session(SessionConfig {
        initial_meter: 30.0,
        ..config()
    });
    s.skip_intro();
    s.player_action();
    assert_eq!(s.meter().snapshot(), 38.0);

    s.tick(0.0);
    assert_eq!(s.meter().snapshot(), 13.0);
    s.tick(1.0);
    assert_eq!(s.phase(), SessionPhase::Ended);
    assert_eq!(s.ending(), Some(Ending::Losing));
}

#[test]
fn three_line_intro_enters_main_loop_once() {
    let mut s = session(config());
    s.tick(2.0);
    s.tick(2.0);
    assert_eq!(s.phase(), SessionPhase::Intro);
    assert!(s.dialogue_cursor().is_at_end(s.store().dialogues()));

    s.tick(2.0);
    assert_eq!(s.phase(), SessionPhase::MainLoop);
    s.skip_intro();
    s.tick(0.5);
    assert_eq!(count(&s, &Notification::Phase(SessionPhase::MainLoop)), 1);
    assert_eq!(count(&s, &dialogue(&s, "intro_c")), 1);
    assert_eq!(count(&s, &dialogue(&s, "main_a")), 1);
}

#[test]
fn player_action_during_intro_is_ignored() {
    let mut s = session(config());
    let before = s.presenter().len();
    s.player_action();
    assert_eq!(s.meter().snapshot(), 50.0);
    assert_eq!(s.presenter().len(), before);
}

#[test]
fn exhaustion_preempts_a_due_advance() {
    let mut s = session(SessionConfig {
        pacing_interval: 1.0,
        ..config()
    });
    s.skip_intro();
    s.tick(0.0);
    s.tick(1.0);

    assert_eq!(s.end_reason(), Some(EndReason::MeterExhausted));
    assert_eq!(count(&s, &dialogue(&s, "main_b")), 0);
    assert!(!s.is_pacing());
    assert!(!s.meter().is_decaying());
}

#[test]
fn chain_end_resolves_with_snapshot() {
    let mut s = session(SessionConfig {
        initial_meter: 15.0,
        decay_per_tick: 1,
        pacing_interval: 1.0,
        ..config()
    });
    s.skip_intro();
    s.tick(0.0);
    for _ in 0..5 {
        s.tick(1.0);
    }

    assert_eq!(s.phase(), SessionPhase::Ended);
    assert_eq!(s.end_reason(), Some(EndReason::DialogueExhausted));
    assert_eq!(s.final_meter(), Some(9.0));
    assert_eq!(s.ending(), Some(Ending::Retribution));
    assert_eq!(count(&s, &dialogue(&s, "main_f")), 0);

    s.tick(1.0);
    assert_eq!(s.meter().snapshot(), 9.0, "decay stops at the transition");

    s.next_dialogue();
    assert_eq!(count(&s, &dialogue(&s, "retribution_2")), 1);
    s.next_dialogue();
    s.next_dialogue();
    assert!(s.is_finished());
    assert_eq!(count(&s, &Notification::Finished(Ending::Retribution)), 1);
}

#[test]
fn hero_ending_when_player_keeps_up() {
    let mut s = session(SessionConfig {
        decay_per_tick: 1,
        gain_per_action: 5.0,
        ..config()
    });
    s.skip_intro();
    for _ in 0..7 {
        s.player_action();
        s.tick(1.0);
    }
    assert_eq!(s.end_reason(), Some(EndReason::PlayerLogExhausted));
    assert_eq!(s.ending(), Some(Ending::Hero));
    assert!(count(&s, &Notification::EndingSelected(Ending::Hero)) == 1);
}

#[test]
fn nothing_fires_after_the_session_ends() {
    let mut s = session(config());
    s.skip_intro();
    s.tick(0.0);
    s.tick(1.0);
    let settled = s.presenter().len();
    for _ in 0..20 {
        s.tick(0.7);
        s.player_action();
        s.skip_intro();
    }
    assert_eq!(s.presenter().len(), settled);
}

#[test]
fn random_play_keeps_invariants() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = session(SessionConfig {
            decay_per_tick: rng.gen_range(0..30),
            gain_per_action: rng.gen_range(0.0..40.0),
            pacing_interval: rng.gen_range(0.5..5.0),
            action_cooldown: rng.gen_range(0.0..1.0),
            ..config()
        });
        let mut last_phase = s.phase();

        for _ in 0..400 {
            match rng.gen_range(0..10) {
                0 => s.skip_intro(),
                1..=3 => s.player_action(),
                4 => s.next_dialogue(),
                _ => s.tick(rng.gen_range(0.0..0.8)),
            }
            let value = s.meter().snapshot();
            assert!((0.0..=100.0).contains(&value), "seed {seed}: meter {value}");
            assert!(s.phase() >= last_phase, "seed {seed}: phase went backwards");
            last_phase = s.phase();
        }

        if s.phase() == SessionPhase::Ended {
            let ending = s.ending().unwrap();
            let resolved = match s.final_meter().unwrap() {
                v if v <= 0.0 => Ending::Losing,
                v if v < 20.0 => Ending::Retribution,
                _ => Ending::Hero,
            };
            assert_eq!(ending, resolved, "seed {seed}");
            assert_eq!(count(&s, &Notification::Phase(SessionPhase::Ended)), 1);
        }
    }
}
