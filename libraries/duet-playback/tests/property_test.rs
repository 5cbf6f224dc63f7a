//! Property-based tests for the playback controller
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::Harness;
use duet_playback::{progress_percent, PlaybackPhase};
use proptest::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Prepare(u64),
    Complete,
    Toggle,
    Seek(f64),
    Next,
    Previous,
    Loop,
    Teardown,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Select),
        (0u64..600).prop_map(Op::Prepare),
        Just(Op::Complete),
        Just(Op::Toggle),
        (-1.0f64..2.0).prop_map(Op::Seek),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Loop),
        Just(Op::Teardown),
    ]
}

proptest! {
    /// Property: completion without loop advances by exactly one, modulo N
    #[test]
    fn completion_advances_by_one(len in 2usize..20, start in 0usize..20) {
        let start = start % len;
        let mut h = Harness::new(len);
        h.play(start, Duration::from_secs(60));

        h.complete();

        prop_assert_eq!(h.controller.current_index(), Some((start + 1) % len));
    }

    /// Property: seek never lands outside 0..=total
    #[test]
    fn seek_stays_within_item(total_secs in 0u64..10_000, fraction in -10.0f64..10.0) {
        let mut h = Harness::new(1);
        let total = Duration::from_secs(total_secs);
        h.play(0, total);

        let position = h.controller.seek(fraction).unwrap();
        prop_assert!(position <= total);
    }

    /// Property: progress ratio is always finite and within 0..=100
    #[test]
    fn progress_ratio_bounded(position_ms in 0u64..10_000_000, total_ms in 0u64..10_000_000) {
        let percent = progress_percent(
            Duration::from_millis(position_ms),
            Duration::from_millis(total_ms),
        );
        prop_assert!(percent.is_finite());
        prop_assert!((0.0..=100.0).contains(&percent));
    }

    /// Property: whatever happens, at most one session is unreleased and the
    /// ticker runs exactly when playing
    #[test]
    fn random_operation_sequences_keep_invariants(ops in prop::collection::vec(op(), 1..60)) {
        let mut h = Harness::new(5);

        for op in ops {
            match op {
                Op::Select(index) => { let _ = h.controller.select(index); }
                Op::Prepare(secs) => {
                    if h.controller.phase() == PlaybackPhase::Preparing {
                        h.prepare(Duration::from_secs(secs));
                    }
                }
                Op::Complete => {
                    if h.controller.has_session() {
                        h.complete();
                    }
                }
                Op::Toggle => { let _ = h.controller.toggle_play_pause(); }
                Op::Seek(fraction) => { let _ = h.controller.seek(fraction); }
                Op::Next => { let _ = h.controller.next(); }
                Op::Previous => { let _ = h.controller.previous(); }
                Op::Loop => { h.controller.toggle_loop(); }
                Op::Teardown => h.controller.teardown(),
            }

            let rec = h.rec.lock().unwrap();
            let live = rec.opened.len() - rec.released.len();
            prop_assert!(live <= 1, "{} sessions live", live);
            prop_assert_eq!(live == 1, h.controller.has_session());
            drop(rec);

            prop_assert_eq!(h.controller.is_ticking(), h.controller.is_playing());
            if let Some(index) = h.controller.current_index() {
                prop_assert!(index < 5);
            }
        }

        h.controller.teardown();
        prop_assert_eq!(h.controller.phase(), PlaybackPhase::Idle);
    }
}
