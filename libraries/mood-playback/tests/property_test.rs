//! Property-based tests for the player session
//!
//! Uses proptest to check queue, history, volume and auto-advance
//! invariants across random command sequences.

use mood_core::{Track, TrackId};
use mood_playback::{PlayerIntent, PlayerSession};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn arbitrary_track() -> impl Strategy<Value = Track> {
    (
        "[A-Za-z0-9_-]{11}", // video id
        "[A-Za-z ]{1,30}",   // title
        "[A-Za-z ]{1,20}",   // channel
    )
        .prop_map(|(id, title, author)| Track::new(id, title, author))
}

fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::vec(arbitrary_track(), 1..40)
}

fn finished_count(intents: &[PlayerIntent]) -> usize {
    intents
        .iter()
        .filter(|i| matches!(i, PlayerIntent::TrackFinished { .. }))
        .count()
}

// ===== Property Tests =====

proptest! {
    /// Property: queue reflects exact insertion order and length
    #[test]
    fn queue_preserves_insertion_order(tracks in arbitrary_tracks()) {
        let mut session = PlayerSession::default();
        for track in &tracks {
            session.enqueue(track.clone());
        }

        let queued: Vec<&TrackId> = session.get_queue().iter().map(|t| &t.id).collect();
        let expected: Vec<&TrackId> = tracks.iter().map(|t| &t.id).collect();
        prop_assert_eq!(queued, expected);
        prop_assert_eq!(session.queue_len(), tracks.len());
    }

    /// Property: play_next without shuffle promotes the queue head
    #[test]
    fn play_next_promotes_head(tracks in arbitrary_tracks()) {
        let mut session = PlayerSession::default();
        for track in &tracks {
            session.enqueue(track.clone());
        }

        session.play_next();

        let current = session.get_current_track().map(|t| t.id.clone());
        prop_assert_eq!(current, Some(tracks[0].id.clone()));
        prop_assert_eq!(session.queue_len(), tracks.len() - 1);
    }

    /// Property: shuffle promotes some queued track and removes exactly one
    #[test]
    fn shuffle_removes_exactly_one(tracks in arbitrary_tracks()) {
        let mut session = PlayerSession::default();
        session.toggle_shuffle();
        for track in &tracks {
            session.enqueue(track.clone());
        }
        let before: Vec<TrackId> = session.get_queue().iter().map(|t| t.id.clone()).collect();

        session.play_next();

        let current = session.get_current_track().map(|t| t.id.clone());
        prop_assert!(current.as_ref().is_some_and(|id| before.contains(id)));
        prop_assert_eq!(session.queue_len(), before.len() - 1);
    }

    /// Property: shuffling through the whole queue plays every entry once
    #[test]
    fn shuffle_drains_queue_without_repeats(count in 1usize..30) {
        let mut session = PlayerSession::default();
        session.toggle_shuffle();
        for i in 0..count {
            session.enqueue(Track::new(format!("t{}", i), "Title", "Channel"));
        }

        let mut seen = HashSet::new();
        for _ in 0..count {
            session.play_next();
            let id = session.get_current_track().map(|t| t.id.to_string());
            prop_assert!(id.is_some());
            prop_assert!(seen.insert(id));
        }
        prop_assert_eq!(session.queue_len(), 0);
    }

    /// Property: history never exceeds its bound
    #[test]
    fn history_is_bounded(tracks in prop::collection::vec(arbitrary_track(), 1..200)) {
        let mut session = PlayerSession::default();
        for track in tracks {
            session.set_current_track(track);
            prop_assert!(session.get_history().len() <= 50);
        }
    }

    /// Property: volume is always clamped to 0-100
    #[test]
    fn volume_always_clamped(level in any::<i32>()) {
        let mut session = PlayerSession::default();
        session.set_volume(level);

        let expected = level.clamp(0, 100);
        prop_assert_eq!(i32::from(session.get_volume()), expected);
    }

    /// Property: auto-advance fires once per crossing of the end
    #[test]
    fn auto_advance_fires_once(
        duration in 1.0f64..600.0,
        overshoots in prop::collection::vec(0.0f64..30.0, 1..20),
    ) {
        let mut session = PlayerSession::default();
        session.set_current_track(Track::new("a", "A", "Channel"));
        session.set_duration(duration);
        session.set_progress(duration / 2.0);
        session.drain_intents();

        for extra in overshoots {
            session.set_progress(duration + extra);
        }

        prop_assert_eq!(finished_count(&session.drain_intents()), 1);
    }

    /// Property: position is never negative or non-finite
    #[test]
    fn position_is_sanitized(position in prop_oneof![
        any::<f64>(),
        Just(f64::NAN),
        Just(f64::NEG_INFINITY),
        -1000.0f64..1000.0,
    ]) {
        let mut session = PlayerSession::default();
        session.set_progress(position);

        let stored = session.get_position();
        prop_assert!(stored.is_finite());
        prop_assert!(stored >= 0.0);
    }
}
