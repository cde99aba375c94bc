//! Random selection for shuffle playback

use mood_core::Track;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Pick a uniformly random index into a queue of `len` tracks
///
/// Returns `None` for an empty queue.
pub fn random_index(len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(thread_rng().gen_range(0..len))
}

/// Shuffle tracks in place (Fisher-Yates)
pub fn shuffle_tracks(tracks: &mut [Track]) {
    tracks.shuffle(&mut thread_rng());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn empty_queue_has_no_index() {
        assert_eq!(random_index(0), None);
    }

    #[test]
    fn index_always_in_range() {
        for len in 1..20 {
            for _ in 0..50 {
                let index = random_index(len).unwrap();
                assert!(index < len);
            }
        }
    }

    #[test]
    fn every_index_reachable() {
        let seen: HashSet<usize> = (0..500).filter_map(|_| random_index(4)).collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn shuffle_preserves_tracks() {
        let mut tracks: Vec<Track> = (0..20)
            .map(|i| Track::new(i.to_string(), format!("Track {}", i), "Channel"))
            .collect();
        let original: HashSet<String> = tracks.iter().map(|t| t.id.to_string()).collect();

        shuffle_tracks(&mut tracks);

        let shuffled: HashSet<String> = tracks.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(original, shuffled);
        assert_eq!(tracks.len(), 20);
    }
}
