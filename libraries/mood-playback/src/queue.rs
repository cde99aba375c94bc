//! Play queue
//!
//! Ordered list of tracks waiting to play after the current one. Insertion
//! order is playback order; shuffle picks from it without reordering it.

use mood_core::{Track, TrackId};
use std::collections::VecDeque;

/// Play queue
///
/// ```text
/// Currently Playing: Track A
/// ─────────────────────────────
/// Queue:
///   - Track B   <- next (FIFO)
///   - Track C
///   - Track D
/// ```
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: VecDeque<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append track to the end; duplicates are allowed
    pub fn push(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Remove the first track with the given id
    pub fn remove_by_id(&mut self, track_id: &TrackId) -> Option<Track> {
        let index = self.tracks.iter().position(|t| &t.id == track_id)?;
        self.tracks.remove(index)
    }

    /// Remove and return the track at index
    pub fn take(&mut self, index: usize) -> Option<Track> {
        self.tracks.remove(index)
    }

    /// Remove and return the next track (FIFO)
    pub fn pop_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Peek at the next track without removing it
    pub fn peek_next(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// Get all tracks in playback order
    pub fn get_all(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    /// Clone all tracks in playback order
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    /// Clear queue
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Get queue length
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
