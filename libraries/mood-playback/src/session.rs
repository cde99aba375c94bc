//! Player session - the playback state machine
//!
//! Owns current track, queue, history, position/duration, volume, and the
//! shuffle/repeat flags. Every command completes synchronously; effects on
//! the widget are expressed as queued [`PlayerIntent`]s.

use crate::{
    events::{PlaybackFact, PlayerIntent},
    history::History,
    preferences::{load_volume, save_volume},
    queue::Queue,
    shuffle::{random_index, shuffle_tracks},
    types::{PlaybackConfig, PlayerSnapshot},
    volume::Volume,
};
use mood_core::{MemoryPreferenceStore, PreferenceStore, Track, TrackId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Central playback state
///
/// State space is {current track / none} x {playing / paused} x
/// {queue empty / non-empty}. There is no terminal state: the session
/// accepts commands for as long as it lives.
pub struct PlayerSession {
    current_track: Option<Track>,
    queue: Queue,
    history: History,

    is_playing: bool,
    volume: Volume,
    position: f64,
    duration: f64,
    shuffle: bool,
    repeat: bool,

    restart_threshold: f64,

    // Set once the current track's completion has been handled; cleared by a
    // position below the duration or by a new track.
    end_latched: bool,

    preferences: Arc<dyn PreferenceStore>,
    pending_intents: Vec<PlayerIntent>,
}

impl PlayerSession {
    /// Create a session, restoring the volume from `preferences`
    pub fn new(config: PlaybackConfig, preferences: Arc<dyn PreferenceStore>) -> Self {
        let volume = load_volume(preferences.as_ref(), config.default_volume);
        debug!(volume = volume.level(), "Player session created");

        Self {
            current_track: None,
            queue: Queue::new(),
            history: History::new(config.history_size),
            is_playing: false,
            volume,
            position: 0.0,
            duration: 0.0,
            shuffle: false,
            repeat: false,
            restart_threshold: config.restart_threshold_secs.max(0.0),
            end_latched: false,
            preferences,
            pending_intents: Vec::new(),
        }
    }

    // ===== Track Selection =====

    /// Make `track` current and start playing it
    ///
    /// The previously current track (if any) becomes the most recent history
    /// entry.
    pub fn set_current_track(&mut self, track: Track) {
        if let Some(previous) = self.current_track.take() {
            self.history.push(previous);
        }
        self.load_track(track);
    }

    /// Play the first track now and queue the rest
    pub fn play_all(&mut self, tracks: Vec<Track>) {
        let mut tracks = tracks.into_iter();
        let Some(first) = tracks.next() else {
            return;
        };
        self.set_current_track(first);
        for track in tracks {
            self.queue.push(track);
        }
        self.emit_queue_changed();
    }

    /// Like [`play_all`](Self::play_all) after a random permutation
    pub fn shuffle_play(&mut self, mut tracks: Vec<Track>) {
        shuffle_tracks(&mut tracks);
        self.play_all(tracks);
    }

    /// Advance to the next track
    ///
    /// Policy, in order: random queue entry when shuffling, queue head
    /// otherwise, replay of the current track when repeating, else halt.
    pub fn play_next(&mut self) {
        let index = if self.shuffle {
            random_index(self.queue.len())
        } else if self.queue.is_empty() {
            None
        } else {
            Some(0)
        };

        if let Some(next) = index.and_then(|i| self.queue.take(i)) {
            self.set_current_track(next);
            self.emit_queue_changed();
            return;
        }

        if self.repeat && self.current_track.is_some() {
            debug!("Queue exhausted, repeating current track");
            self.reset_position();
            self.set_playing(true);
            return;
        }

        debug!("Queue exhausted, halting playback");
        self.set_playing(false);
    }

    /// Restart the current track, or go back one track
    ///
    /// Past the restart threshold this only rewinds; otherwise the most
    /// recent history entry becomes current without pushing the track being
    /// left back into history.
    pub fn play_previous(&mut self) {
        if self.position > self.restart_threshold {
            debug!(position = self.position, "Restarting current track");
            self.reset_position();
            return;
        }

        if let Some(previous) = self.history.pop() {
            self.load_track(previous);
        }
    }

    // ===== Play State =====

    /// Flip the playing flag
    pub fn toggle_play(&mut self) {
        self.set_playing(!self.is_playing);
    }

    /// Resume playback; no-op if already playing
    pub fn play(&mut self) {
        self.set_playing(true);
    }

    /// Pause playback; no-op if already paused
    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    // ===== Queue Management =====

    /// Append a track to the end of the queue
    pub fn enqueue(&mut self, track: Track) {
        self.queue.push(track);
        self.emit_queue_changed();
    }

    /// Remove the first queued track with this id
    pub fn dequeue(&mut self, track_id: &TrackId) -> Option<Track> {
        let removed = self.queue.remove_by_id(track_id);
        if removed.is_some() {
            self.emit_queue_changed();
        }
        removed
    }

    /// Empty the queue
    pub fn clear_queue(&mut self) {
        if !self.queue.is_empty() {
            self.queue.clear();
            self.emit_queue_changed();
        }
    }

    // ===== Volume =====

    /// Set volume, clamped to 0-100, and persist it
    ///
    /// A failing preference store is logged; the in-memory level still
    /// changes.
    pub fn set_volume(&mut self, level: i32) {
        self.volume.set_level(level);
        if let Err(e) = save_volume(self.preferences.as_ref(), self.volume) {
            warn!(error = %e, "Failed to persist volume");
        }
        self.pending_intents.push(PlayerIntent::VolumeChanged {
            level: self.volume.level(),
        });
    }

    // ===== Position =====

    /// Set the playback position in seconds
    ///
    /// Seeks and periodic position reports both land here.
    pub fn set_progress(&mut self, position: f64) {
        self.position = sanitize_seconds(position);
        self.pending_intents.push(PlayerIntent::PositionSet {
            position: self.position,
        });
        self.check_track_end();
    }

    /// Set the current track's duration in seconds (0 = unknown)
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = sanitize_seconds(duration);
        self.check_track_end();
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        debug!(shuffle = self.shuffle, "Shuffle toggled");
    }

    /// Flip repeat
    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        debug!(repeat = self.repeat, "Repeat toggled");
    }

    // ===== Adapter Facts =====

    /// Feed a fact reported by the widget adapter
    ///
    /// Facts naming a track other than the current one are dropped.
    pub fn apply_fact(&mut self, fact: PlaybackFact) {
        let is_current = self
            .current_track
            .as_ref()
            .is_some_and(|t| &t.id == fact.track_id());
        if !is_current {
            debug!(track_id = %fact.track_id(), "Dropping fact for stale track");
            return;
        }

        match fact {
            PlaybackFact::PositionTick { position, .. } => self.set_progress(position),
            PlaybackFact::DurationKnown { duration, .. } => self.set_duration(duration),
            PlaybackFact::Ended { .. } => self.complete_track(),
            PlaybackFact::Failed { track_id, code } => {
                warn!(track_id = %track_id, code, "Track unplayable, skipping");
                self.play_next();
            }
        }
    }

    // ===== State Queries =====

    /// Get currently playing track
    pub fn get_current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Get all tracks in queue
    pub fn get_queue(&self) -> Vec<&Track> {
        self.queue.get_all()
    }

    /// Get queue length
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Get playback history (most recent first)
    pub fn get_history(&self) -> Vec<&Track> {
        self.history.get_all()
    }

    /// Whether playback is (meant to be) running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Get current volume level (0-100)
    pub fn get_volume(&self) -> u8 {
        self.volume.level()
    }

    /// Get current playback position in seconds
    pub fn get_position(&self) -> f64 {
        self.position
    }

    /// Get current track duration in seconds (0 = unknown)
    pub fn get_duration(&self) -> f64 {
        self.duration
    }

    /// Whether shuffle is on
    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Whether repeat is on
    pub fn is_repeat_enabled(&self) -> bool {
        self.repeat
    }

    /// Check if "next" would start something
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty() || (self.repeat && self.current_track.is_some())
    }

    /// Check if "previous" would go back a track
    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    /// Copy of the whole state for renderers
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track.clone(),
            queue: self.queue.to_vec(),
            history: self.history.to_vec(),
            is_playing: self.is_playing,
            volume: self.volume.level(),
            position: self.position,
            duration: self.duration,
            shuffle_enabled: self.shuffle,
            repeat_enabled: self.repeat,
        }
    }

    // ===== Intents =====

    /// Drain all pending intents
    ///
    /// Returns everything emitted since the last drain, in emission order.
    pub fn drain_intents(&mut self) -> Vec<PlayerIntent> {
        std::mem::take(&mut self.pending_intents)
    }

    /// Check if there are pending intents
    pub fn has_pending_intents(&self) -> bool {
        !self.pending_intents.is_empty()
    }

    // ===== Internal =====

    fn load_track(&mut self, track: Track) {
        info!(track_id = %track.id, title = %track.title, "Now playing");

        self.current_track = Some(track.clone());
        self.position = 0.0;
        self.duration = 0.0;
        self.end_latched = false;

        self.pending_intents.push(PlayerIntent::TrackChanged {
            track,
            autoplay: true,
        });
        self.set_playing(true);
    }

    fn reset_position(&mut self) {
        self.position = 0.0;
        self.pending_intents
            .push(PlayerIntent::PositionSet { position: 0.0 });
    }

    fn set_playing(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.pending_intents
                .push(PlayerIntent::PlaybackChanged { playing });
        }
    }

    /// Edge-triggered auto-advance
    fn check_track_end(&mut self) {
        if self.duration <= 0.0 {
            return;
        }
        if self.position < self.duration {
            self.end_latched = false;
            return;
        }
        self.complete_track();
    }

    fn complete_track(&mut self) {
        if self.end_latched {
            return;
        }
        self.end_latched = true;

        if let Some(track) = &self.current_track {
            debug!(track_id = %track.id, "Track finished");
            self.pending_intents.push(PlayerIntent::TrackFinished {
                track_id: track.id.clone(),
            });
        }
        self.play_next();
    }

    fn emit_queue_changed(&mut self) {
        self.pending_intents.push(PlayerIntent::QueueChanged {
            length: self.queue.len(),
        });
    }
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self::new(
            PlaybackConfig::default(),
            Arc::new(MemoryPreferenceStore::new()),
        )
    }
}

fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
