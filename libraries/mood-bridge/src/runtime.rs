//! Player runtime
//!
//! Owns the session and the widget adapter on a single task. Commands come
//! in from any number of [`PlayerHandle`]s; every applied step publishes a
//! fresh [`PlayerSnapshot`].

use crate::adapter::WidgetAdapter;
use crate::config::AdapterConfig;
use crate::error::{BridgeError, Result};
use crate::loader::ScriptLoader;
use crate::widget::WidgetFactory;
use mood_core::{Track, TrackId};
use mood_playback::{PlaybackFact, PlayerIntent, PlayerSession, PlayerSnapshot};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const COMMAND_BUFFER: usize = 32;

/// Commands accepted by the runtime
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Play this track now
    PlayTrack(Track),

    /// Play the first track, queue the rest
    PlayAll(Vec<Track>),

    /// Like `PlayAll` in random order
    ShufflePlay(Vec<Track>),

    /// Add track to queue
    Enqueue(Track),

    /// Remove track from queue
    Dequeue(TrackId),

    /// Clear queue
    ClearQueue,

    /// Skip to next track
    Next,

    /// Go to previous track (or restart)
    Previous,

    /// Flip play/pause
    TogglePlay,

    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Set volume (clamped to 0-100)
    SetVolume(i32),

    /// Seek to position (in seconds)
    Seek(f64),

    /// Flip shuffle
    ToggleShuffle,

    /// Flip repeat
    ToggleRepeat,

    /// Dispose the widget and stop the runtime
    Shutdown,
}

/// Cloneable handle to a running [`PlayerRuntime`]
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    snapshot: watch::Receiver<PlayerSnapshot>,
}

impl PlayerHandle {
    /// Send a command to the runtime
    pub async fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| BridgeError::RuntimeClosed)
    }

    pub async fn play_track(&self, track: Track) -> Result<()> {
        self.send(PlayerCommand::PlayTrack(track)).await
    }

    pub async fn enqueue(&self, track: Track) -> Result<()> {
        self.send(PlayerCommand::Enqueue(track)).await
    }

    pub async fn next(&self) -> Result<()> {
        self.send(PlayerCommand::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.send(PlayerCommand::Previous).await
    }

    pub async fn toggle_play(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlay).await
    }

    pub async fn set_volume(&self, level: i32) -> Result<()> {
        self.send(PlayerCommand::SetVolume(level)).await
    }

    pub async fn seek(&self, position: f64) -> Result<()> {
        self.send(PlayerCommand::Seek(position)).await
    }

    /// Ask the runtime to stop
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PlayerCommand::Shutdown).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified whenever the state changes
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }
}

/// Single-task owner of session and adapter
pub struct PlayerRuntime {
    session: PlayerSession,
    adapter: WidgetAdapter,
    commands: mpsc::Receiver<PlayerCommand>,
    facts: mpsc::UnboundedReceiver<PlaybackFact>,
    snapshot: watch::Sender<PlayerSnapshot>,
}

impl PlayerRuntime {
    /// Build a runtime using the process-wide [`ScriptLoader`]
    pub fn new(
        session: PlayerSession,
        config: AdapterConfig,
        factory: Arc<dyn WidgetFactory>,
    ) -> (Self, PlayerHandle) {
        Self::with_loader(session, config, factory, ScriptLoader::global())
    }

    /// Build a runtime with an explicit loader
    pub fn with_loader(
        session: PlayerSession,
        config: AdapterConfig,
        factory: Arc<dyn WidgetFactory>,
        loader: Arc<ScriptLoader>,
    ) -> (Self, PlayerHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (facts_tx, facts_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let runtime = Self {
            session,
            adapter: WidgetAdapter::new(config, factory, loader, facts_tx),
            commands: commands_rx,
            facts: facts_rx,
            snapshot: snapshot_tx,
        };
        let handle = PlayerHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Run on a new task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process commands, facts and widget events until shutdown
    ///
    /// Stops on [`PlayerCommand::Shutdown`] or once every handle is dropped,
    /// disposing the widget on the way out.
    pub async fn run(mut self) {
        info!("Player runtime started");

        // Widget picks up the restored volume once it exists
        let level = self.session.get_volume();
        self.adapter.handle_intent(PlayerIntent::VolumeChanged { level });

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(fact) = self.facts.recv() => self.session.apply_fact(fact),
                Some(event) = self.adapter.next_event() => self.adapter.handle_event(event),
            }

            for intent in self.session.drain_intents() {
                self.adapter.handle_intent(intent);
            }
            self.publish();
        }

        self.adapter.dispose();
        info!("Player runtime stopped");
    }

    fn apply(&mut self, command: PlayerCommand) {
        debug!(?command, "Applying player command");
        let session = &mut self.session;

        match command {
            PlayerCommand::PlayTrack(track) => session.set_current_track(track),
            PlayerCommand::PlayAll(tracks) => session.play_all(tracks),
            PlayerCommand::ShufflePlay(tracks) => session.shuffle_play(tracks),
            PlayerCommand::Enqueue(track) => session.enqueue(track),
            PlayerCommand::Dequeue(track_id) => {
                session.dequeue(&track_id);
            }
            PlayerCommand::ClearQueue => session.clear_queue(),
            PlayerCommand::Next => session.play_next(),
            PlayerCommand::Previous => session.play_previous(),
            PlayerCommand::TogglePlay => session.toggle_play(),
            PlayerCommand::Play => session.play(),
            PlayerCommand::Pause => session.pause(),
            PlayerCommand::SetVolume(level) => session.set_volume(level),
            PlayerCommand::Seek(position) => session.set_progress(position),
            PlayerCommand::ToggleShuffle => session.toggle_shuffle(),
            PlayerCommand::ToggleRepeat => session.toggle_repeat(),
            PlayerCommand::Shutdown => {}
        }
    }

    fn publish(&self) {
        let next = self.session.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
