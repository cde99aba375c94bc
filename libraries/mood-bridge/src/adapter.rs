//! Widget adapter
//!
//! Turns [`PlayerIntent`]s into widget commands and widget events into
//! [`PlaybackFact`]s. It mirrors what it believes the widget is doing so that
//! commands are only sent on real transitions.

use crate::commands::{PendingCommands, WidgetCommand};
use crate::config::AdapterConfig;
use crate::error::{BridgeError, Result};
use crate::loader::ScriptLoader;
use crate::sampler::PositionSampler;
use crate::widget::{
    PlayerWidget, WidgetEvent, WidgetFactory, WidgetSlot, WidgetState, CONSTRUCTION_FAILED_CODE,
};
use mood_core::TrackId;
use mood_playback::{PlaybackFact, PlayerIntent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

/// Something the adapter has to react to
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    /// Event pushed by the widget
    Widget(WidgetEvent),

    /// A freshly cued track has settled and may be started
    SettleElapsed,

    /// Widget API finished loading; the widget can be built
    ApiReady,

    /// Widget API failed to load or did not load in time
    ApiFailed(String),
}

type LoadOutcome = std::result::Result<(), String>;

/// Drives one embedded player widget on behalf of a player session
pub struct WidgetAdapter {
    config: AdapterConfig,
    factory: Arc<dyn WidgetFactory>,
    loader: Arc<ScriptLoader>,

    widget: WidgetSlot,
    has_widget: bool,
    ready: bool,
    loaded_track: Option<TrackId>,
    /// Set between cueing a track and the widget acknowledging it; any
    /// end or error seen meanwhile belongs to the previous track
    awaiting_cue: bool,

    /// What the session wants
    desired_playing: bool,
    /// What the widget was last told or reported
    widget_playing: bool,

    pending: PendingCommands,
    sampler: Option<PositionSampler>,
    settle_deadline: Option<Instant>,
    api_task: Option<JoinHandle<()>>,

    events_tx: mpsc::UnboundedSender<WidgetEvent>,
    events_rx: mpsc::UnboundedReceiver<WidgetEvent>,
    loads_tx: mpsc::UnboundedSender<LoadOutcome>,
    loads_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    facts: mpsc::UnboundedSender<PlaybackFact>,

    disposed: bool,
}

impl WidgetAdapter {
    /// Create an adapter reporting facts on `facts`
    ///
    /// No widget exists until the first track arrives.
    pub fn new(
        config: AdapterConfig,
        factory: Arc<dyn WidgetFactory>,
        loader: Arc<ScriptLoader>,
        facts: mpsc::UnboundedSender<PlaybackFact>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();

        Self {
            config,
            factory,
            loader,
            widget: Arc::new(Mutex::new(None)),
            has_widget: false,
            ready: false,
            loaded_track: None,
            awaiting_cue: false,
            desired_playing: false,
            widget_playing: false,
            pending: PendingCommands::new(),
            sampler: None,
            settle_deadline: None,
            api_task: None,
            events_tx,
            events_rx,
            loads_tx,
            loads_rx,
            facts,
            disposed: false,
        }
    }

    // ===== Inbound =====

    /// React to an intent from the session
    ///
    /// Never waits: the first track starts loading the widget API in the
    /// background and the widget is built when
    /// [`AdapterEvent::ApiReady`] comes back through
    /// [`next_event`](Self::next_event).
    pub fn handle_intent(&mut self, intent: PlayerIntent) {
        if self.disposed {
            return;
        }

        match intent {
            PlayerIntent::TrackChanged { track, autoplay } => {
                self.load_track(track.id, autoplay);
            }
            PlayerIntent::PlaybackChanged { playing } => self.set_playing(playing),
            PlayerIntent::PositionSet { position } => self.reconcile_position(position),
            PlayerIntent::VolumeChanged { level } => {
                self.dispatch(WidgetCommand::SetVolume(level));
            }
            PlayerIntent::QueueChanged { .. } | PlayerIntent::TrackFinished { .. } => {}
        }
    }

    /// Wait for the next widget event, API load outcome or settle timer
    ///
    /// Cancel safe, so it can sit in a `select!` loop.
    pub async fn next_event(&mut self) -> Option<AdapterEvent> {
        let deadline = self.settle_deadline;
        tokio::select! {
            Some(event) = self.events_rx.recv() => Some(AdapterEvent::Widget(event)),
            Some(outcome) = self.loads_rx.recv() => Some(match outcome {
                Ok(()) => AdapterEvent::ApiReady,
                Err(reason) => AdapterEvent::ApiFailed(reason),
            }),
            () = settle_timer(deadline) => Some(AdapterEvent::SettleElapsed),
            else => None,
        }
    }

    /// React to an event returned by [`next_event`](Self::next_event)
    pub fn handle_event(&mut self, event: AdapterEvent) {
        match event {
            AdapterEvent::Widget(event) => self.handle_widget_event(event),
            AdapterEvent::SettleElapsed => {
                self.settle_deadline = None;
                if !self.disposed {
                    self.sync_play_state();
                }
            }
            AdapterEvent::ApiReady => self.on_api_loaded(Ok(())),
            AdapterEvent::ApiFailed(reason) => self.on_api_loaded(Err(reason)),
        }
    }

    /// React to an event pushed by the widget
    pub fn handle_widget_event(&mut self, event: WidgetEvent) {
        if self.disposed {
            return;
        }

        match event {
            WidgetEvent::Ready => {
                self.ready = true;
                let deferred = self.pending.take();
                debug!(deferred = deferred.len(), "Widget ready");
                self.with_widget(|widget| {
                    for command in &deferred {
                        command.apply(widget);
                    }
                });
                self.report_duration();
            }
            WidgetEvent::StateChanged(state) => self.on_state_changed(state),
            WidgetEvent::Error { code } => {
                self.stop_sampler();
                if self.awaiting_cue {
                    debug!(code, "Dropping error raised before the cue took effect");
                    return;
                }
                if let Some(track_id) = self.loaded_track.clone() {
                    warn!(track_id = %track_id, code, "Widget cannot play track");
                    self.report(PlaybackFact::Failed { track_id, code });
                }
            }
        }
    }

    // ===== Teardown =====

    /// Destroy the widget and stop sampling
    ///
    /// No fact is reported after this returns. Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.settle_deadline = None;
        self.pending.clear();
        self.stop_sampler();
        if let Some(task) = self.api_task.take() {
            task.abort();
        }

        match self.widget.lock() {
            Ok(mut slot) => {
                if let Some(mut widget) = slot.take() {
                    widget.destroy();
                }
            }
            Err(e) => warn!(error = %e, "Widget slot poisoned during dispose"),
        }

        self.has_widget = false;
        self.ready = false;
        info!("Player widget disposed");
    }

    // ===== State Queries =====

    pub fn has_widget(&self) -> bool {
        self.has_widget
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether a position sampler is running
    pub fn is_sampling(&self) -> bool {
        self.sampler.as_ref().is_some_and(|s| !s.is_finished())
    }

    /// Track the widget holds (or is about to)
    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded_track.as_ref()
    }

    /// Whether the widget API is still loading
    pub fn is_loading(&self) -> bool {
        self.api_task.is_some()
    }

    /// Number of commands waiting for readiness
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    // ===== Internal =====

    fn load_track(&mut self, track_id: TrackId, autoplay: bool) {
        self.stop_sampler();
        self.settle_deadline = None;
        self.desired_playing = autoplay;
        self.loaded_track = Some(track_id.clone());

        if self.has_widget {
            debug!(track_id = %track_id, "Cueing track");
            self.widget_playing = false;
            self.awaiting_cue = true;
            self.dispatch(WidgetCommand::Cue(track_id));
            if autoplay {
                self.settle_deadline = Some(Instant::now() + self.config.settle_delay);
            }
            return;
        }

        // A load already in flight builds the widget for the latest track
        if self.api_task.is_none() {
            self.spawn_api_load();
        }
    }

    fn spawn_api_load(&mut self) {
        let factory = Arc::clone(&self.factory);
        let loader = Arc::clone(&self.loader);
        let outcomes = self.loads_tx.clone();
        let timeout = self.config.load_timeout;

        debug!(?timeout, "Loading widget API");
        self.api_task = Some(tokio::spawn(async move {
            let load = loader.ensure_loaded(|| factory.load_api());
            let outcome = match tokio::time::timeout(timeout, load).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("widget API did not load within {:?}", timeout)),
            };
            let _ = outcomes.send(outcome);
        }));
    }

    fn on_api_loaded(&mut self, outcome: LoadOutcome) {
        self.api_task = None;
        if self.disposed || self.has_widget {
            return;
        }
        let Some(track_id) = self.loaded_track.clone() else {
            return;
        };

        let result = match outcome {
            Ok(()) => self.create_widget(&track_id).map_err(|e| e.to_string()),
            Err(reason) => Err(reason),
        };
        if let Err(reason) = result {
            warn!(track_id = %track_id, error = %reason, "Could not create player widget");
            self.report(PlaybackFact::Failed {
                track_id,
                code: CONSTRUCTION_FAILED_CODE,
            });
        }
    }

    fn create_widget(&mut self, track_id: &TrackId) -> Result<()> {
        let autoplay = self.desired_playing;
        let widget = self.factory.construct(
            &self.config.container_id,
            track_id,
            autoplay,
            self.events_tx.clone(),
        )?;

        {
            let mut slot = self
                .widget
                .lock()
                .map_err(|e| BridgeError::WidgetConstruction(e.to_string()))?;
            *slot = Some(widget);
        }

        self.has_widget = true;
        self.ready = false;
        self.widget_playing = autoplay;
        info!(
            track_id = %track_id,
            container = %self.config.container_id,
            "Player widget created"
        );
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        self.desired_playing = playing;
        if !playing {
            self.settle_deadline = None;
            self.stop_sampler();
        }
        self.sync_play_state();
    }

    /// Send play/pause if the widget disagrees with the session
    fn sync_play_state(&mut self) {
        // The settle timer starts freshly cued tracks; a widget still being
        // built takes its play state from autoplay
        if !self.has_widget
            || self.settle_deadline.is_some()
            || self.desired_playing == self.widget_playing
        {
            return;
        }
        self.widget_playing = self.desired_playing;
        let command = if self.desired_playing {
            WidgetCommand::Play
        } else {
            WidgetCommand::Pause
        };
        self.dispatch(command);
    }

    fn reconcile_position(&mut self, position: f64) {
        if self.loaded_track.is_none() {
            return;
        }
        if !self.ready {
            self.pending.push(WidgetCommand::Seek(position));
            return;
        }

        let Some(live) = self.with_widget(|widget| widget.current_position()) else {
            return;
        };
        if (live - position).abs() > self.config.seek_tolerance {
            debug!(live, requested = position, "Seeking widget");
            self.with_widget(|widget| widget.seek_to(position));
            self.sync_play_state();
        }
    }

    fn on_state_changed(&mut self, state: WidgetState) {
        trace!(?state, "Widget state changed");
        if matches!(
            state,
            WidgetState::Cued
                | WidgetState::Unstarted
                | WidgetState::Buffering
                | WidgetState::Playing
        ) {
            self.awaiting_cue = false;
        }

        match state {
            WidgetState::Playing => {
                self.widget_playing = true;
                self.report_duration();
                self.start_sampler();
            }
            WidgetState::Paused => {
                self.widget_playing = false;
                self.stop_sampler();
            }
            WidgetState::Ended => {
                self.stop_sampler();
                if self.awaiting_cue {
                    debug!("Dropping end of the previously loaded track");
                    return;
                }
                self.widget_playing = false;
                if let Some(track_id) = self.loaded_track.clone() {
                    self.report(PlaybackFact::Ended { track_id });
                }
            }
            WidgetState::Buffering | WidgetState::Cued | WidgetState::Unstarted => {
                self.stop_sampler();
            }
        }
    }

    fn dispatch(&mut self, command: WidgetCommand) {
        if self.ready {
            self.with_widget(|widget| command.apply(widget));
        } else {
            trace!(?command, "Widget not ready, deferring command");
            self.pending.push(command);
        }
    }

    fn with_widget<R>(&self, f: impl FnOnce(&mut dyn PlayerWidget) -> R) -> Option<R> {
        let mut slot = match self.widget.lock() {
            Ok(slot) => slot,
            Err(e) => {
                warn!(error = %e, "Widget slot poisoned");
                return None;
            }
        };
        match slot.as_mut() {
            Some(widget) => Some(f(&mut **widget)),
            None => None,
        }
    }

    fn start_sampler(&mut self) {
        if self.is_sampling() {
            return;
        }
        let Some(track_id) = self.loaded_track.clone() else {
            return;
        };
        self.sampler = Some(PositionSampler::spawn(
            Arc::clone(&self.widget),
            track_id,
            self.config.sample_interval,
            self.facts.clone(),
        ));
    }

    fn stop_sampler(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.stop();
        }
    }

    fn report_duration(&self) {
        let Some(track_id) = self.loaded_track.clone() else {
            return;
        };
        let duration = self.with_widget(|widget| widget.duration()).unwrap_or(0.0);
        if duration > 0.0 {
            self.report(PlaybackFact::DurationKnown { track_id, duration });
        }
    }

    fn report(&self, fact: PlaybackFact) {
        if self.facts.send(fact).is_err() {
            debug!("Fact receiver gone, dropping fact");
        }
    }
}

async fn settle_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl Drop for WidgetAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}
