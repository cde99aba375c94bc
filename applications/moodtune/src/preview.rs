//! Terminal preview widget
//!
//! Stands in for the embedded video player when running from a terminal:
//! every track "plays" for a fixed preview length on a wall clock, reporting
//! the same events a real widget would.

use mood_bridge::{PlayerWidget, WidgetEvent, WidgetFactory, WidgetState};
use mood_core::TrackId;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

pub struct PreviewWidgetFactory {
    preview_secs: f64,
}

impl PreviewWidgetFactory {
    pub fn new(preview_secs: f64) -> Self {
        Self { preview_secs }
    }
}

impl WidgetFactory for PreviewWidgetFactory {
    fn construct(
        &self,
        container_id: &str,
        track_id: &TrackId,
        autoplay: bool,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> mood_bridge::Result<Box<dyn PlayerWidget>> {
        debug!(container_id, track_id = %track_id, "Creating preview widget");

        let mut widget = PreviewWidget {
            track_id: track_id.clone(),
            length: self.preview_secs,
            offset: 0.0,
            started_at: None,
            volume: 100,
            events: Some(events),
        };
        widget.emit(WidgetEvent::Ready);
        if autoplay {
            widget.play();
        }
        Ok(Box::new(widget))
    }
}

struct PreviewWidget {
    track_id: TrackId,
    length: f64,
    /// Position accumulated before the current run
    offset: f64,
    /// Set while playing
    started_at: Option<Instant>,
    volume: u8,
    events: Option<mpsc::UnboundedSender<WidgetEvent>>,
}

impl PreviewWidget {
    fn emit(&self, event: WidgetEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn position(&self) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        (self.offset + running).min(self.length)
    }
}

impl PlayerWidget for PreviewWidget {
    fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.emit(WidgetEvent::StateChanged(WidgetState::Playing));
        }
    }

    fn pause(&mut self) {
        if self.started_at.is_some() {
            self.offset = self.position();
            self.started_at = None;
            self.emit(WidgetEvent::StateChanged(WidgetState::Paused));
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        self.offset = seconds.clamp(0.0, self.length);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level;
        debug!(level, "Preview volume");
    }

    fn cue_track(&mut self, track_id: &TrackId) {
        self.track_id = track_id.clone();
        self.offset = 0.0;
        self.started_at = None;
        self.emit(WidgetEvent::StateChanged(WidgetState::Cued));
    }

    fn current_position(&self) -> f64 {
        self.position()
    }

    fn duration(&self) -> f64 {
        self.length
    }

    fn destroy(&mut self) {
        debug!(track_id = %self.track_id, "Destroying preview widget");
        self.started_at = None;
        self.events = None;
    }
}
