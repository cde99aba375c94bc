//! Fake widget shared by the adapter and runtime tests

#![allow(dead_code)]

use async_trait::async_trait;
use mood_bridge::{BridgeError, PlayerWidget, WidgetEvent, WidgetFactory};
use mood_core::TrackId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Calls received by the fake widget
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Seek(f64),
    Volume(u8),
    Cue(String),
    Destroy,
}

#[derive(Debug, Default)]
pub struct WidgetState {
    pub calls: Vec<Call>,
    pub position: f64,
    pub duration: f64,
}

struct FakeWidget {
    state: Arc<Mutex<WidgetState>>,
}

impl FakeWidget {
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl PlayerWidget for FakeWidget {
    fn play(&mut self) {
        self.record(Call::Play);
    }

    fn pause(&mut self) {
        self.record(Call::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        state.position = seconds;
        state.calls.push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, level: u8) {
        self.record(Call::Volume(level));
    }

    fn cue_track(&mut self, track_id: &TrackId) {
        self.record(Call::Cue(track_id.to_string()));
    }

    fn current_position(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> f64 {
        self.state.lock().unwrap().duration
    }

    fn destroy(&mut self) {
        self.record(Call::Destroy);
    }
}

/// Factory producing fake widgets, recording what it was asked for
#[derive(Default)]
pub struct FakeFactory {
    pub state: Arc<Mutex<WidgetState>>,
    /// (container, track, autoplay) per construction
    pub constructed: Mutex<Vec<(String, String, bool)>>,
    pub events: Mutex<Option<mpsc::UnboundedSender<WidgetEvent>>>,
    pub api_loads: AtomicUsize,
    pub api_delay: Mutex<Option<Duration>>,
    pub fail_construct: AtomicBool,
    pub fail_api: AtomicBool,
}

impl FakeFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Push an event as if the widget had sent it
    pub fn emit(&self, event: WidgetEvent) {
        let events = self.events.lock().unwrap();
        events
            .as_ref()
            .expect("widget not constructed")
            .send(event)
            .unwrap();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn set_position(&self, position: f64) {
        self.state.lock().unwrap().position = position;
    }

    pub fn set_duration(&self, duration: f64) {
        self.state.lock().unwrap().duration = duration;
    }

    pub fn constructions(&self) -> Vec<(String, String, bool)> {
        self.constructed.lock().unwrap().clone()
    }
}

#[async_trait]
impl WidgetFactory for FakeFactory {
    async fn load_api(&self) -> mood_bridge::Result<()> {
        self.api_loads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.api_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_api.load(Ordering::SeqCst) {
            return Err(BridgeError::ScriptLoad("network unreachable".into()));
        }
        Ok(())
    }

    fn construct(
        &self,
        container_id: &str,
        track_id: &TrackId,
        autoplay: bool,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> mood_bridge::Result<Box<dyn PlayerWidget>> {
        if self.fail_construct.load(Ordering::SeqCst) {
            return Err(BridgeError::WidgetConstruction("container missing".into()));
        }
        self.constructed.lock().unwrap().push((
            container_id.to_string(),
            track_id.to_string(),
            autoplay,
        ));
        *self.events.lock().unwrap() = Some(events);
        Ok(Box::new(FakeWidget {
            state: Arc::clone(&self.state),
        }))
    }
}
