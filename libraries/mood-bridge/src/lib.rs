//! MoodTune - Player Widget Bridge
//!
//! Connects a [`PlayerSession`](mood_playback::PlayerSession) to an embedded,
//! externally supplied player widget.
//!
//! This crate provides:
//! - One-shot loading of the widget API shared by every caller
//! - Command buffering until the widget reports ready
//! - Cue-instead-of-recreate on track change
//! - Position sampling while playing, with seek reconciliation
//! - A single-task runtime with a cloneable command handle
//!
//! # Example
//!
//! ```rust,no_run
//! use mood_bridge::{
//!     AdapterConfig, PlayerRuntime, PlayerWidget, WidgetEvent, WidgetFactory,
//! };
//! use mood_core::{Track, TrackId};
//! use mood_playback::PlayerSession;
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! struct Headless;
//!
//! impl PlayerWidget for Headless {
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek_to(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _level: u8) {}
//!     fn cue_track(&mut self, _track_id: &TrackId) {}
//!     fn current_position(&self) -> f64 { 0.0 }
//!     fn duration(&self) -> f64 { 0.0 }
//!     fn destroy(&mut self) {}
//! }
//!
//! struct HeadlessFactory;
//!
//! impl WidgetFactory for HeadlessFactory {
//!     fn construct(
//!         &self,
//!         _container_id: &str,
//!         _track_id: &TrackId,
//!         _autoplay: bool,
//!         events: mpsc::UnboundedSender<WidgetEvent>,
//!     ) -> mood_bridge::Result<Box<dyn PlayerWidget>> {
//!         let _ = events.send(WidgetEvent::Ready);
//!         Ok(Box::new(Headless))
//!     }
//! }
//!
//! # async fn demo() -> mood_bridge::Result<()> {
//! let (runtime, handle) = PlayerRuntime::new(
//!     PlayerSession::default(),
//!     AdapterConfig::default(),
//!     Arc::new(HeadlessFactory),
//! );
//! let task = runtime.spawn();
//!
//! handle.play_track(Track::new("dQw4w9WgXcQ", "Song", "Channel")).await?;
//! handle.shutdown().await?;
//! let _ = task.await;
//! # Ok(())
//! # }
//! ```

mod adapter;
mod commands;
mod config;
mod error;
mod loader;
mod runtime;
mod sampler;
mod widget;

// Public exports
pub use adapter::{AdapterEvent, WidgetAdapter};
pub use commands::{PendingCommands, WidgetCommand};
pub use config::AdapterConfig;
pub use error::{BridgeError, Result};
pub use loader::{LoadState, ScriptLoader};
pub use runtime::{PlayerCommand, PlayerHandle, PlayerRuntime};
pub use sampler::PositionSampler;
pub use widget::{
    PlayerWidget, WidgetEvent, WidgetFactory, WidgetSlot, WidgetState, CONSTRUCTION_FAILED_CODE,
};
