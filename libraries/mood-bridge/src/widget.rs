//! Embedded player widget seam
//!
//! The widget is opaque: it is created by a [`WidgetFactory`], driven
//! through [`PlayerWidget`], and reports back asynchronously by sending
//! [`WidgetEvent`]s on the channel handed to it at construction.

use crate::error::Result;
use async_trait::async_trait;
use mood_core::TrackId;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Error code reported when the widget could not be created at all
pub const CONSTRUCTION_FAILED_CODE: i32 = -1;

/// Widget playback states, as reported by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl WidgetState {
    /// Map the widget's numeric state code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

/// Events pushed by a widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Widget finished initializing and accepts commands
    Ready,

    /// Playback state changed
    StateChanged(WidgetState),

    /// Track cannot be played
    Error { code: i32 },
}

/// A live player widget
pub trait PlayerWidget: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to an absolute position in seconds
    fn seek_to(&mut self, seconds: f64);

    /// Volume 0-100
    fn set_volume(&mut self, level: u8);

    /// Load a different track into this instance
    fn cue_track(&mut self, track_id: &TrackId);

    /// Live position in seconds
    fn current_position(&self) -> f64;

    /// Duration in seconds, 0 while unknown
    fn duration(&self) -> f64;

    /// Release the widget; no events may follow
    fn destroy(&mut self);
}

/// Builds widgets, and loads whatever API they depend on
#[async_trait]
pub trait WidgetFactory: Send + Sync {
    /// Load the widget API
    ///
    /// Called at most once per process through
    /// [`ScriptLoader`](crate::ScriptLoader), unless it fails.
    async fn load_api(&self) -> Result<()> {
        Ok(())
    }

    /// Create a widget inside `container_id` playing `track_id`
    fn construct(
        &self,
        container_id: &str,
        track_id: &TrackId,
        autoplay: bool,
        events: mpsc::UnboundedSender<WidgetEvent>,
    ) -> Result<Box<dyn PlayerWidget>>;
}

/// Widget shared between the adapter and its position sampler
///
/// `None` once the widget has been destroyed.
pub type WidgetSlot = Arc<Mutex<Option<Box<dyn PlayerWidget>>>>;
