//! Widget commands and the pre-readiness buffer

use crate::widget::PlayerWidget;
use mood_core::TrackId;

/// A command the adapter can send to the widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(u8),
    Cue(TrackId),
}

impl WidgetCommand {
    /// Apply to a ready widget
    pub fn apply(&self, widget: &mut dyn PlayerWidget) {
        match self {
            WidgetCommand::Play => widget.play(),
            WidgetCommand::Pause => widget.pause(),
            WidgetCommand::Seek(seconds) => widget.seek_to(*seconds),
            WidgetCommand::SetVolume(level) => widget.set_volume(*level),
            WidgetCommand::Cue(track_id) => widget.cue_track(track_id),
        }
    }

    fn supersedes(&self, other: &WidgetCommand) -> bool {
        use WidgetCommand::{Cue, Pause, Play, Seek, SetVolume};
        match (self, other) {
            (Play | Pause, Play | Pause)
            | (Seek(_), Seek(_))
            | (SetVolume(_), SetVolume(_))
            | (Cue(_), Cue(_)) => true,
            // A seek into the previous track is meaningless after a cue
            (Cue(_), Seek(_)) => true,
            _ => false,
        }
    }
}

/// Commands issued before the widget reported ready
///
/// Only the latest command of each kind is kept. Flushing yields them in
/// the order they were last issued.
#[derive(Debug, Default)]
pub struct PendingCommands {
    commands: Vec<WidgetCommand>,
}

impl PendingCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a command, replacing any it supersedes
    pub fn push(&mut self, command: WidgetCommand) {
        self.commands.retain(|queued| !command.supersedes(queued));
        self.commands.push(command);
    }

    /// Take everything buffered, oldest first
    pub fn take(&mut self) -> Vec<WidgetCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
