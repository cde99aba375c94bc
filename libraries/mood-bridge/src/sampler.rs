//! Periodic position sampling while the widget plays

use crate::widget::WidgetSlot;
use mood_core::TrackId;
use mood_playback::PlaybackFact;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Background task reporting the widget's live position
///
/// Cancelled on [`stop`](Self::stop) or drop. It also ends by itself when
/// the widget slot is emptied or nobody listens for facts any more.
#[derive(Debug)]
pub struct PositionSampler {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PositionSampler {
    /// Start sampling `widget` every `interval`, tagging ticks with `track_id`
    ///
    /// The first sample is taken one interval after the start.
    pub fn spawn(
        widget: WidgetSlot,
        track_id: TrackId,
        interval: Duration,
        facts: mpsc::UnboundedSender<PlaybackFact>,
    ) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(sample_loop(
            widget,
            track_id,
            interval,
            facts,
            token.clone(),
        ));
        Self { token, handle }
    }

    /// Stop sampling; no tick is reported after this returns
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PositionSampler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn sample_loop(
    widget: WidgetSlot,
    track_id: TrackId,
    period: Duration,
    facts: mpsc::UnboundedSender<PlaybackFact>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Interval fires immediately on the first tick
    ticker.tick().await;

    debug!(track_id = %track_id, "Position sampler started");

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Cancellation is checked under the slot lock, which dispose also
        // takes, so nothing is sent once dispose has returned.
        let sent = {
            let Ok(slot) = widget.lock() else {
                break;
            };
            if token.is_cancelled() {
                break;
            }
            let Some(live) = slot.as_ref() else {
                break;
            };

            let position = live.current_position();
            trace!(track_id = %track_id, position, "Position tick");

            facts.send(PlaybackFact::PositionTick {
                track_id: track_id.clone(),
                position,
            })
        };

        if sent.is_err() {
            break;
        }
    }

    debug!(track_id = %track_id, "Position sampler stopped");
}
