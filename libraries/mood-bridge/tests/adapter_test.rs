//! Widget adapter tests against a fake widget
//!
//! Timer behaviour runs on tokio's paused clock.

mod common;

use common::{Call, FakeFactory};
use mood_bridge::{
    AdapterConfig, AdapterEvent, LoadState, ScriptLoader, WidgetAdapter, WidgetEvent,
    WidgetState, CONSTRUCTION_FAILED_CODE,
};
use mood_core::{Track, TrackId};
use mood_playback::{PlaybackFact, PlayerIntent};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// ===== Helpers =====

struct Harness {
    adapter: WidgetAdapter,
    factory: Arc<FakeFactory>,
    facts: mpsc::UnboundedReceiver<PlaybackFact>,
}

fn harness() -> Harness {
    harness_with(FakeFactory::new(), Arc::new(ScriptLoader::new()))
}

fn harness_with(factory: Arc<FakeFactory>, loader: Arc<ScriptLoader>) -> Harness {
    let (facts_tx, facts) = mpsc::unbounded_channel();
    let adapter = WidgetAdapter::new(
        AdapterConfig::default(),
        factory.clone(),
        loader,
        facts_tx,
    );
    Harness {
        adapter,
        factory,
        facts,
    }
}

fn track_changed(id: &str) -> PlayerIntent {
    PlayerIntent::TrackChanged {
        track: Track::new(id, format!("Track {}", id), "Channel"),
        autoplay: true,
    }
}

impl Harness {
    /// Deliver one queued widget event (or the settle timer)
    async fn pump(&mut self) -> AdapterEvent {
        let event = self.adapter.next_event().await.unwrap();
        self.adapter.handle_event(event.clone());
        event
    }

    async fn emit(&mut self, event: WidgetEvent) {
        self.factory.emit(event);
        self.pump().await;
    }

    /// Start `id` and let the widget get built once the API is in
    async fn load(&mut self, id: &str) {
        self.adapter.handle_intent(track_changed(id));
        assert_eq!(self.pump().await, AdapterEvent::ApiReady);
    }

    /// Construct the widget for `id` and mark it ready
    async fn ready_widget(&mut self, id: &str) {
        self.load(id).await;
        self.emit(WidgetEvent::Ready).await;
        self.factory.clear_calls();
    }

    fn drain_facts(&mut self) -> Vec<PlaybackFact> {
        let mut facts = Vec::new();
        while let Ok(fact) = self.facts.try_recv() {
            facts.push(fact);
        }
        facts
    }
}

// ===== Construction & Loading =====

#[tokio::test(start_paused = true)]
async fn first_track_constructs_widget() {
    let mut h = harness();

    h.adapter.handle_intent(track_changed("a"));
    assert!(h.adapter.is_loading());
    assert!(!h.adapter.has_widget());

    assert_eq!(h.pump().await, AdapterEvent::ApiReady);

    assert!(!h.adapter.is_loading());
    assert!(h.adapter.has_widget());
    assert!(!h.adapter.is_ready());
    assert_eq!(
        h.factory.constructions(),
        vec![("youtube-player".to_string(), "a".to_string(), true)]
    );
    assert_eq!(h.factory.api_loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn later_tracks_are_cued_not_recreated() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.adapter.handle_intent(track_changed("b"));

    assert_eq!(h.factory.constructions().len(), 1);
    assert_eq!(h.factory.calls(), vec![Call::Cue("b".into())]);
    assert_eq!(h.adapter.loaded_track(), Some(&TrackId::new("b")));

    // Play follows once the cue settles
    assert_eq!(h.pump().await, AdapterEvent::SettleElapsed);
    assert_eq!(h.factory.calls(), vec![Call::Cue("b".into()), Call::Play]);
}

#[tokio::test(start_paused = true)]
async fn pause_during_settle_cancels_start() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.adapter.handle_intent(track_changed("b"));
    h.adapter.handle_intent(PlayerIntent::PlaybackChanged { playing: false });
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(h.factory.calls(), vec![Call::Cue("b".into())]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_adapters_load_api_once() {
    let factory = FakeFactory::new();
    *factory.api_delay.lock().unwrap() = Some(Duration::from_millis(300));
    let loader = Arc::new(ScriptLoader::new());

    let mut first = harness_with(factory.clone(), loader.clone());
    let mut second = harness_with(factory.clone(), loader.clone());

    first.adapter.handle_intent(track_changed("a"));
    second.adapter.handle_intent(track_changed("b"));
    assert_eq!(first.pump().await, AdapterEvent::ApiReady);
    assert_eq!(second.pump().await, AdapterEvent::ApiReady);

    assert_eq!(factory.api_loads.load(Ordering::SeqCst), 1);
    assert_eq!(factory.constructions().len(), 2);
    assert!(first.adapter.has_widget());
    assert!(second.adapter.has_widget());
}

#[tokio::test(start_paused = true)]
async fn track_changes_during_load_build_the_latest() {
    let mut h = harness();
    *h.factory.api_delay.lock().unwrap() = Some(Duration::from_millis(300));

    h.adapter.handle_intent(track_changed("a"));
    h.adapter.handle_intent(track_changed("b"));
    assert_eq!(h.pump().await, AdapterEvent::ApiReady);

    assert_eq!(h.factory.api_loads.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.factory.constructions(),
        vec![("youtube-player".to_string(), "b".to_string(), true)]
    );
}

#[tokio::test(start_paused = true)]
async fn construction_failure_reports_failed_fact() {
    let mut h = harness();
    h.factory.fail_construct.store(true, Ordering::SeqCst);

    h.adapter.handle_intent(track_changed("a"));
    assert_eq!(h.pump().await, AdapterEvent::ApiReady);

    assert!(!h.adapter.has_widget());
    assert_eq!(
        h.drain_facts(),
        vec![PlaybackFact::Failed {
            track_id: TrackId::new("a"),
            code: CONSTRUCTION_FAILED_CODE,
        }]
    );

    // Next track retries construction
    h.factory.fail_construct.store(false, Ordering::SeqCst);
    h.load("b").await;
    assert!(h.adapter.has_widget());
}

#[tokio::test(start_paused = true)]
async fn api_failure_is_retried_on_next_track() {
    let mut h = harness();
    h.factory.fail_api.store(true, Ordering::SeqCst);

    h.adapter.handle_intent(track_changed("a"));
    assert!(matches!(h.pump().await, AdapterEvent::ApiFailed(_)));
    assert!(matches!(
        h.drain_facts().as_slice(),
        [PlaybackFact::Failed { code, .. }] if *code == CONSTRUCTION_FAILED_CODE
    ));

    h.factory.fail_api.store(false, Ordering::SeqCst);
    h.load("b").await;
    assert!(h.adapter.has_widget());
    assert_eq!(h.factory.api_loads.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_api_load_times_out_as_failure() {
    let factory = FakeFactory::new();
    *factory.api_delay.lock().unwrap() = Some(Duration::from_secs(3600));
    let loader = Arc::new(ScriptLoader::new());
    let mut h = harness_with(factory, loader.clone());
    let started = tokio::time::Instant::now();

    h.adapter.handle_intent(track_changed("a"));

    match h.pump().await {
        AdapterEvent::ApiFailed(reason) => assert!(reason.contains("did not load")),
        other => panic!("Expected ApiFailed, got {:?}", other),
    }
    let timeout = AdapterConfig::default().load_timeout;
    assert!(started.elapsed() >= timeout);
    assert!(started.elapsed() < timeout + Duration::from_secs(1));
    assert!(!h.adapter.has_widget());
    assert!(!h.adapter.is_loading());
    assert_eq!(
        h.drain_facts(),
        vec![PlaybackFact::Failed {
            track_id: TrackId::new("a"),
            code: CONSTRUCTION_FAILED_CODE,
        }]
    );

    // The abandoned load leaves the loader free for a retry
    assert_eq!(loader.state(), LoadState::Unloaded);
}

#[tokio::test(start_paused = true)]
async fn dispose_during_load_builds_nothing() {
    let factory = FakeFactory::new();
    *factory.api_delay.lock().unwrap() = Some(Duration::from_secs(5));
    let loader = Arc::new(ScriptLoader::new());
    let mut h = harness_with(factory, loader.clone());

    h.adapter.handle_intent(track_changed("a"));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(loader.state(), LoadState::Loading);

    h.adapter.dispose();
    assert!(!h.adapter.is_loading());
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(h.factory.constructions().is_empty());
    assert!(h.drain_facts().is_empty());
    assert_eq!(loader.state(), LoadState::Unloaded);
}

// ===== Readiness Gating =====

#[tokio::test(start_paused = true)]
async fn commands_wait_for_ready() {
    let mut h = harness();
    h.load("a").await;

    h.adapter.handle_intent(PlayerIntent::VolumeChanged { level: 40 });
    h.adapter.handle_intent(PlayerIntent::PlaybackChanged { playing: false });
    h.adapter.handle_intent(PlayerIntent::PositionSet { position: 10.0 });
    h.adapter.handle_intent(PlayerIntent::VolumeChanged { level: 45 });

    assert!(h.factory.calls().is_empty());
    assert_eq!(h.adapter.pending_commands(), 3);

    h.emit(WidgetEvent::Ready).await;

    assert_eq!(
        h.factory.calls(),
        vec![Call::Pause, Call::Seek(10.0), Call::Volume(45)]
    );
    assert_eq!(h.adapter.pending_commands(), 0);
}

#[tokio::test(start_paused = true)]
async fn commands_during_api_load_are_kept() {
    let mut h = harness();
    *h.factory.api_delay.lock().unwrap() = Some(Duration::from_millis(300));

    h.adapter.handle_intent(track_changed("a"));
    h.adapter.handle_intent(PlayerIntent::PlaybackChanged { playing: false });
    h.adapter.handle_intent(PlayerIntent::PositionSet { position: 10.0 });
    h.adapter.handle_intent(PlayerIntent::VolumeChanged { level: 45 });
    assert_eq!(h.adapter.pending_commands(), 2);

    assert_eq!(h.pump().await, AdapterEvent::ApiReady);
    // Built paused instead of paused after the fact
    assert_eq!(
        h.factory.constructions(),
        vec![("youtube-player".to_string(), "a".to_string(), false)]
    );

    h.emit(WidgetEvent::Ready).await;
    assert_eq!(h.factory.calls(), vec![Call::Seek(10.0), Call::Volume(45)]);
}

#[tokio::test(start_paused = true)]
async fn volume_before_first_track_reaches_widget() {
    let mut h = harness();
    h.adapter.handle_intent(PlayerIntent::VolumeChanged { level: 33 });

    h.load("a").await;
    h.emit(WidgetEvent::Ready).await;

    assert_eq!(h.factory.calls(), vec![Call::Volume(33)]);
}

#[tokio::test(start_paused = true)]
async fn ready_reports_known_duration() {
    let mut h = harness();
    h.factory.set_duration(212.0);
    h.load("a").await;

    h.emit(WidgetEvent::Ready).await;

    assert_eq!(
        h.drain_facts(),
        vec![PlaybackFact::DurationKnown {
            track_id: TrackId::new("a"),
            duration: 212.0,
        }]
    );
}

// ===== Play State Mirroring =====

#[tokio::test(start_paused = true)]
async fn play_pause_only_on_transitions() {
    let mut h = harness();
    h.ready_widget("a").await;

    for playing in [true, false, false, true, true] {
        h.adapter.handle_intent(PlayerIntent::PlaybackChanged { playing });
    }

    assert_eq!(h.factory.calls(), vec![Call::Pause, Call::Play]);
}

// ===== Seek Reconciliation =====

#[tokio::test(start_paused = true)]
async fn seek_only_beyond_tolerance() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.factory.set_position(50.0);

    h.adapter.handle_intent(PlayerIntent::PositionSet { position: 51.5 });
    assert!(h.factory.calls().is_empty());

    h.adapter.handle_intent(PlayerIntent::PositionSet { position: 53.0 });
    assert_eq!(h.factory.calls(), vec![Call::Seek(53.0)]);
}

#[tokio::test(start_paused = true)]
async fn seek_after_end_restarts_playback() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.factory.set_position(180.0);
    h.emit(WidgetEvent::StateChanged(WidgetState::Ended)).await;
    h.factory.clear_calls();

    // Repeat: session rewinds without toggling its playing flag
    h.adapter.handle_intent(PlayerIntent::PositionSet { position: 0.0 });

    assert_eq!(h.factory.calls(), vec![Call::Seek(0.0), Call::Play]);
}

// ===== Widget Events =====

#[tokio::test(start_paused = true)]
async fn ended_and_error_become_facts() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.emit(WidgetEvent::StateChanged(WidgetState::Ended)).await;
    h.emit(WidgetEvent::Error { code: 150 }).await;

    assert_eq!(
        h.drain_facts(),
        vec![
            PlaybackFact::Ended {
                track_id: TrackId::new("a")
            },
            PlaybackFact::Failed {
                track_id: TrackId::new("a"),
                code: 150
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn end_and_error_from_before_a_cue_are_dropped() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.adapter.handle_intent(track_changed("b"));

    // Queued by the widget while it still held "a"
    h.emit(WidgetEvent::StateChanged(WidgetState::Ended)).await;
    h.emit(WidgetEvent::Error { code: 150 }).await;
    assert!(h.drain_facts().is_empty());

    h.emit(WidgetEvent::StateChanged(WidgetState::Cued)).await;
    h.emit(WidgetEvent::Error { code: 150 }).await;

    assert_eq!(
        h.drain_facts(),
        vec![PlaybackFact::Failed {
            track_id: TrackId::new("b"),
            code: 150
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn cued_track_that_plays_reports_its_end() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.adapter.handle_intent(track_changed("b"));
    h.emit(WidgetEvent::StateChanged(WidgetState::Playing)).await;
    h.emit(WidgetEvent::StateChanged(WidgetState::Ended)).await;

    let ended: Vec<_> = h
        .drain_facts()
        .into_iter()
        .filter(|f| matches!(f, PlaybackFact::Ended { .. }))
        .collect();
    assert_eq!(
        ended,
        vec![PlaybackFact::Ended {
            track_id: TrackId::new("b")
        }]
    );
}

// ===== Position Sampling =====

#[tokio::test(start_paused = true)]
async fn samples_position_while_playing() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.factory.set_position(12.0);

    h.emit(WidgetEvent::StateChanged(WidgetState::Playing)).await;
    assert!(h.adapter.is_sampling());

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let ticks: Vec<_> = h
        .drain_facts()
        .into_iter()
        .filter(|f| matches!(f, PlaybackFact::PositionTick { .. }))
        .collect();
    assert_eq!(ticks.len(), 2);
    assert_eq!(
        ticks[0],
        PlaybackFact::PositionTick {
            track_id: TrackId::new("a"),
            position: 12.0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn pause_stops_sampling() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.emit(WidgetEvent::StateChanged(WidgetState::Playing)).await;

    h.emit(WidgetEvent::StateChanged(WidgetState::Paused)).await;
    assert!(!h.adapter.is_sampling());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.drain_facts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn track_change_stops_sampling() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.emit(WidgetEvent::StateChanged(WidgetState::Playing)).await;

    h.adapter.handle_intent(track_changed("b"));

    assert!(!h.adapter.is_sampling());
}

// ===== Teardown =====

#[tokio::test(start_paused = true)]
async fn no_facts_after_dispose() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.emit(WidgetEvent::StateChanged(WidgetState::Playing)).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    h.adapter.dispose();
    h.drain_facts();

    tokio::time::sleep(Duration::from_secs(10)).await;
    h.adapter
        .handle_widget_event(WidgetEvent::StateChanged(WidgetState::Ended));

    assert!(h.drain_facts().is_empty());
    assert!(h.adapter.is_disposed());
    assert!(!h.adapter.has_widget());
}

#[tokio::test(start_paused = true)]
async fn dispose_is_idempotent() {
    let mut h = harness();
    h.ready_widget("a").await;

    h.adapter.dispose();
    h.adapter.dispose();

    assert_eq!(h.factory.calls(), vec![Call::Destroy]);
}

#[tokio::test(start_paused = true)]
async fn intents_after_dispose_are_ignored() {
    let mut h = harness();
    h.ready_widget("a").await;
    h.adapter.dispose();
    h.factory.clear_calls();

    h.adapter.handle_intent(track_changed("b"));
    h.adapter.handle_intent(PlayerIntent::PlaybackChanged { playing: false });

    assert!(h.factory.calls().is_empty());
    assert_eq!(h.factory.constructions().len(), 1);
}
