/// MoodTune - mood-driven music discovery
use clap::{Parser, Subcommand};
use mood_bridge::{PlayerCommand, PlayerRuntime};
use mood_core::{format_time, Mood, MoodClassifier, Track, TrackId, TrackSearchProvider};
use mood_discovery::{GeminiMoodClassifier, YouTubeClient};
use mood_playback::{JsonFilePreferenceStore, PlayerSession, PlayerSnapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod preview;

use crate::config::AppConfig;
use crate::preview::PreviewWidgetFactory;

#[derive(Parser)]
#[command(name = "moodtune")]
#[command(about = "Find and play music that fits your mood", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MOODTUNE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for music
    Search {
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show trending music
    Trending {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List the mood catalog
    Moods,
    /// Find music for a catalog mood
    Mood {
        /// Mood name, e.g. "chill"
        mood: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Describe how you feel and get matching music
    Feel {
        /// How you feel, in your own words
        text: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Find music related to a track
    Related {
        /// Track (video) id
        track_id: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show details for a track
    Info {
        /// Track (video) id
        track_id: String,
    },
    /// Show or set the saved volume
    Volume {
        /// New level (clamped to 0-100)
        #[arg(allow_negative_numbers = true)]
        level: Option<i32>,
    },
    /// Preview-play search results as a queue
    Play {
        /// Free-text query, or a mood name with --mood
        query: String,
        /// Treat the query as a catalog mood
        #[arg(long)]
        mood: bool,
        /// Shuffle the results
        #[arg(long)]
        shuffle: bool,
        /// Replay the last track when the queue runs out
        #[arg(long)]
        repeat: bool,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodtune=info,mood_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Search { query, limit } => {
            let client = youtube(&config)?;
            print_tracks(&client.search(&query, limit).await);
        }
        Commands::Trending { limit } => {
            let client = youtube(&config)?;
            print_tracks(&client.trending(limit).await);
        }
        Commands::Moods => list_moods(),
        Commands::Mood { mood, limit } => {
            let client = youtube(&config)?;
            print_tracks(&client.by_mood(&mood, limit).await);
        }
        Commands::Feel { text, limit } => {
            feel(&config, &text, limit).await?;
        }
        Commands::Related { track_id, limit } => {
            let client = youtube(&config)?;
            print_tracks(&client.related_to(&TrackId::new(track_id), limit).await);
        }
        Commands::Info { track_id } => {
            info(&config, &TrackId::new(track_id)).await?;
        }
        Commands::Volume { level } => {
            volume(&config, level)?;
        }
        Commands::Play {
            query,
            mood,
            shuffle,
            repeat,
            limit,
        } => {
            let client = youtube(&config)?;
            let tracks = if mood {
                client.by_mood(&query, limit).await
            } else {
                client.search(&query, limit).await
            };
            play(&config, tracks, shuffle, repeat).await?;
        }
    }

    Ok(())
}

fn youtube(config: &AppConfig) -> anyhow::Result<YouTubeClient> {
    Ok(YouTubeClient::new(config.youtube_provider()?)?)
}

fn open_session(config: &AppConfig) -> anyhow::Result<PlayerSession> {
    let store = JsonFilePreferenceStore::open(config.preferences.path.clone())?;
    Ok(PlayerSession::new(config.playback.clone(), Arc::new(store)))
}

fn list_moods() {
    for mood in Mood::ALL {
        println!("{:<10} {:<10} {}", mood.as_str(), mood.title(), mood.description());
    }
}

async fn feel(config: &AppConfig, text: &str, limit: usize) -> anyhow::Result<()> {
    let classifier = GeminiMoodClassifier::new(config.gemini_provider()?)?;
    let mood = classifier.classify_mood(text).await?;
    println!("Mood: {} - {}", mood.title(), mood.description());
    println!();

    let client = youtube(config)?;
    print_tracks(&client.by_mood(mood.as_str(), limit).await);
    Ok(())
}

async fn info(config: &AppConfig, track_id: &TrackId) -> anyhow::Result<()> {
    let client = youtube(config)?;
    let Some(details) = client.try_video_details(track_id).await? else {
        anyhow::bail!("No track with id {}", track_id);
    };

    if let Some(track) = details.to_track() {
        println!("{}", track.title);
        println!("  by {}", track.author_name);
        if let Some(published_at) = track.published_at {
            println!("  published {}", published_at.format("%Y-%m-%d"));
        }
    }
    if let Some(seconds) = details.duration_secs() {
        println!("  length {}", format_time(seconds as f64));
    }
    if let Some(views) = details.view_count() {
        println!("  {} views", views);
    }
    Ok(())
}

fn volume(config: &AppConfig, level: Option<i32>) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    if let Some(level) = level {
        session.set_volume(level);
    }
    println!("Volume: {}", session.get_volume());
    Ok(())
}

async fn play(
    config: &AppConfig,
    tracks: Vec<Track>,
    shuffle: bool,
    repeat: bool,
) -> anyhow::Result<()> {
    if tracks.is_empty() {
        println!("Nothing to play.");
        return Ok(());
    }

    let mut session = open_session(config)?;
    if repeat {
        session.toggle_repeat();
    }

    let factory = Arc::new(PreviewWidgetFactory::new(config.player.preview_secs));
    let (runtime, handle) = PlayerRuntime::new(session, config.player.adapter_config(), factory);
    let task = runtime.spawn();

    let mut updates = handle.subscribe();
    handle
        .send(if shuffle {
            PlayerCommand::ShufflePlay(tracks)
        } else {
            PlayerCommand::PlayAll(tracks)
        })
        .await?;

    let mut now_playing: Option<TrackId> = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                report_progress(&snapshot, &mut now_playing);
                if is_finished(&snapshot) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    handle.shutdown().await?;
    task.await?;
    Ok(())
}

fn report_progress(snapshot: &PlayerSnapshot, now_playing: &mut Option<TrackId>) {
    let Some(track) = &snapshot.current_track else {
        return;
    };

    if now_playing.as_ref() != Some(&track.id) {
        *now_playing = Some(track.id.clone());
        println!(
            "Now playing: {} - {} ({} queued)",
            track.author_name,
            track.title,
            snapshot.queue.len()
        );
    }

    if snapshot.duration > 0.0 {
        tracing::debug!(
            position = %format_time(snapshot.position),
            duration = %format_time(snapshot.duration),
            "Progress"
        );
    }
}

/// Halted at the end of the last track
fn is_finished(snapshot: &PlayerSnapshot) -> bool {
    snapshot.current_track.is_some()
        && !snapshot.is_playing
        && snapshot.queue.is_empty()
        && snapshot.duration > 0.0
        && snapshot.position >= snapshot.duration
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("No results.");
        return;
    }

    for (index, track) in tracks.iter().enumerate() {
        println!(
            "{:>2}. {} - {} [{}]",
            index + 1,
            track.author_name,
            track.title,
            track.id
        );
    }
}
