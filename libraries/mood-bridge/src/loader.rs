//! One-shot loading of the widget API
//!
//! Many adapters may ask for the API at once; exactly one of them performs
//! the load and everyone else waits for its outcome.

use crate::error::{BridgeError, Result};
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tracing::{debug, warn};

static GLOBAL: OnceLock<Arc<ScriptLoader>> = OnceLock::new();

/// Lifecycle of the widget API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    /// Last attempt failed; the next caller retries
    Failed(String),
}

/// Coordinates loading the widget API
#[derive(Debug)]
pub struct ScriptLoader {
    state: watch::Sender<LoadState>,
}

impl ScriptLoader {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LoadState::Unloaded);
        Self { state }
    }

    /// Process-wide loader
    pub fn global() -> Arc<ScriptLoader> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ScriptLoader::new())))
    }

    /// Current state
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Make sure the API is loaded, running `load` only if nobody else is
    ///
    /// Returns once the API is ready, or with the error of the attempt this
    /// call ended up waiting on. If the loading caller is cancelled, waiters
    /// race to take over.
    pub async fn ensure_loaded<F, Fut>(&self, load: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut load = Some(load);

        loop {
            let mut rx = self.state.subscribe();

            let mut claimed = false;
            self.state.send_if_modified(|state| match state {
                LoadState::Unloaded | LoadState::Failed(_) => {
                    *state = LoadState::Loading;
                    claimed = true;
                    true
                }
                LoadState::Loading | LoadState::Ready => false,
            });

            if claimed {
                if let Some(load) = load.take() {
                    return self.run_load(load).await;
                }
            }

            let settled = {
                let state = rx
                    .wait_for(|s| *s != LoadState::Loading)
                    .await
                    .map_err(|_| BridgeError::ScriptLoad("loader dropped".to_string()))?;
                state.clone()
            };

            match settled {
                LoadState::Ready => return Ok(()),
                LoadState::Failed(reason) => return Err(BridgeError::ScriptLoad(reason)),
                // Loader was cancelled mid-flight
                LoadState::Unloaded | LoadState::Loading => continue,
            }
        }
    }

    async fn run_load<F, Fut>(&self, load: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        debug!("Loading player API");
        let mut guard = LoadGuard {
            state: &self.state,
            armed: true,
        };

        let result = load().await;
        guard.armed = false;

        match &result {
            Ok(()) => {
                debug!("Player API ready");
                self.state.send_replace(LoadState::Ready);
            }
            Err(e) => {
                warn!(error = %e, "Player API failed to load");
                self.state.send_replace(LoadState::Failed(e.to_string()));
            }
        }
        result
    }
}

impl Default for ScriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets an abandoned load so a waiter can take over
struct LoadGuard<'a> {
    state: &'a watch::Sender<LoadState>,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_replace(LoadState::Unloaded);
        }
    }
}
