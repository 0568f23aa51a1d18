//! Shared application state: storage slot, event hub, per-user locks.

mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    error::ServiceError,
    services::profile_service::{NullProfileLookup, ProfileLookup},
};

pub use self::sse::SseHub;

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Default broadcast capacity of the live event hub.
const SSE_CAPACITY: usize = 64;

/// Central application state owned by the composition root.
///
/// Holds the installable storage backend (absent while degraded), the live
/// event hub, the per-player lock registry that serializes every mutating
/// operation on a game record, and the immutable runtime configuration.
pub struct AppState {
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    sse: SseHub,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
    profile_lookup: RwLock<Arc<dyn ProfileLookup>>,
    config: AppConfig,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            game_store: RwLock::new(None),
            sse: SseHub::new(SSE_CAPACITY),
            user_locks: DashMap::new(),
            profile_lookup: RwLock::new(Arc::new(NullProfileLookup)),
            config,
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the game store or fail with the degraded-mode service error.
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn install_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub used for the live game event stream.
    pub fn game_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The lock serializing all mutations of one player's game record.
    ///
    /// Every mutating operation (toggle, easy-complete, reset, and each
    /// per-player step of the admin board refresh) must hold this for its
    /// whole read-modify-write. Locks are created on first use and kept for
    /// the process lifetime; the per-entry cost is a single `Arc`.
    pub fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_owned())
            .or_default()
            .clone()
    }

    /// Current external profile lookup client.
    pub async fn profile_lookup(&self) -> Arc<dyn ProfileLookup> {
        let guard = self.profile_lookup.read().await;
        guard.clone()
    }

    /// Install the external profile lookup client.
    pub async fn install_profile_lookup(&self, lookup: Arc<dyn ProfileLookup>) {
        let mut guard = self.profile_lookup.write().await;
        *guard = lookup;
    }
}
