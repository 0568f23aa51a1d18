//! In-memory [`GameStore`] backend.
//!
//! Backs the service-level tests and keeps the whole mutation pipeline
//! exercisable without a database. Not suitable for multi-process
//! deployments; records live only as long as the process.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{BingoGameEntity, BingoItemEntity},
    storage::StorageResult,
};

/// Process-local store keeping games and catalog items in hash maps.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    games: HashMap<String, BingoGameEntity>,
    items: HashMap<Uuid, BingoItemEntity>,
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // panic here keeps tests loud instead of silently corrupt.
        self.inner.lock().expect("memory store lock poisoned")
    }
}

impl GameStore for MemoryGameStore {
    fn save_game(&self, game: BingoGameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.lock().games.insert(game.user_id.clone(), game);
            Ok(())
        })
    }

    fn find_game(
        &self,
        user_id: &str,
    ) -> BoxFuture<'static, StorageResult<Option<BingoGameEntity>>> {
        let store = self.clone();
        let user_id = user_id.to_owned();
        Box::pin(async move { Ok(store.lock().games.get(&user_id).cloned()) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<BingoGameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().games.values().cloned().collect()) })
    }

    fn save_item(&self, item: BingoItemEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.lock().items.insert(item.id, item);
            Ok(())
        })
    }

    fn find_item(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BingoItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.lock().items.get(&id).cloned()) })
    }

    fn list_items(
        &self,
        only_active: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<BingoItemEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .lock()
                .items
                .values()
                .filter(|item| !only_active || item.is_active)
                .cloned()
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
