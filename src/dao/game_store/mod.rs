pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{BingoGameEntity, BingoItemEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for game records and the item
/// catalog.
///
/// Game records are keyed uniquely by `user_id`; catalog items by their id.
pub trait GameStore: Send + Sync {
    /// Insert or replace a player's game record.
    fn save_game(&self, game: BingoGameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a player's game record, if one exists.
    fn find_game(&self, user_id: &str)
    -> BoxFuture<'static, StorageResult<Option<BingoGameEntity>>>;
    /// Load every player's game record (leaderboard, stats, board refresh).
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<BingoGameEntity>>>;
    /// Insert or replace a catalog item.
    fn save_item(&self, item: BingoItemEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a catalog item by id.
    fn find_item(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BingoItemEntity>>>;
    /// List catalog items; with `only_active` the soft-deactivated ones are
    /// filtered out.
    fn list_items(&self, only_active: bool)
    -> BoxFuture<'static, StorageResult<Vec<BingoItemEntity>>>;
    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a broken connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
