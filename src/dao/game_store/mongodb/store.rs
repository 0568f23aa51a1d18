use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    connection::{MongoConfig, establish_connection},
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, MongoItemDocument, game_doc_id, item_doc_id},
};
use crate::dao::{
    game_store::GameStore,
    models::{BingoGameEntity, BingoItemEntity},
    storage::StorageResult,
};

const GAME_COLLECTION_NAME: &str = "bingo_games";
const ITEM_COLLECTION_NAME: &str = "bingo_items";

/// MongoDB-backed store for game records and the item catalog.
#[derive(Clone)]
pub struct MongoBingoStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoBingoStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // Active-flag index keeps the board-generation catalog query cheap.
        let item_collection = database.collection::<MongoItemDocument>(ITEM_COLLECTION_NAME);
        let item_index = mongodb::IndexModel::builder()
            .keys(doc! {"is_active": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("item_active_idx".to_owned()))
                    .build(),
            )
            .build();

        item_collection
            .create_index(item_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ITEM_COLLECTION_NAME,
                index: "is_active",
                source,
            })?;

        // Leaderboard sorts on points; games are keyed by user id (_id).
        let game_collection = database.collection::<MongoGameDocument>(GAME_COLLECTION_NAME);
        let game_index = mongodb::IndexModel::builder()
            .keys(doc! {"total_points": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_points_idx".to_owned()))
                    .build(),
            )
            .build();

        game_collection
            .create_index(game_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "total_points",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn game_collection(&self) -> Collection<MongoGameDocument> {
        self.database()
            .await
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn item_collection(&self) -> Collection<MongoItemDocument> {
        self.database()
            .await
            .collection::<MongoItemDocument>(ITEM_COLLECTION_NAME)
    }

    async fn save_game(&self, game: BingoGameEntity) -> MongoResult<()> {
        let user_id = game.user_id.clone();
        let document: MongoGameDocument = game.into();
        let collection = self.game_collection().await;
        collection
            .replace_one(game_doc_id(&user_id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveGame { user_id, source })?;

        Ok(())
    }

    async fn find_game(&self, user_id: String) -> MongoResult<Option<BingoGameEntity>> {
        let collection = self.game_collection().await;

        let document = collection
            .find_one(game_doc_id(&user_id))
            .await
            .map_err(|source| MongoDaoError::LoadGame { user_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_games(&self) -> MongoResult<Vec<BingoGameEntity>> {
        let collection = self.game_collection().await;

        let documents: Vec<MongoGameDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_item(&self, item: BingoItemEntity) -> MongoResult<()> {
        let id = item.id;
        let document: MongoItemDocument = item.into();
        let collection = self.item_collection().await;
        collection
            .replace_one(item_doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveItem { id, source })?;

        Ok(())
    }

    async fn find_item(&self, id: Uuid) -> MongoResult<Option<BingoItemEntity>> {
        let collection = self.item_collection().await;

        let document = collection
            .find_one(item_doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadItem { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_items(&self, only_active: bool) -> MongoResult<Vec<BingoItemEntity>> {
        let collection = self.item_collection().await;
        let filter = if only_active {
            doc! {"is_active": true}
        } else {
            doc! {}
        };

        let documents: Vec<MongoItemDocument> = collection
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::ListItems { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListItems { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl GameStore for MongoBingoStore {
    fn save_game(&self, game: BingoGameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game(game).await.map_err(Into::into) })
    }

    fn find_game(
        &self,
        user_id: &str,
    ) -> BoxFuture<'static, StorageResult<Option<BingoGameEntity>>> {
        let store = self.clone();
        let user_id = user_id.to_owned();
        Box::pin(async move { store.find_game(user_id).await.map_err(Into::into) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<BingoGameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn save_item(&self, item: BingoItemEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_item(item).await.map_err(Into::into) })
    }

    fn find_item(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BingoItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_item(id).await.map_err(Into::into) })
    }

    fn list_items(
        &self,
        only_active: bool,
    ) -> BoxFuture<'static, StorageResult<Vec<BingoItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_items(only_active).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
