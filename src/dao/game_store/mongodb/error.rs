use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Errors raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save game for user `{user_id}`")]
    SaveGame {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load game for user `{user_id}`")]
    LoadGame {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: MongoError,
    },
    #[error("failed to save catalog item `{id}`")]
    SaveItem {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load catalog item `{id}`")]
    LoadItem {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list catalog items")]
    ListItems {
        #[source]
        source: MongoError,
    },
}
