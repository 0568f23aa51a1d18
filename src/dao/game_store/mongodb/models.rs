use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    BingoGameEntity, BingoItemEntity, BingoPatternEntity, BoardEntryEntity, CompletedItemEntity,
    ItemCategory,
};

/// Persisted shape of a player's game record, keyed by the user id.
///
/// Top-level timestamps are converted to BSON datetimes so they stay
/// queryable; nested completion/pattern entries are stored through their
/// serde representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    user_id: String,
    board: Vec<BoardEntryEntity>,
    completed_items: Vec<CompletedItemEntity>,
    bingos_achieved: Vec<BingoPatternEntity>,
    total_points: i64,
    is_completed: bool,
    game_started_at: DateTime,
    game_completed_at: Option<DateTime>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<BingoGameEntity> for MongoGameDocument {
    fn from(value: BingoGameEntity) -> Self {
        Self {
            user_id: value.user_id,
            board: value.board,
            completed_items: value.completed_items,
            bingos_achieved: value.bingos_achieved,
            total_points: value.total_points,
            is_completed: value.is_completed,
            game_started_at: DateTime::from_system_time(value.game_started_at),
            game_completed_at: value.game_completed_at.map(DateTime::from_system_time),
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoGameDocument> for BingoGameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            user_id: value.user_id,
            board: value.board,
            completed_items: value.completed_items,
            bingos_achieved: value.bingos_achieved,
            total_points: value.total_points,
            is_completed: value.is_completed,
            game_started_at: value.game_started_at.to_system_time(),
            game_completed_at: value.game_completed_at.map(|at| at.to_system_time()),
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

/// Persisted shape of a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoItemDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    text: String,
    category: ItemCategory,
    points: i64,
    is_active: bool,
    created_by: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<BingoItemEntity> for MongoItemDocument {
    fn from(value: BingoItemEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            points: value.points,
            is_active: value.is_active,
            created_by: value.created_by,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoItemDocument> for BingoItemEntity {
    fn from(value: MongoItemDocument) -> Self {
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            points: value.points,
            is_active: value.is_active,
            created_by: value.created_by,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

/// Filter selecting a catalog item document by id.
pub fn item_doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// Filter selecting a game document by owning user.
pub fn game_doc_id(user_id: &str) -> Document {
    doc! {"_id": user_id}
}
