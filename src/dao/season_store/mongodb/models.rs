use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{LeagueEntity, LeagueMemberEntity, SeasonEntity};

/// League as stored in the `leagues` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoLeagueDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    commissioner_id: Uuid,
    members: Vec<LeagueMemberEntity>,
    #[serde(default)]
    pub(super) version: i64,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<LeagueEntity> for MongoLeagueDocument {
    fn from(value: LeagueEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            commissioner_id: value.commissioner_id,
            members: value.members,
            version: value.version as i64,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoLeagueDocument> for LeagueEntity {
    fn from(value: MongoLeagueDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            commissioner_id: value.commissioner_id,
            members: value.members,
            version: value.version as u64,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

/// Season as stored in the `seasons` collection.
///
/// Indexed and compared fields live at the top level; the rest of the aggregate
/// is nested under `season`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSeasonDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    pub(super) league_id: Uuid,
    pub(super) version: i64,
    created_at: DateTime,
    updated_at: DateTime,
    season: SeasonEntity,
}

impl From<SeasonEntity> for MongoSeasonDocument {
    fn from(value: SeasonEntity) -> Self {
        Self {
            id: value.id,
            league_id: value.league_id,
            version: value.version as i64,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
            season: value,
        }
    }
}

impl From<MongoSeasonDocument> for SeasonEntity {
    fn from(value: MongoSeasonDocument) -> Self {
        let mut season = value.season;
        season.version = value.version as u64;
        season.created_at = value.created_at.to_system_time();
        season.updated_at = value.updated_at.to_system_time();
        season
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
