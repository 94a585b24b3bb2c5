use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures of the MongoDB season store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
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
    #[error("failed to save league `{id}`")]
    SaveLeague {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load league `{id}`")]
    LoadLeague {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save season `{id}`")]
    SaveSeason {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load season `{id}`")]
    LoadSeason {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list seasons of league `{league_id}`")]
    ListSeasons {
        league_id: Uuid,
        #[source]
        source: MongoError,
    },
}
