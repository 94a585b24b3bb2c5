/// In-process store used by default and in tests.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{LeagueEntity, SeasonEntity, SeasonListItemEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for leagues and season documents.
///
/// A season is stored as one document; `replace_season` is a compare-and-swap
/// on its `version`, which is how a multi-entity mutation commits atomically.
/// Leagues follow the same rule through `replace_league`.
pub trait SeasonStore: Send + Sync {
    /// Store a brand new league; fails with `Duplicate` if the id exists.
    fn insert_league(&self, league: LeagueEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace a league if the stored version still equals `expected_version`.
    fn replace_league(
        &self,
        league: LeagueEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a league.
    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>>;
    /// Store a brand new season; fails with `Duplicate` if the id exists.
    fn insert_season(&self, season: SeasonEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace a season if the stored version still equals `expected_version`.
    fn replace_season(
        &self,
        season: SeasonEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a season document.
    fn find_season(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SeasonEntity>>>;
    /// Summaries of a league's seasons.
    fn list_seasons(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<SeasonListItemEntity>>>;
    /// Cheap liveness check.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Try to re-establish the backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
