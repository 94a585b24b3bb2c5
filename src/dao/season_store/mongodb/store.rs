use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::{LEAGUE_COLLECTION_NAME, SEASON_COLLECTION_NAME, open_season_database},
    error::{MongoDaoError, MongoResult},
    models::{MongoLeagueDocument, MongoSeasonDocument, doc_id, uuid_as_binary},
};
use crate::dao::{
    models::{LeagueEntity, SeasonEntity, SeasonListItemEntity},
    season_store::SeasonStore,
    storage::{StorageError, StorageResult},
};

/// [`SeasonStore`] backed by MongoDB.
#[derive(Clone)]
pub struct MongoSeasonStore {
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
        let (client, database) = open_season_database(&self.config).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        info!("MongoDB connection re-established");
        Ok(())
    }
}

impl MongoSeasonStore {
    /// Open the season database described by `config`.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open_season_database(&config).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn leagues(&self) -> Collection<MongoLeagueDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoLeagueDocument>(LEAGUE_COLLECTION_NAME)
    }

    async fn seasons(&self) -> Collection<MongoSeasonDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoSeasonDocument>(SEASON_COLLECTION_NAME)
    }

    async fn insert_league(&self, league: LeagueEntity) -> StorageResult<()> {
        let id = league.id;
        let collection = self.leagues().await;
        let existing = collection
            .count_documents(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadLeague { id, source })?;
        if existing > 0 {
            return Err(StorageError::Duplicate { id });
        }

        let document: MongoLeagueDocument = league.into();
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveLeague { id, source })?;
        Ok(())
    }

    async fn replace_league(&self, league: LeagueEntity, expected_version: u64) -> StorageResult<()> {
        let id = league.id;
        let document: MongoLeagueDocument = league.into();
        // Leagues written before versioning have no field; treat them as version 0.
        let version_filter = if expected_version == 0 {
            doc! {"$in": [0_i64, null]}
        } else {
            doc! {"$eq": expected_version as i64}
        };
        let result = self
            .leagues()
            .await
            .replace_one(
                doc! {"_id": uuid_as_binary(id), "version": version_filter},
                &document,
            )
            .await
            .map_err(|source| MongoDaoError::SaveLeague { id, source })?;

        if result.matched_count == 0 {
            return Err(StorageError::VersionConflict { id });
        }
        Ok(())
    }

    async fn find_league(&self, id: Uuid) -> MongoResult<Option<LeagueEntity>> {
        let document = self
            .leagues()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadLeague { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn insert_season(&self, season: SeasonEntity) -> StorageResult<()> {
        let id = season.id;
        let collection = self.seasons().await;
        let existing = collection
            .count_documents(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadSeason { id, source })?;
        if existing > 0 {
            return Err(StorageError::Duplicate { id });
        }

        let document: MongoSeasonDocument = season.into();
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveSeason { id, source })?;
        Ok(())
    }

    async fn replace_season(&self, season: SeasonEntity, expected_version: u64) -> StorageResult<()> {
        let id = season.id;
        let document: MongoSeasonDocument = season.into();
        let result = self
            .seasons()
            .await
            .replace_one(
                doc! {"_id": uuid_as_binary(id), "version": expected_version as i64},
                &document,
            )
            .await
            .map_err(|source| MongoDaoError::SaveSeason { id, source })?;

        if result.matched_count == 0 {
            return Err(StorageError::VersionConflict { id });
        }
        Ok(())
    }

    async fn find_season(&self, id: Uuid) -> MongoResult<Option<SeasonEntity>> {
        let document = self
            .seasons()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadSeason { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_seasons(&self, league_id: Uuid) -> MongoResult<Vec<SeasonListItemEntity>> {
        let documents: Vec<MongoSeasonDocument> = self
            .seasons()
            .await
            .find(doc! {"league_id": uuid_as_binary(league_id)})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListSeasons { league_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListSeasons { league_id, source })?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let season: SeasonEntity = document.into();
                SeasonListItemEntity::from(&season)
            })
            .collect())
    }
}

impl SeasonStore for MongoSeasonStore {
    fn insert_league(&self, league: LeagueEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_league(league).await })
    }

    fn replace_league(
        &self,
        league: LeagueEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.replace_league(league, expected_version).await })
    }

    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_league(id).await.map_err(Into::into) })
    }

    fn insert_season(&self, season: SeasonEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_season(season).await })
    }

    fn replace_season(
        &self,
        season: SeasonEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.replace_season(season, expected_version).await })
    }

    fn find_season(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SeasonEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_season(id).await.map_err(Into::into) })
    }

    fn list_seasons(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<SeasonListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_seasons(league_id).await.map_err(Into::into) })
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
