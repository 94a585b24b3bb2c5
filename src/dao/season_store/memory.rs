use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{LeagueEntity, SeasonEntity, SeasonListItemEntity},
    season_store::SeasonStore,
    storage::{StorageError, StorageResult},
};

/// [`SeasonStore`] kept in process memory.
#[derive(Clone, Default)]
pub struct MemorySeasonStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    leagues: DashMap<Uuid, LeagueEntity>,
    seasons: DashMap<Uuid, SeasonEntity>,
    offline: AtomicBool,
}

impl MemorySeasonStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage: every call fails with `Unavailable` until
    /// the store is brought back online.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "in-memory store is offline".into(),
                io::Error::new(io::ErrorKind::NotConnected, "offline"),
            ));
        }
        Ok(())
    }

    fn replace(&self, season: SeasonEntity, expected_version: u64) -> StorageResult<()> {
        self.ensure_online()?;
        let id = season.id;
        let mut stored = self
            .inner
            .seasons
            .get_mut(&id)
            .ok_or(StorageError::VersionConflict { id })?;
        if stored.version != expected_version {
            return Err(StorageError::VersionConflict { id });
        }
        *stored = season;
        Ok(())
    }

    fn insert(&self, season: SeasonEntity) -> StorageResult<()> {
        self.ensure_online()?;
        let id = season.id;
        match self.inner.seasons.entry(id) {
            Entry::Occupied(_) => Err(StorageError::Duplicate { id }),
            Entry::Vacant(slot) => {
                slot.insert(season);
                Ok(())
            }
        }
    }
}

impl SeasonStore for MemorySeasonStore {
    fn insert_league(&self, league: LeagueEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            let id = league.id;
            match store.inner.leagues.entry(id) {
                Entry::Occupied(_) => Err(StorageError::Duplicate { id }),
                Entry::Vacant(slot) => {
                    slot.insert(league);
                    Ok(())
                }
            }
        })
    }

    fn replace_league(
        &self,
        league: LeagueEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            let id = league.id;
            let mut stored = store
                .inner
                .leagues
                .get_mut(&id)
                .ok_or(StorageError::VersionConflict { id })?;
            if stored.version != expected_version {
                return Err(StorageError::VersionConflict { id });
            }
            *stored = league;
            Ok(())
        })
    }

    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.inner.leagues.get(&id).map(|league| league.clone()))
        })
    }

    fn insert_season(&self, season: SeasonEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert(season) })
    }

    fn replace_season(
        &self,
        season: SeasonEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.replace(season, expected_version) })
    }

    fn find_season(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SeasonEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.inner.seasons.get(&id).map(|season| season.clone()))
        })
    }

    fn list_seasons(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<SeasonListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            let mut seasons: Vec<(std::time::SystemTime, SeasonListItemEntity)> = store
                .inner
                .seasons
                .iter()
                .filter(|entry| entry.league_id == league_id)
                .map(|entry| (entry.created_at, SeasonListItemEntity::from(entry.value())))
                .collect();
            seasons.sort_by_key(|(created_at, _)| *created_at);
            Ok(seasons.into_iter().map(|(_, item)| item).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }
}
