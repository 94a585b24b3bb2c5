use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{PoolEntryEntity, PoolEntryReason, SeasonEntity},
    dto::common::ArtistDto,
    state::pool::{self, PoolCategory},
};

/// Artist listed in the pool.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolEntryDto {
    pub id: Uuid,
    pub artist: ArtistDto,
    pub entered_pool_week: u32,
    pub entered_via: PoolEntryReason,
    pub cut_by_player: Option<Uuid>,
    pub cut_from_player: Option<Uuid>,
    /// Not yet picked by anyone.
    pub available: bool,
    /// OLD/NEW partition, only present during a chaos week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PoolCategory>,
}

impl PoolEntryDto {
    /// Describe an entry relative to the season's current week.
    pub fn build(season: &SeasonEntity, entry: &PoolEntryEntity) -> Self {
        Self {
            id: entry.id,
            artist: entry.artist.clone().into(),
            entered_pool_week: entry.entered_pool_week,
            entered_via: entry.entered_via,
            cut_by_player: entry.cut_by_player,
            cut_from_player: entry.cut_from_player,
            available: entry.is_available(),
            category: pool::category(season, entry),
        }
    }
}

/// Listed pool entries of a season.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolResponse {
    pub week: u32,
    pub is_chaos_week: bool,
    pub entries: Vec<PoolEntryDto>,
}

impl From<&SeasonEntity> for PoolResponse {
    fn from(season: &SeasonEntity) -> Self {
        Self {
            week: season.current_week,
            is_chaos_week: season.is_chaos_week(season.current_week),
            entries: pool::listed_entries(season)
                .map(|entry| PoolEntryDto::build(season, entry))
                .collect(),
        }
    }
}
