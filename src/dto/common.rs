use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{AcquisitionKind, AdvantageEntity, ArtistRef, RosterEntryEntity},
    dto::validation::validate_not_blank,
    state::state_machine::{SeasonPhase, SeasonPosition},
};

/// Artist reference coming from the external music catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ArtistDto {
    /// Catalogue identifier.
    #[validate(custom(function = "validate_not_blank"))]
    pub id: String,
    /// Display name.
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

impl From<ArtistRef> for ArtistDto {
    fn from(value: ArtistRef) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<ArtistDto> for ArtistRef {
    fn from(value: ArtistDto) -> Self {
        Self {
            id: value.id.trim().to_owned(),
            name: value.name.trim().to_owned(),
        }
    }
}

/// Phase and week at which something happened.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PositionDto {
    pub week: u32,
    pub phase: SeasonPhase,
}

impl From<SeasonPosition> for PositionDto {
    fn from(value: SeasonPosition) -> Self {
        Self {
            week: value.week,
            phase: value.phase,
        }
    }
}

/// Artist on a roster.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterEntryDto {
    pub id: Uuid,
    pub season_player_id: Uuid,
    pub artist: ArtistDto,
    pub acquired_via: AcquisitionKind,
    pub acquired_at: PositionDto,
    pub active: bool,
}

impl From<&RosterEntryEntity> for RosterEntryDto {
    fn from(entry: &RosterEntryEntity) -> Self {
        Self {
            id: entry.id,
            season_player_id: entry.season_player_id,
            artist: entry.artist.clone().into(),
            acquired_via: entry.acquired_via,
            acquired_at: entry.acquired_at.into(),
            active: entry.is_active(),
        }
    }
}

/// Advantage held by a player.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvantageDto {
    pub id: Uuid,
    pub season_player_id: Uuid,
    pub kind: String,
    pub earned_at: PositionDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<PositionDto>,
}

impl From<&AdvantageEntity> for AdvantageDto {
    fn from(advantage: &AdvantageEntity) -> Self {
        Self {
            id: advantage.id,
            season_player_id: advantage.season_player_id,
            kind: advantage.kind.clone(),
            earned_at: advantage.earned_at.into(),
            used_at: advantage.used_at.map(Into::into),
        }
    }
}
