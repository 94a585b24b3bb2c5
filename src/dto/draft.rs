use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{DraftPickEntity, SeasonEntity},
    dto::{common::ArtistDto, validation::validate_not_blank},
    state::roster::{NextPick, next_pick},
};

/// Full, ordered list of season player ids defining the draft order.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DraftOrderRequest {
    #[validate(length(min = 1))]
    pub player_ids: Vec<Uuid>,
}

/// Artist picked by the player on the clock.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DraftPickRequest {
    #[validate(nested)]
    pub artist: ArtistDto,
}

/// Select a starting advantage from the catalogue.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SelectAdvantageRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub kind: String,
}

/// Slot of the draft order.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftSlotDto {
    pub season_player_id: Uuid,
    pub label_name: String,
    pub draft_position: Option<u32>,
}

/// Pick already made.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftPickDto {
    pub id: Uuid,
    pub season_player_id: Uuid,
    pub artist: ArtistDto,
    pub round: u32,
    pub overall_pick: u32,
}

impl From<&DraftPickEntity> for DraftPickDto {
    fn from(pick: &DraftPickEntity) -> Self {
        Self {
            id: pick.id,
            season_player_id: pick.season_player_id,
            artist: pick.artist.clone().into(),
            round: pick.round,
            overall_pick: pick.overall_pick,
        }
    }
}

/// Player on the clock.
#[derive(Debug, Serialize, ToSchema)]
pub struct NextPickDto {
    pub season_player_id: Uuid,
    pub round: u32,
    pub overall_pick: u32,
}

impl From<NextPick> for NextPickDto {
    fn from(next: NextPick) -> Self {
        Self {
            season_player_id: next.season_player_id,
            round: next.slot.round,
            overall_pick: next.slot.overall,
        }
    }
}

/// Draft order, picks so far and the player on the clock.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub order: Vec<DraftSlotDto>,
    pub picks: Vec<DraftPickDto>,
    /// Absent once every roster is full.
    pub next: Option<NextPickDto>,
}

impl From<&SeasonEntity> for DraftResponse {
    fn from(season: &SeasonEntity) -> Self {
        Self {
            order: season
                .players_in_draft_order()
                .into_iter()
                .map(|player| DraftSlotDto {
                    season_player_id: player.id,
                    label_name: player.label_name.clone(),
                    draft_position: player.draft_position,
                })
                .collect(),
            picks: season.draft_picks.iter().map(DraftPickDto::from).collect(),
            next: next_pick(season).map(Into::into),
        }
    }
}
