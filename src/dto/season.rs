use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{
        GameEventEntity, GameEventKind, SeasonEntity, SeasonListItemEntity, SeasonPlayerEntity,
    },
    dto::{
        common::{AdvantageDto, PositionDto, RosterEntryDto},
        format_system_time,
        validation::validate_not_blank,
    },
    state::state_machine::{SeasonPhase, SeasonState, SeasonStatus},
};

/// Payload used to open a new season inside a league.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSeasonRequest {
    pub name: String,
    /// Artists per roster, also the number of draft rounds.
    pub roster_size: u32,
    /// Number of weekly challenges.
    pub challenge_count: u32,
    /// Week running chaos redraft rules. Falls back to the configured default
    /// when omitted.
    #[serde(default)]
    pub chaos_week: Option<u32>,
}

impl Validate for CreateSeasonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_not_blank(&self.name) {
            errors.add("name", e);
        }
        if !(1..=20).contains(&self.roster_size) {
            errors.add("roster_size", range_error("roster size must be between 1 and 20"));
        }
        if !(1..=52).contains(&self.challenge_count) {
            errors.add(
                "challenge_count",
                range_error("challenge count must be between 1 and 52"),
            );
        }
        if let Some(week) = self.chaos_week {
            if week == 0 || week >= self.challenge_count {
                errors.add(
                    "chaos_week",
                    range_error("chaos week must be a roster-evolution week"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn range_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

/// Join a season with a record label.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinSeasonRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 60))]
    pub label_name: String,
}

/// Season entry of a league listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonListItem {
    pub id: Uuid,
    pub name: String,
    pub phase: SeasonPhase,
    pub week: u32,
    pub status: SeasonStatus,
}

impl From<SeasonListItemEntity> for SeasonListItem {
    fn from(value: SeasonListItemEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            phase: value.current_phase,
            week: value.current_week,
            status: value.status,
        }
    }
}

/// Participant with roster and advantages.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonPlayerDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label_name: String,
    pub draft_position: Option<u32>,
    pub total_points: i32,
    pub rank: u32,
    pub roster: Vec<RosterEntryDto>,
    pub advantages: Vec<AdvantageDto>,
}

impl SeasonPlayerDto {
    fn build(season: &SeasonEntity, player: &SeasonPlayerEntity) -> Self {
        Self {
            id: player.id,
            user_id: player.user_id,
            label_name: player.label_name.clone(),
            draft_position: player.draft_position,
            total_points: player.total_points,
            rank: player.rank,
            roster: season
                .active_roster(player.id)
                .map(RosterEntryDto::from)
                .collect(),
            advantages: season
                .advantages
                .iter()
                .filter(|advantage| advantage.season_player_id == player.id)
                .map(AdvantageDto::from)
                .collect(),
        }
    }
}

/// Entry of the season log.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonEventDto {
    pub at: PositionDto,
    pub kind: GameEventKind,
    pub season_player_id: Option<Uuid>,
    pub description: String,
}

impl From<&GameEventEntity> for SeasonEventDto {
    fn from(event: &GameEventEntity) -> Self {
        Self {
            at: event.at.into(),
            kind: event.kind,
            season_player_id: event.season_player_id,
            description: event.description.clone(),
        }
    }
}

/// Full season view.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonResponse {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub phase: SeasonPhase,
    pub week: u32,
    pub status: SeasonStatus,
    pub version: u64,
    pub roster_size: u32,
    pub challenge_count: u32,
    pub chaos_weeks: Vec<u32>,
    /// Players sorted by draft position.
    pub players: Vec<SeasonPlayerDto>,
    pub events: Vec<SeasonEventDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&SeasonEntity> for SeasonResponse {
    fn from(season: &SeasonEntity) -> Self {
        Self {
            id: season.id,
            league_id: season.league_id,
            name: season.name.clone(),
            phase: season.current_phase,
            week: season.current_week,
            status: season.status,
            version: season.version,
            roster_size: season.roster_size,
            challenge_count: season.challenge_count,
            chaos_weeks: season
                .evolution_schedule
                .iter()
                .filter(|week| week.is_chaos_week)
                .map(|week| week.week)
                .collect(),
            players: season
                .players_in_draft_order()
                .into_iter()
                .map(|player| SeasonPlayerDto::build(season, player))
                .collect(),
            events: season.events.iter().map(SeasonEventDto::from).collect(),
            created_at: format_system_time(season.created_at),
            updated_at: format_system_time(season.updated_at),
        }
    }
}

/// Player created by joining a season.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinSeasonResponse {
    pub season_player_id: Uuid,
    pub label_name: String,
}

/// Result of a phase transition.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub season_id: Uuid,
    pub phase: SeasonPhase,
    pub week: u32,
    pub status: SeasonStatus,
    pub version: u64,
}

impl TransitionResponse {
    /// Build the response from the committed state.
    pub fn new(season: &SeasonEntity, next: SeasonState) -> Self {
        Self {
            season_id: season.id,
            phase: next.position.phase,
            week: next.position.week,
            status: next.status,
            version: season.version,
        }
    }
}
