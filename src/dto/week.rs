use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{
        ChallengeSelectionEntity, PlaylistSubmissionEntity, SeasonEntity, VoteEntity,
        WeekResultEntity,
    },
    dto::validation::validate_tracks,
    state::{library::ChallengeLibrary, season::weekly_selector, state_machine::SeasonPhase},
};

/// Pick the week's challenge from the board.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SelectChallengeRequest {
    pub board_challenge_id: Uuid,
}

/// Playlist answering the week's challenge.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitPlaylistRequest {
    #[validate(custom(function = "validate_tracks"), length(max = 50))]
    pub tracks: Vec<String>,
}

/// Ballot for another player's playlist.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct VoteRequest {
    pub target_player_id: Uuid,
}

/// Challenge chosen for a week.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeSelectionDto {
    pub id: Uuid,
    pub week: u32,
    pub selected_by: Uuid,
    pub board_challenge_id: Uuid,
    /// Canonical title, when the challenge is still on the board.
    pub title: Option<String>,
}

impl ChallengeSelectionDto {
    /// Resolve the selection against the board and the canonical library.
    pub fn build(
        season: &SeasonEntity,
        library: &ChallengeLibrary,
        selection: &ChallengeSelectionEntity,
    ) -> Self {
        let title = season
            .board
            .as_ref()
            .and_then(|board| board.challenge(selection.board_challenge_id))
            .and_then(|challenge| library.challenge(&challenge.canonical_challenge_id))
            .map(|(_, canonical)| canonical.title.clone());
        Self {
            id: selection.id,
            week: selection.week,
            selected_by: selection.selected_by,
            board_challenge_id: selection.board_challenge_id,
            title,
        }
    }
}

/// Submitted playlist.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionDto {
    pub id: Uuid,
    pub week: u32,
    pub season_player_id: Uuid,
    pub tracks: Vec<String>,
}

impl From<&PlaylistSubmissionEntity> for SubmissionDto {
    fn from(submission: &PlaylistSubmissionEntity) -> Self {
        Self {
            id: submission.id,
            week: submission.week,
            season_player_id: submission.season_player_id,
            tracks: submission.tracks.clone(),
        }
    }
}

/// Player whose playlist is presented next.
#[derive(Debug, Serialize, ToSchema)]
pub struct PresenterResponse {
    pub season_player_id: Uuid,
    /// Playlists presented so far, this one included.
    pub presented: usize,
    pub remaining: usize,
}

/// Recorded ballot.
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteDto {
    pub id: Uuid,
    pub week: u32,
    pub voter_id: Uuid,
    pub target_id: Uuid,
}

impl From<&VoteEntity> for VoteDto {
    fn from(vote: &VoteEntity) -> Self {
        Self {
            id: vote.id,
            week: vote.week,
            voter_id: vote.voter_id,
            target_id: vote.target_id,
        }
    }
}

/// Result of a player for a week.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekResultDto {
    pub season_player_id: Uuid,
    pub votes: u32,
    pub points: i32,
    pub is_winner: bool,
}

impl From<&WeekResultEntity> for WeekResultDto {
    fn from(result: &WeekResultEntity) -> Self {
        Self {
            season_player_id: result.season_player_id,
            votes: result.votes,
            points: result.points,
            is_winner: result.is_winner,
        }
    }
}

/// Progress of the current week.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekResponse {
    pub week: u32,
    pub phase: SeasonPhase,
    /// Player entitled to pick this week's challenge.
    pub selector_id: Option<Uuid>,
    pub selection: Option<ChallengeSelectionDto>,
    /// Players who already submitted a playlist.
    pub submitted: Vec<Uuid>,
    /// Players whose playlist was presented, in order.
    pub presented: Vec<Uuid>,
    pub voting_open: bool,
    pub votes_cast: usize,
    pub results: Vec<WeekResultDto>,
    pub evolution_prompt: Option<String>,
}

impl WeekResponse {
    /// Summarize the season's current week.
    pub fn build(season: &SeasonEntity, library: &ChallengeLibrary) -> Self {
        let week = season.current_week;
        Self {
            week,
            phase: season.current_phase,
            selector_id: weekly_selector(season, week).map(|player| player.id),
            selection: season
                .challenge_selections
                .iter()
                .find(|selection| selection.week == week)
                .map(|selection| ChallengeSelectionDto::build(season, library, selection)),
            submitted: season
                .submissions
                .iter()
                .filter(|submission| submission.week == week)
                .map(|submission| submission.season_player_id)
                .collect(),
            presented: season
                .presentations
                .iter()
                .find(|presentation| presentation.week == week)
                .map(|presentation| presentation.presented.clone())
                .unwrap_or_default(),
            voting_open: season
                .voting_sessions
                .iter()
                .any(|session| session.week == week && session.closed_at.is_none()),
            votes_cast: season.votes.iter().filter(|vote| vote.week == week).count(),
            results: season
                .week_results
                .iter()
                .filter(|result| result.week == week)
                .map(WeekResultDto::from)
                .collect(),
            evolution_prompt: season
                .evolution_prompts
                .iter()
                .find(|prompt| prompt.week == week)
                .map(|prompt| prompt.prompt.clone()),
        }
    }
}
