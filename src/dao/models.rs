use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::state_machine::{SeasonPhase, SeasonPosition, SeasonStatus};

/// Role a user holds inside a league.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    /// Owner of the league; runs seasons.
    Commissioner,
    /// Drafts a label and competes.
    Player,
    /// Read-only member.
    Spectator,
}

/// Member of a league.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeagueMemberEntity {
    /// Identity-provider user id.
    pub user_id: Uuid,
    /// Address the commissioner invited.
    pub email: String,
    /// Role inside the league.
    pub role: MemberRole,
}

/// League aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeagueEntity {
    /// Primary key of the league.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Owning user.
    pub commissioner_id: Uuid,
    /// Members including the commissioner.
    pub members: Vec<LeagueMemberEntity>,
    /// Incremented on every committed change; used for compare-and-swap.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last modification timestamp.
    pub updated_at: SystemTime,
}

/// External artist reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ArtistRef {
    /// Identifier in the external music catalogue.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A user's participation in a season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonPlayerEntity {
    /// Primary key of the season player.
    pub id: Uuid,
    /// User behind the label.
    pub user_id: Uuid,
    /// Record label name chosen by the player.
    pub label_name: String,
    /// 1-based draft slot, assigned during setup or when the draft opens.
    pub draft_position: Option<u32>,
    /// Sum of the player's week results.
    pub total_points: i32,
    /// Competition rank derived from `total_points`.
    pub rank: u32,
}

/// One week of the roster-evolution schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvolutionWeekEntity {
    /// Week number.
    pub week: u32,
    /// Whether the week runs chaos redraft rules.
    pub is_chaos_week: bool,
}

/// Editorial state of a board challenge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardChallengeStatus {
    /// Can still be picked as a weekly challenge.
    Open,
    /// Already used as a weekly challenge.
    Selected,
}

/// Column of the challenge board, named after a canonical category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardCategoryEntity {
    /// Primary key of the category.
    pub id: Uuid,
    /// Canonical category name.
    pub title: String,
}

/// Challenge placed on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardChallengeEntity {
    /// Primary key of the board challenge.
    pub id: Uuid,
    /// Category the challenge sits in.
    pub category_id: Uuid,
    /// Reference into the canonical challenge library.
    pub canonical_challenge_id: String,
    /// Dense zero-based position inside the category.
    pub order: u32,
    /// Whether the challenge was already used.
    pub status: BoardChallengeStatus,
    /// Week in which the challenge was selected.
    pub selected_week: Option<u32>,
}

/// Season-specific arrangement of challenges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeBoardEntity {
    /// Primary key of the board.
    pub id: Uuid,
    /// Locked boards are immutable.
    pub is_locked: bool,
    /// Categories in display order.
    pub categories: Vec<BoardCategoryEntity>,
    /// Challenges across all categories.
    pub challenges: Vec<BoardChallengeEntity>,
}

/// One pick of the initial snake draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftPickEntity {
    /// Primary key of the pick.
    pub id: Uuid,
    /// Picking player.
    pub season_player_id: Uuid,
    /// Artist picked.
    pub artist: ArtistRef,
    /// 1-based round.
    pub round: u32,
    /// 1-based overall pick number.
    pub overall_pick: u32,
    /// Roster entry created by this pick.
    pub roster_entry_id: Uuid,
    /// Position at which the pick was made.
    pub made_at: SeasonPosition,
}

/// How an artist landed on a roster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcquisitionKind {
    /// Initial snake draft.
    Draft,
    /// Fresh signing during roster evolution.
    Redraft,
    /// Picked out of the artist pool.
    PoolDraft,
}

/// Record of an artist being cut from a roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterCutEntity {
    /// Position at which the cut happened.
    pub at: SeasonPosition,
    /// Player who performed the cut; `None` when the commissioner did.
    pub cut_by: Option<Uuid>,
    /// Pool entry created by the cut.
    pub pool_entry_id: Uuid,
}

/// Artist on a player's roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntryEntity {
    /// Primary key of the roster entry.
    pub id: Uuid,
    /// Owning player.
    pub season_player_id: Uuid,
    /// Signed artist.
    pub artist: ArtistRef,
    /// How the artist was acquired.
    pub acquired_via: AcquisitionKind,
    /// Position at which the artist joined the roster.
    pub acquired_at: SeasonPosition,
    /// Present once the artist has been cut.
    pub cut: Option<RosterCutEntity>,
}

impl RosterEntryEntity {
    /// Whether the artist is still on the roster.
    pub fn is_active(&self) -> bool {
        self.cut.is_none()
    }
}

/// Advantage held by a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvantageEntity {
    /// Primary key of the advantage.
    pub id: Uuid,
    /// Holder.
    pub season_player_id: Uuid,
    /// Kind from the advantage catalogue.
    pub kind: String,
    /// Position at which it was earned (week 0 for starting advantages).
    pub earned_at: SeasonPosition,
    /// Position at which it was spent.
    pub used_at: Option<SeasonPosition>,
}

/// Weekly challenge chosen from the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeSelectionEntity {
    /// Primary key of the selection.
    pub id: Uuid,
    /// Week the challenge applies to.
    pub week: u32,
    /// Player who chose it.
    pub selected_by: Uuid,
    /// Board challenge chosen.
    pub board_challenge_id: Uuid,
    /// Position at which it was chosen.
    pub selected_at: SeasonPosition,
}

/// Playlist answering a weekly challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistSubmissionEntity {
    /// Primary key of the submission.
    pub id: Uuid,
    /// Week of the challenge.
    pub week: u32,
    /// Submitting player.
    pub season_player_id: Uuid,
    /// Ordered track references.
    pub tracks: Vec<String>,
    /// Position at which it was (last) submitted.
    pub submitted_at: SeasonPosition,
}

/// Progress of the weekly presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationEntity {
    /// Week being presented.
    pub week: u32,
    /// Players whose playlist was presented, in presentation order.
    pub presented: Vec<Uuid>,
    /// Position at which the presentation started.
    pub started_at: SeasonPosition,
}

/// Weekly voting session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotingSessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Week being voted on.
    pub week: u32,
    /// Position at which the session opened.
    pub opened_at: SeasonPosition,
    /// Position at which the session closed.
    pub closed_at: Option<SeasonPosition>,
}

/// Ballot cast by a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteEntity {
    /// Primary key of the vote.
    pub id: Uuid,
    /// Voting session.
    pub session_id: Uuid,
    /// Week being voted on.
    pub week: u32,
    /// Voting player.
    pub voter_id: Uuid,
    /// Player whose playlist got the vote.
    pub target_id: Uuid,
    /// Position at which the vote was cast.
    pub cast_at: SeasonPosition,
}

/// Resolved outcome of a week for one player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekResultEntity {
    /// Week resolved.
    pub week: u32,
    /// Player scored.
    pub season_player_id: Uuid,
    /// Votes received.
    pub votes: u32,
    /// Points awarded.
    pub points: i32,
    /// Whether the player won the week.
    pub is_winner: bool,
    /// Position at which the result was recorded.
    pub recorded_at: SeasonPosition,
}

/// Reason an artist entered the pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolEntryReason {
    /// A player released their own artist.
    SelfCut,
    /// Cut performed under chaos-week rules.
    ChaosCut,
    /// A player cut an opponent's artist.
    OpponentCut,
}

/// Redraft of a pool entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolDraftEntity {
    /// Player who picked the artist out of the pool.
    pub by: Uuid,
    /// Position at which the pick happened.
    pub at: SeasonPosition,
    /// Roster entry created by the pick.
    pub roster_entry_id: Uuid,
}

/// Artist sitting in the pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolEntryEntity {
    /// Primary key of the pool entry.
    pub id: Uuid,
    /// Artist available for redraft.
    pub artist: ArtistRef,
    /// Week the artist entered the pool.
    pub entered_pool_week: u32,
    /// Why the artist entered the pool.
    pub entered_via: PoolEntryReason,
    /// Player who made the cut.
    pub cut_by_player: Option<Uuid>,
    /// Player the artist was cut from.
    pub cut_from_player: Option<Uuid>,
    /// Roster entry the artist was cut from.
    pub source_roster_entry_id: Uuid,
    /// Position at which the artist entered the pool.
    pub entered_at: SeasonPosition,
    /// Present once the artist was picked out of the pool.
    pub drafted: Option<PoolDraftEntity>,
    /// Present once the entry was banished after a chaos-week redraft.
    pub banished_at: Option<SeasonPosition>,
}

/// Prompt chosen by the commissioner for a roster-evolution week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvolutionPromptEntity {
    /// Week the prompt applies to.
    pub week: u32,
    /// Prompt text.
    pub prompt: String,
    /// Position at which it was chosen.
    pub selected_at: SeasonPosition,
}

/// Kind of notable action recorded in the season log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventKind {
    /// Draft pick made.
    DraftPick,
    /// Artist cut.
    ArtistCut,
    /// Artist picked from the pool.
    PoolDraft,
    /// Fresh artist signed.
    Redraft,
    /// Advantage spent.
    AdvantageUsed,
    /// Week won.
    WeekWon,
    /// Pool entries banished.
    PoolBanished,
}

/// Entry of the season log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEventEntity {
    /// Primary key of the event.
    pub id: Uuid,
    /// Position at which it happened.
    pub at: SeasonPosition,
    /// What happened.
    pub kind: GameEventKind,
    /// Player involved, if any.
    pub season_player_id: Option<Uuid>,
    /// Human readable description.
    pub description: String,
}

/// Season aggregate persisted as one document so a single compare-and-swap
/// commits every multi-entity mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonEntity {
    /// Primary key of the season.
    pub id: Uuid,
    /// Owning league.
    pub league_id: Uuid,
    /// Display name.
    pub name: String,
    /// Artists per roster.
    pub roster_size: u32,
    /// Number of weekly challenges, i.e. weeks in the season.
    pub challenge_count: u32,
    /// Current phase.
    pub current_phase: SeasonPhase,
    /// Current week, 0 in preseason.
    pub current_week: u32,
    /// Lifecycle status.
    pub status: SeasonStatus,
    /// Incremented on every committed mutation.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last modification timestamp.
    pub updated_at: SystemTime,
    /// Roster-evolution schedule, one entry per week that has an evolution phase.
    pub evolution_schedule: Vec<EvolutionWeekEntity>,
    /// Participants.
    pub players: Vec<SeasonPlayerEntity>,
    /// Lazily created challenge board.
    pub board: Option<ChallengeBoardEntity>,
    /// Initial draft picks.
    pub draft_picks: Vec<DraftPickEntity>,
    /// Every roster entry, active or cut.
    pub roster: Vec<RosterEntryEntity>,
    /// Advantages earned.
    pub advantages: Vec<AdvantageEntity>,
    /// Weekly challenge selections.
    pub challenge_selections: Vec<ChallengeSelectionEntity>,
    /// Playlist submissions.
    pub submissions: Vec<PlaylistSubmissionEntity>,
    /// Presentation progress per week.
    pub presentations: Vec<PresentationEntity>,
    /// Voting sessions per week.
    pub voting_sessions: Vec<VotingSessionEntity>,
    /// Ballots.
    pub votes: Vec<VoteEntity>,
    /// Resolved week results.
    pub week_results: Vec<WeekResultEntity>,
    /// Artist pool.
    pub pool: Vec<PoolEntryEntity>,
    /// Roster-evolution prompts.
    pub evolution_prompts: Vec<EvolutionPromptEntity>,
    /// Season log.
    pub events: Vec<GameEventEntity>,
}

impl SeasonEntity {
    /// Current phase/week as a position.
    pub fn position(&self) -> SeasonPosition {
        SeasonPosition::new(self.current_week, self.current_phase)
    }

    /// Find a participant by id.
    pub fn player(&self, id: Uuid) -> Option<&SeasonPlayerEntity> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Find the participant backed by `user_id`.
    pub fn player_for_user(&self, user_id: Uuid) -> Option<&SeasonPlayerEntity> {
        self.players.iter().find(|player| player.user_id == user_id)
    }

    /// Active roster of a player.
    pub fn active_roster(&self, season_player_id: Uuid) -> impl Iterator<Item = &RosterEntryEntity> {
        self.roster
            .iter()
            .filter(move |entry| entry.season_player_id == season_player_id && entry.is_active())
    }

    /// Whether `week` runs chaos redraft rules.
    pub fn is_chaos_week(&self, week: u32) -> bool {
        self.evolution_schedule
            .iter()
            .any(|entry| entry.week == week && entry.is_chaos_week)
    }

    /// Players sorted by draft position; players without a slot come last in join order.
    pub fn players_in_draft_order(&self) -> Vec<&SeasonPlayerEntity> {
        let mut players: Vec<&SeasonPlayerEntity> = self.players.iter().collect();
        players.sort_by_key(|player| player.draft_position.unwrap_or(u32::MAX));
        players
    }
}

/// Summary of a season used by listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonListItemEntity {
    /// Primary key of the season.
    pub id: Uuid,
    /// Owning league.
    pub league_id: Uuid,
    /// Display name.
    pub name: String,
    /// Current phase.
    pub current_phase: SeasonPhase,
    /// Current week.
    pub current_week: u32,
    /// Lifecycle status.
    pub status: SeasonStatus,
}

impl From<&SeasonEntity> for SeasonListItemEntity {
    fn from(entity: &SeasonEntity) -> Self {
        Self {
            id: entity.id,
            league_id: entity.league_id,
            name: entity.name.clone(),
            current_phase: entity.current_phase,
            current_week: entity.current_week,
            status: entity.status,
        }
    }
}
