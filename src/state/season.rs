//! Season-level rules: participants, advantages, weekly play, vote resolution
//! and the side effects attached to phase transitions.

use std::{collections::HashMap, time::SystemTime};

use uuid::Uuid;

use crate::{
    dao::models::{
        AdvantageEntity, BoardChallengeStatus, ChallengeBoardEntity, ChallengeSelectionEntity,
        EvolutionWeekEntity, GameEventEntity, GameEventKind, PlaylistSubmissionEntity,
        PresentationEntity, SeasonEntity, SeasonPlayerEntity, VoteEntity, VotingSessionEntity,
        WeekResultEntity,
    },
    state::{
        board::MIN_CHALLENGES_TO_LOCK,
        draft, pool,
        roster::rosters_full,
        rules::{RuleError, RuleResult},
        state_machine::{SeasonEvent, SeasonPhase, SeasonPosition, SeasonStatus},
    },
};

/// Parameters of a new season.
#[derive(Debug, Clone)]
pub struct SeasonSettings {
    /// Display name.
    pub name: String,
    /// Artists per roster (also the number of draft rounds).
    pub roster_size: u32,
    /// Number of weeks.
    pub challenge_count: u32,
    /// Week that runs chaos redraft rules, if any.
    pub chaos_week: Option<u32>,
}

/// Build a fresh season in setup.
pub fn new_season(league_id: Uuid, settings: SeasonSettings) -> RuleResult<SeasonEntity> {
    let name = settings.name.trim();
    if name.is_empty() {
        return Err(RuleError::input("season name must not be empty"));
    }
    if settings.roster_size == 0 {
        return Err(RuleError::input("roster size must be at least 1"));
    }
    if settings.challenge_count == 0 {
        return Err(RuleError::input("a season needs at least one challenge"));
    }
    if settings
        .chaos_week
        .is_some_and(|week| week == 0 || week >= settings.challenge_count)
    {
        return Err(RuleError::input(format!(
            "chaos week must fall between 1 and {}",
            settings.challenge_count.saturating_sub(1)
        )));
    }

    let now = SystemTime::now();
    Ok(SeasonEntity {
        id: Uuid::new_v4(),
        league_id,
        name: name.to_owned(),
        roster_size: settings.roster_size,
        challenge_count: settings.challenge_count,
        current_phase: SeasonPhase::SeasonSetup,
        current_week: 0,
        status: SeasonStatus::Preseason,
        version: 0,
        created_at: now,
        updated_at: now,
        evolution_schedule: (1..settings.challenge_count)
            .map(|week| EvolutionWeekEntity {
                week,
                is_chaos_week: Some(week) == settings.chaos_week,
            })
            .collect(),
        players: Vec::new(),
        board: None,
        draft_picks: Vec::new(),
        roster: Vec::new(),
        advantages: Vec::new(),
        challenge_selections: Vec::new(),
        submissions: Vec::new(),
        presentations: Vec::new(),
        voting_sessions: Vec::new(),
        votes: Vec::new(),
        week_results: Vec::new(),
        pool: Vec::new(),
        evolution_prompts: Vec::new(),
        events: Vec::new(),
    })
}

/// Reject operations issued outside `phase`.
pub fn ensure_phase(season: &SeasonEntity, phase: SeasonPhase) -> RuleResult<()> {
    if season.status == SeasonStatus::Completed {
        return Err(RuleError::transition("season is completed"));
    }
    if season.current_phase != phase {
        return Err(RuleError::transition(format!(
            "operation requires phase {phase}, season is in {}",
            season.current_phase
        )));
    }
    Ok(())
}

/// Append an entry to the season log, stamped with the current position.
pub fn record_event(
    season: &mut SeasonEntity,
    kind: GameEventKind,
    season_player_id: Option<Uuid>,
    description: String,
) {
    let at = season.position();
    season.events.push(GameEventEntity {
        id: Uuid::new_v4(),
        at,
        kind,
        season_player_id,
        description,
    });
}

fn require_player(season: &SeasonEntity, id: Uuid) -> RuleResult<&SeasonPlayerEntity> {
    season
        .player(id)
        .ok_or_else(|| RuleError::not_found(format!("player `{id}` is not part of this season")))
}

/// Add a participant during setup.
pub fn join(
    season: &mut SeasonEntity,
    user_id: Uuid,
    label_name: &str,
) -> RuleResult<SeasonPlayerEntity> {
    ensure_phase(season, SeasonPhase::SeasonSetup)?;
    let label_name = label_name.trim();
    if label_name.is_empty() {
        return Err(RuleError::input("label name must not be empty"));
    }
    if season.player_for_user(user_id).is_some() {
        return Err(RuleError::duplicate("user already joined this season"));
    }
    if season
        .players
        .iter()
        .any(|player| player.label_name.eq_ignore_ascii_case(label_name))
    {
        return Err(RuleError::duplicate(format!(
            "label `{label_name}` is already taken"
        )));
    }

    let player = SeasonPlayerEntity {
        id: Uuid::new_v4(),
        user_id,
        label_name: label_name.to_owned(),
        draft_position: None,
        total_points: 0,
        rank: 1,
    };
    season.players.push(player.clone());
    Ok(player)
}

/// Give a player an advantage stamped with the current position.
pub fn grant_advantage(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    kind: &str,
) -> AdvantageEntity {
    let advantage = AdvantageEntity {
        id: Uuid::new_v4(),
        season_player_id,
        kind: kind.to_owned(),
        earned_at: season.position(),
        used_at: None,
    };
    season.advantages.push(advantage.clone());
    advantage
}

fn has_starting_advantage(season: &SeasonEntity, season_player_id: Uuid) -> bool {
    season
        .advantages
        .iter()
        .any(|advantage| advantage.season_player_id == season_player_id && advantage.earned_at.week == 0)
}

/// Choose the starting advantage of a player.
pub fn select_starting_advantage(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    kind: &str,
    catalogue: &[String],
) -> RuleResult<AdvantageEntity> {
    ensure_phase(season, SeasonPhase::AdvantageSelection)?;
    require_player(season, season_player_id)?;

    let kind = catalogue
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(kind.trim()))
        .ok_or_else(|| RuleError::not_found(format!("unknown advantage `{}`", kind.trim())))?
        .clone();
    if has_starting_advantage(season, season_player_id) {
        return Err(RuleError::duplicate("starting advantage already selected"));
    }
    Ok(grant_advantage(season, season_player_id, &kind))
}

/// Spend an unused advantage.
pub fn use_advantage(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    advantage_id: Uuid,
) -> RuleResult<AdvantageEntity> {
    if season.status != SeasonStatus::InProgress {
        return Err(RuleError::transition(
            "advantages can only be used while the season is in progress",
        ));
    }
    let at = season.position();
    let advantage = season
        .advantages
        .iter_mut()
        .find(|advantage| advantage.id == advantage_id)
        .ok_or_else(|| RuleError::not_found(format!("advantage `{advantage_id}` not found")))?;
    if advantage.season_player_id != season_player_id {
        return Err(RuleError::forbidden("advantage belongs to another player"));
    }
    if advantage.used_at.is_some() {
        return Err(RuleError::transition("advantage was already used"));
    }
    advantage.used_at = Some(at);
    let advantage = advantage.clone();

    record_event(
        season,
        GameEventKind::AdvantageUsed,
        Some(season_player_id),
        format!("{} used", advantage.kind),
    );
    Ok(advantage)
}

/// Player choosing the weekly challenge: draft slots rotate week by week.
pub fn weekly_selector(season: &SeasonEntity, week: u32) -> Option<&SeasonPlayerEntity> {
    let order = season.players_in_draft_order();
    if order.is_empty() || week == 0 {
        return None;
    }
    order
        .get((week as usize - 1) % order.len())
        .copied()
}

/// Pick the current week's challenge from the board.
pub fn select_weekly_challenge(
    season: &mut SeasonEntity,
    selected_by: Uuid,
    board_challenge_id: Uuid,
) -> RuleResult<ChallengeSelectionEntity> {
    ensure_phase(season, SeasonPhase::InSeasonChallengeSelection)?;
    let week = season.current_week;
    let at = season.position();

    if season
        .challenge_selections
        .iter()
        .any(|selection| selection.week == week)
    {
        return Err(RuleError::duplicate(format!(
            "week {week} already has a challenge"
        )));
    }

    let board = season
        .board
        .as_mut()
        .ok_or_else(|| RuleError::not_found("season has no challenge board"))?;
    let challenge = board
        .challenges
        .iter_mut()
        .find(|challenge| challenge.id == board_challenge_id)
        .ok_or_else(|| {
            RuleError::not_found(format!("board challenge `{board_challenge_id}` not found"))
        })?;
    if challenge.status != BoardChallengeStatus::Open {
        return Err(RuleError::transition("challenge was already played"));
    }
    challenge.status = BoardChallengeStatus::Selected;
    challenge.selected_week = Some(week);

    let selection = ChallengeSelectionEntity {
        id: Uuid::new_v4(),
        week,
        selected_by,
        board_challenge_id,
        selected_at: at,
    };
    season.challenge_selections.push(selection.clone());
    Ok(selection)
}

/// Submit (or replace) a player's playlist for the current week.
pub fn submit_playlist(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    tracks: Vec<String>,
) -> RuleResult<PlaylistSubmissionEntity> {
    ensure_phase(season, SeasonPhase::PlaylistSubmission)?;
    require_player(season, season_player_id)?;

    let tracks: Vec<String> = tracks
        .into_iter()
        .map(|track| track.trim().to_owned())
        .filter(|track| !track.is_empty())
        .collect();
    if tracks.is_empty() {
        return Err(RuleError::input("a playlist needs at least one track"));
    }

    let week = season.current_week;
    season
        .submissions
        .retain(|submission| !(submission.week == week && submission.season_player_id == season_player_id));
    let submission = PlaylistSubmissionEntity {
        id: Uuid::new_v4(),
        week,
        season_player_id,
        tracks,
        submitted_at: season.position(),
    };
    season.submissions.push(submission.clone());
    Ok(submission)
}

/// Mark the next playlist in draft order as presented. Returns the presented
/// player.
pub fn advance_presentation(season: &mut SeasonEntity) -> RuleResult<Uuid> {
    ensure_phase(season, SeasonPhase::PlaylistPresentation)?;
    let week = season.current_week;
    let at = season.position();

    let order: Vec<Uuid> = season
        .players_in_draft_order()
        .iter()
        .map(|player| player.id)
        .collect();

    if !season.presentations.iter().any(|p| p.week == week) {
        season.presentations.push(PresentationEntity {
            week,
            presented: Vec::new(),
            started_at: at,
        });
    }
    let presentation = season
        .presentations
        .iter_mut()
        .find(|presentation| presentation.week == week)
        .ok_or_else(|| RuleError::not_found("presentation state missing"))?;

    let next = order
        .into_iter()
        .find(|id| !presentation.presented.contains(id))
        .ok_or_else(|| RuleError::transition("every playlist was already presented"))?;
    presentation.presented.push(next);
    Ok(next)
}

fn open_session(season: &SeasonEntity, week: u32) -> Option<&VotingSessionEntity> {
    season
        .voting_sessions
        .iter()
        .find(|session| session.week == week && session.closed_at.is_none())
}

/// Cast (or replace) a vote for the current week.
pub fn cast_vote(
    season: &mut SeasonEntity,
    voter_id: Uuid,
    target_id: Uuid,
) -> RuleResult<VoteEntity> {
    ensure_phase(season, SeasonPhase::Voting)?;
    require_player(season, voter_id)?;
    require_player(season, target_id)?;
    if voter_id == target_id {
        return Err(RuleError::input("players cannot vote for themselves"));
    }

    let week = season.current_week;
    let session_id = open_session(season, week)
        .map(|session| session.id)
        .ok_or_else(|| RuleError::transition("voting is closed"))?;

    season
        .votes
        .retain(|vote| !(vote.week == week && vote.voter_id == voter_id));
    let vote = VoteEntity {
        id: Uuid::new_v4(),
        session_id,
        week,
        voter_id,
        target_id,
        cast_at: season.position(),
    };
    season.votes.push(vote.clone());
    Ok(vote)
}

/// Recompute totals and competition ranks (1, 1, 3) from week results.
pub fn recompute_standings(season: &mut SeasonEntity) {
    let mut totals: HashMap<Uuid, i32> = HashMap::new();
    for result in &season.week_results {
        *totals.entry(result.season_player_id).or_default() += result.points;
    }

    for player in &mut season.players {
        player.total_points = totals.get(&player.id).copied().unwrap_or(0);
    }

    let points: Vec<i32> = season.players.iter().map(|player| player.total_points).collect();
    for player in &mut season.players {
        let ahead = points
            .iter()
            .filter(|other| **other > player.total_points)
            .count();
        player.rank = ahead as u32 + 1;
    }
}

fn week_has_selection(season: &SeasonEntity, week: u32) -> bool {
    season
        .challenge_selections
        .iter()
        .any(|selection| selection.week == week)
}

fn missing_players<F>(season: &SeasonEntity, mut done: F) -> Vec<String>
where
    F: FnMut(Uuid) -> bool,
{
    season
        .players
        .iter()
        .filter(|player| !done(player.id))
        .map(|player| player.label_name.clone())
        .collect()
}

/// Check a transition's preconditions and run its side effects on `season`.
///
/// `to` is the position the season moves to; data created by the side effects
/// is stamped with it. Must run before the season's position is updated.
pub fn apply_transition_effects(
    season: &mut SeasonEntity,
    event: SeasonEvent,
    to: SeasonPosition,
    weekly_advantage: &str,
) -> RuleResult<()> {
    let week = season.current_week;
    match event {
        SeasonEvent::StartDraft => {
            if season.players.len() < 2 {
                return Err(RuleError::transition("a draft needs at least two players"));
            }
            draft::fill_missing_positions(season);
        }
        SeasonEvent::CompleteDraft => {
            if !rosters_full(season) {
                return Err(RuleError::transition("every roster must be full"));
            }
        }
        SeasonEvent::CompleteAdvantageSelection => {
            let missing = missing_players(season, |id| has_starting_advantage(season, id));
            if !missing.is_empty() {
                return Err(RuleError::transition(format!(
                    "missing starting advantage: {}",
                    missing.join(", ")
                )));
            }
        }
        SeasonEvent::StartSeason => {
            let board = season
                .board
                .get_or_insert_with(ChallengeBoardEntity::empty);
            if board.challenge_count() < MIN_CHALLENGES_TO_LOCK {
                return Err(RuleError::transition(format!(
                    "board needs at least {MIN_CHALLENGES_TO_LOCK} challenges to start the season"
                )));
            }
            board.lock()?;
        }
        SeasonEvent::OpenSubmissions => {
            if !week_has_selection(season, week) {
                return Err(RuleError::transition(format!(
                    "week {week} has no challenge selected"
                )));
            }
        }
        SeasonEvent::StartPresentation => {
            let missing = missing_players(season, |id| {
                season
                    .submissions
                    .iter()
                    .any(|submission| submission.week == week && submission.season_player_id == id)
            });
            if !missing.is_empty() {
                return Err(RuleError::transition(format!(
                    "missing playlists: {}",
                    missing.join(", ")
                )));
            }
        }
        SeasonEvent::OpenVoting => {
            if open_session(season, week).is_none() {
                season.voting_sessions.push(VotingSessionEntity {
                    id: Uuid::new_v4(),
                    week,
                    opened_at: to,
                    closed_at: None,
                });
            }
        }
        SeasonEvent::CloseVoting => close_voting(season, to, weekly_advantage)?,
        SeasonEvent::FinishRosterEvolution => {
            if !rosters_full(season) {
                return Err(RuleError::transition("every roster must be full"));
            }
            if season.is_chaos_week(week) {
                let banished = pool::banish_old_entries(season, week, to);
                season.events.push(GameEventEntity {
                    id: Uuid::new_v4(),
                    at: to,
                    kind: GameEventKind::PoolBanished,
                    season_player_id: None,
                    description: format!("{banished} pool entries banished after the chaos redraft"),
                });
            }
        }
        SeasonEvent::StartRosterEvolution
        | SeasonEvent::StartNextWeek
        | SeasonEvent::CompleteSeason
        | SeasonEvent::Rollback(_) => {}
    }
    Ok(())
}

fn close_voting(
    season: &mut SeasonEntity,
    at: SeasonPosition,
    weekly_advantage: &str,
) -> RuleResult<()> {
    let week = season.current_week;
    let missing = missing_players(season, |id| {
        season
            .votes
            .iter()
            .any(|vote| vote.week == week && vote.voter_id == id)
    });
    if !missing.is_empty() {
        return Err(RuleError::transition(format!(
            "missing votes: {}",
            missing.join(", ")
        )));
    }

    for session in season
        .voting_sessions
        .iter_mut()
        .filter(|session| session.week == week && session.closed_at.is_none())
    {
        session.closed_at = Some(at);
    }

    let mut received: HashMap<Uuid, u32> = HashMap::new();
    for vote in season.votes.iter().filter(|vote| vote.week == week) {
        *received.entry(vote.target_id).or_default() += 1;
    }
    let top = received.values().copied().max().unwrap_or(0);

    season.week_results.retain(|result| result.week != week);
    let mut winners = Vec::new();
    for player in &season.players {
        let votes = received.get(&player.id).copied().unwrap_or(0);
        let is_winner = top > 0 && votes == top;
        if is_winner {
            winners.push((player.id, player.label_name.clone()));
        }
        season.week_results.push(WeekResultEntity {
            week,
            season_player_id: player.id,
            votes,
            points: votes as i32,
            is_winner,
            recorded_at: at,
        });
    }

    for (winner, label) in winners {
        season.advantages.push(AdvantageEntity {
            id: Uuid::new_v4(),
            season_player_id: winner,
            kind: weekly_advantage.to_owned(),
            earned_at: at,
            used_at: None,
        });
        season.events.push(GameEventEntity {
            id: Uuid::new_v4(),
            at,
            kind: GameEventKind::WeekWon,
            season_player_id: Some(winner),
            description: format!("{label} won week {week} with {top} votes"),
        });
    }

    recompute_standings(season);
    Ok(())
}
