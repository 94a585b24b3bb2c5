//! Checkpoint enumeration and rollback.
//!
//! Every season-scoped record carries the [`SeasonPosition`] at which it was
//! created or last mutated. Rolling back to a target `T` deletes everything
//! created at or after `T` and reverts every mutation made at or after `T`,
//! which makes the result independent of the order in which the undone
//! operations originally happened.

use std::{collections::HashSet, fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dao::models::{BoardChallengeStatus, SeasonEntity},
    state::{
        season::recompute_standings,
        state_machine::{
            ApplyError, PlanError, SeasonEvent, SeasonPhase, SeasonPosition, SeasonState,
            SeasonStateMachine, SeasonStatus,
        },
    },
};

/// Identifier of a rewind target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum CheckpointId {
    /// Back to season setup.
    Preseason,
    /// Back to the start of the draft.
    Draft,
    /// Back to starting-advantage selection.
    AdvantageSelection,
    /// Back to the start of week 1.
    StartOfSeason,
    /// Back to the start of week `n`.
    Week(u32),
    /// Back to the start of week `n`'s presentation.
    WeekPresentation(u32),
    /// Back to the start of week `n`'s roster evolution.
    WeekRosterEvolution(u32),
}

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointId::Preseason => f.write_str("PRESEASON"),
            CheckpointId::Draft => f.write_str("DRAFT"),
            CheckpointId::AdvantageSelection => f.write_str("ADVANTAGE_SELECTION"),
            CheckpointId::StartOfSeason => f.write_str("START_OF_SEASON"),
            CheckpointId::Week(week) => write!(f, "WEEK_{week}"),
            CheckpointId::WeekPresentation(week) => write!(f, "WEEK_{week}_PRESENTATION"),
            CheckpointId::WeekRosterEvolution(week) => write!(f, "WEEK_{week}_ROSTER_EVOLUTION"),
        }
    }
}

/// Raised when a checkpoint identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown checkpoint `{0}`")]
pub struct ParseCheckpointError(String);

impl FromStr for CheckpointId {
    type Err = ParseCheckpointError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseCheckpointError(raw.to_owned());
        match raw {
            "PRESEASON" => return Ok(CheckpointId::Preseason),
            "DRAFT" => return Ok(CheckpointId::Draft),
            "ADVANTAGE_SELECTION" => return Ok(CheckpointId::AdvantageSelection),
            "START_OF_SEASON" => return Ok(CheckpointId::StartOfSeason),
            _ => {}
        }

        let rest = raw.strip_prefix("WEEK_").ok_or_else(unknown)?;
        let (number, suffix) = match rest.find('_') {
            Some(index) => (&rest[..index], &rest[index..]),
            None => (rest, ""),
        };
        let week: u32 = number.parse().map_err(|_| unknown())?;
        if week == 0 {
            return Err(unknown());
        }

        match suffix {
            "" => Ok(CheckpointId::Week(week)),
            "_PRESENTATION" => Ok(CheckpointId::WeekPresentation(week)),
            "_ROSTER_EVOLUTION" => Ok(CheckpointId::WeekRosterEvolution(week)),
            _ => Err(unknown()),
        }
    }
}

impl CheckpointId {
    /// Position the season lands on.
    pub fn target(self) -> SeasonPosition {
        use SeasonPhase::*;
        match self {
            CheckpointId::Preseason => SeasonPosition::new(0, SeasonSetup),
            CheckpointId::Draft => SeasonPosition::new(0, Drafting),
            CheckpointId::AdvantageSelection => SeasonPosition::new(0, AdvantageSelection),
            CheckpointId::StartOfSeason => SeasonPosition::new(1, InSeasonChallengeSelection),
            CheckpointId::Week(week) => SeasonPosition::new(week, InSeasonChallengeSelection),
            CheckpointId::WeekPresentation(week) => SeasonPosition::new(week, PlaylistPresentation),
            CheckpointId::WeekRosterEvolution(week) => SeasonPosition::new(week, RosterEvolution),
        }
    }

    /// Human readable label.
    pub fn label(self) -> String {
        match self {
            CheckpointId::Preseason => "Season setup".to_owned(),
            CheckpointId::Draft => "Start of draft".to_owned(),
            CheckpointId::AdvantageSelection => "Advantage selection".to_owned(),
            CheckpointId::StartOfSeason => "Start of season".to_owned(),
            CheckpointId::Week(week) => format!("Start of week {week}"),
            CheckpointId::WeekPresentation(week) => format!("Week {week} presentation"),
            CheckpointId::WeekRosterEvolution(week) => format!("Week {week} roster evolution"),
        }
    }

    /// What survives the rollback.
    pub fn preserves(self) -> Vec<String> {
        match self {
            CheckpointId::Preseason => Vec::new(),
            CheckpointId::Draft => vec!["draft order".into()],
            CheckpointId::AdvantageSelection => vec!["draft picks".into(), "rosters".into()],
            CheckpointId::StartOfSeason => vec![
                "draft".into(),
                "rosters".into(),
                "starting advantages".into(),
            ],
            CheckpointId::Week(week) => vec![format!("all weeks before week {week}")],
            CheckpointId::WeekPresentation(week) => vec![
                format!("week {week} challenge selection"),
                format!("week {week} playlist submissions"),
            ],
            CheckpointId::WeekRosterEvolution(_) => Vec::new(),
        }
    }

    /// What the rollback deletes or reverts.
    pub fn clears(self) -> Vec<String> {
        let full_reset = || {
            vec![
                "draft picks".to_owned(),
                "rosters".to_owned(),
                "advantages".to_owned(),
                "challenge selections".to_owned(),
                "board challenges reset to open".to_owned(),
            ]
        };
        match self {
            CheckpointId::Preseason => {
                let mut clears = vec!["draft positions".to_owned()];
                clears.extend(full_reset());
                clears
            }
            CheckpointId::Draft => full_reset(),
            CheckpointId::AdvantageSelection => {
                vec!["advantages".into(), "challenge selections".into()]
            }
            CheckpointId::StartOfSeason => vec![
                "week 1+ challenge selections".into(),
                "advantages earned in week 1+".into(),
            ],
            CheckpointId::Week(week) => vec![
                format!("week {week}+ challenge selections"),
                format!("advantages earned in week {week}+"),
                format!("roster changes made in week {week}+"),
            ],
            CheckpointId::WeekPresentation(_) => {
                vec!["presentation state".into(), "voting session and votes".into()]
            }
            CheckpointId::WeekRosterEvolution(_) => vec![
                "restores cut artists".into(),
                "removes redrafted artists".into(),
                "returns pool-drafted artists to the pool".into(),
                "clears the evolution prompt".into(),
                "deletes related game events".into(),
            ],
        }
    }

    /// Whether the checkpoint can be applied from `state`.
    pub fn is_available(self, state: SeasonState) -> bool {
        let target = self.target();
        if target > state.position {
            return false;
        }

        let phase = state.position.phase;
        let week = state.position.week;
        match self {
            CheckpointId::Preseason | CheckpointId::Draft | CheckpointId::AdvantageSelection => {
                state.position != target
            }
            CheckpointId::StartOfSeason | CheckpointId::Week(_) => {
                state.status == SeasonStatus::InProgress
            }
            CheckpointId::WeekPresentation(n) => {
                n == week
                    && matches!(
                        phase,
                        SeasonPhase::PlaylistPresentation
                            | SeasonPhase::Voting
                            | SeasonPhase::InSeasonWeekEnd
                            | SeasonPhase::RosterEvolution
                    )
            }
            CheckpointId::WeekRosterEvolution(n) => {
                n == week && phase == SeasonPhase::RosterEvolution
            }
        }
    }
}

/// Checkpoint with its implications and availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Identifier.
    pub id: CheckpointId,
    /// Display label.
    pub label: String,
    /// Position the season lands on.
    pub target: SeasonPosition,
    /// What survives.
    pub preserves: Vec<String>,
    /// What gets deleted or reverted.
    pub clears: Vec<String>,
    /// Whether it can be applied right now.
    pub is_available: bool,
}

impl Checkpoint {
    fn describe(id: CheckpointId, state: SeasonState) -> Self {
        Self {
            id,
            label: id.label(),
            target: id.target(),
            preserves: id.preserves(),
            clears: id.clears(),
            is_available: id.is_available(state),
        }
    }
}

fn candidates(current_week: u32) -> Vec<CheckpointId> {
    let mut ids = vec![
        CheckpointId::Preseason,
        CheckpointId::Draft,
        CheckpointId::AdvantageSelection,
        CheckpointId::StartOfSeason,
    ];
    ids.extend((1..=current_week).map(CheckpointId::Week));
    if current_week > 0 {
        ids.push(CheckpointId::WeekPresentation(current_week));
        ids.push(CheckpointId::WeekRosterEvolution(current_week));
    }
    ids
}

/// Every candidate checkpoint for the state, flagged with its availability.
pub fn list_checkpoints(phase: SeasonPhase, week: u32, status: SeasonStatus) -> Vec<Checkpoint> {
    let state = SeasonState {
        position: SeasonPosition::new(week, phase),
        status,
    };
    candidates(week)
        .into_iter()
        .map(|id| Checkpoint::describe(id, state))
        .collect()
}

/// Checkpoints that can be applied from the given state, in display order.
pub fn list_available_checkpoints(
    phase: SeasonPhase,
    week: u32,
    status: SeasonStatus,
) -> Vec<Checkpoint> {
    list_checkpoints(phase, week, status)
        .into_iter()
        .filter(|checkpoint| checkpoint.is_available)
        .collect()
}

/// Counts of what a rollback removed or reverted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollbackCounts {
    /// Votes deleted.
    pub votes: usize,
    /// Voting sessions deleted.
    pub voting_sessions: usize,
    /// Week results deleted.
    pub week_results: usize,
    /// Presentation states deleted.
    pub presentations: usize,
    /// Playlist submissions deleted.
    pub submissions: usize,
    /// Challenge selections deleted.
    pub challenge_selections: usize,
    /// Evolution prompts deleted.
    pub evolution_prompts: usize,
    /// Game events deleted.
    pub events: usize,
    /// Advantages deleted.
    pub advantages: usize,
    /// Advantages made unused again.
    pub advantage_uses: usize,
    /// Roster entries deleted.
    pub roster_entries: usize,
    /// Cut artists restored to their roster.
    pub restored_cuts: usize,
    /// Pool entries deleted.
    pub pool_entries: usize,
    /// Draft picks deleted.
    pub draft_picks: usize,
}

/// Outcome of a successful rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    /// Checkpoint applied.
    pub checkpoint: CheckpointId,
    /// State before the rollback.
    pub from: SeasonState,
    /// State after the rollback.
    pub to: SeasonState,
    /// What was removed.
    pub counts: RollbackCounts,
}

/// Errors raised when applying a checkpoint.
#[derive(Debug, Error)]
pub enum RollbackError {
    /// The checkpoint is not in the available set.
    #[error("checkpoint {checkpoint} is not available from {position}")]
    Unavailable {
        /// Requested checkpoint.
        checkpoint: CheckpointId,
        /// Season position at request time.
        position: SeasonPosition,
    },
    /// The state machine refused the rewind.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The state machine could not apply the rewind.
    #[error(transparent)]
    Apply(#[from] ApplyError),
    /// The season would be left inconsistent.
    #[error("integrity check failed: {0}")]
    Integrity(String),
}

fn remove_from<T>(items: &mut Vec<T>, mut doomed: impl FnMut(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(|item| !doomed(item));
    before - items.len()
}

/// Delete every datum stamped at or after `target` and revert every mutation
/// stamped at or after it. Dependents go first.
pub fn cascade(season: &mut SeasonEntity, target: SeasonPosition) -> RollbackCounts {
    let t = target;
    let mut counts = RollbackCounts {
        votes: remove_from(&mut season.votes, |vote| vote.cast_at >= t),
        voting_sessions: remove_from(&mut season.voting_sessions, |session| session.opened_at >= t),
        ..RollbackCounts::default()
    };
    for session in &mut season.voting_sessions {
        if session.closed_at.is_some_and(|closed| closed >= t) {
            session.closed_at = None;
        }
    }

    counts.week_results = remove_from(&mut season.week_results, |result| result.recorded_at >= t);
    counts.presentations = remove_from(&mut season.presentations, |p| p.started_at >= t);
    counts.submissions = remove_from(&mut season.submissions, |s| s.submitted_at >= t);

    let dropped: HashSet<Uuid> = season
        .challenge_selections
        .iter()
        .filter(|selection| selection.selected_at >= t)
        .map(|selection| selection.board_challenge_id)
        .collect();
    counts.challenge_selections =
        remove_from(&mut season.challenge_selections, |s| s.selected_at >= t);
    if let Some(board) = season.board.as_mut() {
        for challenge in board
            .challenges
            .iter_mut()
            .filter(|challenge| dropped.contains(&challenge.id))
        {
            challenge.status = BoardChallengeStatus::Open;
            challenge.selected_week = None;
        }
    }

    counts.evolution_prompts = remove_from(&mut season.evolution_prompts, |p| p.selected_at >= t);
    counts.events = remove_from(&mut season.events, |event| event.at >= t);

    for advantage in &mut season.advantages {
        if advantage.used_at.is_some_and(|used| used >= t) {
            advantage.used_at = None;
            counts.advantage_uses += 1;
        }
    }
    counts.advantages = remove_from(&mut season.advantages, |a| a.earned_at >= t);

    for entry in &mut season.pool {
        if entry.drafted.as_ref().is_some_and(|drafted| drafted.at >= t) {
            entry.drafted = None;
        }
    }

    counts.roster_entries = remove_from(&mut season.roster, |entry| entry.acquired_at >= t);
    for entry in &mut season.roster {
        if entry.cut.as_ref().is_some_and(|cut| cut.at >= t) {
            entry.cut = None;
            counts.restored_cuts += 1;
        }
    }

    counts.pool_entries = remove_from(&mut season.pool, |entry| entry.entered_at >= t);
    for entry in &mut season.pool {
        if entry.banished_at.is_some_and(|banished| banished >= t) {
            entry.banished_at = None;
        }
    }

    counts.draft_picks = remove_from(&mut season.draft_picks, |pick| pick.made_at >= t);
    if t <= SeasonPosition::initial() {
        for player in &mut season.players {
            player.draft_position = None;
        }
    }

    recompute_standings(season);
    counts
}

/// Check that nothing is stamped after the season's position and that every
/// reference resolves.
pub fn verify_integrity(season: &SeasonEntity) -> Result<(), String> {
    let now = season.position();
    let players: HashSet<Uuid> = season.players.iter().map(|player| player.id).collect();
    let roster: HashSet<Uuid> = season.roster.iter().map(|entry| entry.id).collect();
    let pool: HashSet<Uuid> = season.pool.iter().map(|entry| entry.id).collect();
    let sessions: HashSet<Uuid> = season.voting_sessions.iter().map(|s| s.id).collect();

    let future = |what: &str, at: SeasonPosition| -> Result<(), String> {
        if at > now {
            return Err(format!("{what} stamped at {at}, after {now}"));
        }
        Ok(())
    };
    let known_player = |what: &str, id: Uuid| -> Result<(), String> {
        if !players.contains(&id) {
            return Err(format!("{what} references unknown player `{id}`"));
        }
        Ok(())
    };

    for pick in &season.draft_picks {
        future("draft pick", pick.made_at)?;
        known_player("draft pick", pick.season_player_id)?;
        if !roster.contains(&pick.roster_entry_id) {
            return Err(format!("draft pick {} lost its roster entry", pick.overall_pick));
        }
    }

    for entry in &season.roster {
        future("roster entry", entry.acquired_at)?;
        known_player("roster entry", entry.season_player_id)?;
        if let Some(cut) = &entry.cut {
            future("roster cut", cut.at)?;
            if !pool.contains(&cut.pool_entry_id) {
                return Err(format!("cut of `{}` lost its pool entry", entry.artist.name));
            }
        }
    }

    for entry in &season.pool {
        future("pool entry", entry.entered_at)?;
        let source = season
            .roster
            .iter()
            .find(|roster_entry| roster_entry.id == entry.source_roster_entry_id)
            .ok_or_else(|| format!("pool entry `{}` lost its source roster entry", entry.id))?;
        if source.cut.as_ref().map(|cut| cut.pool_entry_id) != Some(entry.id) {
            return Err(format!("pool entry `{}` points at an uncut roster entry", entry.id));
        }
        if let Some(drafted) = &entry.drafted {
            future("pool draft", drafted.at)?;
            known_player("pool draft", drafted.by)?;
            if !roster.contains(&drafted.roster_entry_id) {
                return Err(format!("pool draft of `{}` lost its roster entry", entry.id));
            }
        }
        if let Some(banished) = entry.banished_at {
            future("pool banishment", banished)?;
        }
    }

    for advantage in &season.advantages {
        future("advantage", advantage.earned_at)?;
        known_player("advantage", advantage.season_player_id)?;
        if let Some(used) = advantage.used_at {
            future("advantage use", used)?;
        }
    }

    let selected: HashSet<Uuid> = season
        .challenge_selections
        .iter()
        .map(|selection| selection.board_challenge_id)
        .collect();
    for selection in &season.challenge_selections {
        future("challenge selection", selection.selected_at)?;
        known_player("challenge selection", selection.selected_by)?;
        let on_board = season
            .board
            .as_ref()
            .and_then(|board| board.challenge(selection.board_challenge_id))
            .is_some_and(|challenge| challenge.status == BoardChallengeStatus::Selected);
        if !on_board {
            return Err(format!("week {} selection lost its board challenge", selection.week));
        }
    }
    if let Some(board) = &season.board {
        for challenge in &board.challenges {
            if challenge.status == BoardChallengeStatus::Selected && !selected.contains(&challenge.id)
            {
                return Err(format!(
                    "board challenge `{}` is selected without a selection",
                    challenge.canonical_challenge_id
                ));
            }
        }
    }

    for submission in &season.submissions {
        future("submission", submission.submitted_at)?;
        known_player("submission", submission.season_player_id)?;
    }
    for presentation in &season.presentations {
        future("presentation", presentation.started_at)?;
        for id in &presentation.presented {
            known_player("presentation", *id)?;
        }
    }
    for session in &season.voting_sessions {
        future("voting session", session.opened_at)?;
        if let Some(closed) = session.closed_at {
            future("voting session close", closed)?;
        }
    }
    for vote in &season.votes {
        future("vote", vote.cast_at)?;
        known_player("vote", vote.voter_id)?;
        known_player("vote", vote.target_id)?;
        if !sessions.contains(&vote.session_id) {
            return Err(format!("vote `{}` lost its voting session", vote.id));
        }
    }
    for result in &season.week_results {
        future("week result", result.recorded_at)?;
        known_player("week result", result.season_player_id)?;
    }
    for prompt in &season.evolution_prompts {
        future("evolution prompt", prompt.selected_at)?;
    }
    for event in &season.events {
        future("game event", event.at)?;
    }

    let mut positions = HashSet::new();
    for position in season.players.iter().filter_map(|player| player.draft_position) {
        if !positions.insert(position) {
            return Err(format!("draft position {position} assigned twice"));
        }
    }

    Ok(())
}

/// Roll `season` back to `checkpoint`.
///
/// On error the season may be partially modified; callers work on an owned
/// copy and discard it.
pub fn rollback(
    season: &mut SeasonEntity,
    checkpoint: CheckpointId,
) -> Result<RollbackReport, RollbackError> {
    let from = SeasonState {
        position: season.position(),
        status: season.status,
    };
    if !checkpoint.is_available(from) {
        return Err(RollbackError::Unavailable {
            checkpoint,
            position: from.position,
        });
    }

    let target = checkpoint.target();
    let mut machine = SeasonStateMachine::resume(from, season.challenge_count);
    let plan = machine.plan(SeasonEvent::Rollback(target))?;

    let counts = cascade(season, target);
    let to = machine.apply(plan.id)?;
    season.current_phase = to.position.phase;
    season.current_week = to.position.week;
    season.status = to.status;

    verify_integrity(season).map_err(RollbackError::Integrity)?;

    Ok(RollbackReport {
        checkpoint,
        from,
        to,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::{AcquisitionKind, ChallengeBoardEntity, PoolEntryReason},
        state::{
            fixtures,
            roster::{self, next_pick},
            season::{self as rules, apply_transition_effects},
        },
    };

    fn ids(checkpoints: &[Checkpoint]) -> Vec<String> {
        checkpoints.iter().map(|c| c.id.to_string()).collect()
    }

    fn step(season: &mut SeasonEntity, event: SeasonEvent) {
        let state = SeasonState {
            position: season.position(),
            status: season.status,
        };
        let mut machine = SeasonStateMachine::resume(state, season.challenge_count);
        let plan = machine.plan(event).unwrap();
        apply_transition_effects(season, event, plan.to.position, "Veto").unwrap();
        let next = machine.apply(plan.id).unwrap();
        season.current_phase = next.position.phase;
        season.current_week = next.position.week;
        season.status = next.status;
    }

    /// Two players, rosters of two, played up to the start of `weeks`.
    fn season_at_week(weeks: u32) -> SeasonEntity {
        let library = fixtures::library();
        let mut season = fixtures::season(2, 2, 8);
        let board = season.board.get_or_insert_with(ChallengeBoardEntity::empty);
        for canonical in library.categories() {
            let category = board.add_category(&library, &canonical.name).unwrap();
            for challenge in &canonical.challenges {
                board.add_challenge(&library, category.id, &challenge.id).unwrap();
            }
        }

        step(&mut season, SeasonEvent::StartDraft);
        let mut n = 0;
        while let Some(next) = next_pick(&season) {
            roster::make_draft_pick(&mut season, next.season_player_id, fixtures::artist(n)).unwrap();
            n += 1;
        }
        step(&mut season, SeasonEvent::CompleteDraft);
        let catalogue = vec!["Veto".to_owned()];
        for id in season.players.iter().map(|p| p.id).collect::<Vec<_>>() {
            rules::select_starting_advantage(&mut season, id, "Veto", &catalogue).unwrap();
        }
        step(&mut season, SeasonEvent::CompleteAdvantageSelection);
        step(&mut season, SeasonEvent::StartSeason);

        while season.current_week < weeks {
            play_week_until_evolution(&mut season);
            let owner = season.players[0].id;
            let entry = season.active_roster(owner).next().unwrap().id;
            roster::cut_artist(&mut season, Some(owner), entry).unwrap();
            roster::redraft_artist(&mut season, owner, fixtures::artist(100 + n)).unwrap();
            n += 1;
            step(&mut season, SeasonEvent::FinishRosterEvolution);
            step(&mut season, SeasonEvent::StartNextWeek);
        }
        season
    }

    fn play_week_until_evolution(season: &mut SeasonEntity) {
        let [a, b] = [season.players[0].id, season.players[1].id];
        let challenge = season
            .board
            .as_ref()
            .unwrap()
            .challenges
            .iter()
            .find(|c| c.status == BoardChallengeStatus::Open)
            .unwrap()
            .id;
        rules::select_weekly_challenge(season, a, challenge).unwrap();
        step(season, SeasonEvent::OpenSubmissions);
        rules::submit_playlist(season, a, vec!["a".into()]).unwrap();
        rules::submit_playlist(season, b, vec!["b".into()]).unwrap();
        step(season, SeasonEvent::StartPresentation);
        rules::advance_presentation(season).unwrap();
        step(season, SeasonEvent::OpenVoting);
        rules::cast_vote(season, a, b).unwrap();
        rules::cast_vote(season, b, a).unwrap();
        step(season, SeasonEvent::CloseVoting);
        step(season, SeasonEvent::StartRosterEvolution);
    }

    #[test]
    fn checkpoint_ids_round_trip_through_strings() {
        for id in [
            CheckpointId::Preseason,
            CheckpointId::StartOfSeason,
            CheckpointId::Week(12),
            CheckpointId::WeekPresentation(3),
            CheckpointId::WeekRosterEvolution(7),
        ] {
            assert_eq!(id.to_string().parse::<CheckpointId>().unwrap(), id);
        }
        assert!("WEEK_0".parse::<CheckpointId>().is_err());
        assert!("WEEK_2_VOTING".parse::<CheckpointId>().is_err());
        assert!("week_2".parse::<CheckpointId>().is_err());
    }

    #[test]
    fn drafting_offers_preseason_but_not_draft() {
        let available =
            list_available_checkpoints(SeasonPhase::Drafting, 0, SeasonStatus::Preseason);
        assert_eq!(ids(&available), vec!["PRESEASON"]);

        let setup =
            list_available_checkpoints(SeasonPhase::SeasonSetup, 0, SeasonStatus::Preseason);
        assert!(setup.is_empty());
    }

    #[test]
    fn mid_season_lists_every_started_week() {
        let available =
            list_available_checkpoints(SeasonPhase::Voting, 5, SeasonStatus::InProgress);
        assert_eq!(
            ids(&available),
            vec![
                "PRESEASON",
                "DRAFT",
                "ADVANTAGE_SELECTION",
                "START_OF_SEASON",
                "WEEK_1",
                "WEEK_2",
                "WEEK_3",
                "WEEK_4",
                "WEEK_5",
                "WEEK_5_PRESENTATION",
            ]
        );

        let evolution =
            list_available_checkpoints(SeasonPhase::RosterEvolution, 2, SeasonStatus::InProgress);
        assert!(ids(&evolution).contains(&"WEEK_2_ROSTER_EVOLUTION".to_owned()));

        let all = list_checkpoints(SeasonPhase::Voting, 5, SeasonStatus::InProgress);
        let roster = all
            .iter()
            .find(|c| c.id == CheckpointId::WeekRosterEvolution(5))
            .unwrap();
        assert!(!roster.is_available);
    }

    #[test]
    fn week_three_rollback_keeps_earlier_weeks() {
        let mut season = season_at_week(5);
        assert_eq!(season.current_week, 5);
        let report = rollback(&mut season, CheckpointId::Week(3)).unwrap();

        assert_eq!(
            season.position(),
            SeasonPosition::new(3, SeasonPhase::InSeasonChallengeSelection)
        );
        assert_eq!(season.status, SeasonStatus::InProgress);
        assert_eq!(report.counts.challenge_selections, 2);

        let weeks: Vec<u32> = season.challenge_selections.iter().map(|s| s.week).collect();
        assert_eq!(weeks, vec![1, 2]);
        assert!(season.week_results.iter().all(|result| result.week < 3));
        assert!(season.advantages.iter().all(|a| a.earned_at.week < 3));
        assert!(season.roster.iter().all(|entry| entry.acquired_at.week < 3));
        assert!(season.pool.iter().all(|entry| entry.entered_pool_week < 3));
        let selected = season
            .board
            .as_ref()
            .unwrap()
            .challenges
            .iter()
            .filter(|c| c.status == BoardChallengeStatus::Selected)
            .count();
        assert_eq!(selected, 2);
        assert!(roster::rosters_full(&season));
    }

    #[test]
    fn roster_evolution_rollback_ignores_operation_order() {
        let base = {
            let mut season = season_at_week(2);
            play_week_until_evolution(&mut season);
            season
        };
        let [a, b] = [base.players[0].id, base.players[1].id];

        let redraft_then_cut = {
            let mut season = base.clone();
            let entry = season.active_roster(b).next().unwrap().id;
            rules::grant_advantage(&mut season, a, "Veto");
            let own = season.active_roster(a).next().unwrap().id;
            roster::cut_artist(&mut season, Some(a), own).unwrap();
            roster::redraft_artist(&mut season, a, fixtures::artist(500)).unwrap();
            roster::cut_artist(&mut season, Some(a), entry).unwrap();
            season
        };
        let cut_then_pool_draft = {
            let mut season = base.clone();
            let own = season.active_roster(b).next().unwrap().id;
            let pool_entry = roster::cut_artist(&mut season, Some(b), own).unwrap();
            roster::draft_from_pool(&mut season, b, pool_entry.id).unwrap();
            roster::select_evolution_prompt(&mut season, "Swap a headliner").unwrap();
            season
        };

        for mut season in [redraft_then_cut, cut_then_pool_draft] {
            rollback(&mut season, CheckpointId::WeekRosterEvolution(2)).unwrap();
            assert_eq!(season.roster, base.roster);
            assert_eq!(season.pool, base.pool);
            assert_eq!(season.advantages, base.advantages);
            assert_eq!(season.events, base.events);
            assert!(season.evolution_prompts.is_empty());
            let target = CheckpointId::WeekRosterEvolution(2).target();
            assert!(
                season
                    .roster
                    .iter()
                    .filter(|entry| entry.acquired_via == AcquisitionKind::Redraft)
                    .all(|entry| entry.acquired_at < target)
            );
        }
    }

    #[test]
    fn presentation_rollback_clears_votes_and_keeps_submissions() {
        let mut season = season_at_week(1);
        let [a, b] = [season.players[0].id, season.players[1].id];
        let challenge = season.board.as_ref().unwrap().challenges[0].id;
        rules::select_weekly_challenge(&mut season, a, challenge).unwrap();
        step(&mut season, SeasonEvent::OpenSubmissions);
        rules::submit_playlist(&mut season, a, vec!["a".into()]).unwrap();
        rules::submit_playlist(&mut season, b, vec!["b".into()]).unwrap();
        step(&mut season, SeasonEvent::StartPresentation);
        rules::advance_presentation(&mut season).unwrap();
        step(&mut season, SeasonEvent::OpenVoting);
        rules::cast_vote(&mut season, a, b).unwrap();

        rollback(&mut season, CheckpointId::WeekPresentation(1)).unwrap();
        assert_eq!(season.current_phase, SeasonPhase::PlaylistPresentation);
        assert!(season.votes.is_empty());
        assert!(season.voting_sessions.is_empty());
        assert!(season.presentations.is_empty());
        assert_eq!(season.submissions.len(), 2);
        assert_eq!(season.challenge_selections.len(), 1);
    }

    #[test]
    fn preseason_rollback_clears_everything_but_players() {
        let mut season = season_at_week(2);
        rollback(&mut season, CheckpointId::Preseason).unwrap();

        assert_eq!(season.position(), SeasonPosition::initial());
        assert_eq!(season.status, SeasonStatus::Preseason);
        assert_eq!(season.players.len(), 2);
        assert!(season.players.iter().all(|p| p.draft_position.is_none()));
        assert!(season.players.iter().all(|p| p.total_points == 0));
        assert!(season.roster.is_empty());
        assert!(season.draft_picks.is_empty());
        assert!(season.advantages.is_empty());
        assert!(season.pool.is_empty());
        assert!(season.events.is_empty());
        let board = season.board.as_ref().unwrap();
        assert!(board.challenges.iter().all(|c| c.status == BoardChallengeStatus::Open));
    }

    #[test]
    fn draft_rollback_keeps_draft_order() {
        let mut season = season_at_week(1);
        let positions: Vec<_> = season.players.iter().map(|p| p.draft_position).collect();
        rollback(&mut season, CheckpointId::Draft).unwrap();
        let after: Vec<_> = season.players.iter().map(|p| p.draft_position).collect();
        assert_eq!(positions, after);
        assert!(season.roster.is_empty());
        assert_eq!(season.current_phase, SeasonPhase::Drafting);
    }

    #[test]
    fn unavailable_checkpoint_is_rejected_untouched() {
        let mut season = season_at_week(1);
        let before = season.clone();
        let err = rollback(&mut season, CheckpointId::Week(4)).unwrap_err();
        assert!(matches!(err, RollbackError::Unavailable { .. }));
        assert_eq!(season, before);
    }

    #[test]
    fn chaos_banishment_is_reverted_by_rollback() {
        let mut season = season_at_week(fixtures::CHAOS_WEEK);
        play_week_until_evolution(&mut season);
        let owner = season.players[1].id;
        let entry = season.active_roster(owner).next().unwrap().id;
        let new_entry = roster::cut_artist(&mut season, Some(owner), entry).unwrap();
        assert_eq!(new_entry.entered_via, PoolEntryReason::ChaosCut);
        roster::redraft_artist(&mut season, owner, fixtures::artist(900)).unwrap();
        step(&mut season, SeasonEvent::FinishRosterEvolution);

        assert!(
            season
                .pool
                .iter()
                .filter(|entry| entry.entered_pool_week < fixtures::CHAOS_WEEK)
                .all(|entry| entry.banished_at.is_some())
        );
        assert!(crate::state::pool::listed_entries(&season).all(|e| e.id == new_entry.id));

        rollback(&mut season, CheckpointId::Week(fixtures::CHAOS_WEEK)).unwrap();
        assert!(season.pool.iter().all(|entry| entry.banished_at.is_none()));
    }

    #[test]
    fn integrity_check_catches_future_stamps() {
        let mut season = season_at_week(2);
        season.events[0].at = SeasonPosition::new(9, SeasonPhase::Voting);
        assert!(verify_integrity(&season).is_err());
    }

    #[test]
    fn machine_refusals_surface_in_rollback_errors() {
        let err = RollbackError::from(ApplyError::NoPending);
        assert_eq!(err.to_string(), "no transition is pending");
        let err = RollbackError::from(PlanError::AlreadyPending);
        assert_eq!(err.to_string(), "a transition is already pending");
    }
}
