use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Phases a season moves through, declared in canonical forward order.
///
/// The derived ordering follows declaration order, which together with the week
/// number gives every moment of a season a total order (see [`SeasonPosition`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonPhase {
    /// Players join, the commissioner arranges the board and the draft order.
    SeasonSetup,
    /// Snake draft of the starting rosters.
    Drafting,
    /// Every player picks a starting advantage.
    AdvantageSelection,
    /// Everything is in place; waiting for the commissioner to kick off week 1.
    ReadyForWeek1,
    /// The week's selector picks a challenge from the board.
    InSeasonChallengeSelection,
    /// Players submit their playlists for the week's challenge.
    PlaylistSubmission,
    /// Playlists are presented one after another.
    PlaylistPresentation,
    /// Players vote for their favourite playlist.
    Voting,
    /// Votes are resolved and the week's results are shown.
    InSeasonWeekEnd,
    /// Cuts, pool picks and redrafts.
    RosterEvolution,
    /// Between weeks.
    WeekTransition,
}

impl SeasonPhase {
    /// Phases that belong to the preseason (week 0).
    pub fn is_preseason(self) -> bool {
        self <= SeasonPhase::ReadyForWeek1
    }

    /// Stable identifier used in logs and checkpoint labels.
    pub fn as_str(self) -> &'static str {
        match self {
            SeasonPhase::SeasonSetup => "SEASON_SETUP",
            SeasonPhase::Drafting => "DRAFTING",
            SeasonPhase::AdvantageSelection => "ADVANTAGE_SELECTION",
            SeasonPhase::ReadyForWeek1 => "READY_FOR_WEEK_1",
            SeasonPhase::InSeasonChallengeSelection => "IN_SEASON_CHALLENGE_SELECTION",
            SeasonPhase::PlaylistSubmission => "PLAYLIST_SUBMISSION",
            SeasonPhase::PlaylistPresentation => "PLAYLIST_PRESENTATION",
            SeasonPhase::Voting => "VOTING",
            SeasonPhase::InSeasonWeekEnd => "IN_SEASON_WEEK_END",
            SeasonPhase::RosterEvolution => "ROSTER_EVOLUTION",
            SeasonPhase::WeekTransition => "WEEK_TRANSITION",
        }
    }
}

impl fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall lifecycle status of a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonStatus {
    /// Before week 1 starts.
    Preseason,
    /// Weekly cycle running.
    InProgress,
    /// Final week closed.
    Completed,
}

/// A point in the life of a season: the week number plus the phase inside it.
///
/// Every season-scoped record is stamped with the position at which it was
/// created, which is what lets a checkpoint rollback decide what survives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct SeasonPosition {
    /// Week number, 0 during the preseason.
    pub week: u32,
    /// Phase inside the week.
    pub phase: SeasonPhase,
}

impl SeasonPosition {
    /// Build a position from its parts.
    pub const fn new(week: u32, phase: SeasonPhase) -> Self {
        Self { week, phase }
    }

    /// Very first position of every season.
    pub const fn initial() -> Self {
        Self::new(0, SeasonPhase::SeasonSetup)
    }
}

impl fmt::Display for SeasonPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@week{}", self.phase, self.week)
    }
}

/// Phase, week and status taken together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonState {
    /// Current phase/week.
    pub position: SeasonPosition,
    /// Current lifecycle status.
    pub status: SeasonStatus,
}

impl Default for SeasonState {
    fn default() -> Self {
        Self {
            position: SeasonPosition::initial(),
            status: SeasonStatus::Preseason,
        }
    }
}

/// Events that can be applied to the state machine. Each maps to one dedicated
/// service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonEvent {
    /// Commissioner closes setup and opens the draft.
    StartDraft,
    /// All rosters are full.
    CompleteDraft,
    /// All starting advantages are picked.
    CompleteAdvantageSelection,
    /// Kick off week 1.
    StartSeason,
    /// The week's challenge is chosen; playlists may be submitted.
    OpenSubmissions,
    /// All playlists are in; present them.
    StartPresentation,
    /// Presentation done; open the vote.
    OpenVoting,
    /// Resolve the vote.
    CloseVoting,
    /// Move from results into roster evolution.
    StartRosterEvolution,
    /// Roster evolution done.
    FinishRosterEvolution,
    /// Begin the following week.
    StartNextWeek,
    /// Close the final week and complete the season.
    CompleteSeason,
    /// Explicit backward jump issued by the checkpoint engine.
    Rollback(SeasonPosition),
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from} ({status:?})")]
pub struct InvalidTransition {
    /// The position the season was in when the invalid event was received.
    pub from: SeasonPosition,
    /// Status at that time.
    pub status: SeasonStatus,
    /// The event that cannot be applied.
    pub event: SeasonEvent,
}

/// Errors that can occur when planning a state machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A transition is already pending and must be applied or aborted.
    #[error("a transition is already pending")]
    AlreadyPending,
    /// The requested transition is not valid from the current state.
    #[error(transparent)]
    InvalidTransition(InvalidTransition),
}

/// Errors that can occur when applying a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// No transition is currently pending.
    #[error("no transition is pending")]
    NoPending,
    /// Plan ID does not match the pending plan.
    #[error("plan {got} does not match pending plan {expected}")]
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
    /// State changed since the plan was created.
    #[error("season moved from {} to {} while the plan was pending", expected.position, actual.position)]
    StateMismatch {
        /// State when the plan was created.
        expected: SeasonState,
        /// Current state.
        actual: SeasonState,
    },
}

/// Errors that can occur when aborting a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortError {
    /// No transition is currently pending.
    #[error("no transition is pending")]
    NoPending,
    /// Plan ID does not match the pending plan.
    #[error("plan {got} does not match pending plan {expected}")]
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
}

/// Unique identifier for a planned state transition.
pub type PlanId = Uuid;

/// A planned transition that has been validated but not yet applied.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Unique identifier for this plan.
    pub id: PlanId,
    /// State before the transition.
    pub from: SeasonState,
    /// State after the transition.
    pub to: SeasonState,
    /// Event that triggered this transition.
    pub event: SeasonEvent,
}

/// Per-season phase state machine.
///
/// Built from the persisted season each time an operation runs; the service
/// layer plans a transition, performs the transition's side effects on the
/// season document and applies the plan only when they succeed.
#[derive(Debug, Clone)]
pub struct SeasonStateMachine {
    state: SeasonState,
    final_week: u32,
    pending: Option<Plan>,
}

impl SeasonStateMachine {
    /// Create a machine at the initial state of a season with `final_week` weeks.
    pub fn new(final_week: u32) -> Self {
        Self::resume(SeasonState::default(), final_week)
    }

    /// Rebuild a machine for a season already at `state`.
    pub fn resume(state: SeasonState, final_week: u32) -> Self {
        Self {
            state,
            final_week,
            pending: None,
        }
    }

    /// Inspect the current state.
    pub fn state(&self) -> SeasonState {
        self.state
    }

    /// Plan a transition by validating that the event can be applied from the current state.
    pub fn plan(&mut self, event: SeasonEvent) -> Result<Plan, PlanError> {
        if self.pending.is_some() {
            return Err(PlanError::AlreadyPending);
        }

        let next = self
            .compute_transition(event)
            .map_err(PlanError::InvalidTransition)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            from: self.state,
            to: next,
            event,
        };

        self.pending = Some(plan.clone());

        Ok(plan)
    }

    /// Apply a planned transition, returning the new state.
    pub fn apply(&mut self, plan_id: PlanId) -> Result<SeasonState, ApplyError> {
        let plan = self.pending.take().ok_or(ApplyError::NoPending)?;

        if plan.id != plan_id {
            let expected_plan_id = plan.id;
            self.pending = Some(plan);
            return Err(ApplyError::IdMismatch {
                expected: expected_plan_id,
                got: plan_id,
            });
        }

        if self.state != plan.from {
            return Err(ApplyError::StateMismatch {
                expected: plan.from,
                actual: self.state,
            });
        }

        self.state = plan.to;
        Ok(self.state)
    }

    /// Abort a planned transition without applying it.
    pub fn abort(&mut self, plan_id: PlanId) -> Result<(), AbortError> {
        let plan = self.pending.as_ref().ok_or(AbortError::NoPending)?;

        if plan.id != plan_id {
            return Err(AbortError::IdMismatch {
                expected: plan.id,
                got: plan_id,
            });
        }

        self.pending = None;
        Ok(())
    }

    /// Compute the next state for an event if the transition is legal.
    fn compute_transition(&self, event: SeasonEvent) -> Result<SeasonState, InvalidTransition> {
        use SeasonPhase::*;

        let invalid = || InvalidTransition {
            from: self.state.position,
            status: self.state.status,
            event,
        };

        if self.state.status == SeasonStatus::Completed && !matches!(event, SeasonEvent::Rollback(_))
        {
            return Err(invalid());
        }

        let SeasonPosition { week, phase } = self.state.position;
        let at = |week, phase| SeasonPosition::new(week, phase);

        let next = match (phase, event) {
            (SeasonSetup, SeasonEvent::StartDraft) => self.with_position(at(0, Drafting)),
            (Drafting, SeasonEvent::CompleteDraft) => self.with_position(at(0, AdvantageSelection)),
            (AdvantageSelection, SeasonEvent::CompleteAdvantageSelection) => {
                self.with_position(at(0, ReadyForWeek1))
            }
            (ReadyForWeek1, SeasonEvent::StartSeason) => SeasonState {
                position: at(1, InSeasonChallengeSelection),
                status: SeasonStatus::InProgress,
            },
            (InSeasonChallengeSelection, SeasonEvent::OpenSubmissions) => {
                self.with_position(at(week, PlaylistSubmission))
            }
            (PlaylistSubmission, SeasonEvent::StartPresentation) => {
                self.with_position(at(week, PlaylistPresentation))
            }
            (PlaylistPresentation, SeasonEvent::OpenVoting) => self.with_position(at(week, Voting)),
            (Voting, SeasonEvent::CloseVoting) => self.with_position(at(week, InSeasonWeekEnd)),
            (InSeasonWeekEnd, SeasonEvent::StartRosterEvolution) if week < self.final_week => {
                self.with_position(at(week, RosterEvolution))
            }
            (RosterEvolution, SeasonEvent::FinishRosterEvolution) => {
                self.with_position(at(week, WeekTransition))
            }
            (WeekTransition, SeasonEvent::StartNextWeek) => {
                self.with_position(at(week + 1, InSeasonChallengeSelection))
            }
            (InSeasonWeekEnd, SeasonEvent::CompleteSeason) if week >= self.final_week => {
                SeasonState {
                    position: self.state.position,
                    status: SeasonStatus::Completed,
                }
            }
            (_, SeasonEvent::Rollback(target)) if target <= self.state.position => SeasonState {
                position: target,
                status: if target.week == 0 {
                    SeasonStatus::Preseason
                } else {
                    SeasonStatus::InProgress
                },
            },
            _ => return Err(invalid()),
        };

        Ok(next)
    }

    fn with_position(&self, position: SeasonPosition) -> SeasonState {
        SeasonState {
            position,
            status: self.state.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut SeasonStateMachine, event: SeasonEvent) -> SeasonState {
        let plan = sm.plan(event).unwrap();
        sm.apply(plan.id).unwrap()
    }

    #[test]
    fn initial_state_is_setup_week_zero() {
        let sm = SeasonStateMachine::new(8);
        assert_eq!(sm.state().position, SeasonPosition::initial());
        assert_eq!(sm.state().status, SeasonStatus::Preseason);
    }

    #[test]
    fn phases_order_canonically_within_and_across_weeks() {
        assert!(SeasonPhase::SeasonSetup < SeasonPhase::Drafting);
        assert!(SeasonPhase::RosterEvolution < SeasonPhase::WeekTransition);
        assert!(
            SeasonPosition::new(2, SeasonPhase::WeekTransition)
                < SeasonPosition::new(3, SeasonPhase::InSeasonChallengeSelection)
        );
        assert!(
            SeasonPosition::new(0, SeasonPhase::ReadyForWeek1)
                < SeasonPosition::new(1, SeasonPhase::InSeasonChallengeSelection)
        );
    }

    #[test]
    fn full_cycle_through_two_week_season() {
        let mut sm = SeasonStateMachine::new(2);

        apply(&mut sm, SeasonEvent::StartDraft);
        apply(&mut sm, SeasonEvent::CompleteDraft);
        apply(&mut sm, SeasonEvent::CompleteAdvantageSelection);
        let started = apply(&mut sm, SeasonEvent::StartSeason);
        assert_eq!(
            started.position,
            SeasonPosition::new(1, SeasonPhase::InSeasonChallengeSelection)
        );
        assert_eq!(started.status, SeasonStatus::InProgress);

        for event in [
            SeasonEvent::OpenSubmissions,
            SeasonEvent::StartPresentation,
            SeasonEvent::OpenVoting,
            SeasonEvent::CloseVoting,
            SeasonEvent::StartRosterEvolution,
            SeasonEvent::FinishRosterEvolution,
        ] {
            apply(&mut sm, event);
        }

        let week_two = apply(&mut sm, SeasonEvent::StartNextWeek);
        assert_eq!(
            week_two.position,
            SeasonPosition::new(2, SeasonPhase::InSeasonChallengeSelection)
        );

        for event in [
            SeasonEvent::OpenSubmissions,
            SeasonEvent::StartPresentation,
            SeasonEvent::OpenVoting,
            SeasonEvent::CloseVoting,
        ] {
            apply(&mut sm, event);
        }

        let err = sm.plan(SeasonEvent::StartRosterEvolution).unwrap_err();
        assert!(matches!(err, PlanError::InvalidTransition(_)));

        let done = apply(&mut sm, SeasonEvent::CompleteSeason);
        assert_eq!(done.status, SeasonStatus::Completed);
        assert_eq!(done.position.phase, SeasonPhase::InSeasonWeekEnd);
    }

    #[test]
    fn complete_season_rejected_before_final_week() {
        let state = SeasonState {
            position: SeasonPosition::new(1, SeasonPhase::InSeasonWeekEnd),
            status: SeasonStatus::InProgress,
        };
        let mut sm = SeasonStateMachine::resume(state, 3);
        assert!(sm.plan(SeasonEvent::CompleteSeason).is_err());
    }

    #[test]
    fn completed_season_rejects_forward_events() {
        let state = SeasonState {
            position: SeasonPosition::new(3, SeasonPhase::InSeasonWeekEnd),
            status: SeasonStatus::Completed,
        };
        let mut sm = SeasonStateMachine::resume(state, 3);
        assert!(sm.plan(SeasonEvent::StartRosterEvolution).is_err());
        assert!(sm.plan(SeasonEvent::CompleteSeason).is_err());
    }

    #[test]
    fn skipping_a_phase_is_invalid() {
        let mut sm = SeasonStateMachine::new(4);
        let err = sm.plan(SeasonEvent::CompleteDraft).unwrap_err();
        match err {
            PlanError::InvalidTransition(invalid) => {
                assert_eq!(invalid.from, SeasonPosition::initial());
                assert_eq!(invalid.event, SeasonEvent::CompleteDraft);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rollback_only_moves_backwards() {
        let state = SeasonState {
            position: SeasonPosition::new(5, SeasonPhase::Voting),
            status: SeasonStatus::InProgress,
        };
        let mut sm = SeasonStateMachine::resume(state, 8);

        let forward = SeasonPosition::new(6, SeasonPhase::InSeasonChallengeSelection);
        assert!(sm.plan(SeasonEvent::Rollback(forward)).is_err());

        let back = SeasonPosition::new(3, SeasonPhase::InSeasonChallengeSelection);
        let next = apply(&mut sm, SeasonEvent::Rollback(back));
        assert_eq!(next.position, back);
        assert_eq!(next.status, SeasonStatus::InProgress);
    }

    #[test]
    fn rollback_to_preseason_resets_status() {
        let state = SeasonState {
            position: SeasonPosition::new(4, SeasonPhase::InSeasonWeekEnd),
            status: SeasonStatus::Completed,
        };
        let mut sm = SeasonStateMachine::resume(state, 4);
        let next = apply(
            &mut sm,
            SeasonEvent::Rollback(SeasonPosition::new(0, SeasonPhase::Drafting)),
        );
        assert_eq!(next.status, SeasonStatus::Preseason);
    }

    #[test]
    fn second_plan_while_pending_is_rejected() {
        let mut sm = SeasonStateMachine::new(4);
        sm.plan(SeasonEvent::StartDraft).unwrap();
        assert_eq!(
            sm.plan(SeasonEvent::StartDraft).unwrap_err(),
            PlanError::AlreadyPending
        );
    }

    #[test]
    fn machine_errors_render_for_rollback_reports() {
        let mut sm = SeasonStateMachine::new(4);
        let err = sm.plan(SeasonEvent::CloseVoting).unwrap_err();
        assert!(err.to_string().contains("CloseVoting"));
        assert_eq!(
            ApplyError::NoPending.to_string(),
            "no transition is pending"
        );
    }

    #[test]
    fn abort_clears_pending() {
        let mut sm = SeasonStateMachine::new(4);
        let plan = sm.plan(SeasonEvent::StartDraft).unwrap();
        sm.abort(plan.id).unwrap();
        assert_eq!(sm.state().position, SeasonPosition::initial());
        assert!(sm.plan(SeasonEvent::StartDraft).is_ok());
    }

    #[test]
    fn apply_with_wrong_id_keeps_plan_pending() {
        let mut sm = SeasonStateMachine::new(4);
        let plan = sm.plan(SeasonEvent::StartDraft).unwrap();
        let err = sm.apply(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApplyError::IdMismatch { .. }));
        let next = sm.apply(plan.id).unwrap();
        assert_eq!(next.position.phase, SeasonPhase::Drafting);
    }
}
