use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::common::PositionDto,
    state::{
        checkpoint::{Checkpoint, RollbackCounts, RollbackReport},
        state_machine::{SeasonPhase, SeasonStatus},
    },
};

/// Rewind target with its implications.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckpointDto {
    /// Identifier to post back, e.g. `WEEK_3` or `WEEK_2_ROSTER_EVOLUTION`.
    pub id: String,
    pub label: String,
    pub target: PositionDto,
    pub preserves: Vec<String>,
    pub clears: Vec<String>,
    pub is_available: bool,
}

impl From<Checkpoint> for CheckpointDto {
    fn from(checkpoint: Checkpoint) -> Self {
        Self {
            id: checkpoint.id.to_string(),
            label: checkpoint.label,
            target: checkpoint.target.into(),
            preserves: checkpoint.preserves,
            clears: checkpoint.clears,
            is_available: checkpoint.is_available,
        }
    }
}

/// Checkpoints of a season's current state.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckpointListResponse {
    pub phase: SeasonPhase,
    pub week: u32,
    pub checkpoints: Vec<CheckpointDto>,
}

/// Number of records removed or reverted by a rollback.
#[derive(Debug, Serialize, ToSchema)]
pub struct RollbackCountsDto {
    pub votes: usize,
    pub voting_sessions: usize,
    pub week_results: usize,
    pub presentations: usize,
    pub submissions: usize,
    pub challenge_selections: usize,
    pub evolution_prompts: usize,
    pub events: usize,
    pub advantages: usize,
    pub advantage_uses: usize,
    pub roster_entries: usize,
    pub restored_cuts: usize,
    pub pool_entries: usize,
    pub draft_picks: usize,
}

impl From<RollbackCounts> for RollbackCountsDto {
    fn from(counts: RollbackCounts) -> Self {
        Self {
            votes: counts.votes,
            voting_sessions: counts.voting_sessions,
            week_results: counts.week_results,
            presentations: counts.presentations,
            submissions: counts.submissions,
            challenge_selections: counts.challenge_selections,
            evolution_prompts: counts.evolution_prompts,
            events: counts.events,
            advantages: counts.advantages,
            advantage_uses: counts.advantage_uses,
            roster_entries: counts.roster_entries,
            restored_cuts: counts.restored_cuts,
            pool_entries: counts.pool_entries,
            draft_picks: counts.draft_picks,
        }
    }
}

/// Outcome of applying a checkpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct RollbackResponse {
    pub checkpoint: String,
    pub from: PositionDto,
    pub to: PositionDto,
    pub status: SeasonStatus,
    pub version: u64,
    pub removed: RollbackCountsDto,
}

impl RollbackResponse {
    /// Build the response from a report and the committed version.
    pub fn new(report: RollbackReport, version: u64) -> Self {
        Self {
            checkpoint: report.checkpoint.to_string(),
            from: report.from.position.into(),
            to: report.to.position.into(),
            status: report.to.status,
            version,
            removed: report.counts.into(),
        }
    }
}
