use serde::Deserialize;
use utoipa::ToSchema;

use crate::state::state_machine::SeasonEvent;

/// Transitions exposed on `/seasons/{id}/phase/{event}`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseEventDto {
    StartDraft,
    CompleteDraft,
    CompleteAdvantageSelection,
    StartSeason,
    OpenSubmissions,
    StartPresentation,
    OpenVoting,
    CloseVoting,
    StartRosterEvolution,
    FinishRosterEvolution,
    StartNextWeek,
    CompleteSeason,
}

impl From<PhaseEventDto> for SeasonEvent {
    fn from(value: PhaseEventDto) -> Self {
        match value {
            PhaseEventDto::StartDraft => SeasonEvent::StartDraft,
            PhaseEventDto::CompleteDraft => SeasonEvent::CompleteDraft,
            PhaseEventDto::CompleteAdvantageSelection => SeasonEvent::CompleteAdvantageSelection,
            PhaseEventDto::StartSeason => SeasonEvent::StartSeason,
            PhaseEventDto::OpenSubmissions => SeasonEvent::OpenSubmissions,
            PhaseEventDto::StartPresentation => SeasonEvent::StartPresentation,
            PhaseEventDto::OpenVoting => SeasonEvent::OpenVoting,
            PhaseEventDto::CloseVoting => SeasonEvent::CloseVoting,
            PhaseEventDto::StartRosterEvolution => SeasonEvent::StartRosterEvolution,
            PhaseEventDto::FinishRosterEvolution => SeasonEvent::FinishRosterEvolution,
            PhaseEventDto::StartNextWeek => SeasonEvent::StartNextWeek,
            PhaseEventDto::CompleteSeason => SeasonEvent::CompleteSeason,
        }
    }
}
