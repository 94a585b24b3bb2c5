use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Record Label League server.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::season_stream,
        crate::routes::leagues::create_league,
        crate::routes::leagues::get_league,
        crate::routes::leagues::add_member,
        crate::routes::leagues::list_seasons,
        crate::routes::leagues::create_season,
        crate::routes::seasons::get_season,
        crate::routes::seasons::join_season,
        crate::routes::seasons::transition,
        crate::routes::draft::get_draft,
        crate::routes::draft::set_order,
        crate::routes::draft::make_pick,
        crate::routes::draft::select_advantage,
        crate::routes::draft::use_advantage,
        crate::routes::weeks::current_week,
        crate::routes::weeks::select_challenge,
        crate::routes::weeks::submit_playlist,
        crate::routes::weeks::next_presenter,
        crate::routes::weeks::cast_vote,
        crate::routes::evolution::set_prompt,
        crate::routes::evolution::cut_artist,
        crate::routes::evolution::pool_pick,
        crate::routes::evolution::redraft,
        crate::routes::evolution::list_pool,
        crate::routes::board::library,
        crate::routes::board::get_board,
        crate::routes::board::add_category,
        crate::routes::board::delete_category,
        crate::routes::board::add_challenge,
        crate::routes::board::reorder_challenges,
        crate::routes::board::remove_challenge,
        crate::routes::board::lock_board,
        crate::routes::board::unlock_board,
        crate::routes::checkpoints::list_checkpoints,
        crate::routes::checkpoints::apply_checkpoint,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ArtistDto,
            crate::dto::common::PositionDto,
            crate::dto::common::RosterEntryDto,
            crate::dto::common::AdvantageDto,
            crate::dto::league::CreateLeagueRequest,
            crate::dto::league::AddMemberRequest,
            crate::dto::league::LeagueMemberDto,
            crate::dto::league::LeagueResponse,
            crate::dto::season::CreateSeasonRequest,
            crate::dto::season::JoinSeasonRequest,
            crate::dto::season::JoinSeasonResponse,
            crate::dto::season::SeasonListItem,
            crate::dto::season::SeasonPlayerDto,
            crate::dto::season::SeasonEventDto,
            crate::dto::season::SeasonResponse,
            crate::dto::season::TransitionResponse,
            crate::dto::phase::PhaseEventDto,
            crate::dto::draft::DraftOrderRequest,
            crate::dto::draft::DraftPickRequest,
            crate::dto::draft::SelectAdvantageRequest,
            crate::dto::draft::DraftSlotDto,
            crate::dto::draft::DraftPickDto,
            crate::dto::draft::NextPickDto,
            crate::dto::draft::DraftResponse,
            crate::dto::week::SelectChallengeRequest,
            crate::dto::week::SubmitPlaylistRequest,
            crate::dto::week::VoteRequest,
            crate::dto::week::ChallengeSelectionDto,
            crate::dto::week::SubmissionDto,
            crate::dto::week::PresenterResponse,
            crate::dto::week::VoteDto,
            crate::dto::week::WeekResultDto,
            crate::dto::week::WeekResponse,
            crate::dto::evolution::EvolutionPromptRequest,
            crate::dto::evolution::EvolutionPromptResponse,
            crate::dto::evolution::CutArtistRequest,
            crate::dto::evolution::PoolPickRequest,
            crate::dto::evolution::RedraftRequest,
            crate::dto::pool::PoolEntryDto,
            crate::dto::pool::PoolResponse,
            crate::dto::board::AddCategoryRequest,
            crate::dto::board::AddChallengeRequest,
            crate::dto::board::ReorderChallengesRequest,
            crate::dto::board::BoardChallengeDto,
            crate::dto::board::BoardCategoryDto,
            crate::dto::board::BoardResponse,
            crate::dto::library::LibraryChallengeDto,
            crate::dto::library::LibraryCategoryDto,
            crate::dto::library::LibraryResponse,
            crate::dto::checkpoint::CheckpointDto,
            crate::dto::checkpoint::CheckpointListResponse,
            crate::dto::checkpoint::RollbackCountsDto,
            crate::dto::checkpoint::RollbackResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::SeasonUpdatedEvent,
            crate::dto::sse::RollbackAppliedEvent,
            crate::dao::models::MemberRole,
            crate::dao::models::BoardChallengeStatus,
            crate::dao::models::AcquisitionKind,
            crate::dao::models::PoolEntryReason,
            crate::dao::models::GameEventKind,
            crate::state::pool::PoolCategory,
            crate::state::state_machine::SeasonPhase,
            crate::state::state_machine::SeasonStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "leagues", description = "Leagues and their members"),
        (name = "seasons", description = "Season creation, membership and views"),
        (name = "phases", description = "Phase transitions"),
        (name = "draft", description = "Snake draft and advantages"),
        (name = "weeks", description = "Weekly challenge, submissions, presentation and voting"),
        (name = "evolution", description = "Roster evolution and the artist pool"),
        (name = "board", description = "Challenge board and canonical library"),
        (name = "checkpoints", description = "Checkpoints and rollback"),
    )
)]
pub struct ApiDoc;
