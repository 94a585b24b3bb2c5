/// League and season membership checks.
pub mod access;
/// Challenge board editing and the canonical library.
pub mod board_service;
/// Checkpoint listing and rollback.
pub mod checkpoint_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Snake draft and advantages.
pub mod draft_service;
/// Roster evolution: prompts, cuts, pool picks and redrafts.
pub mod evolution_service;
/// Health check service.
pub mod health_service;
/// League creation and membership.
pub mod league_service;
/// Artist pool views.
pub mod pool_service;
/// Season lifecycle and phase transitions.
pub mod season_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events subscription and streaming.
pub mod sse_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
/// Weekly challenge, submission, presentation and voting.
pub mod week_service;

#[cfg(test)]
pub(crate) mod test_support;
