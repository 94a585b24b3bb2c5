use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{common::ArtistDto, validation::validate_not_blank};

/// Prompt of the current roster-evolution week.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EvolutionPromptRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 280))]
    pub prompt: String,
}

/// Cut an artist from a roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CutArtistRequest {
    pub roster_entry_id: Uuid,
}

/// Pick an artist out of the pool.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PoolPickRequest {
    pub pool_entry_id: Uuid,
}

/// Sign a fresh artist.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RedraftRequest {
    #[validate(nested)]
    pub artist: ArtistDto,
}

/// Prompt stored for a week.
#[derive(Debug, Serialize, ToSchema)]
pub struct EvolutionPromptResponse {
    pub week: u32,
    pub prompt: String,
}
