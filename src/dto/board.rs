use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{BoardChallengeEntity, BoardChallengeStatus, ChallengeBoardEntity},
    dto::validation::validate_not_blank,
    state::library::ChallengeLibrary,
};

/// Add a category named after a canonical category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddCategoryRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

/// Place a canonical challenge into a category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddChallengeRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub canonical_challenge_id: String,
}

/// Full ordered list of a category's challenge ids.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReorderChallengesRequest {
    pub challenge_ids: Vec<Uuid>,
}

/// Challenge placed on the board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardChallengeDto {
    pub id: Uuid,
    pub canonical_challenge_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: u32,
    pub status: BoardChallengeStatus,
    pub selected_week: Option<u32>,
}

impl BoardChallengeDto {
    /// Resolve a board challenge against the canonical library.
    pub fn build(library: &ChallengeLibrary, challenge: &BoardChallengeEntity) -> Self {
        let canonical = library
            .challenge(&challenge.canonical_challenge_id)
            .map(|(_, canonical)| canonical);
        Self {
            id: challenge.id,
            canonical_challenge_id: challenge.canonical_challenge_id.clone(),
            title: canonical.map(|c| c.title.clone()),
            description: canonical.map(|c| c.description.clone()),
            order: challenge.order,
            status: challenge.status,
            selected_week: challenge.selected_week,
        }
    }
}

/// Category column with its challenges in order.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardCategoryDto {
    pub id: Uuid,
    pub title: String,
    pub challenges: Vec<BoardChallengeDto>,
}

/// Challenge board of a season.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    pub id: Uuid,
    pub is_locked: bool,
    pub challenge_count: usize,
    pub categories: Vec<BoardCategoryDto>,
}

impl BoardResponse {
    /// Group the board's challenges under their categories in display order.
    pub fn build(board: &ChallengeBoardEntity, library: &ChallengeLibrary) -> Self {
        let mut grouped: IndexMap<Uuid, BoardCategoryDto> = board
            .categories
            .iter()
            .map(|category| {
                (
                    category.id,
                    BoardCategoryDto {
                        id: category.id,
                        title: category.title.clone(),
                        challenges: Vec::new(),
                    },
                )
            })
            .collect();

        let mut challenges: Vec<&BoardChallengeEntity> = board.challenges.iter().collect();
        challenges.sort_by_key(|challenge| challenge.order);
        for challenge in challenges {
            if let Some(category) = grouped.get_mut(&challenge.category_id) {
                category
                    .challenges
                    .push(BoardChallengeDto::build(library, challenge));
            }
        }

        Self {
            id: board.id,
            is_locked: board.is_locked,
            challenge_count: board.challenge_count(),
            categories: grouped.into_values().collect(),
        }
    }
}
