use serde::Serialize;
use utoipa::ToSchema;

use crate::state::library::{CanonicalCategory, CanonicalChallenge, ChallengeLibrary};

/// Canonical challenge.
#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryChallengeDto {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl From<&CanonicalChallenge> for LibraryChallengeDto {
    fn from(challenge: &CanonicalChallenge) -> Self {
        Self {
            id: challenge.id.clone(),
            title: challenge.title.clone(),
            description: challenge.description.clone(),
        }
    }
}

/// Canonical category.
#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryCategoryDto {
    pub name: String,
    pub challenges: Vec<LibraryChallengeDto>,
}

impl From<&CanonicalCategory> for LibraryCategoryDto {
    fn from(category: &CanonicalCategory) -> Self {
        Self {
            name: category.name.clone(),
            challenges: category.challenges.iter().map(Into::into).collect(),
        }
    }
}

/// Read-only challenge catalogue used to build boards.
#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryResponse {
    pub categories: Vec<LibraryCategoryDto>,
}

impl From<&ChallengeLibrary> for LibraryResponse {
    fn from(library: &ChallengeLibrary) -> Self {
        Self {
            categories: library.categories().iter().map(Into::into).collect(),
        }
    }
}
