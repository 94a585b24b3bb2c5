use serde::{Deserialize, Serialize};

/// Challenge from the shared canonical library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalChallenge {
    /// Stable identifier referenced by board challenges.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer prompt shown to players.
    pub description: String,
}

/// Category of the shared canonical library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalCategory {
    /// Unique category name.
    pub name: String,
    /// Challenges belonging to the category.
    pub challenges: Vec<CanonicalChallenge>,
}

/// Read-only lookup over the canonical challenge/category library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeLibrary {
    categories: Vec<CanonicalCategory>,
}

impl ChallengeLibrary {
    /// Wrap a list of categories.
    pub fn new(categories: Vec<CanonicalCategory>) -> Self {
        Self { categories }
    }

    /// All categories in library order.
    pub fn categories(&self) -> &[CanonicalCategory] {
        &self.categories
    }

    /// Find a category by its name, ignoring ASCII case.
    pub fn category(&self, name: &str) -> Option<&CanonicalCategory> {
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Find a challenge and the category it belongs to.
    pub fn challenge(&self, id: &str) -> Option<(&CanonicalCategory, &CanonicalChallenge)> {
        self.categories.iter().find_map(|category| {
            category
                .challenges
                .iter()
                .find(|challenge| challenge.id == id)
                .map(|challenge| (category, challenge))
        })
    }
}
