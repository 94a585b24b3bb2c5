//! Challenge board rules: board-wide canonical uniqueness, dense per-category
//! ordering and the lock invariant.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    dao::models::{
        BoardCategoryEntity, BoardChallengeEntity, BoardChallengeStatus, ChallengeBoardEntity,
    },
    state::{
        library::ChallengeLibrary,
        rules::{RuleError, RuleResult},
    },
};

/// Minimum number of challenges a board needs before it can be locked.
pub const MIN_CHALLENGES_TO_LOCK: usize = 15;

impl ChallengeBoardEntity {
    /// Empty, unlocked board.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_locked: false,
            categories: Vec::new(),
            challenges: Vec::new(),
        }
    }

    /// Total number of challenges across all categories.
    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }

    /// Challenges of a category sorted by their order.
    pub fn challenges_in(&self, category_id: Uuid) -> Vec<&BoardChallengeEntity> {
        let mut challenges: Vec<&BoardChallengeEntity> = self
            .challenges
            .iter()
            .filter(|challenge| challenge.category_id == category_id)
            .collect();
        challenges.sort_by_key(|challenge| challenge.order);
        challenges
    }

    /// Find a board challenge by id.
    pub fn challenge(&self, id: Uuid) -> Option<&BoardChallengeEntity> {
        self.challenges.iter().find(|challenge| challenge.id == id)
    }

    fn ensure_unlocked(&self) -> RuleResult<()> {
        if self.is_locked {
            return Err(RuleError::transition(
                "challenge board is locked; unlock it before editing",
            ));
        }
        Ok(())
    }

    fn category(&self, id: Uuid) -> RuleResult<&BoardCategoryEntity> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .ok_or_else(|| RuleError::not_found(format!("category `{id}` not found on board")))
    }

    /// Add a category named after a canonical library category.
    pub fn add_category(
        &mut self,
        library: &ChallengeLibrary,
        name: &str,
    ) -> RuleResult<BoardCategoryEntity> {
        self.ensure_unlocked()?;

        let canonical = library
            .category(name)
            .ok_or_else(|| RuleError::not_found(format!("unknown category `{}`", name.trim())))?;

        if self
            .categories
            .iter()
            .any(|category| category.title.eq_ignore_ascii_case(&canonical.name))
        {
            return Err(RuleError::duplicate(format!(
                "category `{}` is already on the board",
                canonical.name
            )));
        }

        let category = BoardCategoryEntity {
            id: Uuid::new_v4(),
            title: canonical.name.clone(),
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Remove a category together with its challenges.
    pub fn delete_category(&mut self, category_id: Uuid) -> RuleResult<()> {
        self.ensure_unlocked()?;
        let category = self.category(category_id)?;
        if self
            .challenges_in(category_id)
            .iter()
            .any(|challenge| challenge.status == BoardChallengeStatus::Selected)
        {
            return Err(RuleError::transition(format!(
                "category `{}` holds a challenge already played this season",
                category.title
            )));
        }

        self.categories.retain(|category| category.id != category_id);
        self.challenges
            .retain(|challenge| challenge.category_id != category_id);
        Ok(())
    }

    /// Append a canonical challenge to a category.
    pub fn add_challenge(
        &mut self,
        library: &ChallengeLibrary,
        category_id: Uuid,
        canonical_challenge_id: &str,
    ) -> RuleResult<BoardChallengeEntity> {
        self.ensure_unlocked()?;
        let category = self.category(category_id)?;

        let (canonical_category, canonical) = library
            .challenge(canonical_challenge_id)
            .ok_or_else(|| {
                RuleError::not_found(format!("unknown challenge `{canonical_challenge_id}`"))
            })?;

        if self
            .challenges
            .iter()
            .any(|challenge| challenge.canonical_challenge_id == canonical.id)
        {
            return Err(RuleError::duplicate(format!(
                "challenge `{}` is already on the board",
                canonical.id
            )));
        }

        if !canonical_category.name.eq_ignore_ascii_case(&category.title) {
            return Err(RuleError::input(format!(
                "challenge `{}` belongs to category `{}`, not `{}`",
                canonical.id, canonical_category.name, category.title
            )));
        }

        let challenge = BoardChallengeEntity {
            id: Uuid::new_v4(),
            category_id,
            canonical_challenge_id: canonical.id.clone(),
            order: self.challenges_in(category_id).len() as u32,
            status: BoardChallengeStatus::Open,
            selected_week: None,
        };
        self.challenges.push(challenge.clone());
        Ok(challenge)
    }

    /// Remove a challenge and close the gap it leaves in its category.
    pub fn remove_challenge(&mut self, challenge_id: Uuid) -> RuleResult<()> {
        self.ensure_unlocked()?;

        let challenge = self
            .challenge(challenge_id)
            .ok_or_else(|| RuleError::not_found(format!("challenge `{challenge_id}` not found")))?;
        if challenge.status == BoardChallengeStatus::Selected {
            return Err(RuleError::transition(format!(
                "challenge `{}` was played in week {} and cannot be removed",
                challenge.canonical_challenge_id,
                challenge.selected_week.unwrap_or_default()
            )));
        }
        let category_id = challenge.category_id;

        self.challenges.retain(|challenge| challenge.id != challenge_id);
        self.renumber(category_id);
        Ok(())
    }

    /// Replace the order of a category with the caller's full id list.
    pub fn reorder(&mut self, category_id: Uuid, ordered_ids: &[Uuid]) -> RuleResult<()> {
        self.ensure_unlocked()?;
        self.category(category_id)?;

        let current: HashSet<Uuid> = self
            .challenges
            .iter()
            .filter(|challenge| challenge.category_id == category_id)
            .map(|challenge| challenge.id)
            .collect();
        let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();

        if requested.len() != ordered_ids.len() {
            return Err(RuleError::input("reorder list contains duplicate ids"));
        }
        if requested != current {
            return Err(RuleError::conflict(format!(
                "reorder list does not match the {} challenges now in the category",
                current.len()
            )));
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(challenge) = self.challenges.iter_mut().find(|c| c.id == *id) {
                challenge.order = index as u32;
            }
        }
        Ok(())
    }

    /// Lock the board; requires [`MIN_CHALLENGES_TO_LOCK`] challenges.
    pub fn lock(&mut self) -> RuleResult<()> {
        let count = self.challenge_count();
        if count < MIN_CHALLENGES_TO_LOCK {
            return Err(RuleError::transition(format!(
                "board needs at least {MIN_CHALLENGES_TO_LOCK} challenges to lock, has {count}"
            )));
        }
        self.is_locked = true;
        Ok(())
    }

    /// Return the board to an editable state.
    pub fn unlock(&mut self) {
        self.is_locked = false;
    }

    fn renumber(&mut self, category_id: Uuid) {
        let ordered: Vec<Uuid> = self
            .challenges_in(category_id)
            .into_iter()
            .map(|challenge| challenge.id)
            .collect();
        for (index, id) in ordered.iter().enumerate() {
            if let Some(challenge) = self.challenges.iter_mut().find(|c| c.id == *id) {
                challenge.order = index as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures;

    fn board_with(library: &ChallengeLibrary, count: usize) -> ChallengeBoardEntity {
        let mut board = ChallengeBoardEntity::empty();
        let mut added = 0;
        for canonical in library.categories() {
            let category = board.add_category(library, &canonical.name).unwrap();
            for challenge in &canonical.challenges {
                if added == count {
                    return board;
                }
                board.add_challenge(library, category.id, &challenge.id).unwrap();
                added += 1;
            }
        }
        board
    }

    fn orders(board: &ChallengeBoardEntity, category_id: Uuid) -> Vec<u32> {
        board
            .challenges_in(category_id)
            .iter()
            .map(|challenge| challenge.order)
            .collect()
    }

    #[test]
    fn locking_with_fourteen_fails_and_fifteen_succeeds() {
        let library = fixtures::library();
        let mut board = board_with(&library, 14);
        assert_eq!(board.challenge_count(), 14);
        assert!(matches!(board.lock(), Err(RuleError::InvalidTransition(_))));
        assert!(!board.is_locked);

        let mut board = board_with(&library, 15);
        board.lock().unwrap();
        assert!(board.is_locked);
    }

    #[test]
    fn locked_board_rejects_every_edit() {
        let library = fixtures::library();
        let mut board = board_with(&library, 15);
        board.lock().unwrap();
        let category_id = board.categories[0].id;
        let challenge_id = board.challenges[0].id;
        let ids: Vec<Uuid> = board.challenges_in(category_id).iter().map(|c| c.id).collect();

        assert!(board.add_category(&library, "Wildcards").is_err());
        assert!(board.delete_category(category_id).is_err());
        assert!(board.remove_challenge(challenge_id).is_err());
        assert!(board.reorder(category_id, &ids).is_err());

        let before = board.clone();
        board.unlock();
        assert!(!board.is_locked);
        assert_eq!(board.challenges, before.challenges);
        board.remove_challenge(challenge_id).unwrap();
    }

    #[test]
    fn same_canonical_challenge_in_two_categories_is_duplicate() {
        let library = fixtures::library();
        let mut board = ChallengeBoardEntity::empty();
        let decades = board.add_category(&library, "Decades").unwrap();
        board.add_challenge(&library, decades.id, "decades-1").unwrap();

        let err = board.add_challenge(&library, decades.id, "decades-1").unwrap_err();
        assert!(matches!(err, RuleError::Duplicate(_)));

        let mut other = ChallengeBoardEntity::empty();
        let a = other.add_category(&library, "Decades").unwrap();
        let b = other.add_category(&library, "Moods").unwrap();
        other.add_challenge(&library, a.id, "decades-1").unwrap();
        let err = other.add_challenge(&library, b.id, "decades-1").unwrap_err();
        assert!(matches!(err, RuleError::Duplicate(_)));
    }

    #[test]
    fn duplicate_category_name_is_rejected() {
        let library = fixtures::library();
        let mut board = ChallengeBoardEntity::empty();
        board.add_category(&library, "Moods").unwrap();
        assert!(matches!(
            board.add_category(&library, "moods"),
            Err(RuleError::Duplicate(_))
        ));
    }

    #[test]
    fn reorder_renumbers_densely_from_zero() {
        let library = fixtures::library();
        let mut board = ChallengeBoardEntity::empty();
        let category = board.add_category(&library, "Decades").unwrap();
        for id in ["decades-1", "decades-2", "decades-3", "decades-4"] {
            board.add_challenge(&library, category.id, id).unwrap();
        }

        let mut ids: Vec<Uuid> = board.challenges_in(category.id).iter().map(|c| c.id).collect();
        ids.rotate_left(1);
        board.reorder(category.id, &ids).unwrap();

        let reordered: Vec<Uuid> = board.challenges_in(category.id).iter().map(|c| c.id).collect();
        assert_eq!(reordered, ids);
        assert_eq!(orders(&board, category.id), vec![0, 1, 2, 3]);

        board.remove_challenge(ids[1]).unwrap();
        assert_eq!(orders(&board, category.id), vec![0, 1, 2]);
    }

    #[test]
    fn reorder_requires_exact_membership() {
        let library = fixtures::library();
        let mut board = ChallengeBoardEntity::empty();
        let category = board.add_category(&library, "Decades").unwrap();
        for id in ["decades-1", "decades-2"] {
            board.add_challenge(&library, category.id, id).unwrap();
        }
        let ids: Vec<Uuid> = board.challenges_in(category.id).iter().map(|c| c.id).collect();

        assert!(matches!(
            board.reorder(category.id, &[ids[0], ids[0]]),
            Err(RuleError::InvalidInput(_))
        ));
        assert!(matches!(
            board.reorder(category.id, &[ids[0], Uuid::new_v4()]),
            Err(RuleError::Conflict(_))
        ));

        board.add_challenge(&library, category.id, "decades-3").unwrap();
        assert!(matches!(
            board.reorder(category.id, &ids),
            Err(RuleError::Conflict(_))
        ));
    }

    #[test]
    fn played_challenges_survive_an_unlocked_board() {
        let library = fixtures::library();
        let mut board = board_with(&library, 15);
        let category_id = board.categories[0].id;
        let played = board.challenges_in(category_id)[0].id;
        let unplayed = board.challenges_in(category_id)[1].id;
        if let Some(challenge) = board.challenges.iter_mut().find(|c| c.id == played) {
            challenge.status = BoardChallengeStatus::Selected;
            challenge.selected_week = Some(1);
        }

        assert!(matches!(
            board.remove_challenge(played),
            Err(RuleError::InvalidTransition(_))
        ));
        assert!(matches!(
            board.delete_category(category_id),
            Err(RuleError::InvalidTransition(_))
        ));
        assert_eq!(board.challenge_count(), 15);

        board.remove_challenge(unplayed).unwrap();
        assert_eq!(orders(&board, category_id), vec![0, 1, 2, 3]);
    }

    #[test]
    fn deleting_a_category_drops_its_challenges() {
        let library = fixtures::library();
        let mut board = board_with(&library, 6);
        let category_id = board.categories[0].id;
        board.delete_category(category_id).unwrap();
        assert!(board.challenges_in(category_id).is_empty());
        assert!(board.categories.iter().all(|c| c.id != category_id));
    }
}
