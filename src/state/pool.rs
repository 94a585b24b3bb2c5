//! Artist pool bookkeeping and chaos-week categorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dao::models::{PoolEntryEntity, SeasonEntity},
    state::state_machine::SeasonPosition,
};

/// Chaos-week partition of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolCategory {
    /// Entered the pool before the chaos week.
    Old,
    /// Entered the pool during the chaos week.
    New,
}

impl PoolEntryEntity {
    /// Still visible in the pool (not banished).
    pub fn is_listed(&self) -> bool {
        self.banished_at.is_none()
    }

    /// Listed and not yet picked by anyone.
    pub fn is_available(&self) -> bool {
        self.is_listed() && self.drafted.is_none()
    }

    /// Category relative to `chaos_week`.
    pub fn category_for(&self, chaos_week: u32) -> PoolCategory {
        if self.entered_pool_week < chaos_week {
            PoolCategory::Old
        } else {
            PoolCategory::New
        }
    }
}

/// Category of an entry for the season's current week; only defined during a
/// chaos week.
pub fn category(season: &SeasonEntity, entry: &PoolEntryEntity) -> Option<PoolCategory> {
    season
        .is_chaos_week(season.current_week)
        .then(|| entry.category_for(season.current_week))
}

/// Entries currently listed in the pool.
pub fn listed_entries(season: &SeasonEntity) -> impl Iterator<Item = &PoolEntryEntity> {
    season.pool.iter().filter(|entry| entry.is_listed())
}

/// Banish every OLD entry of the chaos week, drafted or not. Returns how many
/// entries were banished.
pub fn banish_old_entries(season: &mut SeasonEntity, chaos_week: u32, at: SeasonPosition) -> usize {
    let mut banished = 0;
    for entry in season
        .pool
        .iter_mut()
        .filter(|entry| entry.is_listed() && entry.category_for(chaos_week) == PoolCategory::Old)
    {
        entry.banished_at = Some(at);
        banished += 1;
    }
    banished
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::{PoolDraftEntity, PoolEntryReason},
        state::{fixtures, state_machine::SeasonPhase},
    };
    use uuid::Uuid;

    fn entry(week: u32) -> PoolEntryEntity {
        PoolEntryEntity {
            id: Uuid::new_v4(),
            artist: fixtures::artist(week as usize + 100),
            entered_pool_week: week,
            entered_via: PoolEntryReason::SelfCut,
            cut_by_player: None,
            cut_from_player: None,
            source_roster_entry_id: Uuid::new_v4(),
            entered_at: SeasonPosition::new(week, SeasonPhase::RosterEvolution),
            drafted: None,
            banished_at: None,
        }
    }

    #[test]
    fn entries_before_chaos_week_are_old_and_during_are_new() {
        let mut season = fixtures::season(2, 3, 8);
        season.current_week = 5;
        let before = entry(4);
        let during = entry(5);

        assert_eq!(category(&season, &before), Some(PoolCategory::Old));
        assert_eq!(category(&season, &during), Some(PoolCategory::New));

        season.current_week = 4;
        assert_eq!(category(&season, &before), None);
    }

    #[test]
    fn banishment_clears_all_old_entries_drafted_or_not() {
        let mut season = fixtures::season(2, 3, 8);
        season.current_week = 5;
        let mut drafted_old = entry(2);
        drafted_old.drafted = Some(PoolDraftEntity {
            by: season.players[0].id,
            at: SeasonPosition::new(5, SeasonPhase::RosterEvolution),
            roster_entry_id: Uuid::new_v4(),
        });
        season.pool = vec![entry(1), drafted_old, entry(4), entry(5), entry(5)];

        let at = SeasonPosition::new(5, SeasonPhase::RosterEvolution);
        assert_eq!(banish_old_entries(&mut season, 5, at), 3);

        let remaining: Vec<_> = listed_entries(&season).collect();
        assert_eq!(remaining.len(), 2);
        assert!(
            remaining
                .iter()
                .all(|entry| category(&season, entry) == Some(PoolCategory::New))
        );
    }

    #[test]
    fn drafted_entries_are_listed_but_unavailable() {
        let mut drafted = entry(3);
        drafted.drafted = Some(PoolDraftEntity {
            by: Uuid::new_v4(),
            at: SeasonPosition::new(3, SeasonPhase::RosterEvolution),
            roster_entry_id: Uuid::new_v4(),
        });
        assert!(drafted.is_listed());
        assert!(!drafted.is_available());
    }
}
