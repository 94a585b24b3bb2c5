//! Snake draft ordering.
//!
//! Rounds come in pairs. Pair `k` starts with the player at rotation offset
//! `k mod P`; the first round of the pair walks forward from that offset and the
//! second walks the exact same order backwards.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    dao::models::SeasonEntity,
    state::rules::{RuleError, RuleResult},
};

/// A slot in the pick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickSlot {
    /// 1-based overall pick number.
    pub overall: u32,
    /// 1-based round.
    pub round: u32,
    /// 1-based pick inside the round.
    pub pick_in_round: u32,
    /// 0-based index into the draft-ordered player list.
    pub player_index: usize,
}

/// Draft-ordered player indices for a 0-based round.
pub fn round_order(player_count: usize, round: u32) -> Vec<usize> {
    if player_count == 0 {
        return Vec::new();
    }

    let round = round as usize;
    let offset = (round / 2) % player_count;
    let forward = (0..player_count).map(|step| (offset + step) % player_count);

    if round % 2 == 0 {
        forward.collect()
    } else {
        let mut order: Vec<usize> = forward.collect();
        order.reverse();
        order
    }
}

/// Slot for a 0-based overall pick index.
pub fn slot_for_pick(player_count: usize, pick_index: u32) -> Option<PickSlot> {
    if player_count == 0 {
        return None;
    }

    let per_round = player_count as u32;
    let round = pick_index / per_round;
    let in_round = (pick_index % per_round) as usize;
    let player_index = *round_order(player_count, round).get(in_round)?;

    Some(PickSlot {
        overall: pick_index + 1,
        round: round + 1,
        pick_in_round: in_round as u32 + 1,
        player_index,
    })
}

/// Full pick sequence for `rounds` rounds.
pub fn pick_sequence(player_count: usize, rounds: u32) -> Vec<PickSlot> {
    let total = player_count as u32 * rounds;
    (0..total)
        .filter_map(|index| slot_for_pick(player_count, index))
        .collect()
}

/// Reassign draft positions from a full ordered list of season player ids.
///
/// Only legal during season setup. Positions become the 1-based index in the
/// supplied order, so applying the same order twice is a no-op.
pub fn reorder_players(season: &mut SeasonEntity, ordered_ids: &[Uuid]) -> RuleResult<()> {
    if season.current_phase != crate::state::state_machine::SeasonPhase::SeasonSetup {
        return Err(RuleError::transition(
            "draft order can only be changed during season setup",
        ));
    }

    if ordered_ids.len() != season.players.len() {
        return Err(RuleError::input(format!(
            "expected {} player ids, got {}",
            season.players.len(),
            ordered_ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !seen.insert(*id) {
            return Err(RuleError::input(format!("player `{id}` listed twice")));
        }
        if season.player(*id).is_none() {
            return Err(RuleError::not_found(format!(
                "player `{id}` is not part of this season"
            )));
        }
    }

    for (index, id) in ordered_ids.iter().enumerate() {
        if let Some(player) = season.players.iter_mut().find(|player| player.id == *id) {
            player.draft_position = Some(index as u32 + 1);
        }
    }

    Ok(())
}

/// Give every player lacking a draft slot the next free one, in join order.
pub fn fill_missing_positions(season: &mut SeasonEntity) {
    let mut next = season
        .players
        .iter()
        .filter_map(|player| player.draft_position)
        .max()
        .unwrap_or(0);

    for player in season
        .players
        .iter_mut()
        .filter(|player| player.draft_position.is_none())
    {
        next += 1;
        player.draft_position = Some(next);
    }
}
