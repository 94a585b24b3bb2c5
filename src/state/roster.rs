//! Roster mutations: the initial snake draft and roster evolution (cuts, pool
//! picks and fresh redrafts).

use uuid::Uuid;

use crate::{
    dao::models::{
        AcquisitionKind, ArtistRef, DraftPickEntity, EvolutionPromptEntity, GameEventKind,
        PoolDraftEntity, PoolEntryEntity, PoolEntryReason, RosterCutEntity, RosterEntryEntity,
        SeasonEntity,
    },
    state::{
        draft::{self, PickSlot},
        rules::{RuleError, RuleResult},
        season::{ensure_phase, record_event},
        state_machine::SeasonPhase,
    },
};

/// Next slot of the snake draft together with the player who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPick {
    /// Slot in the pick sequence.
    pub slot: PickSlot,
    /// Season player on the clock.
    pub season_player_id: Uuid,
}

/// Player on the clock, or `None` once every roster is full.
pub fn next_pick(season: &SeasonEntity) -> Option<NextPick> {
    let order = season.players_in_draft_order();
    let total = order.len() as u32 * season.roster_size;
    let made = season.draft_picks.len() as u32;
    if made >= total {
        return None;
    }

    let slot = draft::slot_for_pick(order.len(), made)?;
    order.get(slot.player_index).map(|player| NextPick {
        slot,
        season_player_id: player.id,
    })
}

fn active_holder(season: &SeasonEntity, artist_id: &str) -> Option<Uuid> {
    season
        .roster
        .iter()
        .find(|entry| entry.is_active() && entry.artist.id == artist_id)
        .map(|entry| entry.season_player_id)
}

fn ensure_unsigned(season: &SeasonEntity, artist: &ArtistRef) -> RuleResult<()> {
    if active_holder(season, &artist.id).is_some() {
        return Err(RuleError::duplicate(format!(
            "artist `{}` is already on a roster",
            artist.name
        )));
    }
    Ok(())
}

fn ensure_roster_room(season: &SeasonEntity, season_player_id: Uuid) -> RuleResult<()> {
    let held = season.active_roster(season_player_id).count() as u32;
    if held >= season.roster_size {
        return Err(RuleError::transition(format!(
            "roster already holds {held} of {} artists",
            season.roster_size
        )));
    }
    Ok(())
}

fn ensure_artist(artist: &ArtistRef) -> RuleResult<()> {
    if artist.id.trim().is_empty() || artist.name.trim().is_empty() {
        return Err(RuleError::input("artist id and name must not be empty"));
    }
    Ok(())
}

fn sign(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    artist: ArtistRef,
    acquired_via: AcquisitionKind,
) -> Uuid {
    let entry = RosterEntryEntity {
        id: Uuid::new_v4(),
        season_player_id,
        artist,
        acquired_via,
        acquired_at: season.position(),
        cut: None,
    };
    let id = entry.id;
    season.roster.push(entry);
    id
}

/// Record the pick of the player currently on the clock.
pub fn make_draft_pick(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    artist: ArtistRef,
) -> RuleResult<DraftPickEntity> {
    ensure_phase(season, SeasonPhase::Drafting)?;
    ensure_artist(&artist)?;

    let next = next_pick(season).ok_or_else(|| RuleError::transition("the draft is complete"))?;
    if next.season_player_id != season_player_id {
        return Err(RuleError::forbidden(format!(
            "pick {} belongs to another player",
            next.slot.overall
        )));
    }
    ensure_unsigned(season, &artist)?;

    let roster_entry_id = sign(season, season_player_id, artist.clone(), AcquisitionKind::Draft);
    let pick = DraftPickEntity {
        id: Uuid::new_v4(),
        season_player_id,
        artist,
        round: next.slot.round,
        overall_pick: next.slot.overall,
        roster_entry_id,
        made_at: season.position(),
    };
    season.draft_picks.push(pick.clone());

    record_event(
        season,
        GameEventKind::DraftPick,
        Some(season_player_id),
        format!(
            "pick {} (round {}): {}",
            pick.overall_pick, pick.round, pick.artist.name
        ),
    );
    Ok(pick)
}

/// Store the commissioner's roster-evolution prompt for the current week,
/// replacing an earlier one.
pub fn select_evolution_prompt(
    season: &mut SeasonEntity,
    prompt: &str,
) -> RuleResult<EvolutionPromptEntity> {
    ensure_phase(season, SeasonPhase::RosterEvolution)?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(RuleError::input("prompt must not be empty"));
    }

    let week = season.current_week;
    season.evolution_prompts.retain(|entry| entry.week != week);
    let entity = EvolutionPromptEntity {
        week,
        prompt: prompt.to_owned(),
        selected_at: season.position(),
    };
    season.evolution_prompts.push(entity.clone());
    Ok(entity)
}

/// Cut an artist into the pool.
///
/// `actor` is the cutting player, or `None` for the commissioner. Outside a
/// chaos week cutting someone else's artist spends one of the actor's unused
/// advantages.
pub fn cut_artist(
    season: &mut SeasonEntity,
    actor: Option<Uuid>,
    roster_entry_id: Uuid,
) -> RuleResult<PoolEntryEntity> {
    ensure_phase(season, SeasonPhase::RosterEvolution)?;
    let at = season.position();
    let week = season.current_week;

    let entry = season
        .roster
        .iter()
        .find(|entry| entry.id == roster_entry_id)
        .cloned()
        .ok_or_else(|| RuleError::not_found(format!("roster entry `{roster_entry_id}` not found")))?;
    if !entry.is_active() {
        return Err(RuleError::transition(format!(
            "`{}` was already cut",
            entry.artist.name
        )));
    }

    let owner = entry.season_player_id;
    let reason = if season.is_chaos_week(week) {
        PoolEntryReason::ChaosCut
    } else {
        match actor {
            Some(player) if player != owner => PoolEntryReason::OpponentCut,
            _ => PoolEntryReason::SelfCut,
        }
    };

    if reason == PoolEntryReason::OpponentCut {
        let player = actor.unwrap_or(owner);
        let advantage = season
            .advantages
            .iter_mut()
            .find(|advantage| advantage.season_player_id == player && advantage.used_at.is_none())
            .ok_or_else(|| {
                RuleError::forbidden("cutting an opponent's artist requires an unused advantage")
            })?;
        advantage.used_at = Some(at);
    }

    let pool_entry = PoolEntryEntity {
        id: Uuid::new_v4(),
        artist: entry.artist.clone(),
        entered_pool_week: week,
        entered_via: reason,
        cut_by_player: actor,
        cut_from_player: Some(owner),
        source_roster_entry_id: entry.id,
        entered_at: at,
        drafted: None,
        banished_at: None,
    };

    if let Some(roster_entry) = season.roster.iter_mut().find(|e| e.id == roster_entry_id) {
        roster_entry.cut = Some(RosterCutEntity {
            at,
            cut_by: actor,
            pool_entry_id: pool_entry.id,
        });
    }
    season.pool.push(pool_entry.clone());

    record_event(
        season,
        GameEventKind::ArtistCut,
        Some(owner),
        format!("{} entered the pool ({:?})", entry.artist.name, reason),
    );
    Ok(pool_entry)
}

/// Pick an available artist out of the pool.
pub fn draft_from_pool(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    pool_entry_id: Uuid,
) -> RuleResult<RosterEntryEntity> {
    ensure_phase(season, SeasonPhase::RosterEvolution)?;
    ensure_roster_room(season, season_player_id)?;

    let entry = season
        .pool
        .iter()
        .find(|entry| entry.id == pool_entry_id)
        .ok_or_else(|| RuleError::not_found(format!("pool entry `{pool_entry_id}` not found")))?;
    if !entry.is_available() {
        return Err(RuleError::transition(format!(
            "`{}` is no longer available",
            entry.artist.name
        )));
    }
    let artist = entry.artist.clone();
    ensure_unsigned(season, &artist)?;

    let at = season.position();
    let roster_entry_id = sign(season, season_player_id, artist.clone(), AcquisitionKind::PoolDraft);
    if let Some(entry) = season.pool.iter_mut().find(|entry| entry.id == pool_entry_id) {
        entry.drafted = Some(PoolDraftEntity {
            by: season_player_id,
            at,
            roster_entry_id,
        });
    }

    record_event(
        season,
        GameEventKind::PoolDraft,
        Some(season_player_id),
        format!("{} drafted from the pool", artist.name),
    );
    season
        .roster
        .iter()
        .find(|entry| entry.id == roster_entry_id)
        .cloned()
        .ok_or_else(|| RuleError::not_found("roster entry vanished"))
}

/// Sign an artist that is neither rostered nor waiting in the pool.
pub fn redraft_artist(
    season: &mut SeasonEntity,
    season_player_id: Uuid,
    artist: ArtistRef,
) -> RuleResult<RosterEntryEntity> {
    ensure_phase(season, SeasonPhase::RosterEvolution)?;
    ensure_artist(&artist)?;
    ensure_roster_room(season, season_player_id)?;
    ensure_unsigned(season, &artist)?;

    if season
        .pool
        .iter()
        .any(|entry| entry.is_available() && entry.artist.id == artist.id)
    {
        return Err(RuleError::duplicate(format!(
            "`{}` is in the pool; draft it from there",
            artist.name
        )));
    }

    let name = artist.name.clone();
    let roster_entry_id = sign(season, season_player_id, artist, AcquisitionKind::Redraft);
    record_event(
        season,
        GameEventKind::Redraft,
        Some(season_player_id),
        format!("{name} signed"),
    );
    season
        .roster
        .iter()
        .find(|entry| entry.id == roster_entry_id)
        .cloned()
        .ok_or_else(|| RuleError::not_found("roster entry vanished"))
}

/// Whether every player holds a full active roster.
pub fn rosters_full(season: &SeasonEntity) -> bool {
    season
        .players
        .iter()
        .all(|player| season.active_roster(player.id).count() as u32 == season.roster_size)
}
