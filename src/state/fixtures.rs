//! Builders shared by unit tests.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::{
        ArtistRef, EvolutionWeekEntity, LeagueEntity, LeagueMemberEntity, MemberRole,
        SeasonEntity, SeasonPlayerEntity,
    },
    state::{
        library::{CanonicalCategory, CanonicalChallenge, ChallengeLibrary},
        state_machine::{SeasonPhase, SeasonStatus},
    },
};

pub const CHAOS_WEEK: u32 = 5;

pub fn artist(n: usize) -> ArtistRef {
    ArtistRef {
        id: format!("artist-{n}"),
        name: format!("Artist {n}"),
    }
}

pub fn schedule(challenge_count: u32, chaos_week: Option<u32>) -> Vec<EvolutionWeekEntity> {
    (1..challenge_count)
        .map(|week| EvolutionWeekEntity {
            week,
            is_chaos_week: Some(week) == chaos_week,
        })
        .collect()
}

/// League holding only its commissioner.
pub fn league(commissioner: Uuid) -> LeagueEntity {
    let now = SystemTime::now();
    LeagueEntity {
        id: Uuid::new_v4(),
        name: "Test League".into(),
        commissioner_id: commissioner,
        members: vec![LeagueMemberEntity {
            user_id: commissioner,
            email: "commissioner@example.com".into(),
            role: MemberRole::Commissioner,
        }],
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Season in setup with `players` joined players holding draft slots 1..=players.
pub fn season(players: usize, roster_size: u32, challenge_count: u32) -> SeasonEntity {
    let now = SystemTime::now();
    SeasonEntity {
        id: Uuid::new_v4(),
        league_id: Uuid::new_v4(),
        name: "Test Season".into(),
        roster_size,
        challenge_count,
        current_phase: SeasonPhase::SeasonSetup,
        current_week: 0,
        status: SeasonStatus::Preseason,
        version: 0,
        created_at: now,
        updated_at: now,
        evolution_schedule: schedule(challenge_count, Some(CHAOS_WEEK)),
        players: (0..players)
            .map(|index| SeasonPlayerEntity {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                label_name: format!("Label {index}"),
                draft_position: Some(index as u32 + 1),
                total_points: 0,
                rank: 1,
            })
            .collect(),
        board: None,
        draft_picks: Vec::new(),
        roster: Vec::new(),
        advantages: Vec::new(),
        challenge_selections: Vec::new(),
        submissions: Vec::new(),
        presentations: Vec::new(),
        voting_sessions: Vec::new(),
        votes: Vec::new(),
        week_results: Vec::new(),
        pool: Vec::new(),
        evolution_prompts: Vec::new(),
        events: Vec::new(),
    }
}

pub fn library() -> ChallengeLibrary {
    let category = |name: &str, prefix: &str, count: usize| CanonicalCategory {
        name: name.into(),
        challenges: (1..=count)
            .map(|n| CanonicalChallenge {
                id: format!("{prefix}-{n}"),
                title: format!("{name} {n}"),
                description: format!("{name} challenge number {n}"),
            })
            .collect(),
    };

    ChallengeLibrary::new(vec![
        category("Decades", "decades", 6),
        category("Moods", "moods", 6),
        category("Genres", "genres", 6),
        category("Wildcards", "wild", 4),
    ])
}
