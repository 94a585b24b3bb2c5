//! Requester checks shared by the season services.

use uuid::Uuid;

use crate::{
    dao::models::{LeagueEntity, MemberRole, SeasonEntity},
    error::ServiceError,
    state::SharedState,
};

/// Load a league or fail with `NotFound`.
pub async fn load_league(state: &SharedState, league_id: Uuid) -> Result<LeagueEntity, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_league(league_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("league `{league_id}` not found")))
}

/// League owning a season.
pub async fn league_of_season(
    state: &SharedState,
    season_id: Uuid,
) -> Result<LeagueEntity, ServiceError> {
    let season = state.load_season(season_id).await?;
    load_league(state, season.league_id).await
}

/// Role of `user_id` inside the league, if any.
pub fn role_of(league: &LeagueEntity, user_id: Uuid) -> Option<MemberRole> {
    league
        .members
        .iter()
        .find(|member| member.user_id == user_id)
        .map(|member| member.role)
}

/// Fail unless `user_id` belongs to the league.
pub fn require_member(league: &LeagueEntity, user_id: Uuid) -> Result<MemberRole, ServiceError> {
    role_of(league, user_id).ok_or_else(|| {
        ServiceError::Unauthorized(format!("user `{user_id}` is not a member of this league"))
    })
}

/// Fail unless `user_id` is the league's commissioner.
pub fn require_commissioner(league: &LeagueEntity, user_id: Uuid) -> Result<(), ServiceError> {
    if league.commissioner_id != user_id {
        return Err(ServiceError::Unauthorized(
            "only the commissioner can do this".into(),
        ));
    }
    Ok(())
}

/// Season player backing `user_id`.
pub fn require_season_player(season: &SeasonEntity, user_id: Uuid) -> Result<Uuid, ServiceError> {
    season
        .player_for_user(user_id)
        .map(|player| player.id)
        .ok_or_else(|| {
            ServiceError::Unauthorized(format!("user `{user_id}` does not play in this season"))
        })
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::LeagueMemberEntity;

    fn league(commissioner: Uuid, spectator: Uuid) -> LeagueEntity {
        LeagueEntity {
            id: Uuid::new_v4(),
            name: "Friday Crate Diggers".into(),
            commissioner_id: commissioner,
            members: vec![
                LeagueMemberEntity {
                    user_id: commissioner,
                    email: "boss@example.com".into(),
                    role: MemberRole::Commissioner,
                },
                LeagueMemberEntity {
                    user_id: spectator,
                    email: "fan@example.com".into(),
                    role: MemberRole::Spectator,
                },
            ],
            version: 0,
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    #[test]
    fn only_the_commissioner_passes_commissioner_checks() {
        let commissioner = Uuid::new_v4();
        let spectator = Uuid::new_v4();
        let league = league(commissioner, spectator);

        assert!(require_commissioner(&league, commissioner).is_ok());
        assert!(matches!(
            require_commissioner(&league, spectator),
            Err(ServiceError::Unauthorized(_))
        ));
        assert_eq!(require_member(&league, spectator).unwrap(), MemberRole::Spectator);
        assert!(require_member(&league, Uuid::new_v4()).is_err());
    }
}
