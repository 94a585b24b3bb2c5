use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{LeagueEntity, LeagueMemberEntity, MemberRole},
    dto::league::{AddMemberRequest, CreateLeagueRequest, LeagueResponse},
    error::ServiceError,
    services::access,
    state::SharedState,
};

/// Create a league owned by the requester.
pub async fn create_league(
    state: &SharedState,
    requester: Uuid,
    request: CreateLeagueRequest,
) -> Result<LeagueResponse, ServiceError> {
    let store = state.require_store().await?;
    let now = SystemTime::now();
    let league = LeagueEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
        commissioner_id: requester,
        members: vec![LeagueMemberEntity {
            user_id: requester,
            email: request.email.trim().to_owned(),
            role: MemberRole::Commissioner,
        }],
        version: 0,
        created_at: now,
        updated_at: now,
    };
    store.insert_league(league.clone()).await?;
    info!(league_id = %league.id, commissioner = %requester, "league created");
    Ok(league.into())
}

/// League details, visible to its members.
pub async fn get_league(
    state: &SharedState,
    requester: Uuid,
    league_id: Uuid,
) -> Result<LeagueResponse, ServiceError> {
    let league = access::load_league(state, league_id).await?;
    access::require_member(&league, requester)?;
    Ok(league.into())
}

/// Add a member to a league. Commissioner only.
pub async fn add_member(
    state: &SharedState,
    requester: Uuid,
    league_id: Uuid,
    request: AddMemberRequest,
) -> Result<LeagueResponse, ServiceError> {
    if request.role == MemberRole::Commissioner {
        return Err(ServiceError::InvalidInput(
            "a league has exactly one commissioner".into(),
        ));
    }
    let user_id = request.user_id;
    let role = request.role;
    let email = request.email.trim().to_owned();

    let ((), league) = state
        .run_league_operation(league_id, move |league| {
            access::require_commissioner(league, requester)?;
            if access::role_of(league, user_id).is_some() {
                return Err(ServiceError::DuplicateEntity(format!(
                    "user `{user_id}` is already a member"
                )));
            }
            if league
                .members
                .iter()
                .any(|member| member.email.eq_ignore_ascii_case(&email))
            {
                return Err(ServiceError::DuplicateEntity(format!(
                    "`{email}` is already a member"
                )));
            }
            league.members.push(LeagueMemberEntity {
                user_id,
                email,
                role,
            });
            Ok(())
        })
        .await?;

    info!(league_id = %league.id, user_id = %user_id, role = ?role, "league member added");
    Ok(league.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::season_store::SeasonStore, services::test_support::TestLeague};

    #[tokio::test]
    async fn members_can_read_but_only_the_commissioner_invites() {
        let ctx = TestLeague::new().await;
        let outsider = Uuid::new_v4();

        let err = get_league(&ctx.state, outsider, ctx.league_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = add_member(
            &ctx.state,
            ctx.players[0],
            ctx.league_id,
            AddMemberRequest {
                user_id: outsider,
                email: "new@example.com".into(),
                role: MemberRole::Player,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let league = get_league(&ctx.state, ctx.players[0], ctx.league_id)
            .await
            .unwrap();
        assert_eq!(league.members.len(), ctx.players.len() + 2);
    }

    #[tokio::test]
    async fn duplicate_members_are_rejected() {
        let ctx = TestLeague::new().await;
        let err = add_member(
            &ctx.state,
            ctx.commissioner,
            ctx.league_id,
            AddMemberRequest {
                user_id: ctx.players[1],
                email: "other@example.com".into(),
                role: MemberRole::Player,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEntity(_)));
    }

    #[tokio::test]
    async fn concurrent_invites_are_all_kept() {
        let ctx = TestLeague::new().await;
        let before = ctx.store.find_league(ctx.league_id).await.unwrap().unwrap();

        let invite = |n: usize| {
            let state = ctx.state.clone();
            let commissioner = ctx.commissioner;
            let league_id = ctx.league_id;
            tokio::spawn(async move {
                add_member(
                    &state,
                    commissioner,
                    league_id,
                    AddMemberRequest {
                        user_id: Uuid::new_v4(),
                        email: format!("invitee-{n}@example.com"),
                        role: MemberRole::Player,
                    },
                )
                .await
            })
        };
        let (first, second) = tokio::join!(invite(1), invite(2));
        first.unwrap().unwrap();
        second.unwrap().unwrap();

        let after = ctx.store.find_league(ctx.league_id).await.unwrap().unwrap();
        assert_eq!(after.members.len(), before.members.len() + 2);
        assert_eq!(after.version, before.version + 2);
        assert!(
            after
                .members
                .iter()
                .any(|member| member.email == "invitee-1@example.com")
        );
        assert!(
            after
                .members
                .iter()
                .any(|member| member.email == "invitee-2@example.com")
        );
        assert_eq!(ctx.state.open_gates(), 0);
    }

    #[tokio::test]
    async fn rejected_invites_leave_the_version_alone() {
        let ctx = TestLeague::new().await;
        let before = ctx.store.find_league(ctx.league_id).await.unwrap().unwrap();
        let err = add_member(
            &ctx.state,
            ctx.commissioner,
            ctx.league_id,
            AddMemberRequest {
                user_id: Uuid::new_v4(),
                email: before.members[0].email.to_uppercase(),
                role: MemberRole::Spectator,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEntity(_)));

        let after = ctx.store.find_league(ctx.league_id).await.unwrap().unwrap();
        assert_eq!(after.version, before.version);
    }
}
