use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{LeagueEntity, LeagueMemberEntity, MemberRole},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Payload used to create a league; the requester becomes its commissioner.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateLeagueRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 80))]
    pub name: String,
    /// Contact address of the commissioner.
    #[validate(email)]
    pub email: String,
}

/// Invite a user into a league.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    #[validate(email)]
    pub email: String,
    pub role: MemberRole,
}

/// Member of a league as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueMemberDto {
    pub user_id: Uuid,
    pub email: String,
    pub role: MemberRole,
}

impl From<LeagueMemberEntity> for LeagueMemberDto {
    fn from(member: LeagueMemberEntity) -> Self {
        Self {
            user_id: member.user_id,
            email: member.email,
            role: member.role,
        }
    }
}

/// League with its members.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueResponse {
    pub id: Uuid,
    pub name: String,
    pub commissioner_id: Uuid,
    pub members: Vec<LeagueMemberDto>,
    pub created_at: String,
}

impl From<LeagueEntity> for LeagueResponse {
    fn from(league: LeagueEntity) -> Self {
        Self {
            id: league.id,
            name: league.name,
            commissioner_id: league.commissioner_id,
            members: league.members.into_iter().map(Into::into).collect(),
            created_at: format_system_time(league.created_at),
        }
    }
}
