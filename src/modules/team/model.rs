use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::{
    modules::{
        profile::model::ProfileSummary,
        team::schema::{MemberStatus, TeamEntity, TeamMemberEntity, TeamRole},
    },
    utils::double_option,
};

pub struct InsertTeam {
    pub created_by: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub invite_code: String,
}

pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamBody {
    #[validate(length(min = 2, max = 60, message = "Team name must be 2 to 60 characters long"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(url(message = "Invalid logo url"))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamBody {
    #[validate(length(min = 2, max = 60, message = "Team name must be 2 to 60 characters long"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl UpdateTeamBody {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.logo_url.is_none()
    }
}

impl From<UpdateTeamBody> for UpdateTeam {
    fn from(body: UpdateTeamBody) -> Self {
        UpdateTeam { name: body.name, description: body.description, logo_url: body.logo_url }
    }
}

/// A team the user belongs to, with the user's role in it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserTeamRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub team: TeamEntity,
    pub role: TeamRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberView {
    pub id: i64,
    pub team_id: i64,
    pub user_id: Uuid,
    pub status: MemberStatus,
    pub role: TeamRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub profile: ProfileSummary,
}

impl TeamMemberView {
    pub fn new(member: TeamMemberEntity, profile: ProfileSummary) -> Self {
        TeamMemberView {
            id: member.id,
            team_id: member.team_id,
            user_id: member.user_id,
            status: member.status,
            role: member.role,
            joined_at: member.joined_at,
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberResponse {
    pub id: i64,
    pub team_id: i64,
    pub user_id: Uuid,
    pub status: MemberStatus,
    pub role: TeamRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl From<TeamMemberEntity> for TeamMemberResponse {
    fn from(member: TeamMemberEntity) -> Self {
        TeamMemberResponse {
            id: member.id,
            team_id: member.team_id,
            user_id: member.user_id,
            status: member.status,
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetailsResponse {
    pub team: TeamEntity,
    pub members: Vec<TeamMemberView>,
}
