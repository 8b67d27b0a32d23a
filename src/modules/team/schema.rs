use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "team_member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamEntity {
    pub id: i64,
    pub created_by: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub invite_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberEntity {
    pub id: i64,
    pub team_id: i64,
    pub user_id: Uuid,
    pub status: MemberStatus,
    pub role: TeamRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl TeamMemberEntity {
    pub fn is_admin(&self) -> bool {
        self.role == TeamRole::Admin && self.status == MemberStatus::Approved
    }
}
