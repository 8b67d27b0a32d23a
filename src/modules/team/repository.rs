use uuid::Uuid;

use crate::{
    api::error,
    modules::team::{
        model::{InsertTeam, UpdateTeam, UserTeamRow},
        schema::{MemberStatus, TeamEntity, TeamMemberEntity, TeamRole},
    },
};

#[async_trait::async_trait]
pub trait TeamRepository {
    /// Creates the team and its creator's approved admin membership as one unit.
    async fn create_with_admin(&self, team: &InsertTeam)
    -> Result<TeamEntity, error::SystemError>;

    async fn find_by_id(&self, team_id: i64) -> Result<Option<TeamEntity>, error::SystemError>;

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<TeamEntity>, error::SystemError>;

    async fn update(
        &self,
        team_id: i64,
        team: &UpdateTeam,
    ) -> Result<Option<TeamEntity>, error::SystemError>;

    async fn find_membership(
        &self,
        team_id: i64,
        user_id: &Uuid,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError>;

    async fn find_member_by_id(
        &self,
        member_id: i64,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError>;

    /// Returns `None` when the user already has a membership row for the team.
    async fn insert_member(
        &self,
        team_id: i64,
        user_id: &Uuid,
        status: MemberStatus,
        role: TeamRole,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError>;

    async fn find_members(
        &self,
        team_id: i64,
        status: MemberStatus,
    ) -> Result<Vec<TeamMemberEntity>, error::SystemError>;

    async fn find_teams_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<UserTeamRow>, error::SystemError>;

    async fn set_member_status(
        &self,
        member_id: i64,
        status: MemberStatus,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError>;

    async fn delete_member(&self, member_id: i64) -> Result<bool, error::SystemError>;
}
