use uuid::Uuid;

use crate::{
    api::error,
    modules::team::{
        model::{InsertTeam, UpdateTeam, UserTeamRow},
        repository::TeamRepository,
        schema::{MemberStatus, TeamEntity, TeamMemberEntity, TeamRole},
    },
};

#[derive(Clone)]
pub struct TeamRepositoryPg {
    pool: sqlx::PgPool,
}

impl TeamRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TeamRepository for TeamRepositoryPg {
    async fn create_with_admin(
        &self,
        team: &InsertTeam,
    ) -> Result<TeamEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, TeamEntity>(
            r#"
            INSERT INTO teams (created_by, name, description, logo_url, invite_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(team.created_by)
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.logo_url)
        .bind(&team.invite_code)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO team_members (team_id, user_id, status, role) VALUES ($1, $2, $3, $4)",
        )
        .bind(created.id)
        .bind(team.created_by)
        .bind(MemberStatus::Approved)
        .bind(TeamRole::Admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn find_by_id(&self, team_id: i64) -> Result<Option<TeamEntity>, error::SystemError> {
        let team = sqlx::query_as::<_, TeamEntity>("SELECT * FROM teams WHERE id = $1")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(team)
    }

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<TeamEntity>, error::SystemError> {
        let team = sqlx::query_as::<_, TeamEntity>("SELECT * FROM teams WHERE invite_code = $1")
            .bind(invite_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(team)
    }

    async fn update(
        &self,
        team_id: i64,
        team: &UpdateTeam,
    ) -> Result<Option<TeamEntity>, error::SystemError> {
        let team = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET
                name        = COALESCE($2, name),
                description = CASE WHEN $3::boolean THEN $4 ELSE description END,
                logo_url    = CASE WHEN $5::boolean THEN $6 ELSE logo_url END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(team_id)
        .bind(&team.name) // $2: Option<String>
        .bind(team.description.is_some()) // $3: was description provided?
        .bind(team.description.as_ref().and_then(|v| v.as_ref())) // $4
        .bind(team.logo_url.is_some()) // $5: was logo_url provided?
        .bind(team.logo_url.as_ref().and_then(|v| v.as_ref())) // $6
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    async fn find_membership(
        &self,
        team_id: i64,
        user_id: &Uuid,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let member = sqlx::query_as::<_, TeamMemberEntity>(
            "SELECT * FROM team_members WHERE team_id = $1 AND user_id = $2",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    async fn find_member_by_id(
        &self,
        member_id: i64,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let member =
            sqlx::query_as::<_, TeamMemberEntity>("SELECT * FROM team_members WHERE id = $1")
                .bind(member_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(member)
    }

    async fn insert_member(
        &self,
        team_id: i64,
        user_id: &Uuid,
        status: MemberStatus,
        role: TeamRole,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let member = sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            INSERT INTO team_members (team_id, user_id, status, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (team_id, user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(status)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    async fn find_members(
        &self,
        team_id: i64,
        status: MemberStatus,
    ) -> Result<Vec<TeamMemberEntity>, error::SystemError> {
        let members = sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            SELECT * FROM team_members
            WHERE team_id = $1 AND status = $2
            ORDER BY joined_at, id
            "#,
        )
        .bind(team_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn find_teams_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<UserTeamRow>, error::SystemError> {
        let teams = sqlx::query_as::<_, UserTeamRow>(
            r#"
            SELECT t.*, m.role
            FROM team_members m
            JOIN teams t
                ON t.id = m.team_id
            WHERE m.user_id = $1
            AND m.status = 'approved'
            ORDER BY t.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    async fn set_member_status(
        &self,
        member_id: i64,
        status: MemberStatus,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let member = sqlx::query_as::<_, TeamMemberEntity>(
            "UPDATE team_members SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(member_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    async fn delete_member(&self, member_id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
