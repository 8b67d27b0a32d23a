use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        profile::{repository::ProfileRepository, service::summaries_by_id},
        team::{
            model::{
                CreateTeamBody, InsertTeam, TeamDetailsResponse, TeamMemberResponse,
                TeamMemberView, UpdateTeamBody, UserTeamRow,
            },
            repository::TeamRepository,
            schema::{MemberStatus, TeamEntity, TeamMemberEntity, TeamRole},
        },
    },
    utils::generate_invite_code,
};

const INVITE_CODE_ATTEMPTS: usize = 3;

fn is_invite_code_collision(err: &error::SystemError) -> bool {
    matches!(
        err,
        error::SystemError::Conflict(Some(meta))
            if meta.constraint.as_deref() == Some("teams_invite_code_key")
    )
}

#[derive(Clone)]
pub struct TeamService<T, P>
where
    T: TeamRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    team_repo: Arc<T>,
    profile_repo: Arc<P>,
}

impl<T, P> TeamService<T, P>
where
    T: TeamRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    pub fn with_dependencies(team_repo: Arc<T>, profile_repo: Arc<P>) -> Self {
        info!("TeamService initialized with dependencies");
        TeamService { team_repo, profile_repo }
    }

    pub async fn create_team(
        &self,
        user_id: Uuid,
        body: CreateTeamBody,
    ) -> Result<TeamEntity, error::SystemError> {
        let mut team = InsertTeam {
            created_by: user_id,
            name: body.name.trim().to_string(),
            description: body.description,
            logo_url: body.logo_url,
            invite_code: generate_invite_code(),
        };

        let mut attempt = 1;
        loop {
            match self.team_repo.create_with_admin(&team).await {
                Err(e) if is_invite_code_collision(&e) && attempt < INVITE_CODE_ATTEMPTS => {
                    warn!("Invite code collision on attempt {attempt}, regenerating");
                    team.invite_code = generate_invite_code();
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn find_team(&self, team_id: i64) -> Result<TeamEntity, error::SystemError> {
        self.team_repo
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Team not found"))
    }

    async fn find_member(&self, member_id: i64) -> Result<TeamMemberEntity, error::SystemError> {
        self.team_repo
            .find_member_by_id(member_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Team member not found"))
    }

    async fn require_admin(&self, team_id: i64, user_id: &Uuid) -> Result<(), error::SystemError> {
        match self.team_repo.find_membership(team_id, user_id).await? {
            Some(member) if member.is_admin() => Ok(()),
            _ => Err(error::SystemError::forbidden("Only team admins can do this")),
        }
    }

    pub async fn join_team(
        &self,
        team_id: i64,
        user_id: Uuid,
    ) -> Result<TeamMemberResponse, error::SystemError> {
        let (_, existing) = tokio::try_join!(
            self.find_team(team_id),
            self.team_repo.find_membership(team_id, &user_id),
        )?;

        if let Some(existing) = existing {
            return Err(match existing.status {
                MemberStatus::Rejected => {
                    error::SystemError::forbidden("Your request to join this team was declined")
                }
                MemberStatus::Approved => error::SystemError::AlreadyMember,
                MemberStatus::Pending => error::SystemError::RequestAlreadyPending,
            });
        }

        self.team_repo
            .insert_member(team_id, &user_id, MemberStatus::Pending, TeamRole::Member)
            .await?
            .map(TeamMemberResponse::from)
            .ok_or(error::SystemError::RequestAlreadyPending)
    }

    pub async fn team_by_invite_code(&self, code: &str) -> Result<TeamEntity, error::SystemError> {
        let code = code.trim().to_ascii_uppercase();
        self.team_repo
            .find_by_invite_code(&code)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Invalid invite code"))
    }

    pub async fn join_by_invite_code(
        &self,
        code: &str,
        user_id: Uuid,
    ) -> Result<TeamMemberResponse, error::SystemError> {
        let team = self.team_by_invite_code(code).await?;
        self.join_team(team.id, user_id).await
    }

    pub async fn user_teams(&self, user_id: Uuid) -> Result<Vec<UserTeamRow>, error::SystemError> {
        self.team_repo.find_teams_for_user(&user_id).await
    }

    pub async fn team_details(
        &self,
        team_id: i64,
    ) -> Result<TeamDetailsResponse, error::SystemError> {
        let (team, members) = tokio::try_join!(
            self.find_team(team_id),
            self.team_repo.find_members(team_id, MemberStatus::Approved),
        )?;
        let members = self.with_profiles(members).await?;
        Ok(TeamDetailsResponse { team, members })
    }

    pub async fn pending_requests(
        &self,
        actor_id: Uuid,
        team_id: i64,
    ) -> Result<Vec<TeamMemberView>, error::SystemError> {
        self.find_team(team_id).await?;
        self.require_admin(team_id, &actor_id).await?;
        let members = self.team_repo.find_members(team_id, MemberStatus::Pending).await?;
        self.with_profiles(members).await
    }

    pub async fn approve_member(
        &self,
        actor_id: Uuid,
        member_id: i64,
    ) -> Result<TeamMemberResponse, error::SystemError> {
        self.set_status_as_admin(actor_id, member_id, MemberStatus::Approved).await
    }

    pub async fn reject_member(
        &self,
        actor_id: Uuid,
        member_id: i64,
    ) -> Result<TeamMemberResponse, error::SystemError> {
        self.set_status_as_admin(actor_id, member_id, MemberStatus::Rejected).await
    }

    async fn set_status_as_admin(
        &self,
        actor_id: Uuid,
        member_id: i64,
        status: MemberStatus,
    ) -> Result<TeamMemberResponse, error::SystemError> {
        let member = self.find_member(member_id).await?;
        self.require_admin(member.team_id, &actor_id).await?;
        if member.user_id == actor_id {
            return Err(error::SystemError::bad_request("You cannot change your own membership"));
        }
        self.team_repo
            .set_member_status(member_id, status)
            .await?
            .map(TeamMemberResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Team member not found"))
    }

    /// Admins may remove anyone but the team's creator; members may remove themselves.
    pub async fn remove_member(
        &self,
        actor_id: Uuid,
        member_id: i64,
    ) -> Result<(), error::SystemError> {
        let member = self.find_member(member_id).await?;
        let team = self.find_team(member.team_id).await?;

        if member.user_id == team.created_by {
            return Err(error::SystemError::forbidden("The team creator cannot be removed"));
        }
        if member.user_id != actor_id {
            self.require_admin(team.id, &actor_id).await?;
        }

        if !self.team_repo.delete_member(member_id).await? {
            return Err(error::SystemError::not_found("Team member not found"));
        }
        Ok(())
    }

    pub async fn update_team(
        &self,
        actor_id: Uuid,
        team_id: i64,
        body: UpdateTeamBody,
    ) -> Result<TeamEntity, error::SystemError> {
        if body.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        self.require_admin(team_id, &actor_id).await?;
        self.team_repo
            .update(team_id, &body.into())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Team not found"))
    }

    async fn with_profiles(
        &self,
        members: Vec<TeamMemberEntity>,
    ) -> Result<Vec<TeamMemberView>, error::SystemError> {
        let profiles =
            summaries_by_id(self.profile_repo.as_ref(), members.iter().map(|m| m.user_id)).await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match profiles.get(&member.user_id) {
                Some(profile) => Some(TeamMemberView::new(member, profile.clone())),
                None => {
                    warn!(
                        "Skipping team member {}: profile {} not found",
                        member.id, member.user_id
                    );
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::profile::schema::Reputation;
    use crate::test::InMemoryStore;

    type Svc = TeamService<InMemoryStore, InMemoryStore>;

    fn setup() -> (Arc<InMemoryStore>, Svc) {
        let store = Arc::new(InMemoryStore::default());
        let service = TeamService::with_dependencies(store.clone(), store.clone());
        (store, service)
    }

    fn body(name: &str) -> CreateTeamBody {
        CreateTeamBody { name: name.to_string(), description: None, logo_url: None }
    }

    #[actix_web::test]
    async fn creator_becomes_approved_admin() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);

        let team = service.create_team(owner, body("  Várzea FC ")).await.unwrap();
        assert_eq!(team.name, "Várzea FC");
        assert_eq!(team.invite_code.len(), crate::constants::INVITE_CODE_LEN);

        let mine = service.user_teams(owner).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].team.id, team.id);
        assert_eq!(mine[0].role, TeamRole::Admin);

        let details = service.team_details(team.id).await.unwrap();
        assert_eq!(details.members.len(), 1);
        assert_eq!(details.members[0].profile.name, "Dona Bola");
    }

    #[actix_web::test]
    async fn invite_code_collisions_are_retried() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);

        store.invite_code_collisions(INVITE_CODE_ATTEMPTS - 1);
        assert!(service.create_team(owner, body("Retry FC")).await.is_ok());

        store.invite_code_collisions(INVITE_CODE_ATTEMPTS);
        let result = service.create_team(owner, body("Unlucky FC")).await;
        assert!(matches!(result, Err(error::SystemError::Conflict(_))));
    }

    #[actix_web::test]
    async fn join_flow_by_invite_code() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);
        let team = service.create_team(owner, body("Várzea FC")).await.unwrap();

        let lowercase = team.invite_code.to_ascii_lowercase();
        let request = service.join_by_invite_code(&lowercase, player).await.unwrap();
        assert_eq!(request.status, MemberStatus::Pending);
        assert_eq!(request.role, TeamRole::Member);

        let again = service.join_team(team.id, player).await;
        assert!(matches!(again, Err(error::SystemError::RequestAlreadyPending)));

        let pending = service.pending_requests(owner, team.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].profile.id, player);

        service.approve_member(owner, request.id).await.unwrap();
        assert!(service.pending_requests(owner, team.id).await.unwrap().is_empty());
        assert_eq!(service.team_details(team.id).await.unwrap().members.len(), 2);

        let member_again = service.join_team(team.id, player).await;
        assert!(matches!(member_again, Err(error::SystemError::AlreadyMember)));
    }

    #[actix_web::test]
    async fn rejected_players_cannot_rejoin() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);
        let team = service.create_team(owner, body("Várzea FC")).await.unwrap();

        let request = service.join_team(team.id, player).await.unwrap();
        service.reject_member(owner, request.id).await.unwrap();

        let result = service.join_team(team.id, player).await;
        assert!(matches!(result, Err(error::SystemError::Forbidden(_))));
        assert!(service.user_teams(player).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unknown_team_and_code_are_not_found() {
        let (store, service) = setup();
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);

        assert!(matches!(service.join_team(99, player).await, Err(error::SystemError::NotFound(_))));
        assert!(matches!(
            service.team_by_invite_code("NOPE").await,
            Err(error::SystemError::NotFound(_))
        ));
        assert!(matches!(service.team_details(99).await, Err(error::SystemError::NotFound(_))));
    }

    #[actix_web::test]
    async fn admin_only_operations() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);
        let other = store.add_profile("Goleiro", Reputation::Iniciante);
        let team = service.create_team(owner, body("Várzea FC")).await.unwrap();

        let request = service.join_team(team.id, other).await.unwrap();
        service.join_team(team.id, player).await.unwrap();

        assert!(matches!(
            service.pending_requests(player, team.id).await,
            Err(error::SystemError::Forbidden(_))
        ));
        assert!(matches!(
            service.approve_member(player, request.id).await,
            Err(error::SystemError::Forbidden(_))
        ));
        let patch = UpdateTeamBody { name: Some("Hijacked".into()), ..Default::default() };
        assert!(matches!(
            service.update_team(player, team.id, patch).await,
            Err(error::SystemError::Forbidden(_))
        ));
    }

    #[actix_web::test]
    async fn update_team_can_clear_optional_fields() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let created = service
            .create_team(
                owner,
                CreateTeamBody {
                    name: "Várzea FC".into(),
                    description: Some("Quintas 20h".into()),
                    logo_url: Some("https://cdn.example.com/a.png".into()),
                },
            )
            .await
            .unwrap();

        let patch = UpdateTeamBody { logo_url: Some(None), ..Default::default() };
        let updated = service.update_team(owner, created.id, patch).await.unwrap();
        assert_eq!(updated.logo_url, None);
        assert_eq!(updated.description.as_deref(), Some("Quintas 20h"));
        assert_eq!(updated.name, "Várzea FC");

        let empty = service.update_team(owner, created.id, UpdateTeamBody::default()).await;
        assert!(matches!(empty, Err(error::SystemError::BadRequest(_))));
    }

    #[actix_web::test]
    async fn members_can_leave_but_creator_stays() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);
        let stranger = store.add_profile("Torcedor", Reputation::Iniciante);
        let team = service.create_team(owner, body("Várzea FC")).await.unwrap();

        let request = service.join_team(team.id, player).await.unwrap();
        service.approve_member(owner, request.id).await.unwrap();

        assert!(matches!(
            service.remove_member(stranger, request.id).await,
            Err(error::SystemError::Forbidden(_))
        ));

        let details = service.team_details(team.id).await.unwrap();
        let owner_row = details.members.into_iter().find(|m| m.user_id == owner).unwrap();
        assert!(matches!(
            service.remove_member(player, owner_row.id).await,
            Err(error::SystemError::Forbidden(_))
        ));
        assert!(matches!(
            service.remove_member(owner, owner_row.id).await,
            Err(error::SystemError::Forbidden(_))
        ));

        service.remove_member(player, request.id).await.unwrap();
        assert!(service.user_teams(player).await.unwrap().is_empty());
        assert!(matches!(
            service.remove_member(owner, request.id).await,
            Err(error::SystemError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn details_skip_members_without_profiles() {
        let (store, service) = setup();
        let owner = store.add_profile("Dona Bola", Reputation::Craque);
        let player = store.add_profile("Zagueiro", Reputation::Intermediario);
        let team = service.create_team(owner, body("Várzea FC")).await.unwrap();
        let request = service.join_team(team.id, player).await.unwrap();
        service.approve_member(owner, request.id).await.unwrap();

        store.remove_profile(&player);

        let details = service.team_details(team.id).await.unwrap();
        assert_eq!(details.members.len(), 1);
        assert_eq!(details.members[0].user_id, owner);
    }
}
