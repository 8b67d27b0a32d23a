//! In-memory store implementing every repository trait, used by the service tests.
//! Uniqueness mirrors the Postgres schema: one friendship per unordered pair,
//! one membership per (team, user), unique invite codes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        profile::{
            model::ProfileSummary,
            repository::ProfileRepository,
            schema::{ProfileEntity, Reputation},
        },
        team::{
            model::{InsertTeam, UpdateTeam, UserTeamRow},
            repository::TeamRepository,
            schema::{MemberStatus, TeamEntity, TeamMemberEntity, TeamRole},
        },
    },
};

#[derive(Default)]
struct State {
    next_id: i64,
    profiles: Vec<ProfileEntity>,
    friendships: Vec<FriendshipEntity>,
    teams: Vec<TeamEntity>,
    members: Vec<TeamMemberEntity>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    summary_lookups: AtomicUsize,
    stale_pair_reads: AtomicUsize,
    invite_code_collisions: AtomicUsize,
}

fn same_pair(row: &FriendshipEntity, a: &Uuid, b: &Uuid) -> bool {
    (row.requester_id == *a && row.receiver_id == *b)
        || (row.requester_id == *b && row.receiver_id == *a)
}

fn newest_first<T>(mut rows: Vec<T>) -> Vec<T> {
    rows.reverse();
    rows
}

impl InMemoryStore {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_profile(&self, name: &str, reputation: Reputation) -> Uuid {
        let id = Uuid::now_v7();
        self.state().profiles.push(ProfileEntity {
            id,
            name: name.to_string(),
            email: None,
            photo_url: Some(format!("https://cdn.example.com/{id}.png")),
            date_of_birth: None,
            city: None,
            state: None,
            sport: None,
            position: None,
            bio: None,
            points: 0,
            matches_played: 0,
            reputation,
            banner_url: None,
            favorite_team: None,
            favorite_team_logo_url: None,
            match_coins: 0,
            created_at: chrono::Utc::now(),
        });
        id
    }

    /// Leaves any rows pointing at the profile dangling.
    pub fn remove_profile(&self, id: &Uuid) {
        self.state().profiles.retain(|p| p.id != *id);
    }

    /// Writes a row without the pair uniqueness check.
    pub fn insert_raw_friendship(&self, requester: Uuid, receiver: Uuid, status: FriendshipStatus) {
        let mut state = self.state();
        let id = state.next_id();
        state.friendships.push(FriendshipEntity {
            id,
            requester_id: requester,
            receiver_id: receiver,
            status,
            created_at: chrono::Utc::now(),
        });
    }

    pub fn friendship_count_between(&self, a: &Uuid, b: &Uuid) -> usize {
        self.state().friendships.iter().filter(|f| same_pair(f, a, b)).count()
    }

    pub fn summary_lookups(&self) -> usize {
        self.summary_lookups.load(Ordering::SeqCst)
    }

    /// The next `n` pair lookups report no rows, as if another writer had not committed yet.
    pub fn stale_pair_reads(&self, n: usize) {
        self.stale_pair_reads.store(n, Ordering::SeqCst);
    }

    /// The next `n` team inserts fail on the invite code unique constraint.
    pub fn invite_code_collisions(&self, n: usize) {
        self.invite_code_collisions.store(n, Ordering::SeqCst);
    }

    fn take_one(counter: &AtomicUsize) -> bool {
        counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError> {
        Ok(self.state().profiles.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_summaries(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ProfileSummary>, error::SystemError> {
        self.summary_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state()
            .profiles
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(ProfileSummary::from)
            .collect())
    }

    async fn search_by_name(
        &self,
        query: &str,
        exclude_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileEntity>, error::SystemError> {
        let needle = query.to_lowercase();
        let mut found: Vec<ProfileEntity> = self
            .state()
            .profiles
            .iter()
            .filter(|p| p.id != *exclude_id && p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(limit as usize);
        Ok(found)
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self.state().friendships.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        if Self::take_one(&self.stale_pair_reads) {
            return Ok(Vec::new());
        }
        Ok(self
            .state()
            .friendships
            .iter()
            .filter(|f| same_pair(f, user_id_a, user_id_b))
            .take(2)
            .cloned()
            .collect())
    }

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = self
            .state()
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Accepted && f.involves(user_id))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn find_pending_to(
        &self,
        receiver_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = self
            .state()
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Pending && f.receiver_id == *receiver_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = self
            .state()
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Pending && f.requester_id == *requester_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut state = self.state();
        if state.friendships.iter().any(|f| same_pair(f, requester_id, receiver_id)) {
            return Ok(None);
        }
        let row = FriendshipEntity {
            id: state.next_id(),
            requester_id: *requester_id,
            receiver_id: *receiver_id,
            status: FriendshipStatus::Pending,
            created_at: chrono::Utc::now(),
        };
        state.friendships.push(row.clone());
        Ok(Some(row))
    }

    async fn mark_accepted(
        &self,
        id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut state = self.state();
        Ok(state.friendships.iter_mut().find(|f| f.id == id).map(|f| {
            f.status = FriendshipStatus::Accepted;
            f.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let mut state = self.state();
        let before = state.friendships.len();
        state.friendships.retain(|f| f.id != id);
        Ok(state.friendships.len() < before)
    }

    async fn delete_pending(&self, id: i64) -> Result<bool, error::SystemError> {
        let mut state = self.state();
        let before = state.friendships.len();
        state.friendships.retain(|f| !(f.id == id && f.status == FriendshipStatus::Pending));
        Ok(state.friendships.len() < before)
    }
}

#[async_trait::async_trait]
impl TeamRepository for InMemoryStore {
    async fn create_with_admin(
        &self,
        team: &InsertTeam,
    ) -> Result<TeamEntity, error::SystemError> {
        let mut state = self.state();
        let forced = Self::take_one(&self.invite_code_collisions);
        if forced || state.teams.iter().any(|t| t.invite_code == team.invite_code) {
            return Err(error::SystemError::Conflict(Some(error::DbErrorMeta {
                code: Some("23505".into()),
                constraint: Some("teams_invite_code_key".into()),
                message: "duplicate key value violates unique constraint".into(),
            })));
        }

        let created = TeamEntity {
            id: state.next_id(),
            created_by: team.created_by,
            name: team.name.clone(),
            description: team.description.clone(),
            logo_url: team.logo_url.clone(),
            invite_code: team.invite_code.clone(),
            created_at: chrono::Utc::now(),
        };
        let admin = TeamMemberEntity {
            id: state.next_id(),
            team_id: created.id,
            user_id: team.created_by,
            status: MemberStatus::Approved,
            role: TeamRole::Admin,
            joined_at: chrono::Utc::now(),
        };
        state.teams.push(created.clone());
        state.members.push(admin);
        Ok(created)
    }

    async fn find_by_id(&self, team_id: i64) -> Result<Option<TeamEntity>, error::SystemError> {
        Ok(self.state().teams.iter().find(|t| t.id == team_id).cloned())
    }

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<TeamEntity>, error::SystemError> {
        Ok(self.state().teams.iter().find(|t| t.invite_code == invite_code).cloned())
    }

    async fn update(
        &self,
        team_id: i64,
        team: &UpdateTeam,
    ) -> Result<Option<TeamEntity>, error::SystemError> {
        let mut state = self.state();
        Ok(state.teams.iter_mut().find(|t| t.id == team_id).map(|t| {
            if let Some(name) = &team.name {
                t.name = name.clone();
            }
            if let Some(description) = &team.description {
                t.description = description.clone();
            }
            if let Some(logo_url) = &team.logo_url {
                t.logo_url = logo_url.clone();
            }
            t.clone()
        }))
    }

    async fn find_membership(
        &self,
        team_id: i64,
        user_id: &Uuid,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        Ok(self
            .state()
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == *user_id)
            .cloned())
    }

    async fn find_member_by_id(
        &self,
        member_id: i64,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        Ok(self.state().members.iter().find(|m| m.id == member_id).cloned())
    }

    async fn insert_member(
        &self,
        team_id: i64,
        user_id: &Uuid,
        status: MemberStatus,
        role: TeamRole,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let mut state = self.state();
        if state.members.iter().any(|m| m.team_id == team_id && m.user_id == *user_id) {
            return Ok(None);
        }
        let member = TeamMemberEntity {
            id: state.next_id(),
            team_id,
            user_id: *user_id,
            status,
            role,
            joined_at: chrono::Utc::now(),
        };
        state.members.push(member.clone());
        Ok(Some(member))
    }

    async fn find_members(
        &self,
        team_id: i64,
        status: MemberStatus,
    ) -> Result<Vec<TeamMemberEntity>, error::SystemError> {
        Ok(self
            .state()
            .members
            .iter()
            .filter(|m| m.team_id == team_id && m.status == status)
            .cloned()
            .collect())
    }

    async fn find_teams_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<UserTeamRow>, error::SystemError> {
        let state = self.state();
        let mut rows: Vec<UserTeamRow> = state
            .members
            .iter()
            .filter(|m| m.user_id == *user_id && m.status == MemberStatus::Approved)
            .filter_map(|m| {
                let team = state.teams.iter().find(|t| t.id == m.team_id)?;
                Some(UserTeamRow { team: team.clone(), role: m.role })
            })
            .collect();
        rows.sort_by(|a, b| a.team.name.cmp(&b.team.name));
        Ok(rows)
    }

    async fn set_member_status(
        &self,
        member_id: i64,
        status: MemberStatus,
    ) -> Result<Option<TeamMemberEntity>, error::SystemError> {
        let mut state = self.state();
        Ok(state.members.iter_mut().find(|m| m.id == member_id).map(|m| {
            m.status = status;
            m.clone()
        }))
    }

    async fn delete_member(&self, member_id: i64) -> Result<bool, error::SystemError> {
        let mut state = self.state();
        let before = state.members.len();
        state.members.retain(|m| m.id != member_id);
        Ok(state.members.len() < before)
    }
}
