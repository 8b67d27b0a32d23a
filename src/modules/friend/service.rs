use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;

use crate::{
    api::error,
    constants::{SEARCH_MIN_QUERY_LEN, SEARCH_RESULT_LIMIT},
    modules::{
        friend::{
            model::{FriendshipLookup, FriendshipResponse, FriendshipView, Relation},
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        profile::{model::ProfileResponse, repository::ProfileRepository, service::summaries_by_id},
    },
};

#[derive(Clone)]
pub struct FriendService<R, P>
where
    R: FriendshipRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    profile_repo: Arc<P>,
}

fn conflict_for(status: FriendshipStatus) -> error::SystemError {
    match status {
        FriendshipStatus::Accepted => error::SystemError::AlreadyFriends,
        FriendshipStatus::Pending => error::SystemError::RequestAlreadyPending,
    }
}

impl<R, P> FriendService<R, P>
where
    R: FriendshipRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, profile_repo: Arc<P>) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, profile_repo }
    }

    /// Looks up the single row for the unordered pair `{user_a, user_b}`.
    ///
    /// `is_requester` is reported from `user_a`'s side. Two rows for one pair
    /// break the uniqueness invariant and surface as `IntegrityFault`.
    pub async fn get_status(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<FriendshipLookup>, error::SystemError> {
        let mut rows = self.friend_repo.find_by_pair(&user_a, &user_b).await?.into_iter();

        let Some(row) = rows.next() else {
            return Ok(None);
        };

        if rows.next().is_some() {
            log::error!("More than one friendship row for pair {user_a} / {user_b}");
            return Err(error::SystemError::integrity_fault(
                "Multiple friendship rows for the same pair",
            ));
        }

        Ok(Some(FriendshipLookup::for_user(&row, &user_a)))
    }

    pub async fn relation(&self, user_a: Uuid, user_b: Uuid) -> Result<Relation, error::SystemError> {
        let lookup = self.get_status(user_a, user_b).await?;
        Ok(Relation::from_lookup(lookup.as_ref()))
    }

    pub async fn send_request(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendshipResponse, error::SystemError> {
        if requester_id == receiver_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        let (receiver, existing) = tokio::try_join!(
            self.profile_repo.find_by_id(&receiver_id),
            self.get_status(requester_id, receiver_id),
        )?;

        if receiver.is_none() {
            return Err(error::SystemError::not_found("Receiver profile not found"));
        }

        if let Some(existing) = existing {
            return Err(conflict_for(existing.status));
        }

        match self.friend_repo.insert_pending(&requester_id, &receiver_id).await? {
            Some(row) => Ok(FriendshipResponse::from(row)),
            None => {
                // Lost a race against a concurrent request for the same pair.
                let winner = self.get_status(requester_id, receiver_id).await?;
                Err(winner
                    .map(|w| conflict_for(w.status))
                    .unwrap_or(error::SystemError::RequestAlreadyPending))
            }
        }
    }

    pub async fn accept(&self, friendship_id: i64) -> Result<FriendshipResponse, error::SystemError> {
        self.friend_repo
            .mark_accepted(friendship_id)
            .await?
            .map(FriendshipResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))
    }

    pub async fn decline(&self, friendship_id: i64) -> Result<(), error::SystemError> {
        if !self.friend_repo.delete_pending(friendship_id).await? {
            return Err(error::SystemError::not_found("Friend request not found"));
        }
        Ok(())
    }

    pub async fn cancel(&self, friendship_id: i64) -> Result<(), error::SystemError> {
        self.remove_friend(friendship_id).await
    }

    pub async fn remove_friend(&self, friendship_id: i64) -> Result<(), error::SystemError> {
        if !self.friend_repo.delete(friendship_id).await? {
            return Err(error::SystemError::not_found("Friendship not found"));
        }
        Ok(())
    }

    async fn find_row(&self, friendship_id: i64) -> Result<FriendshipEntity, error::SystemError> {
        self.friend_repo
            .find_by_id(friendship_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friendship not found"))
    }

    pub async fn accept_as(
        &self,
        actor_id: Uuid,
        friendship_id: i64,
    ) -> Result<FriendshipResponse, error::SystemError> {
        let row = self.find_row(friendship_id).await?;
        if row.receiver_id != actor_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to accept this friend request",
            ));
        }
        self.accept(friendship_id).await
    }

    pub async fn decline_as(
        &self,
        actor_id: Uuid,
        friendship_id: i64,
    ) -> Result<(), error::SystemError> {
        let row = self.find_row(friendship_id).await?;
        if row.receiver_id != actor_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to decline this friend request",
            ));
        }
        if row.status != FriendshipStatus::Pending {
            return Err(error::SystemError::bad_request("Only pending requests can be declined"));
        }
        self.decline(friendship_id).await
    }

    pub async fn cancel_as(
        &self,
        actor_id: Uuid,
        friendship_id: i64,
    ) -> Result<(), error::SystemError> {
        let row = self.find_row(friendship_id).await?;
        if row.requester_id != actor_id || row.status != FriendshipStatus::Pending {
            return Err(error::SystemError::forbidden(
                "Only the requester can cancel a pending friend request",
            ));
        }
        self.cancel(friendship_id).await
    }

    pub async fn remove_as(
        &self,
        actor_id: Uuid,
        friendship_id: i64,
    ) -> Result<(), error::SystemError> {
        let row = self.find_row(friendship_id).await?;
        if !row.involves(&actor_id) {
            return Err(error::SystemError::forbidden("You are not part of this friendship"));
        }
        self.remove_friend(friendship_id).await
    }

    pub async fn list_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipView>, error::SystemError> {
        let rows = self.friend_repo.find_accepted_for(&user_id).await?;
        self.with_counterparts(&user_id, rows).await
    }

    pub async fn list_incoming(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipView>, error::SystemError> {
        let rows = self.friend_repo.find_pending_to(&user_id).await?;
        self.with_counterparts(&user_id, rows).await
    }

    pub async fn list_outgoing(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipView>, error::SystemError> {
        let rows = self.friend_repo.find_pending_from(&user_id).await?;
        self.with_counterparts(&user_id, rows).await
    }

    async fn with_counterparts(
        &self,
        user_id: &Uuid,
        rows: Vec<FriendshipEntity>,
    ) -> Result<Vec<FriendshipView>, error::SystemError> {
        let profiles = summaries_by_id(
            self.profile_repo.as_ref(),
            rows.iter().map(|row| row.counterpart_of(user_id)),
        )
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let other = row.counterpart_of(user_id);
                match profiles.get(&other) {
                    Some(profile) => Some(FriendshipView::new(row, profile.clone())),
                    None => {
                        warn!("Skipping friendship {}: profile {} not found", row.id, other);
                        None
                    }
                }
            })
            .collect())
    }

    pub async fn search_users(
        &self,
        query: &str,
        exclude_user_id: Uuid,
    ) -> Result<Vec<ProfileResponse>, error::SystemError> {
        // Surrounding whitespace does not count towards the minimum length.
        let query = query.trim();
        if query.chars().count() < SEARCH_MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let profiles =
            self.profile_repo.search_by_name(query, &exclude_user_id, SEARCH_RESULT_LIMIT).await?;

        Ok(profiles
            .into_iter()
            .filter(|p| p.id != exclude_user_id)
            .map(ProfileResponse::from)
            .collect())
    }
}
