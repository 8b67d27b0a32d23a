use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::schema::FriendshipEntity;

#[async_trait::async_trait]
pub trait FriendshipRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Every row for the unordered pair, in either direction.
    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_pending_to(
        &self,
        receiver_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    /// Inserts a pending row unless one already exists for the unordered pair.
    /// Returns `None` when the pair is taken.
    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn mark_accepted(&self, id: i64)
    -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError>;

    async fn delete_pending(&self, id: i64) -> Result<bool, error::SystemError>;
}
