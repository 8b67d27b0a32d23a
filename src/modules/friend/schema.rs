use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: i64,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipEntity {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.requester_id == *user_id || self.receiver_id == *user_id
    }

    /// The other participant, seen from `user_id`.
    pub fn counterpart_of(&self, user_id: &Uuid) -> Uuid {
        if self.requester_id == *user_id { self.receiver_id } else { self.requester_id }
    }
}
