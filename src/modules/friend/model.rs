use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{
    friend::schema::{FriendshipEntity, FriendshipStatus},
    profile::model::ProfileSummary,
};

/// Relationship row as seen by one of its two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipLookup {
    pub id: i64,
    pub status: FriendshipStatus,
    pub is_requester: bool,
}

impl FriendshipLookup {
    pub fn for_user(row: &FriendshipEntity, user_id: &Uuid) -> Self {
        FriendshipLookup { id: row.id, status: row.status, is_requester: row.requester_id == *user_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    None,
    PendingOutgoing,
    PendingIncoming,
    Accepted,
}

impl Relation {
    pub fn from_lookup(lookup: Option<&FriendshipLookup>) -> Self {
        match lookup {
            None => Relation::None,
            Some(l) if l.status == FriendshipStatus::Accepted => Relation::Accepted,
            Some(l) if l.is_requester => Relation::PendingOutgoing,
            Some(_) => Relation::PendingIncoming,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendshipStatusResponse {
    pub relation: Relation,
    pub friendship: Option<FriendshipLookup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipResponse {
    pub id: i64,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendshipEntity> for FriendshipResponse {
    fn from(row: FriendshipEntity) -> Self {
        FriendshipResponse {
            id: row.id,
            requester_id: row.requester_id,
            receiver_id: row.receiver_id,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// A relationship row joined with the profile of the other participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipView {
    pub id: i64,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub counterpart: ProfileSummary,
}

impl FriendshipView {
    pub fn new(row: FriendshipEntity, counterpart: ProfileSummary) -> Self {
        FriendshipView {
            id: row.id,
            requester_id: row.requester_id,
            receiver_id: row.receiver_id,
            status: row.status,
            created_at: row.created_at,
            counterpart,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 100, message = "Search query is too long"))]
    pub q: String,
}
