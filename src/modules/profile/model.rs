use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::profile::schema::{ProfileEntity, Reputation};

/// Minimal public projection of a profile, used to enrich friend and team lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
    pub reputation: Reputation,
}

impl From<&ProfileEntity> for ProfileSummary {
    fn from(profile: &ProfileEntity) -> Self {
        ProfileSummary {
            id: profile.id,
            name: profile.name.clone(),
            photo_url: profile.photo_url.clone(),
            reputation: profile.reputation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub sport: Vec<String>,
    pub position: Vec<String>,
    pub bio: Option<String>,
    pub points: i32,
    pub matches_played: i32,
    pub reputation: Reputation,
    pub banner_url: Option<String>,
    pub favorite_team: Option<String>,
    pub favorite_team_logo_url: Option<String>,
    pub match_coins: i32,
}

impl From<ProfileEntity> for ProfileResponse {
    fn from(entity: ProfileEntity) -> Self {
        ProfileResponse {
            id: entity.id,
            name: entity.name,
            photo_url: entity.photo_url,
            date_of_birth: entity.date_of_birth,
            city: entity.city,
            state: entity.state,
            sport: entity.sport.unwrap_or_default(),
            position: entity.position.unwrap_or_default(),
            bio: entity.bio,
            points: entity.points,
            matches_played: entity.matches_played,
            reputation: entity.reputation,
            banner_url: entity.banner_url,
            favorite_team: entity.favorite_team,
            favorite_team_logo_url: entity.favorite_team_logo_url,
            match_coins: entity.match_coins,
        }
    }
}
