use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "reputation")]
pub enum Reputation {
    Iniciante,
    #[sqlx(rename = "Intermediário")]
    #[serde(rename = "Intermediário")]
    Intermediario,
    Craque,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub sport: Option<Vec<String>>,
    pub position: Option<Vec<String>>,
    pub bio: Option<String>,
    pub points: i32,
    pub matches_played: i32,
    pub reputation: Reputation,
    pub banner_url: Option<String>,
    pub favorite_team: Option<String>,
    pub favorite_team_logo_url: Option<String>,
    pub match_coins: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
