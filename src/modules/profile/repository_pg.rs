use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{
        model::ProfileSummary, repository::ProfileRepository, schema::ProfileEntity,
    },
};

#[derive(Clone)]
pub struct ProfileRepositoryPg {
    pool: sqlx::PgPool,
}

impl ProfileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile = sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_summaries(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ProfileSummary>, error::SystemError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, name, photo_url, reputation FROM profiles WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    async fn search_by_name(
        &self,
        query: &str,
        exclude_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileEntity>, error::SystemError> {
        let profiles = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT * FROM profiles
            WHERE id <> $1
            AND name ILIKE $2
            ORDER BY name
            LIMIT $3
            "#,
        )
        .bind(exclude_id)
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }
}
