use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{repository::FriendshipRepository, schema::FriendshipEntity},
};

#[derive(Clone)]
pub struct FriendshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        // LIMIT 2 is enough to tell "one" from "more than one"
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (requester_id = $1 AND receiver_id = $2)
            OR (requester_id = $2 AND receiver_id = $1)
            LIMIT 2
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status = 'accepted'
            AND (requester_id = $1 OR receiver_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_pending_to(
        &self,
        receiver_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status = 'pending' AND receiver_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status = 'pending' AND requester_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_pending(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        // friendships_pair_key makes this a single conditional insert
        let row = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (requester_id, receiver_id, status)
            VALUES ($1, $2, 'pending')
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn mark_accepted(
        &self,
        id: i64,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let row = sqlx::query_as::<_, FriendshipEntity>(
            "UPDATE friendships SET status = 'accepted' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_pending(&self, id: i64) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM friendships WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
