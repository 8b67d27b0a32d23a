use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{model::ProfileSummary, schema::ProfileEntity},
};

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError>;

    /// One round trip for the whole id set. Unknown ids are simply absent from the result.
    async fn find_summaries(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ProfileSummary>, error::SystemError>;

    /// Case-insensitive substring match on name, never returning `exclude_id`.
    async fn search_by_name(
        &self,
        query: &str,
        exclude_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ProfileEntity>, error::SystemError>;
}
