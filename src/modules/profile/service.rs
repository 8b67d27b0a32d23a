use log::info;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::profile::{
    model::{ProfileResponse, ProfileSummary},
    repository::ProfileRepository,
};

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository + Send + Sync>,
}

impl ProfileService {
    pub fn with_dependencies(repo: Arc<dyn ProfileRepository + Send + Sync>) -> Self {
        info!("ProfileService initialized with dependencies");
        ProfileService { repo }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ProfileResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(ProfileResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Profile not found"))
    }
}

/// Resolves every id in `ids` with a single batched lookup and indexes the result by id.
pub async fn summaries_by_id<P, I>(
    repo: &P,
    ids: I,
) -> Result<HashMap<Uuid, ProfileSummary>, error::SystemError>
where
    P: ProfileRepository + ?Sized,
    I: IntoIterator<Item = Uuid>,
{
    let unique: HashSet<Uuid> = ids.into_iter().collect();
    if unique.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<Uuid> = unique.into_iter().collect();
    let summaries = repo.find_summaries(&ids).await?;
    Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
}
