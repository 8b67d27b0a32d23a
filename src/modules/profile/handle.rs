use actix_web::{get, web, HttpRequest};
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::profile::{model::ProfileResponse, service::ProfileService};

#[get("/me")]
pub async fn get_my_profile(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let profile = profile_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(profile)).message("Profile retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_profile(
    profile_service: web::Data<ProfileService>,
    profile_id: web::Path<Uuid>,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let profile = profile_service.get_by_id(profile_id.into_inner()).await?;
    Ok(success::Success::ok(Some(profile)).message("Profile retrieved successfully"))
}
