use actix_web::{delete, get, patch, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        profile::repository_pg::ProfileRepositoryPg,
        team::{
            model::{
                CreateTeamBody, TeamDetailsResponse, TeamMemberResponse, TeamMemberView,
                UpdateTeamBody, UserTeamRow,
            },
            repository_pg::TeamRepositoryPg,
            schema::TeamEntity,
            service::TeamService,
        },
    },
    utils::ValidatedJson,
};

pub type TeamSvc = TeamService<TeamRepositoryPg, ProfileRepositoryPg>;

#[post("")]
pub async fn create_team(
    team_service: web::Data<TeamSvc>,
    body: ValidatedJson<CreateTeamBody>,
    req: HttpRequest,
) -> Result<success::Success<TeamEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let team = team_service.create_team(user_id, body.0).await?;
    Ok(success::Success::created(Some(team)).message("Team created successfully"))
}

#[get("/mine")]
pub async fn list_my_teams(
    team_service: web::Data<TeamSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserTeamRow>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let teams = team_service.user_teams(user_id).await?;
    Ok(success::Success::ok(Some(teams)).message("Teams retrieved successfully"))
}

#[get("/invite/{code}")]
pub async fn get_team_by_invite(
    team_service: web::Data<TeamSvc>,
    code: web::Path<String>,
) -> Result<success::Success<TeamEntity>, error::Error> {
    let team = team_service.team_by_invite_code(&code).await?;
    Ok(success::Success::ok(Some(team)))
}

#[post("/invite/{code}/join")]
pub async fn join_by_invite(
    team_service: web::Data<TeamSvc>,
    code: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<TeamMemberResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let member = team_service.join_by_invite_code(&code, user_id).await?;
    Ok(success::Success::created(Some(member)).message("Join request sent successfully"))
}

#[get("/{id:\\d+}")]
pub async fn get_team(
    team_service: web::Data<TeamSvc>,
    team_id: web::Path<i64>,
) -> Result<success::Success<TeamDetailsResponse>, error::Error> {
    let details = team_service.team_details(*team_id).await?;
    Ok(success::Success::ok(Some(details)))
}

#[patch("/{id:\\d+}")]
pub async fn update_team(
    team_service: web::Data<TeamSvc>,
    team_id: web::Path<i64>,
    body: ValidatedJson<UpdateTeamBody>,
    req: HttpRequest,
) -> Result<success::Success<TeamEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let team = team_service.update_team(user_id, *team_id, body.0).await?;
    Ok(success::Success::ok(Some(team)).message("Team updated successfully"))
}

#[post("/{id:\\d+}/join")]
pub async fn join_team(
    team_service: web::Data<TeamSvc>,
    team_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<TeamMemberResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let member = team_service.join_team(*team_id, user_id).await?;
    Ok(success::Success::created(Some(member)).message("Join request sent successfully"))
}

#[get("/{id:\\d+}/requests")]
pub async fn list_pending_requests(
    team_service: web::Data<TeamSvc>,
    team_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<Vec<TeamMemberView>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = team_service.pending_requests(user_id, *team_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Join requests retrieved successfully"))
}

#[post("/members/{member_id:\\d+}/approve")]
pub async fn approve_member(
    team_service: web::Data<TeamSvc>,
    member_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<TeamMemberResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let member = team_service.approve_member(user_id, *member_id).await?;
    Ok(success::Success::ok(Some(member)).message("Member approved"))
}

#[post("/members/{member_id:\\d+}/reject")]
pub async fn reject_member(
    team_service: web::Data<TeamSvc>,
    member_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<TeamMemberResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let member = team_service.reject_member(user_id, *member_id).await?;
    Ok(success::Success::ok(Some(member)).message("Member rejected"))
}

#[delete("/members/{member_id:\\d+}")]
pub async fn remove_member(
    team_service: web::Data<TeamSvc>,
    member_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    team_service.remove_member(user_id, *member_id).await?;
    Ok(success::Success::no_content())
}
