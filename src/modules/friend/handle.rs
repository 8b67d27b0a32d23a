use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{
                FriendRequestBody, FriendshipResponse, FriendshipStatusResponse, FriendshipView,
                Relation, SearchQuery,
            },
            repository_pg::FriendshipRepositoryPg,
            service::FriendService,
        },
        profile::{model::ProfileResponse, repository_pg::ProfileRepositoryPg},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendSvc = FriendService<FriendshipRepositoryPg, ProfileRepositoryPg>;

/// A repeated decline/cancel/remove finds nothing to delete; the caller's intent already holds.
fn already_handled(result: Result<(), error::SystemError>) -> Result<(), error::Error> {
    match result {
        Err(error::SystemError::NotFound(msg)) => {
            log::debug!("Friendship mutation already handled: {msg}");
            Ok(())
        }
        other => other.map_err(error::Error::from),
    }
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipView>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.list_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/search")]
pub async fn search_users(
    friend_service: web::Data<FriendSvc>,
    query: ValidatedQuery<SearchQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ProfileResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let users = friend_service.search_users(&query.0.q, user_id).await?;

    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[get("/status/{user_id}")]
pub async fn get_status(
    friend_service: web::Data<FriendSvc>,
    other_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipStatusResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship = friend_service.get_status(user_id, *other_id).await?;
    let response = FriendshipStatusResponse {
        relation: Relation::from_lookup(friendship.as_ref()),
        friendship,
    };

    Ok(success::Success::ok(Some(response)))
}

#[post("/requests")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let requester_id = get_claims(&req)?.sub;
    let request = friend_service.send_request(requester_id, body.0.receiver_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[get("/requests/incoming")]
pub async fn list_incoming(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipView>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.list_incoming(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/requests/outgoing")]
pub async fn list_outgoing(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendshipView>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.list_outgoing(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[post("/requests/{id:\\d+}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friendship = friend_service.accept_as(user_id, *friendship_id).await?;

    Ok(success::Success::ok(Some(friendship)).message("Friend request accepted successfully"))
}

#[post("/requests/{id:\\d+}/decline")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    already_handled(friend_service.decline_as(user_id, *friendship_id).await)?;
    Ok(success::Success::no_content())
}

#[delete("/requests/{id:\\d+}")]
pub async fn cancel_friend_request(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    already_handled(friend_service.cancel_as(user_id, *friendship_id).await)?;
    Ok(success::Success::no_content())
}

#[delete("/{id:\\d+}")]
pub async fn remove_friend(
    friend_service: web::Data<FriendSvc>,
    friendship_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    already_handled(friend_service.remove_as(user_id, *friendship_id).await)?;
    Ok(success::Success::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_deletes_are_swallowed() {
        assert!(already_handled(Err(error::SystemError::not_found("gone"))).is_ok());
        assert!(already_handled(Ok(())).is_ok());
    }

    #[test]
    fn other_failures_still_surface() {
        let result = already_handled(Err(error::SystemError::forbidden("not yours")));
        assert!(matches!(result, Err(error::Error::Forbidden(_))));
    }

    #[actix_web::test]
    async fn declining_a_friendship_surfaces_as_bad_request() {
        use crate::modules::profile::schema::Reputation;
        use crate::test::InMemoryStore;
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::default());
        let service = FriendService::with_dependencies(store.clone(), store.clone());
        let a = store.add_profile("Alice", Reputation::Craque);
        let b = store.add_profile("Bruno", Reputation::Iniciante);

        let request = service.send_request(a, b).await.unwrap();
        service.accept(request.id).await.unwrap();

        let result = already_handled(service.decline_as(b, request.id).await);
        assert!(matches!(result, Err(error::Error::BadRequest(_))));
        assert_eq!(service.relation(a, b).await.unwrap(), Relation::Accepted);
    }
}
