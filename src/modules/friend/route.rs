use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(list_friends)
            .service(search_users)
            .service(get_status)
            .service(send_friend_request)
            .service(list_incoming)
            .service(list_outgoing)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(cancel_friend_request)
            .service(remove_friend),
    );
}
