use crate::modules::team::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/teams")
            .service(create_team)
            .service(list_my_teams)
            .service(get_team_by_invite)
            .service(join_by_invite)
            .service(get_team)
            .service(update_team)
            .service(join_team)
            .service(list_pending_requests)
            .service(approve_member)
            .service(reject_member)
            .service(remove_member),
    );
}
