use crate::modules::profile::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/profiles").service(get_my_profile).service(get_profile));
}
