use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, run_migrations},
    middlewares::{authentication, authorization},
    modules::{
        friend::{repository_pg::FriendshipRepositoryPg, service::FriendService},
        profile::{repository_pg::ProfileRepositoryPg, service::ProfileService},
        team::{repository_pg::TeamRepositoryPg, service::TeamService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;
    run_migrations(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Database migration error: {e}")))?;

    let profile_repo = ProfileRepositoryPg::new(db_pool.clone());
    let friend_repo = FriendshipRepositoryPg::new(db_pool.clone());
    let team_repo = TeamRepositoryPg::new(db_pool.clone());

    let profile_service = ProfileService::with_dependencies(Arc::new(profile_repo.clone()));
    let friend_service =
        FriendService::with_dependencies(Arc::new(friend_repo), Arc::new(profile_repo.clone()));
    let team_service =
        TeamService::with_dependencies(Arc::new(team_repo), Arc::new(profile_repo.clone()));

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(team_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(from_fn(authorization(vec!["authenticated"])))
                    .wrap(from_fn(authentication))
                    .configure(modules::profile::route::configure)
                    .configure(modules::friend::route::configure)
                    .configure(modules::team::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
