#[macro_use]
extern crate diesel;
extern crate env_logger;
extern crate log;

use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use diesel::r2d2::ConnectionManager;
use diesel::PgConnection;
use log::info;

mod api;
mod core;
mod db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug,hyper=info", std::env::var("RUST_LOG")
          .map_or_else(|_| "".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let pg_spec = database_url();
    let pg_mgr = ConnectionManager::<PgConnection>::new(pg_spec);
    let pg_pool = Data::new(r2d2::Pool::builder()
        .build(pg_mgr)
        .expect("Failed to create pool."));

    let bind = std::env::var("BIND_ADDRESS")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    info!("Starting server at: {}", &bind);

    HttpServer::new(move || {
        App::new()
            .app_data(pg_pool.clone())
            .wrap(middleware::Logger::default())
            .service(api::index)
            .service(api::get_movies)
            .service(api::post_movie)
            .service(api::get_movie)
            .service(api::patch_movie)
            .service(api::delete_movie)
            .service(api::get_movies_by_country)
            .service(api::get_movies_by_genre)
    })
    .bind(&bind)?
    .run()
    .await
}

fn database_url() -> String {
    let user = std::env::var("DATABASE_USERNAME").expect("DATABASE_USERNAME");
    let password = std::env::var("DATABASE_PASSWORD").expect("DATABASE_PASSWORD");
    let host = std::env::var("DATABASE_IP").expect("DATABASE_IP");
    let port = std::env::var("DATABASE_PORT").expect("DATABASE_PORT");
    let name = std::env::var("DATABASE_NAME").expect("DATABASE_NAME");

    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
}
