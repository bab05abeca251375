#![feature(decl_macro, proc_macro_hygiene)]

#[macro_use]
extern crate rocket;

use diesel::r2d2::ConnectionManager;
use quill_models::{db_conn::DbPool, Connection, CONFIG};
use rocket::Rocket;
use tracing::info;

#[macro_use]
mod template_utils;
mod routes;
mod templates;
#[cfg(test)]
mod tests;
mod utils;

/// Initializes a database pool.
fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let mut builder = DbPool::builder();
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    };
    if let Some(min_idle) = CONFIG.db_min_idle {
        builder = builder.min_idle(Some(min_idle));
    };
    builder.build(manager).ok()
}

fn quill(pool: DbPool) -> Rocket {
    rocket::custom(
        CONFIG
            .rocket
            .clone()
            .expect("Error in the Rocket configuration"),
    )
    .mount(
        "/",
        routes![
            routes::posts::index,
            routes::posts::details,
            routes::posts::new,
            routes::posts::new_auth,
            routes::posts::create,
            routes::posts::create_auth,
            routes::posts::edit,
            routes::posts::edit_auth,
            routes::posts::update,
            routes::posts::update_auth,
            routes::comments::create,
            routes::comments::create_auth,
            routes::groups::details,
            routes::user::details,
            routes::user::follow,
            routes::user::follow_auth,
            routes::user::unfollow,
            routes::user::unfollow_auth,
            routes::user::feed,
            routes::user::feed_auth,
            routes::user::new,
            routes::user::create,
            routes::session::new,
            routes::session::create,
            routes::session::delete,
            routes::static_files,
        ],
    )
    .register(catchers![
        routes::errors::not_found,
        routes::errors::server_error
    ])
    .manage(pool)
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let pool = init_pool().expect("main: database pool initialization error");
    info!("Quill is serving on {}", CONFIG.base_url.as_str());
    quill(pool).launch();
}
