#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

pub mod coercion;
pub mod composer;
pub mod database;
pub mod env;
mod field_validator;
pub mod generator;
pub mod levels;
pub mod models;
pub mod payloads;
mod responses;
mod routes;
pub mod schema;
pub mod store;

pub fn rocket(database_url: &str) -> Rocket<Build> {
    rocket::build()
        .manage(database::init_pool(database_url.to_string()))
        .mount(
            "/",
            routes![
                routes::root::get,
                routes::generate::generate,
                routes::tags::list,
                routes::tags::mappings,
                routes::tags::create_with_mapping,
                routes::tags::import_mappings,
                routes::tags::delete_mappings,
                routes::taggings::list,
                routes::taggings::create,
                routes::taggings::delete_bulk,
                routes::vocabulary::list,
                routes::vocabulary::create,
                routes::vocabulary::import,
                routes::vocabulary::delete_bulk,
                routes::templates::list,
                routes::templates::create,
                routes::templates::import,
                routes::templates::delete_bulk,
                routes::templates::slots,
                routes::templates::create_slot,
                routes::templates::import_slots,
                routes::templates::delete_slots,
                routes::generated_sentences::list,
                routes::generated_sentences::create,
                routes::generated_sentences::import,
                routes::generated_sentences::delete_bulk,
                routes::generated_sentences::favorite,
                routes::generated_sentences::vocabulary,
            ],
        )
        .register("/", catchers![routes::catcher::default])
}
