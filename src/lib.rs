//! Backend server for the NYSC Toru-Orua community portal: elections and
//! voting, candidate registration with admin approval, and the suggestions
//! board, all over MongoDB.

#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Assemble the rocket: routes plus the config, database, and logging
/// fairings. Ignition performs the actual config loading and DB connection.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
}
