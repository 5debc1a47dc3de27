use rocket::Route;

mod admin;
mod auth;
mod candidate;
mod common;
mod public;
mod suggestion;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes.extend(candidate::routes());
    routes.extend(admin::routes());
    routes.extend(suggestion::routes());
    routes
}
