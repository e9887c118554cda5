//! Library Catalog Server
//!
//! REST JSON API over a library catalog: books and their copies, authors,
//! members, checkouts, and an append-only log of book mutations.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Catalog routes, without middleware. The seed route is only mounted when
/// enabled in the configuration.
pub fn api_routes(state: AppState) -> Router {
    let mut routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:isbn",
            get(api::books::get_book)
                .patch(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route("/books/:isbn/authors", get(api::books::get_book_authors))
        .route("/books/:isbn/copies", post(api::books::add_copies))
        // Authors
        .route("/authors", get(api::authors::list_authors).post(api::authors::create_author))
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .patch(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route("/authors/:id/books", get(api::authors::get_author_books))
        // Members
        .route("/members", get(api::members::list_members).post(api::members::create_member))
        .route(
            "/members/:id",
            get(api::members::get_member)
                .patch(api::members::update_member)
                .delete(api::members::delete_member),
        )
        // Checkouts
        .route(
            "/checkouts",
            get(api::checkouts::list_checkouts)
                .post(api::checkouts::create_checkout)
                .patch(api::checkouts::return_checkout),
        )
        .route("/checkouts/:member_id", get(api::checkouts::get_member_checkouts))
        // Events
        .route("/events", get(api::events::list_events))
        .route("/events/books/:isbn", get(api::events::get_book_events))
        // Availability
        .route("/availability", get(api::availability::list_availability))
        .route("/availability/:isbn", get(api::availability::get_book_availability));

    if state.config.seed.enabled {
        tracing::warn!("Seed endpoint enabled; POST /seed wipes the catalog");
        routes = routes.route("/seed", post(api::seed::seed_database));
    }

    routes.with_state(state)
}
