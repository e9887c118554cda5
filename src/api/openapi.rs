//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, availability, books, checkouts, events, health, members, seed};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.3.0",
        description = "Books, authors, copies, members, checkouts and the book event log",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::get_book_authors,
        books::create_book,
        books::add_copies,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::get_author_books,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Checkouts
        checkouts::list_checkouts,
        checkouts::get_member_checkouts,
        checkouts::create_checkout,
        checkouts::return_checkout,
        // Events
        events::list_events,
        events::get_book_events,
        // Availability
        availability::list_availability,
        availability::get_book_availability,
        // Seed
        seed::seed_database,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookCopy,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::AddCopies,
            crate::models::book::BookPatch,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::AuthorPatch,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::MemberPatch,
            // Checkouts
            crate::models::checkout::Checkout,
            crate::models::checkout::CheckoutRequest,
            // Events
            crate::models::event::Event,
            crate::models::event::EventType,
            // Availability
            crate::models::availability::BookAvailability,
            crate::models::availability::CheckoutScope,
            // Seed
            crate::models::seed::SeedReport,
            // Envelopes
            crate::api::BookEnvelope,
            crate::api::BookListEnvelope,
            crate::api::BookSummaryListEnvelope,
            crate::api::AuthorEnvelope,
            crate::api::AuthorListEnvelope,
            crate::api::MemberEnvelope,
            crate::api::MemberListEnvelope,
            crate::api::CheckoutEnvelope,
            crate::api::CheckoutListEnvelope,
            crate::api::EventListEnvelope,
            crate::api::AvailabilityEnvelope,
            crate::api::AvailabilityListEnvelope,
            crate::api::SeedEnvelope,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Books and copies"),
        (name = "authors", description = "Authors"),
        (name = "members", description = "Library members"),
        (name = "checkouts", description = "Lending copies to members"),
        (name = "events", description = "Append-only book event log"),
        (name = "availability", description = "Copy counts per book"),
        (name = "seed", description = "Development reset and seed")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
