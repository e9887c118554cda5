//! API handlers for the catalog REST endpoints
//!
//! Success bodies are wrapped as `{"data": ...}`.

pub mod authors;
pub mod availability;
pub mod books;
pub mod checkouts;
pub mod events;
pub mod health;
pub mod members;
pub mod openapi;
pub mod seed;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    author::Author,
    availability::BookAvailability,
    book::{Book, BookSummary},
    checkout::Checkout,
    event::Event,
    member::Member,
    seed::SeedReport,
};

/// Declare a `{"data": ...}` response body for one payload type
macro_rules! envelope {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(serde::Serialize, utoipa::ToSchema)]
        pub struct $name {
            pub data: $inner,
        }

        impl From<$inner> for $name {
            fn from(data: $inner) -> Self {
                Self { data }
            }
        }
    };
}

envelope!(
    /// One book, `null` when missing
    BookEnvelope,
    Option<Book>
);
envelope!(BookListEnvelope, Vec<Book>);
envelope!(BookSummaryListEnvelope, Vec<BookSummary>);
envelope!(
    /// One author, `null` when missing
    AuthorEnvelope,
    Option<Author>
);
envelope!(AuthorListEnvelope, Vec<Author>);
envelope!(
    /// One member, `null` when missing
    MemberEnvelope,
    Option<Member>
);
envelope!(MemberListEnvelope, Vec<Member>);
envelope!(CheckoutEnvelope, Checkout);
envelope!(CheckoutListEnvelope, Vec<Checkout>);
envelope!(EventListEnvelope, Vec<Event>);
envelope!(
    /// Copy counts of one book, `null` when missing or without copies
    AvailabilityEnvelope,
    Option<BookAvailability>
);
envelope!(AvailabilityListEnvelope, Vec<BookAvailability>);
envelope!(SeedEnvelope, SeedReport);

/// Parse a UUID path segment
pub fn parse_uuid(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("invalid {} id {}", what, raw)))
}
