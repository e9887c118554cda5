//! Data models for the catalog

pub mod author;
pub mod availability;
pub mod book;
pub mod checkout;
pub mod event;
pub mod member;
pub mod patch;
pub mod person;
pub mod seed;

// Re-export commonly used types
pub use author::Author;
pub use availability::{BookAvailability, CheckoutScope};
pub use book::{Book, BookCopy, BookSummary};
pub use checkout::Checkout;
pub use event::{Event, EventFailurePolicy, EventType, NewEvent};
pub use member::Member;
pub use seed::SeedReport;
