//! Seed fixtures and reset report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::author::BookAuthorLink;
use super::book::BookCopy;
use super::event::NewEvent;

/// Author entry of `authors.json`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorFixture {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle: String,
}

/// Book entry of `books.json`
#[derive(Debug, Clone, Deserialize)]
pub struct BookFixture {
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Author id; must be listed in `authors.json`
    pub author: Option<Uuid>,
    /// Physical copies to create
    #[serde(default = "default_fixture_copies")]
    pub copies: u32,
}

fn default_fixture_copies() -> u32 {
    1
}

/// Member entry of `members.json`
#[derive(Debug, Clone, Deserialize)]
pub struct MemberFixture {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle: String,
    #[serde(default)]
    pub image_url: String,
}

/// Checkout entry of `checkouts.json`; `book_id` is a copy id
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutFixture {
    pub book_id: i64,
    pub member_id: Uuid,
}

/// All fixture files of a seed run
#[derive(Debug, Clone, Default)]
pub struct SeedFixtures {
    pub authors: Vec<AuthorFixture>,
    pub books: Vec<BookFixture>,
    pub members: Vec<MemberFixture>,
    pub checkouts: Vec<CheckoutFixture>,
}

/// Checkout with its generated timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCheckout {
    pub copy_id: i64,
    pub member_id: Uuid,
    pub checked_out: DateTime<Utc>,
    pub returned: Option<DateTime<Utc>>,
}

/// Every row a seed run writes, in insert-ready form
#[derive(Debug, Clone, Default)]
pub struct SeedPlan {
    /// Books with sanitized ISBNs
    pub books: Vec<BookFixture>,
    pub copies: Vec<BookCopy>,
    pub authors: Vec<AuthorFixture>,
    pub members: Vec<MemberFixture>,
    pub checkouts: Vec<PlannedCheckout>,
    pub author_links: Vec<BookAuthorLink>,
    pub events: Vec<NewEvent>,
}

/// Row counts per table after a seed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeedReport {
    pub books: i64,
    pub copies: i64,
    pub authors: i64,
    pub members: i64,
    pub checkouts: i64,
    pub books_authors: i64,
    pub events: i64,
}

impl SeedReport {
    /// Tables left empty after seeding
    pub fn empty_tables(&self) -> Vec<&'static str> {
        [
            ("books", self.books),
            ("copies", self.copies),
            ("authors", self.authors),
            ("members", self.members),
            ("checkouts", self.checkouts),
            ("books_authors", self.books_authors),
            ("events", self.events),
        ]
        .into_iter()
        .filter(|(_, count)| *count < 1)
        .map(|(table, _)| table)
        .collect()
    }
}
