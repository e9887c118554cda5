//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::book::BookSummary;
use super::patch::{has_any_value, merge_text};
use super::person::has_any_name;

/// Full author model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub middle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Books written by the author, only filled in on listings
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookSummary>>,
}

/// Create author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthor {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle: String,
}

impl CreateAuthor {
    pub fn has_name(&self) -> bool {
        has_any_name(&self.first_name, &self.last_name, &self.middle)
    }
}

/// Partial update of an author
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AuthorPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle: Option<String>,
}

impl AuthorPatch {
    pub fn is_empty(&self) -> bool {
        !has_any_value(&[
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.middle.as_deref(),
        ])
    }

    pub fn apply_to(&self, author: &mut Author) -> bool {
        let first = merge_text(&mut author.first_name, self.first_name.as_deref());
        let last = merge_text(&mut author.last_name, self.last_name.as_deref());
        let middle = merge_text(&mut author.middle, self.middle.as_deref());
        first || last || middle
    }
}

/// Book ISBN paired with one of its authors (junction row)
#[derive(Debug, Clone, FromRow)]
pub struct BookAuthorLink {
    pub book_isbn: String,
    pub author_id: Uuid,
}
