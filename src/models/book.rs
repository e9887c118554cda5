//! Book and copy models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::author::Author;
use super::patch::{has_any_value, merge_text};
use crate::error::{AppError, AppResult};

/// Longest ISBN the `books.isbn` column accepts after sanitizing
pub const MAX_ISBN_LEN: usize = 20;

/// Full book model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub authors: Vec<Author>,
    #[sqlx(skip)]
    pub copies: Vec<BookCopy>,
}

/// One physical, lendable copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i64,
    pub isbn: String,
}

/// Descriptive fields of a book, without relations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub isbn: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    /// ISBN; hyphens and spaces are stripped before storage
    #[validate(length(min = 1, message = "book isbn missing in request"))]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Authors to link to the new book
    #[serde(default)]
    pub author_ids: Vec<Uuid>,
    /// Number of copies to create with the book (default 1)
    #[serde(default = "default_copy_count")]
    #[validate(range(min = 1, max = 1000, message = "copies must be between 1 and 1000"))]
    pub copies: u32,
}

/// Add copies to an existing book
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCopies {
    #[serde(default = "default_copy_count")]
    #[validate(range(min = 1, max = 1000, message = "count must be between 1 and 1000"))]
    pub count: u32,
}

fn default_copy_count() -> u32 {
    1
}

/// Partial update of a book. ISBN is the identity and cannot be patched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        !has_any_value(&[
            self.title.as_deref(),
            self.description.as_deref(),
            self.image_url.as_deref(),
        ])
    }

    /// Merge into a stored book; returns whether any field changed.
    pub fn apply_to(&self, book: &mut Book) -> bool {
        let title = merge_text(&mut book.title, self.title.as_deref());
        let description = merge_text(&mut book.description, self.description.as_deref());
        let image_url = merge_text(&mut book.image_url, self.image_url.as_deref());
        title || description || image_url
    }
}

/// Strip separators from a user supplied ISBN and check what is left.
pub fn normalize_isbn(raw: &str) -> AppResult<String> {
    let isbn: String = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    if isbn.is_empty() {
        return Err(AppError::Validation("book isbn missing in request".to_string()));
    }
    if isbn.len() > MAX_ISBN_LEN || !isbn.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!("invalid isbn {}", raw)));
    }
    Ok(isbn)
}

/// Row found when looking an ISBN up, soft-deleted rows included.
#[derive(Debug, Clone, FromRow)]
pub struct IsbnCandidate {
    pub isbn: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// What creating a book with a given ISBN turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAction {
    /// Nothing holds the ISBN
    Insert,
    /// A soft-deleted row holds it; remove that row, then insert
    PurgeThenInsert,
    /// A live book holds it
    Reject,
}

/// A live ISBN is a conflict; new inventory for it goes through the copies
/// endpoint instead.
pub fn reconcile_isbn(existing: Option<&IsbnCandidate>) -> CreateAction {
    match existing {
        None => CreateAction::Insert,
        Some(row) if row.deleted_at.is_some() => CreateAction::PurgeThenInsert,
        Some(_) => CreateAction::Reject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> Book {
        let now = Utc::now();
        Book {
            isbn: "9781".to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            authors: Vec::new(),
            copies: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-0-441-17271-9").unwrap(), "9780441172719");
        assert_eq!(normalize_isbn(" 978 1 ").unwrap(), "9781");
        assert_eq!(normalize_isbn("0-8044-2957-X").unwrap(), "080442957X");
    }

    #[test]
    fn test_normalize_isbn_rejects() {
        assert!(matches!(normalize_isbn("--"), Err(AppError::Validation(_))));
        assert!(matches!(normalize_isbn("978/1"), Err(AppError::Validation(_))));
        assert!(matches!(
            normalize_isbn(&"1".repeat(MAX_ISBN_LEN + 1)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_reconcile_isbn() {
        assert_eq!(reconcile_isbn(None), CreateAction::Insert);

        let deleted = IsbnCandidate {
            isbn: "9781".to_string(),
            deleted_at: Some(Utc::now()),
        };
        assert_eq!(reconcile_isbn(Some(&deleted)), CreateAction::PurgeThenInsert);

        let live = IsbnCandidate {
            isbn: "9781".to_string(),
            deleted_at: None,
        };
        assert_eq!(reconcile_isbn(Some(&live)), CreateAction::Reject);
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut stored = book("Dune");
        let patch = BookPatch {
            title: Some("Dune Messiah".to_string()),
            description: Some(String::new()),
            image_url: None,
        };

        assert!(!patch.is_empty());
        assert!(patch.apply_to(&mut stored));
        assert_eq!(stored.title, "Dune Messiah");
        assert_eq!(stored.description, "desc");
    }

    #[test]
    fn test_empty_patch() {
        let patch = BookPatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        let mut stored = book("Dune");
        assert!(patch.is_empty());
        assert!(!patch.apply_to(&mut stored));
    }

    #[test]
    fn test_create_book_defaults() {
        let payload: CreateBook = serde_json::from_str(r#"{"isbn": "978-1"}"#).unwrap();
        assert_eq!(payload.copies, 1);
        assert!(payload.author_ids.is_empty());
        assert!(payload.validate().is_ok());

        let payload: CreateBook = serde_json::from_str(r#"{"isbn": "978-1", "copies": 0}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
