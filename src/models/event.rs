//! Book event log model
//!
//! Every create, update or delete of a book appends one event per copy of
//! the book, carrying the book's descriptive fields as they stand after the
//! mutation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::book::Book;

/// Kind of book mutation an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "book_event_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventType::Create => "CREATE",
            EventType::Update => "UPDATE",
            EventType::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Stored event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    pub isbn: String,
    pub copy_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Event row waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub isbn: String,
    pub copy_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl NewEvent {
    /// One event per copy of `book`, each a snapshot of its current fields.
    pub fn snapshots(book: &Book, event_type: EventType) -> Vec<NewEvent> {
        book.copies
            .iter()
            .map(|copy| NewEvent {
                isbn: book.isbn.clone(),
                copy_id: copy.id,
                event_type,
                title: book.title.clone(),
                description: book.description.clone(),
                image_url: book.image_url.clone(),
            })
            .collect()
    }
}

/// What to do with a book mutation whose events fail to insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFailurePolicy {
    /// Roll the whole mutation back
    #[default]
    Abort,
    /// Keep the mutation and log the lost events
    Log,
}

/// Query parameters for the event log
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Only events of this type (CREATE, UPDATE or DELETE)
    pub event_type: Option<EventType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookCopy;

    fn book_with_copies(count: i64) -> Book {
        let now = Utc::now();
        Book {
            isbn: "9781".to_string(),
            title: "Dune".to_string(),
            description: "Desert planet".to_string(),
            image_url: "http://img/dune.png".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            authors: Vec::new(),
            copies: (1..=count)
                .map(|id| BookCopy {
                    id,
                    isbn: "9781".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_snapshot_per_copy() {
        let book = book_with_copies(3);
        let events = NewEvent::snapshots(&book, EventType::Update);

        assert_eq!(events.len(), 3);
        let ids: Vec<i64> = events.iter().map(|e| e.copy_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for event in &events {
            assert_eq!(event.isbn, "9781");
            assert_eq!(event.event_type, EventType::Update);
            assert_eq!(event.title, "Dune");
            assert_eq!(event.description, "Desert planet");
        }
    }

    #[test]
    fn test_no_copies_no_events() {
        let book = book_with_copies(0);
        assert!(NewEvent::snapshots(&book, EventType::Delete).is_empty());
    }

    #[test]
    fn test_snapshot_follows_current_title() {
        let mut book = book_with_copies(2);
        book.title = "Dune Messiah".to_string();
        let events = NewEvent::snapshots(&book, EventType::Update);
        assert!(events.iter().all(|e| e.title == "Dune Messiah"));
    }

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(serde_json::to_string(&EventType::Create).unwrap(), "\"CREATE\"");
        let parsed: EventType = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(parsed, EventType::Delete);
        assert_eq!(EventType::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_failure_policy_names() {
        let policy: EventFailurePolicy = serde_json::from_str("\"log\"").unwrap();
        assert_eq!(policy, EventFailurePolicy::Log);
        assert_eq!(EventFailurePolicy::default(), EventFailurePolicy::Abort);
    }
}
