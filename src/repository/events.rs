//! Book event log repository

use sqlx::{Connection, PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        event::{Event, EventFailurePolicy, EventQuery, EventType, NewEvent},
    },
};

use super::bulk::insert_chunked;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Event log, oldest first, optionally restricted to one event type
    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE ($1::book_event_type IS NULL OR event_type = $1)
            ORDER BY id
            "#,
        )
        .bind(query.event_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    /// Events recorded for one ISBN, including those of purged books
    pub async fn list_for_isbn(&self, isbn: &str) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE isbn = $1 ORDER BY id")
            .bind(isbn)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    /// Append one event per copy of `book` on the caller's transaction.
    ///
    /// With [`EventFailurePolicy::Log`] the insert runs in a savepoint and a
    /// failure only rolls that savepoint back; the caller's mutation goes on.
    pub async fn record_book_mutation(
        conn: &mut PgConnection,
        book: &Book,
        event_type: EventType,
        policy: EventFailurePolicy,
    ) -> AppResult<usize> {
        let events = NewEvent::snapshots(book, event_type);
        if events.is_empty() {
            tracing::debug!(isbn = %book.isbn, %event_type, "Book has no copies, no events recorded");
            return Ok(0);
        }

        match policy {
            EventFailurePolicy::Abort => {
                Self::insert_all(conn, &events).await?;
            }
            EventFailurePolicy::Log => {
                let mut savepoint = conn.begin().await?;
                match Self::insert_all(&mut savepoint, &events).await {
                    Ok(_) => savepoint.commit().await?,
                    Err(e) => {
                        tracing::error!(
                            isbn = %book.isbn,
                            %event_type,
                            lost = events.len(),
                            "Failed to record book events: {}",
                            e
                        );
                        savepoint.rollback().await?;
                        return Ok(0);
                    }
                }
            }
        }

        tracing::debug!(isbn = %book.isbn, %event_type, count = events.len(), "Recorded book events");
        Ok(events.len())
    }

    /// Bulk insert prepared events
    pub async fn insert_all(conn: &mut PgConnection, events: &[NewEvent]) -> Result<u64, sqlx::Error> {
        insert_chunked(
            conn,
            "INSERT INTO events (isbn, copy_id, event_type, title, description, image_url) ",
            events,
            |mut row, event| {
                row.push_bind(event.isbn.clone())
                    .push_bind(event.copy_id)
                    .push_bind(event.event_type)
                    .push_bind(event.title.clone())
                    .push_bind(event.description.clone())
                    .push_bind(event.image_url.clone());
            },
        )
        .await
    }
}
