//! Book event log service

use crate::{
    error::AppResult,
    models::{
        book::normalize_isbn,
        event::{Event, EventQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        self.repository.events.list(query).await
    }

    pub async fn for_book(&self, isbn: &str) -> AppResult<Vec<Event>> {
        let isbn = normalize_isbn(isbn)?;
        self.repository.events.list_for_isbn(&isbn).await
    }
}
