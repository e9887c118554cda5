//! Book catalog service
//!
//! Every book mutation runs in one transaction together with the events it
//! appends to the log.

use std::collections::HashSet;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{normalize_isbn, reconcile_isbn, AddCopies, Book, BookPatch, CreateAction, CreateBook},
        event::{EventFailurePolicy, EventType},
    },
    repository::{authors::AuthorsRepository, books::BooksRepository, events::EventsRepository, Repository},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    event_policy: EventFailurePolicy,
}

impl BooksService {
    pub fn new(repository: Repository, event_policy: EventFailurePolicy) -> Self {
        Self {
            repository,
            event_policy,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_live().await
    }

    pub async fn get(&self, isbn: &str) -> AppResult<Option<Book>> {
        let isbn = normalize_isbn(isbn)?;
        self.repository.books.find_live(&isbn).await
    }

    pub async fn authors_of(&self, isbn: &str) -> AppResult<Vec<Author>> {
        let isbn = normalize_isbn(isbn)?;
        self.repository.books.authors_of(&isbn).await
    }

    /// Create a book with its copies and author links.
    ///
    /// A soft-deleted book holding the same ISBN is purged first; a live one
    /// makes the request a conflict.
    pub async fn create(&self, payload: CreateBook) -> AppResult<Book> {
        payload.validate()?;
        let isbn = normalize_isbn(&payload.isbn)?;
        let author_ids = dedup_ids(&payload.author_ids);

        let mut tx = self.repository.pool.begin().await?;

        let missing = AuthorsRepository::missing_ids(&mut tx, &author_ids).await?;
        if let Some(id) = missing.first() {
            return Err(AppError::Validation(format!("author with id {} not found", id)));
        }

        let existing = BooksRepository::lock_candidate(&mut tx, &isbn).await?;
        match reconcile_isbn(existing.as_ref()) {
            CreateAction::Reject => {
                return Err(AppError::Conflict(format!("book with isbn {} already exists", isbn)));
            }
            CreateAction::PurgeThenInsert => {
                BooksRepository::purge(&mut tx, &isbn).await?;
                tracing::info!(isbn = %isbn, "Purged soft-deleted book before re-creating it");
            }
            CreateAction::Insert => {}
        }

        BooksRepository::insert(
            &mut tx,
            &isbn,
            payload.title.trim(),
            payload.description.trim(),
            payload.image_url.trim(),
        )
        .await?;
        BooksRepository::insert_copies(&mut tx, &isbn, payload.copies).await?;
        BooksRepository::link_authors(&mut tx, &isbn, &author_ids).await?;

        let book = BooksRepository::lock_live(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::Internal(format!("book {} vanished during creation", isbn)))?;

        EventsRepository::record_book_mutation(&mut tx, &book, EventType::Create, self.event_policy)
            .await?;

        tx.commit().await?;
        tracing::info!(isbn = %book.isbn, copies = book.copies.len(), "Book created");
        Ok(book)
    }

    /// Merge a patch into a live book. Nothing is written, and no event is
    /// recorded, when the patch changes nothing.
    pub async fn patch(&self, isbn: &str, patch: BookPatch) -> AppResult<Book> {
        let isbn = normalize_isbn(isbn)?;
        if patch.is_empty() {
            return self
                .repository
                .books
                .find_live(&isbn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("book with isbn {} not found", isbn)));
        }

        let mut tx = self.repository.pool.begin().await?;
        let mut book = BooksRepository::lock_live(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book with isbn {} not found", isbn)))?;

        if !patch.apply_to(&mut book) {
            return Ok(book);
        }

        let stored = BooksRepository::update(&mut tx, &book).await?;
        book.updated_at = stored.updated_at;

        EventsRepository::record_book_mutation(&mut tx, &book, EventType::Update, self.event_policy)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Soft delete a live book
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let isbn = normalize_isbn(isbn)?;
        let mut tx = self.repository.pool.begin().await?;

        let book = BooksRepository::lock_live(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book with isbn {} not found", isbn)))?;

        BooksRepository::soft_delete(&mut tx, &isbn).await?;
        EventsRepository::record_book_mutation(&mut tx, &book, EventType::Delete, self.event_policy)
            .await?;

        tx.commit().await?;
        tracing::info!(isbn = %isbn, "Book deleted");
        Ok(())
    }

    /// Add copies to a live book. Only the new copies get CREATE events.
    pub async fn add_copies(&self, isbn: &str, payload: AddCopies) -> AppResult<Book> {
        payload.validate()?;
        let isbn = normalize_isbn(isbn)?;
        let mut tx = self.repository.pool.begin().await?;

        let mut book = BooksRepository::lock_live(&mut tx, &isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("book with isbn {} not found", isbn)))?;

        let added = BooksRepository::insert_copies(&mut tx, &isbn, payload.count).await?;

        let new_copies = Book {
            copies: added.clone(),
            ..book.clone()
        };
        EventsRepository::record_book_mutation(&mut tx, &new_copies, EventType::Create, self.event_policy)
            .await?;

        tx.commit().await?;
        book.copies.extend(added);
        tracing::info!(isbn = %isbn, added = payload.count, total = book.copies.len(), "Copies added");
        Ok(book)
    }
}

/// Drop repeated ids, keeping first-seen order
fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
