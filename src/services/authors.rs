//! Authors service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorPatch, CreateAuthor},
        book::BookSummary,
        person::full_name,
    },
    repository::{authors::AuthorsRepository, Repository},
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list_live().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.repository.authors.find_live(id).await
    }

    pub async fn books_of(&self, id: Uuid) -> AppResult<Vec<BookSummary>> {
        self.repository.authors.books_of(id).await
    }

    /// Create an author; a live author with the same full name is a conflict
    pub async fn create(&self, payload: CreateAuthor) -> AppResult<Author> {
        if !payload.has_name() {
            return Err(AppError::Validation("author name missing in request".to_string()));
        }

        let mut tx = self.repository.pool.begin().await?;
        let existing = AuthorsRepository::find_by_name(
            &mut tx,
            payload.first_name.trim(),
            payload.last_name.trim(),
            payload.middle.trim(),
        )
        .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "author {} already exists",
                full_name(&payload.first_name, &payload.middle, &payload.last_name)
            )));
        }

        let author = AuthorsRepository::insert(&mut tx, &payload).await?;
        tx.commit().await?;
        Ok(author)
    }

    pub async fn patch(&self, id: Uuid, patch: AuthorPatch) -> AppResult<Author> {
        if patch.is_empty() {
            return self
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("author with id {} not found", id)));
        }

        let mut tx = self.repository.pool.begin().await?;
        let mut author = AuthorsRepository::lock_live(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author with id {} not found", id)))?;

        if !patch.apply_to(&mut author) {
            return Ok(author);
        }

        let author = AuthorsRepository::update(&mut tx, &author).await?;
        tx.commit().await?;
        Ok(author)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.authors.soft_delete(id).await
    }
}
