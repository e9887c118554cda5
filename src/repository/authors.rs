//! Authors repository

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::BookSummary,
    },
};

#[derive(FromRow)]
struct AuthoredBook {
    author_id: Uuid,
    #[sqlx(flatten)]
    book: BookSummary,
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a live author by ID
    pub async fn find_live(&self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// List live authors, each with the live books they wrote
    pub async fn list_live(&self) -> AppResult<Vec<Author>> {
        let mut authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE deleted_at IS NULL ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, AuthoredBook>(
            r#"
            SELECT ba.author_id, b.isbn, b.title, b.description, b.image_url
            FROM books_authors ba
            JOIN books b ON b.isbn = ba.book_isbn
            WHERE b.deleted_at IS NULL
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_author: HashMap<Uuid, Vec<BookSummary>> = HashMap::new();
        for row in rows {
            by_author.entry(row.author_id).or_default().push(row.book);
        }
        for author in authors.iter_mut() {
            author.books = Some(by_author.remove(&author.id).unwrap_or_default());
        }
        Ok(authors)
    }

    /// Live books linked to an author
    pub async fn books_of(&self, id: Uuid) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.isbn, b.title, b.description, b.image_url
            FROM books b
            JOIN books_authors ba ON ba.book_isbn = b.isbn
            WHERE ba.author_id = $1 AND b.deleted_at IS NULL
            ORDER BY b.title
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Live author carrying exactly this name
    pub async fn find_by_name(
        conn: &mut PgConnection,
        first_name: &str,
        last_name: &str,
        middle: &str,
    ) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE first_name = $1 AND last_name = $2 AND middle = $3 AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(middle)
        .fetch_optional(conn)
        .await?;
        Ok(author)
    }

    /// Ids among `ids` that name no live author
    pub async fn missing_ids(conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let missing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT wanted.id FROM UNNEST($1::uuid[]) AS wanted(id)
            WHERE NOT EXISTS (
                SELECT 1 FROM authors a WHERE a.id = wanted.id AND a.deleted_at IS NULL
            )
            "#,
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;
        Ok(missing)
    }

    /// Insert an author with a fresh id
    pub async fn insert(conn: &mut PgConnection, data: &CreateAuthor) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, first_name, last_name, middle)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.first_name.trim())
        .bind(data.last_name.trim())
        .bind(data.middle.trim())
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "author already exists", "invalid author"))
    }

    /// Lock a live author for update
    pub async fn lock_live(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(author)
    }

    /// Write back the name fields of an author
    pub async fn update(conn: &mut PgConnection, author: &Author) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $2, last_name = $3, middle = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.middle)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "another author has this name", "invalid author"))?
        .ok_or_else(|| AppError::NotFound(format!("author with id {} not found", author.id)))
    }

    /// Soft delete a live author
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE authors SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("author with id {} not found", id)));
        }
        Ok(())
    }
}
