//! Books and copies repository

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookCopy, IsbnCandidate},
    },
};

/// Author row joined with the book it is linked to
#[derive(FromRow)]
struct LinkedAuthor {
    book_isbn: String,
    #[sqlx(flatten)]
    author: Author,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a live book with its authors and copies
    pub async fn find_live(&self, isbn: &str) -> AppResult<Option<Book>> {
        let mut conn = self.pool.acquire().await?;
        let book = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE isbn = $1 AND deleted_at IS NULL",
        )
        .bind(isbn)
        .fetch_optional(&mut *conn)
        .await?;

        match book {
            Some(book) => {
                let mut books = vec![book];
                Self::load_relations(&mut conn, &mut books).await?;
                Ok(books.pop())
            }
            None => Ok(None),
        }
    }

    /// List live books with their authors and copies
    pub async fn list_live(&self) -> AppResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;
        let mut books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE deleted_at IS NULL ORDER BY created_at, isbn",
        )
        .fetch_all(&mut *conn)
        .await?;

        Self::load_relations(&mut conn, &mut books).await?;
        Ok(books)
    }

    /// Live authors of a live book
    pub async fn authors_of(&self, isbn: &str) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.* FROM authors a
            JOIN books_authors ba ON ba.author_id = a.id
            JOIN books b ON b.isbn = ba.book_isbn
            WHERE ba.book_isbn = $1 AND a.deleted_at IS NULL AND b.deleted_at IS NULL
            ORDER BY a.last_name, a.first_name
            "#,
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Lock the row holding `isbn`, soft-deleted or not
    pub async fn lock_candidate(
        conn: &mut PgConnection,
        isbn: &str,
    ) -> AppResult<Option<IsbnCandidate>> {
        let row = sqlx::query_as::<_, IsbnCandidate>(
            "SELECT isbn, deleted_at FROM books WHERE isbn = $1 FOR UPDATE",
        )
        .bind(isbn)
        .fetch_optional(conn)
        .await?;
        Ok(row)
    }

    /// Lock a live book and load its relations
    pub async fn lock_live(conn: &mut PgConnection, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE isbn = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(isbn)
        .fetch_optional(&mut *conn)
        .await?;

        match book {
            Some(book) => {
                let mut books = vec![book];
                Self::load_relations(conn, &mut books).await?;
                Ok(books.pop())
            }
            None => Ok(None),
        }
    }

    /// Hard delete a book row; copies, author links and their checkouts go
    /// with it. Events are kept.
    pub async fn purge(conn: &mut PgConnection, isbn: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert a book row
    pub async fn insert(
        conn: &mut PgConnection,
        isbn: &str,
        title: &str,
        description: &str,
        image_url: &str,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, title, description, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(title)
        .bind(description)
        .bind(image_url)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::from_constraint(
                e,
                &format!("book with isbn {} already exists", isbn),
                "invalid book reference",
            )
        })
    }

    /// Add `count` copies of a book, returning them in id order
    pub async fn insert_copies(
        conn: &mut PgConnection,
        isbn: &str,
        count: u32,
    ) -> AppResult<Vec<BookCopy>> {
        let copies = sqlx::query_as::<_, BookCopy>(
            r#"
            WITH inserted AS (
                INSERT INTO copies (isbn)
                SELECT $1 FROM generate_series(1, $2)
                RETURNING id, isbn
            )
            SELECT id, isbn FROM inserted ORDER BY id
            "#,
        )
        .bind(isbn)
        .bind(count as i32)
        .fetch_all(conn)
        .await?;
        Ok(copies)
    }

    /// Link authors to a book; existing links are left alone
    pub async fn link_authors(
        conn: &mut PgConnection,
        isbn: &str,
        author_ids: &[Uuid],
    ) -> AppResult<u64> {
        if author_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO books_authors (book_isbn, author_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(isbn)
        .bind(author_ids)
        .execute(conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "author already linked", "unknown author id"))?;
        Ok(result.rows_affected())
    }

    /// Write back the descriptive fields of a book
    pub async fn update(conn: &mut PgConnection, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, description = $3, image_url = $4, updated_at = NOW()
            WHERE isbn = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.image_url)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book with isbn {} not found", book.isbn)))
    }

    /// Soft delete a live book
    pub async fn soft_delete(conn: &mut PgConnection, isbn: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = NOW(), updated_at = NOW() WHERE isbn = $1 AND deleted_at IS NULL",
        )
        .bind(isbn)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("book with isbn {} not found", isbn)));
        }
        Ok(())
    }

    /// Copy belonging to a live book
    pub async fn lock_live_copy(conn: &mut PgConnection, copy_id: i64) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            r#"
            SELECT c.id, c.isbn FROM copies c
            JOIN books b ON b.isbn = c.isbn
            WHERE c.id = $1 AND b.deleted_at IS NULL
            FOR UPDATE OF c
            "#,
        )
        .bind(copy_id)
        .fetch_optional(conn)
        .await?;
        Ok(copy)
    }

    /// Fill in authors and copies for a batch of books with two queries
    async fn load_relations(conn: &mut PgConnection, books: &mut [Book]) -> AppResult<()> {
        if books.is_empty() {
            return Ok(());
        }
        let isbns: Vec<String> = books.iter().map(|b| b.isbn.clone()).collect();

        let copies = sqlx::query_as::<_, BookCopy>(
            "SELECT id, isbn FROM copies WHERE isbn = ANY($1) ORDER BY id",
        )
        .bind(&isbns)
        .fetch_all(&mut *conn)
        .await?;

        let linked = sqlx::query_as::<_, LinkedAuthor>(
            r#"
            SELECT ba.book_isbn, a.* FROM books_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_isbn = ANY($1) AND a.deleted_at IS NULL
            ORDER BY a.last_name, a.first_name
            "#,
        )
        .bind(&isbns)
        .fetch_all(&mut *conn)
        .await?;

        let mut copies_by_isbn: HashMap<String, Vec<BookCopy>> = HashMap::new();
        for copy in copies {
            copies_by_isbn.entry(copy.isbn.clone()).or_default().push(copy);
        }
        let mut authors_by_isbn: HashMap<String, Vec<Author>> = HashMap::new();
        for row in linked {
            authors_by_isbn.entry(row.book_isbn).or_default().push(row.author);
        }

        for book in books.iter_mut() {
            book.copies = copies_by_isbn.remove(&book.isbn).unwrap_or_default();
            book.authors = authors_by_isbn.remove(&book.isbn).unwrap_or_default();
        }
        Ok(())
    }
}
