//! Development reset and bulk load of the whole catalog

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::seed::{SeedPlan, SeedReport},
};

use super::{bulk::insert_chunked, events::EventsRepository};

#[derive(Clone)]
pub struct SeedRepository {
    pool: Pool<Postgres>,
}

impl SeedRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Wipe every catalog table and load `plan` in one transaction.
    ///
    /// Copies are written before the books they reference; the deferred
    /// foreign keys are only checked at commit.
    pub async fn reset_and_load(&self, plan: &SeedPlan) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "TRUNCATE events, checkouts, books_authors, copies, members, authors, books RESTART IDENTITY CASCADE",
        )
        .execute(&mut *tx)
        .await?;

        insert_chunked(&mut tx, "INSERT INTO copies (id, isbn) ", &plan.copies, |mut row, copy| {
            row.push_bind(copy.id).push_bind(copy.isbn.clone());
        })
        .await?;

        insert_chunked(
            &mut tx,
            "INSERT INTO books (isbn, title, description, image_url) ",
            &plan.books,
            |mut row, book| {
                row.push_bind(book.isbn.clone())
                    .push_bind(book.title.clone())
                    .push_bind(book.description.clone())
                    .push_bind(book.image_url.clone());
            },
        )
        .await?;

        insert_chunked(
            &mut tx,
            "INSERT INTO authors (id, first_name, last_name, middle) ",
            &plan.authors,
            |mut row, author| {
                row.push_bind(author.id)
                    .push_bind(author.first_name.clone())
                    .push_bind(author.last_name.clone())
                    .push_bind(author.middle.clone());
            },
        )
        .await?;

        insert_chunked(
            &mut tx,
            "INSERT INTO members (id, first_name, last_name, middle, image_url) ",
            &plan.members,
            |mut row, member| {
                row.push_bind(member.id)
                    .push_bind(member.first_name.clone())
                    .push_bind(member.last_name.clone())
                    .push_bind(member.middle.clone())
                    .push_bind(member.image_url.clone());
            },
        )
        .await?;

        insert_chunked(
            &mut tx,
            "INSERT INTO checkouts (copy_id, member_id, checked_out, returned) ",
            &plan.checkouts,
            |mut row, checkout| {
                row.push_bind(checkout.copy_id)
                    .push_bind(checkout.member_id)
                    .push_bind(checkout.checked_out)
                    .push_bind(checkout.returned);
            },
        )
        .await?;

        insert_chunked(
            &mut tx,
            "INSERT INTO books_authors (book_isbn, author_id) ",
            &plan.author_links,
            |mut row, link| {
                row.push_bind(link.book_isbn.clone()).push_bind(link.author_id);
            },
        )
        .await?;

        EventsRepository::insert_all(&mut tx, &plan.events).await?;

        // Explicit copy ids leave the sequence behind
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('copies', 'id'), COALESCE((SELECT MAX(id) FROM copies), 0) + 1, false)",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Row count of every catalog table
    pub async fn count_tables(&self) -> AppResult<SeedReport> {
        let (books, copies, authors, members, checkouts, books_authors, events) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM books),
                    (SELECT COUNT(*) FROM copies),
                    (SELECT COUNT(*) FROM authors),
                    (SELECT COUNT(*) FROM members),
                    (SELECT COUNT(*) FROM checkouts),
                    (SELECT COUNT(*) FROM books_authors),
                    (SELECT COUNT(*) FROM events)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(SeedReport {
            books,
            copies,
            authors,
            members,
            checkouts,
            books_authors,
            events,
        })
    }
}
