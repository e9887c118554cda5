//! Checkouts repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::checkout::{Checkout, CheckoutKey},
};

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All checkouts, or only unreturned ones
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT * FROM checkouts
            WHERE ($1 = FALSE OR returned IS NULL)
            ORDER BY checked_out DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(checkouts)
    }

    /// Checkouts of one member
    pub async fn list_for_member(&self, member_id: Uuid, active_only: bool) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT * FROM checkouts
            WHERE member_id = $1 AND ($2 = FALSE OR returned IS NULL)
            ORDER BY checked_out DESC
            "#,
        )
        .bind(member_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(checkouts)
    }

    /// Unreturned checkouts of a set of members
    pub async fn active_for_members(&self, member_ids: &[Uuid]) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT * FROM checkouts
            WHERE member_id = ANY($1) AND returned IS NULL
            ORDER BY checked_out DESC
            "#,
        )
        .bind(member_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(checkouts)
    }

    /// Checkouts of the copies of live books
    pub async fn for_live_books(&self) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT ch.* FROM checkouts ch
            JOIN copies c ON c.id = ch.copy_id
            JOIN books b ON b.isbn = c.isbn
            WHERE b.deleted_at IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(checkouts)
    }

    /// Checkouts of the copies of one book
    pub async fn for_book(&self, isbn: &str) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT ch.* FROM checkouts ch
            JOIN copies c ON c.id = ch.copy_id
            WHERE c.isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;
        Ok(checkouts)
    }

    /// Unreturned checkout holding a copy. Callers hold the copy row lock.
    pub async fn active_for_copy(conn: &mut PgConnection, copy_id: i64) -> AppResult<Option<Checkout>> {
        let checkout = sqlx::query_as::<_, Checkout>(
            "SELECT * FROM checkouts WHERE copy_id = $1 AND returned IS NULL",
        )
        .bind(copy_id)
        .fetch_optional(conn)
        .await?;
        Ok(checkout)
    }

    /// Checkout by composite key, locked
    pub async fn lock(conn: &mut PgConnection, key: CheckoutKey) -> AppResult<Option<Checkout>> {
        let checkout = sqlx::query_as::<_, Checkout>(
            "SELECT * FROM checkouts WHERE copy_id = $1 AND member_id = $2 FOR UPDATE",
        )
        .bind(key.copy_id)
        .bind(key.member_id)
        .fetch_optional(conn)
        .await?;
        Ok(checkout)
    }

    /// Start a checkout now. A returned checkout of the same copy by the same
    /// member is reopened. A copy still out with anyone is a conflict.
    pub async fn open(conn: &mut PgConnection, key: CheckoutKey) -> AppResult<Checkout> {
        let checkout = sqlx::query_as::<_, Checkout>(
            r#"
            INSERT INTO checkouts (copy_id, member_id, checked_out)
            VALUES ($1, $2, NOW())
            ON CONFLICT (copy_id, member_id) DO UPDATE
            SET checked_out = NOW(), returned = NULL, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(key.copy_id)
        .bind(key.member_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::from_constraint(
                e,
                &format!("copy {} is already checked out", key.copy_id),
                "unknown copy or member",
            )
        })?;
        Ok(checkout)
    }

    /// Stamp a checkout as returned now
    pub async fn close(conn: &mut PgConnection, key: CheckoutKey) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>(
            r#"
            UPDATE checkouts SET returned = NOW(), updated_at = NOW()
            WHERE copy_id = $1 AND member_id = $2 AND returned IS NULL
            RETURNING *
            "#,
        )
        .bind(key.copy_id)
        .bind(key.member_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no active checkout of copy {} by member {}",
                key.copy_id, key.member_id
            ))
        })
    }
}
