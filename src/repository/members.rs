//! Members repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a live member by ID
    pub async fn find_live(&self, id: Uuid) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    /// List live members
    pub async fn list_live(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE deleted_at IS NULL ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Live member, locked for the rest of the transaction
    pub async fn lock_live(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(member)
    }

    /// Create a member
    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (id, first_name, last_name, middle, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.first_name.trim())
        .bind(data.last_name.trim())
        .bind(data.middle.trim())
        .bind(data.image_url.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }

    /// Write back the editable fields of a member
    pub async fn update(conn: &mut PgConnection, member: &Member) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET first_name = $2, last_name = $3, middle = $4, image_url = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(member.id)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.middle)
        .bind(&member.image_url)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("member with id {} not found", member.id)))
    }

    /// Soft delete a live member
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE members SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("member with id {} not found", id)));
        }
        Ok(())
    }
}
