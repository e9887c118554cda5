//! Checkout (lending) service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::checkout::{Checkout, CheckoutQuery, CheckoutRequest},
    repository::{books::BooksRepository, checkouts::CheckoutsRepository, members::MembersRepository, Repository},
};

#[derive(Clone)]
pub struct CheckoutsService {
    repository: Repository,
}

impl CheckoutsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &CheckoutQuery) -> AppResult<Vec<Checkout>> {
        self.repository.checkouts.list(query.active.unwrap_or(false)).await
    }

    pub async fn for_member(&self, member_id: Uuid, query: &CheckoutQuery) -> AppResult<Vec<Checkout>> {
        self.repository
            .checkouts
            .list_for_member(member_id, query.active.unwrap_or(false))
            .await
    }

    /// Lend a copy to a member. A copy is lent to at most one member at a time.
    pub async fn check_out(&self, request: CheckoutRequest) -> AppResult<Checkout> {
        let key = request.key()?;
        let mut tx = self.repository.pool.begin().await?;

        MembersRepository::lock_live(&mut tx, key.member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("member with id {} not found", key.member_id)))?;

        BooksRepository::lock_live_copy(&mut tx, key.copy_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("copy with id {} not found", key.copy_id)))?;

        if let Some(active) = CheckoutsRepository::active_for_copy(&mut tx, key.copy_id).await? {
            return Err(AppError::Conflict(format!(
                "copy {} is already checked out since {}",
                active.copy_id,
                active.checked_out.to_rfc3339()
            )));
        }

        let checkout = CheckoutsRepository::open(&mut tx, key).await?;
        tx.commit().await?;

        tracing::info!(copy_id = key.copy_id, member_id = %key.member_id, "Copy checked out");
        Ok(checkout)
    }

    /// Take a copy back from a member
    pub async fn return_copy(&self, request: CheckoutRequest) -> AppResult<Checkout> {
        let key = request.key()?;
        let mut tx = self.repository.pool.begin().await?;

        let existing = CheckoutsRepository::lock(&mut tx, key).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "checkout of copy {} by member {} not found",
                key.copy_id, key.member_id
            ))
        })?;
        if !existing.is_active() {
            return Err(AppError::BusinessRule(format!(
                "copy {} was already returned",
                key.copy_id
            )));
        }

        let checkout = CheckoutsRepository::close(&mut tx, key).await?;
        tx.commit().await?;

        tracing::info!(copy_id = key.copy_id, member_id = %key.member_id, "Copy returned");
        Ok(checkout)
    }
}
