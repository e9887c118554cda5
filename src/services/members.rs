//! Members service

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        checkout::Checkout,
        member::{CreateMember, Member, MemberPatch, MemberQuery},
    },
    repository::{members::MembersRepository, Repository},
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List live members, optionally with their active checkouts
    pub async fn list(&self, query: &MemberQuery) -> AppResult<Vec<Member>> {
        let mut members = self.repository.members.list_live().await?;

        if query.checkouts.unwrap_or(false) {
            let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
            let checkouts = self.repository.checkouts.active_for_members(&ids).await?;

            let mut by_member: HashMap<Uuid, Vec<Checkout>> = HashMap::new();
            for checkout in checkouts {
                by_member.entry(checkout.member_id).or_default().push(checkout);
            }
            for member in members.iter_mut() {
                member.checkouts = Some(by_member.remove(&member.id).unwrap_or_default());
            }
        }

        Ok(members)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Member>> {
        self.repository.members.find_live(id).await
    }

    pub async fn create(&self, payload: CreateMember) -> AppResult<Member> {
        if !payload.has_name() {
            return Err(AppError::Validation("member name missing in request".to_string()));
        }
        let member = self.repository.members.create(&payload).await?;
        tracing::info!(member_id = %member.id, "Member created");
        Ok(member)
    }

    pub async fn patch(&self, id: Uuid, patch: MemberPatch) -> AppResult<Member> {
        if patch.is_empty() {
            return self
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("member with id {} not found", id)));
        }

        let mut tx = self.repository.pool.begin().await?;
        let mut member = MembersRepository::lock_live(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("member with id {} not found", id)))?;

        if !patch.apply_to(&mut member) {
            return Ok(member);
        }

        let member = MembersRepository::update(&mut tx, &member).await?;
        tx.commit().await?;
        Ok(member)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.members.soft_delete(id).await
    }
}
