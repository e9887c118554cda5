//! Checkout (loan of one copy to one member) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Checkout row, keyed by (copy_id, member_id)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    pub copy_id: i64,
    pub member_id: Uuid,
    pub checked_out: DateTime<Utc>,
    pub returned: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checkout {
    /// A checkout is active until the copy comes back
    pub fn is_active(&self) -> bool {
        self.returned.is_none()
    }
}

/// Body of checkout and return requests
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub copy_id: Option<i64>,
    pub member_id: Option<Uuid>,
}

/// Composite key of a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutKey {
    pub copy_id: i64,
    pub member_id: Uuid,
}

impl CheckoutRequest {
    pub fn key(&self) -> AppResult<CheckoutKey> {
        let copy_id = self
            .copy_id
            .ok_or_else(|| AppError::Validation("copy id missing in request".to_string()))?;
        let member_id = self
            .member_id
            .ok_or_else(|| AppError::Validation("member_id missing in request".to_string()))?;
        Ok(CheckoutKey { copy_id, member_id })
    }
}

/// Query parameters for checkout listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CheckoutQuery {
    /// Only unreturned checkouts
    pub active: Option<bool>,
}
