//! Library member model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::checkout::Checkout;
use super::patch::{has_any_value, merge_text};
use super::person::has_any_name;

/// Full member model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub middle: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Active checkouts, only filled in when requested
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkouts: Option<Vec<Checkout>>,
}

/// Create member request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMember {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub middle: String,
    #[serde(default)]
    pub image_url: String,
}

impl CreateMember {
    pub fn has_name(&self) -> bool {
        has_any_name(&self.first_name, &self.last_name, &self.middle)
    }
}

/// Partial update of a member
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MemberPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle: Option<String>,
    pub image_url: Option<String>,
}

impl MemberPatch {
    pub fn is_empty(&self) -> bool {
        !has_any_value(&[
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.middle.as_deref(),
            self.image_url.as_deref(),
        ])
    }

    pub fn apply_to(&self, member: &mut Member) -> bool {
        let first = merge_text(&mut member.first_name, self.first_name.as_deref());
        let last = merge_text(&mut member.last_name, self.last_name.as_deref());
        let middle = merge_text(&mut member.middle, self.middle.as_deref());
        let image = merge_text(&mut member.image_url, self.image_url.as_deref());
        first || last || middle || image
    }
}

/// Query parameters for member listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MemberQuery {
    /// Attach each member's active checkouts
    pub checkouts: Option<bool>,
}
