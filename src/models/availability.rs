//! Copy availability aggregates

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::checkout::Checkout;

/// Which checkouts count against a copy's availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutScope {
    /// Only checkouts that have not been returned
    #[default]
    Active,
    /// Every checkout ever made, returned ones included
    All,
}

impl CheckoutScope {
    pub fn includes(&self, checkout: &Checkout) -> bool {
        match self {
            CheckoutScope::Active => checkout.is_active(),
            CheckoutScope::All => true,
        }
    }
}

/// Copy counts for one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookAvailability {
    pub isbn: String,
    pub title: String,
    pub number_of_copies: i64,
    pub number_checked_out: i64,
    pub number_available: i64,
}

/// Query parameters for availability endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// `active` or `all`; defaults to the configured scope
    pub scope: Option<CheckoutScope>,
}
