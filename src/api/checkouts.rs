//! Checkout endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::checkout::{CheckoutQuery, CheckoutRequest},
};

use super::{parse_uuid, CheckoutEnvelope, CheckoutListEnvelope};

/// List checkouts
#[utoipa::path(
    get,
    path = "/checkouts",
    tag = "checkouts",
    params(CheckoutQuery),
    responses(
        (status = 200, description = "Checkouts, newest first", body = CheckoutListEnvelope)
    )
)]
pub async fn list_checkouts(
    State(state): State<crate::AppState>,
    query: Result<Query<CheckoutQuery>, QueryRejection>,
) -> AppResult<Json<CheckoutListEnvelope>> {
    let Query(query) = query?;
    let checkouts = state.services.checkouts.list(&query).await?;
    Ok(Json(checkouts.into()))
}

/// Checkouts of one member
#[utoipa::path(
    get,
    path = "/checkouts/{member_id}",
    tag = "checkouts",
    params(
        ("member_id" = String, Path, description = "Member UUID"),
        CheckoutQuery
    ),
    responses(
        (status = 200, description = "Checkouts of the member", body = CheckoutListEnvelope)
    )
)]
pub async fn get_member_checkouts(
    State(state): State<crate::AppState>,
    Path(member_id): Path<String>,
    query: Result<Query<CheckoutQuery>, QueryRejection>,
) -> AppResult<Json<CheckoutListEnvelope>> {
    let member_id = parse_uuid(&member_id, "member")?;
    let Query(query) = query?;
    let checkouts = state.services.checkouts.for_member(member_id, &query).await?;
    Ok(Json(checkouts.into()))
}

/// Check a copy out to a member
#[utoipa::path(
    post,
    path = "/checkouts",
    tag = "checkouts",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Copy checked out", body = CheckoutEnvelope),
        (status = 404, description = "Copy or member not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Copy already checked out", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_checkout(
    State(state): State<crate::AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CheckoutEnvelope>)> {
    let Json(request) = payload?;
    let checkout = state.services.checkouts.check_out(request).await?;
    Ok((StatusCode::CREATED, Json(checkout.into())))
}

/// Return a checked out copy
#[utoipa::path(
    patch,
    path = "/checkouts",
    tag = "checkouts",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Copy returned", body = CheckoutEnvelope),
        (status = 404, description = "Checkout not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_checkout(
    State(state): State<crate::AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> AppResult<Json<CheckoutEnvelope>> {
    let Json(request) = payload?;
    let checkout = state.services.checkouts.return_copy(request).await?;
    Ok(Json(checkout.into()))
}
