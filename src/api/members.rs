//! Member endpoints

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
    models::member::{CreateMember, MemberPatch, MemberQuery},
};

use super::{parse_uuid, MemberEnvelope, MemberListEnvelope};

/// List live members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    params(MemberQuery),
    responses(
        (status = 200, description = "Live members", body = MemberListEnvelope)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    query: Result<Query<MemberQuery>, QueryRejection>,
) -> AppResult<Json<MemberListEnvelope>> {
    let Query(query) = query?;
    let members = state.services.members.list(&query).await?;
    Ok(Json(members.into()))
}

/// Get one member
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member UUID")),
    responses(
        (status = 200, description = "Member, or null when missing", body = MemberEnvelope)
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MemberEnvelope>> {
    let id = parse_uuid(&id, "member")?;
    let member = state.services.members.get(id).await?;
    Ok(Json(member.into()))
}

/// Create a member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = MemberEnvelope),
        (status = 400, description = "Name missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    payload: Result<Json<CreateMember>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MemberEnvelope>)> {
    let Json(payload) = payload?;
    let member = state.services.members.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Some(member).into())))
}

/// Partially update a member
#[utoipa::path(
    patch,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member UUID")),
    request_body = MemberPatch,
    responses(
        (status = 200, description = "Member updated", body = MemberEnvelope),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MemberPatch>, JsonRejection>,
) -> AppResult<Json<MemberEnvelope>> {
    let id = parse_uuid(&id, "member")?;
    let Json(patch) = payload?;
    let member = state.services.members.patch(id, patch).await?;
    Ok(Json(Some(member).into()))
}

/// Soft delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member UUID")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_uuid(&id, "member")?;
    state.services.members.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
