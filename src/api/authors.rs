//! Author endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{AuthorPatch, CreateAuthor},
};

use super::{parse_uuid, AuthorEnvelope, AuthorListEnvelope, BookSummaryListEnvelope};

/// List live authors with their books
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Live authors", body = AuthorListEnvelope)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<AuthorListEnvelope>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors.into()))
}

/// Get one author
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author UUID")),
    responses(
        (status = 200, description = "Author, or null when missing", body = AuthorEnvelope),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorEnvelope>> {
    let id = parse_uuid(&id, "author")?;
    let author = state.services.authors.get(id).await?;
    Ok(Json(author.into()))
}

/// Books of an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = String, Path, description = "Author UUID")),
    responses(
        (status = 200, description = "Books of the author", body = BookSummaryListEnvelope)
    )
)]
pub async fn get_author_books(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookSummaryListEnvelope>> {
    let id = parse_uuid(&id, "author")?;
    let books = state.services.authors.books_of(id).await?;
    Ok(Json(books.into()))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorEnvelope),
        (status = 400, description = "Name missing", body = crate::error::ErrorResponse),
        (status = 409, description = "Author already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    payload: Result<Json<CreateAuthor>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthorEnvelope>)> {
    let Json(payload) = payload?;
    let author = state.services.authors.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Some(author).into())))
}

/// Partially update an author
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author UUID")),
    request_body = AuthorPatch,
    responses(
        (status = 200, description = "Author updated", body = AuthorEnvelope),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AuthorPatch>, JsonRejection>,
) -> AppResult<Json<AuthorEnvelope>> {
    let id = parse_uuid(&id, "author")?;
    let Json(patch) = payload?;
    let author = state.services.authors.patch(id, patch).await?;
    Ok(Json(Some(author).into()))
}

/// Soft delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author UUID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_uuid(&id, "author")?;
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
