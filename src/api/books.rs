//! Book catalog endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{AddCopies, BookPatch, CreateBook},
};

use super::{AuthorListEnvelope, BookEnvelope, BookListEnvelope};

/// List live books with their authors and copies
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Live books", body = BookListEnvelope)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<BookListEnvelope>> {
    let books = state.services.books.list().await?;
    Ok(Json(books.into()))
}

/// Get one book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book, or null when missing", body = BookEnvelope),
        (status = 400, description = "Invalid ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookEnvelope>> {
    let book = state.services.books.get(&isbn).await?;
    Ok(Json(book.into()))
}

/// Authors of a book
#[utoipa::path(
    get,
    path = "/books/{isbn}/authors",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Authors of the book", body = AuthorListEnvelope)
    )
)]
pub async fn get_book_authors(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<AuthorListEnvelope>> {
    let authors = state.services.books.authors_of(&isbn).await?;
    Ok(Json(authors.into()))
}

/// Create a book with copies and author links
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookEnvelope>)> {
    let Json(payload) = payload?;
    let book = state.services.books.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Some(book).into())))
}

/// Add copies to a book
#[utoipa::path(
    post,
    path = "/books/{isbn}/copies",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = AddCopies,
    responses(
        (status = 201, description = "Copies added", body = BookEnvelope),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_copies(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    payload: Result<Json<AddCopies>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookEnvelope>)> {
    let Json(payload) = payload?;
    let book = state.services.books.add_copies(&isbn, payload).await?;
    Ok((StatusCode::CREATED, Json(Some(book).into())))
}

/// Partially update a book
#[utoipa::path(
    patch,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = BookEnvelope),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> AppResult<Json<BookEnvelope>> {
    let Json(patch) = payload?;
    let book = state.services.books.patch(&isbn, patch).await?;
    Ok(Json(Some(book).into()))
}

/// Soft delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.books.delete(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
