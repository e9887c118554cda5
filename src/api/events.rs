//! Book event log endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::{error::AppResult, models::event::EventQuery};

use super::EventListEnvelope;

/// Full event log
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events, oldest first", body = EventListEnvelope),
        (status = 400, description = "Unknown event type", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> AppResult<Json<EventListEnvelope>> {
    let Query(query) = query?;
    let events = state.services.events.list(&query).await?;
    Ok(Json(events.into()))
}

/// Events of one book
#[utoipa::path(
    get,
    path = "/events/books/{isbn}",
    tag = "events",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Events of the book", body = EventListEnvelope)
    )
)]
pub async fn get_book_events(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<EventListEnvelope>> {
    let events = state.services.events.for_book(&isbn).await?;
    Ok(Json(events.into()))
}
