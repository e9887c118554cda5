//! Copy availability endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::{error::AppResult, models::availability::AvailabilityQuery};

use super::{AvailabilityEnvelope, AvailabilityListEnvelope};

/// Copy counts of every live book with copies
#[utoipa::path(
    get,
    path = "/availability",
    tag = "availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Copy counts per book", body = AvailabilityListEnvelope),
        (status = 400, description = "Unknown scope", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_availability(
    State(state): State<crate::AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> AppResult<Json<AvailabilityListEnvelope>> {
    let Query(query) = query?;
    let counts = state.services.availability.all(query.scope).await?;
    Ok(Json(counts.into()))
}

/// Copy counts of one book
#[utoipa::path(
    get,
    path = "/availability/{isbn}",
    tag = "availability",
    params(
        ("isbn" = String, Path, description = "Book ISBN"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Copy counts, or null", body = AvailabilityEnvelope)
    )
)]
pub async fn get_book_availability(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> AppResult<Json<AvailabilityEnvelope>> {
    let Query(query) = query?;
    let counts = state.services.availability.for_book(&isbn, query.scope).await?;
    Ok(Json(counts.into()))
}
