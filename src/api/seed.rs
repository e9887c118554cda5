//! Development reset/seed endpoint

use axum::{extract::State, Json};

use crate::error::AppResult;

use super::SeedEnvelope;

/// Wipe the catalog and reload the fixture data
#[utoipa::path(
    post,
    path = "/seed",
    tag = "seed",
    responses(
        (status = 200, description = "Rows per table after seeding", body = SeedEnvelope),
        (status = 500, description = "Seeding failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn seed_database(State(state): State<crate::AppState>) -> AppResult<Json<SeedEnvelope>> {
    let report = state.services.seed.seed().await?;
    Ok(Json(report.into()))
}
