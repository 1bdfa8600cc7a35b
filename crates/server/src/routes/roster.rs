use axum::{extract::{Path, State}, Json};
use service::roster::{RosterYear, SaveCellInput, SaveCellResult};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/roster/{year}", tag = "roster",
    params(("year" = String, Path, description = "Four-digit year")),
    responses(
        (status = 200, description = "Dates, role rows and the role|date grid"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn get_roster_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<RosterYear>, JsonApiError> {
    Ok(Json(state.prep.roster.get_roster_year(&year).await?))
}

#[utoipa::path(
    post, path = "/api/roster/cell", tag = "roster",
    request_body = crate::openapi::SaveCellDoc,
    responses(
        (status = 200, description = "Saved and approved"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn save_roster_cell(
    State(state): State<AppState>,
    Json(input): Json<SaveCellInput>,
) -> Result<Json<SaveCellResult>, JsonApiError> {
    let res = state.prep.roster.save_roster_cell(&input).await?;
    info!(year = %input.year, duty = %input.duty, date = %input.date_iso, "save roster cell");
    Ok(Json(res))
}
