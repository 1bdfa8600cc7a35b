use axum::{extract::State, Json};
use service::songs::{CleanResult, SaveSongResult, Song, SongInput};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/songs", tag = "songs",
    responses(
        (status = 200, description = "Songs in sheet order"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<Song>>, JsonApiError> {
    let songs = state.prep.songs.list_songs().await?;
    info!(count = songs.len(), "list songs");
    Ok(Json(songs))
}

#[utoipa::path(
    post, path = "/api/songs", tag = "songs",
    request_body = crate::openapi::SongDoc,
    responses(
        (status = 200, description = "Saved; `updated` tells whether an existing row was rewritten"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn save_song(
    State(state): State<AppState>,
    Json(input): Json<SongInput>,
) -> Result<Json<SaveSongResult>, JsonApiError> {
    let res = state.prep.songs.upsert_song(&input).await?;
    info!(id = %res.id, updated = res.updated, "save song");
    Ok(Json(res))
}

#[utoipa::path(
    post, path = "/api/songs/clean", tag = "songs",
    responses(
        (status = 200, description = "Cleaned, or nothing to clean"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn clean_songs(State(state): State<AppState>) -> Result<Json<CleanResult>, JsonApiError> {
    Ok(Json(state.prep.songs.sanitize_all().await?))
}
