use serde_json::Value;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Any subset of the song columns; unknown fields are dropped and `UpdatedAt` is ignored.
/// Each value may be any JSON scalar and is stored as trimmed text (`66` becomes `"66"`).
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct SongDoc {
    pub ID: Option<Value>,
    pub Title: Option<Value>,
    pub Artist: Option<Value>,
    pub Category: Option<Value>,
    pub Key: Option<Value>,
    pub Tempo: Option<Value>,
    pub Theme: Option<Value>,
    pub Season: Option<Value>,
    pub Style: Option<Value>,
    pub Lyrics: Option<Value>,
    pub DocLinks: Option<Value>,
    pub YouTube: Option<Value>,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct SaveCellDoc {
    pub year: String,
    pub dateISO: String,
    pub duty: String,
    /// Any JSON scalar, stored as text; absent or `null` clears the cell.
    pub value: Option<Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::app_meta,
        crate::routes::songs::list_songs,
        crate::routes::songs::save_song,
        crate::routes::songs::clean_songs,
        crate::routes::roster::get_roster_year,
        crate::routes::roster::save_roster_cell,
    ),
    components(
        schemas(
            HealthResponse,
            SongDoc,
            SaveCellDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "meta"),
        (name = "songs"),
        (name = "roster")
    )
)]
pub struct ApiDoc;
