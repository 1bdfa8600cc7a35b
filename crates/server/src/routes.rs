pub mod roster;
pub mod songs;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeFile,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::accessor::AppMeta;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Document and songs sheet names for the sidebar's "Connected to:" line.
#[utoipa::path(get, path = "/api/meta", tag = "meta", responses((status = 200, description = "OK")))]
pub async fn app_meta(State(state): State<AppState>) -> Json<AppMeta> {
    Json(state.prep.app_meta().await)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: UI page, remote procedures, health.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // 页面允许被任意来源嵌入（iframe）
    let ui = Router::new()
        .route_service("/", ServeFile::new(&state.index_path))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("frame-ancestors *"),
        ));

    let api = Router::new()
        .route("/api/meta", get(app_meta))
        .route("/api/songs", get(songs::list_songs).post(songs::save_song))
        .route("/api/songs/clean", post(songs::clean_songs))
        .route("/api/roster/cell", post(roster::save_roster_cell))
        .route("/api/roster/:year", get(roster::get_roster_year));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(ui)
        .merge(api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        // 响应返回时打点，包含状态码与耗时
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        // 失败（5xx 等）时以 ERROR 记录
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
