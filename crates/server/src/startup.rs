use std::{net::SocketAddr, path::PathBuf};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{accessor::StoreOptions, runtime, schema::SheetNames, PrepService};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Open the document named by `cfg.store`, verify its schema and wrap it in router state.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let store = &cfg.store;
    let opts = StoreOptions {
        data_dir: store.data_dir.clone(),
        document_id: store.document_id.clone(),
        document_name: store.document_name.clone(),
        create_if_missing: store.create_if_missing,
    };
    let names = SheetNames {
        songs: store.songs_sheet.clone(),
        roster_prefix: store.roster_prefix.clone(),
    };
    let prep = PrepService::open(&opts, names).await?;
    Ok(AppState { prep, index_path: PathBuf::from(&cfg.ui.index_path) })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: open the document named by `cfg` and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.ui.index_path, &cfg.store.data_dir).await?;

    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, document_id = %cfg.store.document_id, "starting worship prep server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
