use std::{path::PathBuf, sync::Arc};

use service::PrepService;

#[derive(Clone)]
pub struct AppState {
    pub prep: Arc<PrepService>,
    /// UI page served at `/`.
    pub index_path: PathBuf,
}
