use std::sync::Arc;

use tracing::info;

use crate::accessor::{AppMeta, StoreOptions, Workbook};
use crate::errors::ServiceError;
use crate::roster::RosterManager;
use crate::schema::{verify_schema, SheetNames};
use crate::songs::SongCatalog;

/// Everything the remote surface calls into, sharing one open document.
pub struct PrepService {
    pub workbook: Workbook,
    pub songs: SongCatalog,
    pub roster: RosterManager,
}

impl PrepService {
    pub fn from_workbook(workbook: Workbook, names: SheetNames) -> Self {
        Self {
            songs: SongCatalog::new(workbook.clone(), names.songs.clone()),
            roster: RosterManager::new(workbook.clone(), names),
            workbook,
        }
    }

    /// Open the configured document and check its sheets against the fixed schema.
    pub async fn open(opts: &StoreOptions, names: SheetNames) -> Result<Arc<Self>, ServiceError> {
        let workbook = Workbook::open_store(opts).await?;
        verify_schema(&workbook, &names).await?;
        info!(document_id = %opts.document_id, songs_sheet = %names.songs, "prep service ready");
        Ok(Arc::new(Self::from_workbook(workbook, names)))
    }

    pub async fn app_meta(&self) -> AppMeta {
        self.workbook.app_meta(self.songs.sheet_name()).await
    }
}
