use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::accessor::{timestamp, uuid, Workbook};
use crate::errors::ServiceError;
use crate::schema::{song_header_row, SONG_COLS};
use crate::songs::model::{CleanResult, SaveSongResult, Song, SongInput};
use crate::storage::{cell_text, Sheet};

/// `ID -> sheet row`, valid while the sheet's last row is unchanged.
#[derive(Default)]
struct IdIndex {
    rows: HashMap<String, usize>,
    last_row: usize,
}

/// Songs sheet manager: list, upsert by `ID`, and bulk cleanup.
pub struct SongCatalog {
    workbook: Workbook,
    sheet_name: String,
    index: Mutex<Option<IdIndex>>,
}

impl SongCatalog {
    pub fn new(workbook: Workbook, sheet_name: impl Into<String>) -> Self {
        Self { workbook, sheet_name: sheet_name.into(), index: Mutex::new(None) }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    async fn sheet(&self) -> Result<Sheet, ServiceError> {
        self.workbook.get_or_create_sheet(&self.sheet_name).await
    }

    /// All data rows (row 2 onward) in sheet order.
    pub async fn list_songs(&self) -> Result<Vec<Song>, ServiceError> {
        let sheet = self.sheet().await?;
        let last_row = sheet.last_row().await?;
        if last_row < 2 {
            return Ok(Vec::new());
        }
        let values = sheet.get_values(2, 1, last_row - 1, SONG_COLS.len()).await?;
        Ok(values.iter().map(|row| Song::from_row(row)).collect())
    }

    /// Insert a new song or rewrite the row whose `ID` matches.
    ///
    /// `UpdatedAt` is always stamped here; whatever the client sent is discarded.
    pub async fn upsert_song(&self, input: &SongInput) -> Result<SaveSongResult, ServiceError> {
        let mut song = Song::from_input(input);
        if song.id.is_empty() {
            song.id = uuid("S");
        }
        song.updated_at = timestamp();

        let sheet = self.sheet().await?;
        let mut guard = self.index.lock().await;
        let last_row = sheet.last_row().await?;
        if last_row == 0 {
            sheet.set_values(1, 1, vec![song_header_row()]).await?;
        }

        match self.find_row(&sheet, &mut *guard, &song.id).await? {
            Some(row) => {
                sheet.set_values(row, 1, vec![song.to_row()]).await?;
                debug!(id = %song.id, row, "song row rewritten");
                Ok(SaveSongResult { ok: true, id: song.id, updated: true })
            }
            None => {
                let row = sheet.append_row(song.to_row()).await?;
                if let Some(index) = guard.as_mut() {
                    index.rows.insert(song.id.clone(), row);
                    index.last_row = row;
                }
                info!(id = %song.id, row, "song appended");
                Ok(SaveSongResult { ok: true, id: song.id, updated: false })
            }
        }
    }

    /// Normalize every data row in one write: cells become trimmed strings,
    /// blank IDs are filled in and `UpdatedAt` is restamped.
    pub async fn sanitize_all(&self) -> Result<CleanResult, ServiceError> {
        let sheet = self.sheet().await?;
        let mut guard = self.index.lock().await;
        let last_row = sheet.last_row().await?;
        if last_row < 2 {
            return Ok(CleanResult { ok: true, msg: Some("No data rows to clean.".into()) });
        }

        let mut values = sheet.get_values(2, 1, last_row - 1, SONG_COLS.len()).await?;
        let mut backfilled = 0usize;
        for row in values.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Value::String(cell_text(Some(&*cell)).trim().to_string());
            }
            if row[0].as_str().map_or(true, str::is_empty) {
                row[0] = Value::String(uuid("S"));
                backfilled += 1;
            }
            row[SONG_COLS.len() - 1] = Value::String(timestamp());
        }
        let count = values.len();
        sheet.set_values(2, 1, values).await?;
        *guard = None;
        info!(rows = count, backfilled, "songs sheet cleaned");
        Ok(CleanResult { ok: true, msg: None })
    }

    /// Resolve `id` through the index, rebuilding it when the sheet has grown
    /// or a cached row no longer holds that id.
    async fn find_row(&self, sheet: &Sheet, slot: &mut Option<IdIndex>, id: &str) -> Result<Option<usize>, ServiceError> {
        let last_row = sheet.last_row().await?;
        let stale = slot.as_ref().map_or(true, |index| index.last_row != last_row);
        if !stale {
            if let Some(row) = slot.as_ref().and_then(|index| index.rows.get(id).copied()) {
                if Self::row_holds(sheet, row, id).await? {
                    return Ok(Some(row));
                }
            } else {
                return Ok(None);
            }
        }

        let index = Self::build_index(sheet, last_row).await?;
        let row = index.rows.get(id).copied();
        *slot = Some(index);
        Ok(row)
    }

    async fn row_holds(sheet: &Sheet, row: usize, id: &str) -> Result<bool, ServiceError> {
        let cell = sheet.get_values(row, 1, 1, 1).await?;
        Ok(cell_text(cell.first().and_then(|r| r.first())) == id)
    }

    async fn build_index(sheet: &Sheet, last_row: usize) -> Result<IdIndex, ServiceError> {
        let mut rows = HashMap::new();
        if last_row >= 2 {
            let ids = sheet.get_values(2, 1, last_row - 1, 1).await?;
            for (offset, cells) in ids.iter().enumerate() {
                let id = cell_text(cells.first());
                if !id.is_empty() {
                    // first occurrence wins, matching a top-down scan
                    rows.entry(id).or_insert(offset + 2);
                }
            }
        }
        debug!(entries = rows.len(), last_row, "song id index rebuilt");
        Ok(IdIndex { rows, last_row })
    }
}
