//! Fixed sheet layouts and the startup check that the stored sheets match them.

use serde_json::Value;
use tracing::{info, warn};

use crate::accessor::Workbook;
use crate::errors::ServiceError;
use crate::storage::cell_text;

/// Songs sheet header, by position.
pub const SONG_COLS: &[&str] = &[
    "ID",
    "Title",
    "Artist",
    "Category",
    "Key",
    "Tempo",
    "Theme",
    "Season",
    "Style",
    "Lyrics",
    "DocLinks",
    "YouTube",
    "UpdatedAt",
];

/// Column A of every roster sheet. Row 1 is the `Date` header, not a duty.
pub const ROSTER_ROWS: &[&str] = &[
    "Date",
    "Liturgical Day",
    "Preacher",
    "Worship Leader / Liturgist",
    "1st Reading",
    "Psalm Reading",
    "2nd Reading",
    "Gospel Reading",
    "Bible Reader 1",
    "Bible Reader 2",
    "Usher 1",
    "Usher 2",
    "Communion Assistance 1",
    "Communion Assistance 2",
    "Communion Assistance 3",
    "Altar Guild 1",
    "Altar Guild 2",
    "Pianist",
    "Guitarist",
    "Bassist",
    "Drummer",
    "Other Instrument",
    "Singer 1",
    "Singer 2",
    "Singer 3",
    "Singer 4",
    "LCD (Visual)",
    "Live Streaming",
    "PA (Audio)",
];

/// Sheet names used by the catalog and roster.
#[derive(Clone, Debug)]
pub struct SheetNames {
    pub songs: String,
    pub roster_prefix: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self { songs: "Songs".into(), roster_prefix: "Roster ".into() }
    }
}

impl SheetNames {
    pub fn roster(&self, year: &str) -> String {
        format!("{}{}", self.roster_prefix, year)
    }
}

pub fn song_header_row() -> Vec<Value> {
    SONG_COLS.iter().map(|h| Value::String((*h).to_string())).collect()
}

/// Check stored headers against [`SONG_COLS`] and [`ROSTER_ROWS`].
///
/// An empty Songs sheet gets its header row written. Any mismatch is a
/// [`ServiceError::Schema`]; nothing is repaired.
pub async fn verify_schema(workbook: &Workbook, names: &SheetNames) -> Result<(), ServiceError> {
    let songs = workbook.get_or_create_sheet(&names.songs).await?;
    if songs.last_row().await? == 0 {
        songs.set_values(1, 1, vec![song_header_row()]).await?;
        info!(sheet = %names.songs, "wrote songs header row");
    } else {
        let header = songs.get_values(1, 1, 1, SONG_COLS.len()).await?;
        let found: Vec<String> = header[0].iter().map(|c| cell_text(Some(c)).trim().to_string()).collect();
        if found != SONG_COLS {
            return Err(ServiceError::Schema(format!(
                "sheet {:?} header is {:?}, expected {:?}",
                names.songs, found, SONG_COLS
            )));
        }
    }

    let mut checked = 0usize;
    for name in workbook.sheet_names().await {
        if !name.starts_with(&names.roster_prefix) {
            continue;
        }
        let sheet = workbook.get_or_create_sheet(&name).await?;
        let present = sheet.last_row().await?.min(ROSTER_ROWS.len());
        if present == 0 {
            continue;
        }
        let labels = sheet.get_values(1, 1, present, 1).await?;
        for (idx, row) in labels.iter().enumerate() {
            let label = cell_text(row.first());
            let label = label.trim();
            if label.is_empty() {
                warn!(sheet = %name, row = idx + 1, "roster role label is blank");
                continue;
            }
            if label != ROSTER_ROWS[idx] {
                return Err(ServiceError::Schema(format!(
                    "sheet {:?} row {} label is {:?}, expected {:?}",
                    name,
                    idx + 1,
                    label,
                    ROSTER_ROWS[idx]
                )));
            }
        }
        checked += 1;
    }
    info!(roster_sheets = checked, "schema verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GridStore, JsonGridStore};
    use serde_json::json;
    use std::sync::Arc;

    async fn workbook() -> (Workbook, Arc<JsonGridStore>, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!("schema_{}.json", uuid::Uuid::new_v4()));
        let store = JsonGridStore::open(&tmp, "Doc", true).await.expect("store");
        (Workbook::new(store.clone()), store, tmp)
    }

    #[test]
    fn tables_have_fixed_sizes() {
        assert_eq!(SONG_COLS.len(), 13);
        assert_eq!(ROSTER_ROWS.len(), 29);
        assert_eq!(ROSTER_ROWS[0], "Date");
        assert_eq!(SONG_COLS[SONG_COLS.len() - 1], "UpdatedAt");
        assert_eq!(SheetNames::default().roster("2025"), "Roster 2025");
    }

    #[tokio::test]
    async fn empty_songs_sheet_gets_header() -> Result<(), anyhow::Error> {
        let (wb, store, tmp) = workbook().await;
        verify_schema(&wb, &SheetNames::default()).await?;
        let header = store.get_range("Songs", crate::storage::GridRange::new(1, 1, 1, 13)).await?;
        assert_eq!(header[0], song_header_row());
        // second run sees a matching header
        verify_schema(&wb, &SheetNames::default()).await?;
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_song_header_is_rejected() -> Result<(), anyhow::Error> {
        let (wb, store, tmp) = workbook().await;
        store.get_or_create_sheet("Songs").await?;
        store.set_range("Songs", 1, 1, vec![vec![json!("ID"), json!("Name")]]).await?;
        let res = verify_schema(&wb, &SheetNames::default()).await;
        assert!(matches!(res, Err(ServiceError::Schema(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn roster_labels_checked_for_present_rows_only() -> Result<(), anyhow::Error> {
        let (wb, store, tmp) = workbook().await;
        store.get_or_create_sheet("Roster 2025").await?;
        let partial: Vec<Vec<Value>> = ROSTER_ROWS[..5].iter().map(|r| vec![json!(r)]).collect();
        store.set_range("Roster 2025", 1, 1, partial).await?;
        store.get_or_create_sheet("Roster 2026").await?;
        verify_schema(&wb, &SheetNames::default()).await?;

        store.set_range("Roster 2025", 3, 1, vec![vec![json!("Organist")]]).await?;
        let res = verify_schema(&wb, &SheetNames::default()).await;
        assert!(matches!(res, Err(ServiceError::Schema(msg)) if msg.contains("Organist")));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
