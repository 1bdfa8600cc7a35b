use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::accessor::Workbook;
use crate::errors::ServiceError;
use crate::roster::model::{grid_key, RosterYear, SaveCellInput, SaveCellResult, Year};
use crate::schema::{SheetNames, ROSTER_ROWS};
use crate::storage::{cell_text, Sheet};

pub struct RosterManager {
    workbook: Workbook,
    names: SheetNames,
}

fn role_labels() -> Vec<String> {
    ROSTER_ROWS.iter().map(|r| (*r).to_string()).collect()
}

async fn read_dates(sheet: &Sheet, last_col: usize) -> Result<Vec<String>, ServiceError> {
    let header = sheet.get_values(1, 2, 1, last_col - 1).await?;
    Ok(header
        .first()
        .map(|row| row.iter().map(|c| cell_text(Some(c)).trim().to_string()).collect())
        .unwrap_or_default())
}

impl RosterManager {
    pub fn new(workbook: Workbook, names: SheetNames) -> Self {
        Self { workbook, names }
    }

    async fn sheet_for(&self, year: &Year) -> Result<Sheet, ServiceError> {
        self.workbook.get_or_create_sheet(&self.names.roster(year.as_str())).await
    }

    /// Read a whole roster year as `role|date -> value`.
    ///
    /// Role rows the sheet does not have yet are skipped, as are blank date labels.
    pub async fn get_roster_year(&self, raw_year: &str) -> Result<RosterYear, ServiceError> {
        let year = Year::parse(raw_year, "getRosterYear")?;
        let sheet = self.sheet_for(&year).await?;
        let last_col = sheet.last_column().await?;
        let last_row = sheet.last_row().await?;

        let mut out = RosterYear {
            year: year.as_str().to_string(),
            dates: Vec::new(),
            rows: role_labels(),
            grid: BTreeMap::new(),
        };
        if last_col < 2 || last_row < 1 {
            return Ok(out);
        }

        out.dates = read_dates(&sheet, last_col).await?;
        if out.dates.is_empty() {
            return Ok(out);
        }

        let duty_rows = ROSTER_ROWS.len() - 1;
        let values = sheet.get_values(2, 2, duty_rows, last_col - 1).await?;
        for (r_idx, role) in ROSTER_ROWS.iter().enumerate().skip(1) {
            // role at index r_idx sits on sheet row r_idx + 1
            if r_idx + 1 > last_row {
                break;
            }
            let Some(cells) = values.get(r_idx - 1) else { break };
            for (c_idx, date) in out.dates.iter().enumerate() {
                if date.is_empty() {
                    continue;
                }
                out.grid.insert(grid_key(role, date), cell_text(cells.get(c_idx)));
            }
        }
        debug!(year = %out.year, dates = out.dates.len(), cells = out.grid.len(), "roster year read");
        Ok(out)
    }

    /// Write one assignment. Every check runs before the write, so a rejected
    /// call leaves the sheet untouched.
    pub async fn save_roster_cell(&self, input: &SaveCellInput) -> Result<SaveCellResult, ServiceError> {
        let year = Year::parse(&input.year, "saveRosterCell")?;

        let row_idx = ROSTER_ROWS
            .iter()
            .position(|r| *r == input.duty)
            .ok_or_else(|| ServiceError::Validation(format!("Duty/role not found in roster rows: {}", input.duty)))?;

        let sheet = self.sheet_for(&year).await?;
        let last_col = sheet.last_column().await?;
        if last_col < 2 {
            return Err(ServiceError::Validation("Roster sheet has no date columns yet.".into()));
        }

        let dates = read_dates(&sheet, last_col).await?;
        let col = dates
            .iter()
            .position(|d| *d == input.date_iso)
            .map(|i| i + 2)
            .ok_or_else(|| ServiceError::Validation(format!("Date not found in roster sheet: {}", input.date_iso)))?;

        let value = cell_text(input.value.as_ref());
        sheet.set_value(row_idx + 1, col, Value::String(value)).await?;
        info!(year = %year.as_str(), duty = %input.duty, date = %input.date_iso, "roster cell saved");

        Ok(SaveCellResult { ok: true, approved: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GridStore, JsonGridStore};
    use serde_json::json;
    use std::sync::Arc;

    async fn setup() -> (RosterManager, Arc<JsonGridStore>, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!("roster_{}.json", uuid::Uuid::new_v4()));
        let store = JsonGridStore::open(&tmp, "Doc", true).await.expect("store init");
        let roster = RosterManager::new(Workbook::new(store.clone()), SheetNames::default());
        (roster, store, tmp)
    }

    /// Roster sheet with all role labels and the given dates in row 1.
    async fn seed(store: &JsonGridStore, sheet: &str, dates: &[&str], role_rows: usize) {
        store.get_or_create_sheet(sheet).await.unwrap();
        let mut header = vec![json!("Date")];
        header.extend(dates.iter().map(|d| json!(d)));
        store.set_range(sheet, 1, 1, vec![header]).await.unwrap();
        let labels: Vec<Vec<Value>> = ROSTER_ROWS[1..role_rows].iter().map(|r| vec![json!(r)]).collect();
        if !labels.is_empty() {
            store.set_range(sheet, 2, 1, labels).await.unwrap();
        }
    }

    #[tokio::test]
    async fn fresh_year_is_empty() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        let year = roster.get_roster_year("2025").await?;
        assert_eq!(year.year, "2025");
        assert!(year.dates.is_empty());
        assert!(year.grid.is_empty());
        assert_eq!(year.rows.len(), 29);
        assert!(store.sheet_names().await.contains(&"Roster 2025".to_string()));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn bad_year_fails_before_touching_store() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        let err = roster.get_roster_year("25").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("25")));
        let input = SaveCellInput { year: "2k25".into(), date_iso: "x".into(), duty: "Pianist".into(), value: None };
        assert!(matches!(roster.save_roster_cell(&input).await, Err(ServiceError::Validation(_))));
        assert!(store.sheet_names().await.is_empty());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn saved_cell_shows_up_in_grid() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        seed(&store, "Roster 2025", &["2025-01-05", "2025-01-12"], ROSTER_ROWS.len()).await;

        let res = roster
            .save_roster_cell(&SaveCellInput {
                year: "2025".into(),
                date_iso: "2025-01-05".into(),
                duty: "Pianist".into(),
                value: Some("Alice".into()),
            })
            .await?;
        assert_eq!(res, SaveCellResult { ok: true, approved: true });

        let year = roster.get_roster_year("2025").await?;
        assert_eq!(year.dates, vec!["2025-01-05", "2025-01-12"]);
        assert_eq!(year.grid.get("Pianist|2025-01-05").map(String::as_str), Some("Alice"));
        assert_eq!(year.grid.get("Pianist|2025-01-12").map(String::as_str), Some(""));
        assert!(!year.grid.contains_key("Date|2025-01-05"));
        // 28 duties x 2 dates
        assert_eq!(year.grid.len(), 56);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_role_rows_and_blank_dates_are_skipped() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        // Date, Liturgical Day, Preacher only; one blank date label
        seed(&store, "Roster 2026", &["2026-03-01", "", "2026-03-15"], 3).await;
        store.set_range("Roster 2026", 3, 2, vec![vec![json!("Rev. Kim")]]).await?;

        let year = roster.get_roster_year("2026").await?;
        assert_eq!(year.dates, vec!["2026-03-01", "", "2026-03-15"]);
        assert_eq!(year.grid.len(), 4);
        assert_eq!(year.grid["Preacher|2026-03-01"], "Rev. Kim");
        assert!(!year.grid.contains_key("Pianist|2026-03-01"));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn rejected_writes_leave_sheet_untouched() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        seed(&store, "Roster 2025", &["2025-01-05"], ROSTER_ROWS.len()).await;
        let before = roster.get_roster_year("2025").await?;

        for (duty, date) in [("Organist", "2025-01-05"), ("pianist", "2025-01-05"), ("Pianist", "2025-01-06")] {
            let input = SaveCellInput {
                year: "2025".into(),
                date_iso: date.into(),
                duty: duty.into(),
                value: Some("Bob".into()),
            };
            let err = roster.save_roster_cell(&input).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{duty} {date}");
        }
        assert_eq!(roster.get_roster_year("2025").await?, before);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn sheet_without_dates_rejects_writes() -> Result<(), anyhow::Error> {
        let (roster, _store, tmp) = setup().await;
        let input = SaveCellInput {
            year: "2027".into(),
            date_iso: "2027-01-03".into(),
            duty: "Usher 1".into(),
            value: None,
        };
        let err = roster.save_roster_cell(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("no date columns")));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn date_labels_match_after_trim_and_value_defaults_empty() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        seed(&store, "Roster 2025", &[" 2025-02-02 "], ROSTER_ROWS.len()).await;
        store.set_range("Roster 2025", 19, 2, vec![vec![json!("Carol")]]).await?;

        let input = SaveCellInput {
            year: "2025".into(),
            date_iso: "2025-02-02".into(),
            duty: "Guitarist".into(),
            value: None,
        };
        roster.save_roster_cell(&input).await?;
        let year = roster.get_roster_year("2025").await?;
        assert_eq!(year.grid["Guitarist|2025-02-02"], "");
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn date_duty_writes_the_header_row() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        seed(&store, "Roster 2025", &["2025-01-05", "2025-01-12"], ROSTER_ROWS.len()).await;

        let input = SaveCellInput {
            year: "2025".into(),
            date_iso: "2025-01-05".into(),
            duty: "Date".into(),
            value: Some("2025-01-04".into()),
        };
        assert_eq!(roster.save_roster_cell(&input).await?, SaveCellResult { ok: true, approved: true });

        let year = roster.get_roster_year("2025").await?;
        assert_eq!(year.dates, vec!["2025-01-04", "2025-01-12"]);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn scalar_values_are_stored_as_text() -> Result<(), anyhow::Error> {
        let (roster, store, tmp) = setup().await;
        seed(&store, "Roster 2025", &["2025-01-05"], ROSTER_ROWS.len()).await;

        let input = SaveCellInput {
            year: "2025".into(),
            date_iso: "2025-01-05".into(),
            duty: "Usher 1".into(),
            value: Some(json!(42)),
        };
        roster.save_roster_cell(&input).await?;
        let year = roster.get_roster_year("2025").await?;
        assert_eq!(year.grid["Usher 1|2025-01-05"], "42");
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
