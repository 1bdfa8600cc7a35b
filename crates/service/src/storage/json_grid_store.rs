use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::grid_store::{Cell, GridRange, GridStore, SheetDims};

/// Serialized shape of a grid document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    sheets: BTreeMap<String, SheetData>,
}

/// Ragged row-major cells; row `i` holds sheet row `i + 1`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SheetData {
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl SheetData {
    fn dims(&self) -> SheetDims {
        let mut dims = SheetDims::default();
        for (r, row) in self.rows.iter().enumerate() {
            if let Some(c) = row.iter().rposition(|cell| !is_blank(cell)) {
                dims.last_row = r + 1;
                dims.last_col = dims.last_col.max(c + 1);
            }
        }
        dims
    }

    fn read(&self, range: GridRange) -> Vec<Vec<Cell>> {
        (0..range.rows)
            .map(|dr| {
                let row = self.rows.get(range.row - 1 + dr);
                (0..range.cols)
                    .map(|dc| {
                        row.and_then(|r| r.get(range.col - 1 + dc))
                            .cloned()
                            .unwrap_or(Value::Null)
                    })
                    .collect()
            })
            .collect()
    }

    fn write(&mut self, row: usize, col: usize, values: Vec<Vec<Cell>>) {
        for (dr, src) in values.into_iter().enumerate() {
            let r = row - 1 + dr;
            if self.rows.len() <= r {
                self.rows.resize_with(r + 1, Vec::new);
            }
            let dst = &mut self.rows[r];
            for (dc, cell) in src.into_iter().enumerate() {
                let c = col - 1 + dc;
                if dst.len() <= c {
                    dst.resize(c + 1, Value::Null);
                }
                dst[c] = cell;
            }
        }
    }
}

/// Grid document persisted as a single JSON file.
///
/// The whole document is kept in memory and rewritten after every mutation,
/// which is fine for the few hundred rows a songs/roster workbook holds.
/// A mutation is applied to a copy and only becomes visible once the file
/// write succeeds.
pub struct JsonGridStore {
    inner: Arc<RwLock<Document>>,
    file_path: PathBuf,
}

impl JsonGridStore {
    /// Open the document at `path`. When the file is missing and `create_if_missing`
    /// is set, an empty document named `name` is written; otherwise opening fails.
    pub async fn open<P: Into<PathBuf>>(path: P, name: &str, create_if_missing: bool) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        let doc = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice::<Document>(&bytes).map_err(|e| {
                ServiceError::Store(format!("cannot parse {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && create_if_missing => {
                if let Some(parent) = file_path.parent() {
                    fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
                }
                let empty = Document { name: name.to_string(), sheets: BTreeMap::new() };
                fs::write(&file_path, serde_json::to_vec_pretty(&empty).map_err(ServiceError::store)?)
                    .await
                    .map_err(ServiceError::store)?;
                info!(path = %file_path.display(), "created empty grid document");
                empty
            }
            Err(e) => {
                return Err(ServiceError::Store(format!("cannot open {}: {e}", file_path.display())));
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(doc)), file_path }))
    }

    async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(ServiceError::store)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::store)?;
        Ok(())
    }
}

fn missing_sheet(name: &str) -> ServiceError {
    ServiceError::Store(format!("sheet not found: {name}"))
}

#[async_trait]
impl GridStore for JsonGridStore {
    async fn document_name(&self) -> String {
        self.inner.read().await.name.clone()
    }

    async fn sheet_names(&self) -> Vec<String> {
        self.inner.read().await.sheets.keys().cloned().collect()
    }

    async fn get_or_create_sheet(&self, name: &str) -> Result<bool, ServiceError> {
        if self.inner.read().await.sheets.contains_key(name) {
            return Ok(false);
        }
        let mut doc = self.inner.write().await;
        if doc.sheets.contains_key(name) {
            return Ok(false);
        }
        let mut next = doc.clone();
        next.sheets.insert(name.to_string(), SheetData::default());
        self.save(&next).await?;
        *doc = next;
        info!(sheet = %name, "created sheet");
        Ok(true)
    }

    async fn dimensions(&self, sheet: &str) -> Result<SheetDims, ServiceError> {
        let doc = self.inner.read().await;
        let data = doc.sheets.get(sheet).ok_or_else(|| missing_sheet(sheet))?;
        Ok(data.dims())
    }

    async fn get_range(&self, sheet: &str, range: GridRange) -> Result<Vec<Vec<Cell>>, ServiceError> {
        range.validate()?;
        let doc = self.inner.read().await;
        let data = doc.sheets.get(sheet).ok_or_else(|| missing_sheet(sheet))?;
        Ok(data.read(range))
    }

    async fn set_range(&self, sheet: &str, row: usize, col: usize, values: Vec<Vec<Cell>>) -> Result<(), ServiceError> {
        let rows = values.len();
        let cols = values.iter().map(Vec::len).max().unwrap_or(0);
        GridRange::new(row, col, rows, cols).validate()?;
        let mut doc = self.inner.write().await;
        let mut next = doc.clone();
        let data = next.sheets.get_mut(sheet).ok_or_else(|| missing_sheet(sheet))?;
        data.write(row, col, values);
        self.save(&next).await?;
        *doc = next;
        debug!(%sheet, row, col, rows, cols, "range written");
        Ok(())
    }

    async fn append_row(&self, sheet: &str, values: Vec<Cell>) -> Result<usize, ServiceError> {
        if values.is_empty() {
            return Err(ServiceError::Store("cannot append an empty row".into()));
        }
        let mut doc = self.inner.write().await;
        let mut next = doc.clone();
        let data = next.sheets.get_mut(sheet).ok_or_else(|| missing_sheet(sheet))?;
        let row = data.dims().last_row + 1;
        data.write(row, 1, vec![values]);
        self.save(&next).await?;
        *doc = next;
        debug!(%sheet, row, "row appended");
        Ok(row)
    }
}
