use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

/// One cell of a grid document. Only JSON scalars are expected.
pub type Cell = Value;

/// Render a cell as text: strings as-is, null as empty, other scalars as JSON text.
pub fn cell_text(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Extent of a sheet's content. Both are 1-based; 0 means no content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetDims {
    pub last_row: usize,
    pub last_col: usize,
}

/// Rectangular 1-based range: top-left `(row, col)` spanning `rows` × `cols`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRange {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridRange {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self { row, col, rows, cols }
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, 1, 1)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.row == 0 || self.col == 0 {
            return Err(ServiceError::Store(format!(
                "range start must be 1-based, got ({}, {})",
                self.row, self.col
            )));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(ServiceError::Store(format!(
                "range must span at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

/// Backing grid document: named sheets of cells addressed by row/column.
#[async_trait]
pub trait GridStore: Send + Sync {
    /// Display name of the open document.
    async fn document_name(&self) -> String;
    async fn sheet_names(&self) -> Vec<String>;
    /// Returns `true` when the sheet had to be created.
    async fn get_or_create_sheet(&self, name: &str) -> Result<bool, ServiceError>;
    async fn dimensions(&self, sheet: &str) -> Result<SheetDims, ServiceError>;
    /// Cells outside the stored content read as `Null`.
    async fn get_range(&self, sheet: &str, range: GridRange) -> Result<Vec<Vec<Cell>>, ServiceError>;
    /// Writes `values` with its top-left corner at `(row, col)`.
    async fn set_range(&self, sheet: &str, row: usize, col: usize, values: Vec<Vec<Cell>>) -> Result<(), ServiceError>;
    /// Writes `values` to `last_row + 1`; returns that row.
    async fn append_row(&self, sheet: &str, values: Vec<Cell>) -> Result<usize, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_text_renders_scalars() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(Some(&json!(" a "))), " a ");
        assert_eq!(cell_text(Some(&json!(120))), "120");
        assert_eq!(cell_text(Some(&json!(true))), "true");
    }

    #[test]
    fn range_rejects_zero_coordinates() {
        assert!(GridRange::new(0, 1, 1, 1).validate().is_err());
        assert!(GridRange::new(1, 1, 0, 13).validate().is_err());
        assert!(GridRange::cell(2, 3).validate().is_ok());
    }
}
