use std::sync::Arc;

use crate::errors::ServiceError;
use crate::storage::grid_store::{Cell, GridRange, GridStore};

/// Named sheet inside a grid document.
#[derive(Clone)]
pub struct Sheet {
    store: Arc<dyn GridStore>,
    name: String,
}

impl Sheet {
    pub(crate) fn new(store: Arc<dyn GridStore>, name: impl Into<String>) -> Self {
        Self { store, name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn last_row(&self) -> Result<usize, ServiceError> {
        Ok(self.store.dimensions(&self.name).await?.last_row)
    }

    pub async fn last_column(&self) -> Result<usize, ServiceError> {
        Ok(self.store.dimensions(&self.name).await?.last_col)
    }

    pub async fn get_values(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Vec<Vec<Cell>>, ServiceError> {
        self.store.get_range(&self.name, GridRange::new(row, col, rows, cols)).await
    }

    pub async fn set_values(&self, row: usize, col: usize, values: Vec<Vec<Cell>>) -> Result<(), ServiceError> {
        self.store.set_range(&self.name, row, col, values).await
    }

    pub async fn set_value(&self, row: usize, col: usize, value: Cell) -> Result<(), ServiceError> {
        self.store.set_range(&self.name, row, col, vec![vec![value]]).await
    }

    pub async fn append_row(&self, values: Vec<Cell>) -> Result<usize, ServiceError> {
        self.store.append_row(&self.name, values).await
    }
}
