//! Storage abstractions for the service layer
//!
//! `GridStore` is the seam to the backing grid document; `JsonGridStore` is the
//! file-backed implementation and `Sheet` a named handle over either.

pub mod grid_store;
pub mod json_grid_store;
pub mod sheet;

pub use grid_store::{cell_text, Cell, GridRange, GridStore, SheetDims};
pub use json_grid_store::JsonGridStore;
pub use sheet::Sheet;
