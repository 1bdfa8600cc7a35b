//! Yearly duty roster: one sheet per year, roles down column A, dates across row 1.

pub mod manager;
pub mod model;

pub use manager::RosterManager;
pub use model::{grid_key, RosterYear, SaveCellInput, SaveCellResult, Year};
