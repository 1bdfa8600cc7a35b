//! Service layer for the worship-prep backend.
//! - `storage`: the grid-store seam and its JSON file implementation.
//! - `accessor`: opens the document, hands out sheets, ids and timestamps.
//! - `songs` / `roster`: the two record managers.
//! - `schema`: fixed column/role tables and the startup check.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod accessor;
pub mod schema;
pub mod songs;
pub mod roster;
pub mod app;

pub use app::PrepService;
