//! Song catalog: a flat table with one song per row under a fixed header.

pub mod catalog;
pub mod model;

pub use catalog::SongCatalog;
pub use model::{CleanResult, SaveSongResult, Song, SongInput};
