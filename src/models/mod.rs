//! Typed views of scored data

pub mod track;

pub use track::{ScoredTable, TrackRecord};
