//! Track model and folder scanning.
//!
//! The playlist is built from recursive folder scans; tracks carry only
//! their path and a derived display title. Tag metadata is read lazily by
//! the playback layer, not here.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
