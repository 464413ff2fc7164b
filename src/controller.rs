//! Playlist and playback control.
//!
//! `PlaylistController` owns the ordered track list, the active filtered
//! view, the playback cursor and the cached elapsed-position counter, and
//! drives the audio backend and tag reader from discrete commands.

mod error;
mod model;

pub use error::*;
pub use model::*;

#[cfg(test)]
mod tests;
