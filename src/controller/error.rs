use std::path::PathBuf;

use thiserror::Error;

use crate::audio::AudioError;

/// User-facing failures. Each one is terminal to the triggering command
/// only; playlist, view and cursor are left exactly as they were.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("folder not found: {0}")]
    RootNotFound(PathBuf),

    #[error("no folder selected")]
    NoFolderSelected,

    #[error("no .{0} files found in the selected folder")]
    NoMatches(String),

    #[error("no songs in the playlist")]
    EmptyPlaylist,

    #[error("no song is currently playing or it has been stopped")]
    NotPlaying,

    #[error(transparent)]
    Audio(#[from] AudioError),
}
