use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("nothing loaded")]
    NothingLoaded,
}

/// Black-box playback engine surface.
///
/// Contract: `play` after `load` begins playback at the given offset;
/// `stop` discards the current sink, so a later `play` must pass its own
/// offset; `is_busy` is true only while audio is actively playing, and false
/// when paused, stopped or drained. Callers that need to distinguish
/// "paused" from "idle" keep their own flag.
pub trait AudioBackend {
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    fn play(&mut self, start_at: Duration) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn is_busy(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}
