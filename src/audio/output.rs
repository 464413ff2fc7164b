use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::backend::{AudioBackend, AudioError};
use super::sink::create_sink_at;

/// `rodio`-backed playback engine.
///
/// Owns the output stream (which must stay alive for the lifetime of the
/// backend), at most one sink, the loaded file and the last volume. The
/// volume is re-applied to every sink because a sink is rebuilt on each
/// play and on every seek.
pub struct RodioBackend {
    stream: OutputStream,
    loaded: Option<PathBuf>,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioBackend {
    pub fn new() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            loaded: None,
            sink: None,
            volume: 1.0,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        // Decoding is deferred to `play`; opening up front keeps the load/play
        // split observable (an unreadable file fails here, not mid-command).
        File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self, start_at: Duration) -> Result<(), AudioError> {
        let path = self.loaded.clone().ok_or(AudioError::NothingLoaded)?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = create_sink_at(&self.stream, &path, start_at)?;
        sink.set_volume(self.volume);
        sink.play();
        debug!("playing {} from {}s", path.display(), start_at.as_secs());

        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}
