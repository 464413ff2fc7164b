//! The playlist/playback controller.
//!
//! State machine: Idle --play--> Playing --pause--> Paused --resume-->
//! Playing; Playing/Paused --stop--> Idle; Playing --next--> Playing.
//! `elapsed_secs` is a model value, not ground truth from the engine:
//! seeking works by stop + restart-at-offset, and the engine is never
//! polled for its real position. Drift is an accepted limitation.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::audio::AudioBackend;
use crate::config::LibrarySettings;
use crate::library::{Track, scan};
use crate::tags::TagReader;

use super::error::ControllerError;

/// Result of a pause toggle, used by the view for the pause/resume label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PauseState {
    Paused,
    Resumed,
}

/// Display metadata for the track that just started playing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// `None` when the duration could not be read.
    pub duration_secs: Option<u64>,
}

impl fmt::Display for NowPlaying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = match self.duration_secs {
            Some(d) => format!("{}:{:02}", d / 60, d % 60),
            None => "Unknown".to_string(),
        };
        write!(
            f,
            "Now Playing: {} | Artist: {} | Album: {} | Duration: {}",
            self.title, self.artist, self.album, duration
        )
    }
}

/// Owns the playlist, the active filtered view and the playback cursor,
/// and drives the audio backend and tag reader from discrete commands.
pub struct PlaylistController<A, T> {
    audio: A,
    tags: T,
    tracks: Vec<Track>,
    /// Active filtered view, `None` when no filter is applied. Reset
    /// whenever the playlist changes; never patched incrementally.
    view: Option<Vec<Track>>,
    query: String,
    /// Absolute index into `tracks` of the current track.
    current: Option<usize>,
    paused: bool,
    elapsed_secs: u64,
    /// 0 = unknown.
    duration_secs: u64,
    volume: f32,
}

impl<A: AudioBackend, T: TagReader> PlaylistController<A, T> {
    pub fn new(audio: A, tags: T, initial_volume: f32) -> Self {
        let mut controller = Self {
            audio,
            tags,
            tracks: Vec::new(),
            view: None,
            query: String::new(),
            current: None,
            paused: false,
            elapsed_secs: 0,
            duration_secs: 0,
            volume: initial_volume,
        };
        controller.audio.set_volume(initial_volume);
        controller
    }

    /// Startup scan of the configured root folder. Zero matches is fine;
    /// a missing directory is not.
    pub fn load_root(
        &mut self,
        path: &Path,
        settings: &LibrarySettings,
    ) -> Result<usize, ControllerError> {
        if !path.is_dir() {
            return Err(ControllerError::RootNotFound(path.to_path_buf()));
        }
        let found = scan(path, settings);
        let added = found.len();
        self.tracks.extend(found);
        self.reset_view();
        Ok(added)
    }

    /// User-triggered folder add. Appends to the playlist (never clears it)
    /// and resets the active view to the full playlist on success.
    pub fn add_folder(
        &mut self,
        path: &Path,
        settings: &LibrarySettings,
    ) -> Result<usize, ControllerError> {
        if path.as_os_str().is_empty() {
            return Err(ControllerError::NoFolderSelected);
        }
        let found = scan(path, settings);
        if found.is_empty() {
            return Err(ControllerError::NoMatches(settings.extension.clone()));
        }
        let added = found.len();
        self.tracks.extend(found);
        self.reset_view();
        debug!("added {added} track(s) from {}", path.display());
        Ok(added)
    }

    /// Case-insensitive substring match on file names (not paths, not
    /// tags). The result becomes the active view that index-based
    /// selection resolves against; an empty query clears the filter.
    /// Non-incremental: always matched against the full playlist.
    pub fn search(&mut self, query: &str) -> &[Track] {
        if query.is_empty() {
            self.query.clear();
            self.view = None;
            return &self.tracks;
        }

        let needle = query.to_lowercase();
        let matches: Vec<Track> = self
            .tracks
            .iter()
            .filter(|t| t.file_name().to_lowercase().contains(&needle))
            .cloned()
            .collect();

        self.query = query.to_string();
        self.view.insert(matches)
    }

    /// Play the track at `selection` (an index into the active view). With
    /// no selection, restart the current track, or default to the first
    /// playlist entry when nothing was ever selected.
    pub fn select_and_play(
        &mut self,
        selection: Option<usize>,
    ) -> Result<NowPlaying, ControllerError> {
        let index = match selection {
            Some(view_index) => self.resolve_view_index(view_index)?,
            None => match self.current {
                Some(index) => index,
                None => {
                    if self.tracks.is_empty() {
                        return Err(ControllerError::EmptyPlaylist);
                    }
                    0
                }
            },
        };

        self.start_playback(index)
    }

    /// Advance the cursor, wrapping past the end back to the first track,
    /// and play. An unset cursor advances to the first track.
    pub fn advance_to_next(&mut self) -> Result<NowPlaying, ControllerError> {
        if self.tracks.is_empty() {
            return Err(ControllerError::EmptyPlaylist);
        }

        let next = match self.current {
            Some(index) if index + 1 < self.tracks.len() => index + 1,
            _ => 0,
        };

        self.start_playback(next)
    }

    /// Unconditional stop; safe to call when nothing is playing. The
    /// elapsed counter is left alone, matching the restart-from-zero
    /// contract of a subsequent play.
    pub fn stop(&mut self) {
        self.audio.stop();
        self.paused = false;
    }

    /// Flip between pause and resume. Fails when truly idle: the engine
    /// reports not-busy while paused, so the controller's own flag is what
    /// distinguishes "paused" from "nothing playing".
    pub fn toggle_pause(&mut self) -> Result<PauseState, ControllerError> {
        if !self.audio.is_busy() && !self.paused {
            return Err(ControllerError::NotPlaying);
        }

        if self.paused {
            self.audio.resume();
            self.paused = false;
            Ok(PauseState::Resumed)
        } else {
            self.audio.pause();
            self.paused = true;
            Ok(PauseState::Paused)
        }
    }

    /// Approximate seek: clamp the model position, stop, and restart the
    /// engine at the new offset. A paused track cannot be seeked.
    pub fn seek_relative(&mut self, delta_secs: i64) -> Result<(), ControllerError> {
        if !self.audio.is_busy() {
            return Err(ControllerError::NotPlaying);
        }

        let target =
            (self.elapsed_secs as i64 + delta_secs).clamp(0, self.duration_secs as i64) as u64;
        self.audio.stop();
        self.audio.play(Duration::from_secs(target))?;
        self.elapsed_secs = target;
        Ok(())
    }

    /// Forward the volume to the engine and cache it for the view. The
    /// engine defines clamp behavior for out-of-range values; the
    /// controller does not re-clamp.
    pub fn set_volume(&mut self, level: f32) {
        self.volume = level;
        self.audio.set_volume(level);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The list the view should display: the filtered view when a filter
    /// is active, the full playlist otherwise.
    pub fn active_view(&self) -> &[Track] {
        self.view.as_deref().unwrap_or(&self.tracks)
    }

    pub fn is_filtered(&self) -> bool {
        self.view.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Position of the current track within the active view, if visible.
    pub fn view_position_of_current(&self) -> Option<usize> {
        let index = self.current?;
        match &self.view {
            Some(view) => {
                let current = &self.tracks[index];
                view.iter().position(|t| t.path == current.path)
            }
            None => Some(index),
        }
    }

    /// Map an index in the active view back to an absolute playlist index.
    /// With a filter active, the selected track is located by its first
    /// occurrence in the playlist (duplicate paths resolve to the first).
    fn resolve_view_index(&self, view_index: usize) -> Result<usize, ControllerError> {
        match &self.view {
            Some(view) => {
                let chosen = view.get(view_index).ok_or(ControllerError::EmptyPlaylist)?;
                self.tracks
                    .iter()
                    .position(|t| t.path == chosen.path)
                    .ok_or(ControllerError::EmptyPlaylist)
            }
            None => {
                if view_index < self.tracks.len() {
                    Ok(view_index)
                } else {
                    Err(ControllerError::EmptyPlaylist)
                }
            }
        }
    }

    /// Load + play from offset zero, then commit cursor state and gather
    /// display metadata. State is only committed after the engine accepted
    /// the track, so a failed play leaves the cursor untouched.
    fn start_playback(&mut self, index: usize) -> Result<NowPlaying, ControllerError> {
        let track = self.tracks[index].clone();
        self.audio.load(&track.path)?;
        self.audio.play(Duration::ZERO)?;

        self.current = Some(index);
        self.paused = false;
        self.elapsed_secs = 0;

        let duration = self.tags.read_duration(&track.path).map(|d| d.as_secs());
        self.duration_secs = duration.unwrap_or(0);

        debug!("cursor at {index}: {}", track.path.display());
        Ok(self.describe(&track, duration))
    }

    /// Build the now-playing summary. A readable tag with missing fields
    /// falls back per field; an unreadable tag falls back to the file name
    /// and placeholder artist/album. Failures never propagate.
    fn describe(&self, track: &Track, duration: Option<u64>) -> NowPlaying {
        match self.tags.read_tags(&track.path) {
            Some(meta) => NowPlaying {
                title: meta.title.unwrap_or_else(|| "Unknown".to_string()),
                artist: meta.artist.unwrap_or_else(|| "Unknown".to_string()),
                album: meta.album.unwrap_or_else(|| "Unknown".to_string()),
                duration_secs: duration,
            },
            None => NowPlaying {
                title: track.file_name().to_string(),
                artist: "Unknown Artist".to_string(),
                album: "Unknown Album".to_string(),
                duration_secs: duration,
            },
        }
    }

    /// A view is stale once the playlist changes; drop it rather than
    /// patching it.
    fn reset_view(&mut self) {
        self.query.clear();
        self.view = None;
    }
}

#[cfg(test)]
impl<A: AudioBackend, T: TagReader> PlaylistController<A, T> {
    pub(crate) fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }
}
