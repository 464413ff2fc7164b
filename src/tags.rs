//! Tag metadata reads, behind a seam so playback logic can be tested
//! without real audio files.
//!
//! Any read failure is reported as `None`; the caller substitutes
//! placeholder values and never propagates the failure.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use log::debug;

/// Tag fields for the now-playing display. A field missing from an
/// otherwise readable tag is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

pub trait TagReader {
    /// Read title/artist/album. `None` when the file has no readable tag.
    fn read_tags(&self, path: &Path) -> Option<Metadata>;

    /// Read the track duration. `None` when the file cannot be probed.
    fn read_duration(&self, path: &Path) -> Option<Duration>;
}

/// Production reader backed by `lofty`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Option<Metadata> {
        let tagged = match lofty::read_from_path(path) {
            Ok(t) => t,
            Err(e) => {
                debug!("tag read failed for {}: {e}", path.display());
                return None;
            }
        };

        let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;

        let field = |key: &ItemKey| {
            tag.get_string(*key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Metadata {
            title: field(&ItemKey::TrackTitle),
            artist: field(&ItemKey::TrackArtist),
            album: field(&ItemKey::AlbumTitle),
        })
    }

    fn read_duration(&self, path: &Path) -> Option<Duration> {
        match lofty::read_from_path(path) {
            Ok(tagged) => Some(tagged.properties().duration()),
            Err(e) => {
                debug!("duration probe failed for {}: {e}", path.display());
                None
            }
        }
    }
}
