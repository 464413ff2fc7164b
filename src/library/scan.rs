use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Suffix match against the configured extension, case-sensitive: a file
/// named `song.MP3` is not picked up when the extension is `mp3`.
fn matches_extension(name: &str, extension: &str) -> bool {
    let ext = extension.trim().trim_start_matches('.');
    if ext.is_empty() {
        return false;
    }
    name.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.'))
}

/// Walk `dir` and collect every matching file as a `Track`.
///
/// Results come back in filesystem enumeration order; callers must not
/// depend on a specific ordering.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    // recursive = false means only the root directory's own entries.
    let depth_cap = match (settings.recursive, settings.max_depth) {
        (false, _) => Some(1),
        (true, cap) => cap,
    };

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(cap) = depth_cap {
        walker = walker.max_depth(cap);
    }

    let tracks: Vec<Track> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| matches_extension(name, &settings.extension))
        })
        .map(|entry| Track::from_path(entry.into_path()))
        .collect();

    debug!(
        "scanned {} for .{}: {} track(s)",
        dir.display(),
        settings.extension,
        tracks.len()
    );
    tracks
}
