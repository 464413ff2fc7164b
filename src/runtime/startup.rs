use std::path::Path;

use crate::audio::RodioBackend;
use crate::config::Settings;
use crate::controller::PlaylistController;
use crate::tags::LoftyTagReader;

/// Construct the playback backend and controller, then run the initial
/// root scan. A missing root folder is reported once and the app carries
/// on with an empty playlist; a missing audio device is fatal.
pub fn build(
    root: &str,
    settings: &Settings,
) -> Result<
    (
        PlaylistController<RodioBackend, LoftyTagReader>,
        Option<String>,
    ),
    Box<dyn std::error::Error>,
> {
    let audio = RodioBackend::new()?;
    let mut controller =
        PlaylistController::new(audio, LoftyTagReader, settings.audio.initial_volume);

    let startup_error = match controller.load_root(Path::new(root), &settings.library) {
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    };

    Ok((controller, startup_error))
}
