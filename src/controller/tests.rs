use super::*;
use crate::audio::{AudioBackend, AudioError};
use crate::config::LibrarySettings;
use crate::library::Track;
use crate::tags::{Metadata, TagReader};

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Load(PathBuf),
    Play(u64),
    Pause,
    Resume,
    Stop,
    SetVolume(f32),
}

#[derive(Default)]
struct FakeAudioInner {
    calls: Vec<Call>,
    busy: bool,
}

/// Call recorder that mirrors the sink contract: busy only while actively
/// playing, false when paused or stopped.
#[derive(Clone, Default)]
struct FakeAudio(Rc<RefCell<FakeAudioInner>>);

impl FakeAudio {
    fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }
}

impl AudioBackend for FakeAudio {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        self.0.borrow_mut().calls.push(Call::Load(path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self, start_at: Duration) -> Result<(), AudioError> {
        let mut inner = self.0.borrow_mut();
        inner.calls.push(Call::Play(start_at.as_secs()));
        inner.busy = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.calls.push(Call::Pause);
        inner.busy = false;
    }

    fn resume(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.calls.push(Call::Resume);
        inner.busy = true;
    }

    fn stop(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.calls.push(Call::Stop);
        inner.busy = false;
    }

    fn is_busy(&self) -> bool {
        self.0.borrow().busy
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.borrow_mut().calls.push(Call::SetVolume(volume));
    }
}

#[derive(Clone, Default)]
struct FakeTags {
    tags: HashMap<PathBuf, Metadata>,
    durations: HashMap<PathBuf, u64>,
}

impl TagReader for FakeTags {
    fn read_tags(&self, path: &Path) -> Option<Metadata> {
        self.tags.get(path).cloned()
    }

    fn read_duration(&self, path: &Path) -> Option<Duration> {
        self.durations.get(path).map(|&s| Duration::from_secs(s))
    }
}

fn t(name: &str) -> Track {
    Track::from_path(PathBuf::from(format!("/music/{name}")))
}

fn controller_with(
    names: &[&str],
    tags: FakeTags,
) -> (PlaylistController<FakeAudio, FakeTags>, FakeAudio) {
    let audio = FakeAudio::default();
    let handle = audio.clone();
    let mut controller = PlaylistController::new(audio, tags, 0.5);
    controller.set_tracks(names.iter().map(|n| t(n)).collect());
    handle.clear_calls();
    (controller, handle)
}

fn duration_tags(name: &str, secs: u64) -> FakeTags {
    let mut tags = FakeTags::default();
    tags.durations.insert(t(name).path, secs);
    tags
}

#[test]
fn play_on_empty_playlist_fails_without_touching_audio() {
    let (mut c, audio) = controller_with(&[], FakeTags::default());

    let err = c.select_and_play(None).unwrap_err();
    assert!(matches!(err, ControllerError::EmptyPlaylist));
    assert!(audio.calls().is_empty());
    assert_eq!(c.current_index(), None);
}

#[test]
fn play_without_selection_defaults_to_first_track() {
    let (mut c, audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());

    c.select_and_play(None).unwrap();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(
        audio.calls(),
        vec![Call::Load(t("a.mp3").path), Call::Play(0)]
    );
}

#[test]
fn play_without_selection_restarts_current_track_from_zero() {
    let (mut c, audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());

    c.select_and_play(Some(1)).unwrap();
    audio.clear_calls();

    c.select_and_play(None).unwrap();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(
        audio.calls(),
        vec![Call::Load(t("b.mp3").path), Call::Play(0)]
    );
}

#[test]
fn explicit_selection_plays_that_playlist_entry() {
    let (mut c, audio) = controller_with(&["a.mp3", "b.mp3", "c.mp3"], FakeTags::default());

    c.select_and_play(Some(1)).unwrap();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(audio.calls()[0], Call::Load(t("b.mp3").path));
    assert!(!c.is_paused());
    assert_eq!(c.elapsed_secs(), 0);
}

#[test]
fn selection_through_filter_resolves_to_absolute_index() {
    let (mut c, audio) = controller_with(&["alpha.mp3", "beta.mp3", "gamma.mp3"], FakeTags::default());

    let view = c.search("mm");
    assert_eq!(view.len(), 1);

    c.select_and_play(Some(0)).unwrap();
    assert_eq!(c.current_index(), Some(2));
    assert_eq!(audio.calls()[0], Call::Load(t("gamma.mp3").path));
}

#[test]
fn duplicate_paths_resolve_to_first_occurrence() {
    let (mut c, _audio) = controller_with(
        &["one.mp3", "dup.mp3", "two.mp3", "dup.mp3"],
        FakeTags::default(),
    );

    let view = c.search("dup");
    assert_eq!(view.len(), 2);

    // Selecting the second copy still lands on the first occurrence.
    c.select_and_play(Some(1)).unwrap();
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn out_of_range_selection_fails_and_preserves_state() {
    let (mut c, audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());
    c.search("a");

    let err = c.select_and_play(Some(5)).unwrap_err();
    assert!(matches!(err, ControllerError::EmptyPlaylist));
    assert!(c.is_filtered());
    assert_eq!(c.current_index(), None);
    assert!(audio.calls().is_empty());
}

#[test]
fn advance_wraps_past_the_end() {
    let (mut c, audio) = controller_with(&["a.mp3", "b.mp3", "c.mp3"], FakeTags::default());

    c.select_and_play(Some(2)).unwrap();
    audio.clear_calls();

    c.advance_to_next().unwrap();
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(audio.calls()[0], Call::Load(t("a.mp3").path));
}

#[test]
fn advance_from_unset_cursor_starts_at_zero() {
    let (mut c, _audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());

    c.advance_to_next().unwrap();
    assert_eq!(c.current_index(), Some(0));

    c.advance_to_next().unwrap();
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn advance_on_empty_playlist_fails() {
    let (mut c, audio) = controller_with(&[], FakeTags::default());
    let err = c.advance_to_next().unwrap_err();
    assert!(matches!(err, ControllerError::EmptyPlaylist));
    assert!(audio.calls().is_empty());
}

#[test]
fn advance_resets_elapsed_counter() {
    let (mut c, _audio) = controller_with(&["a.mp3", "b.mp3"], duration_tags("a.mp3", 120));

    c.select_and_play(Some(0)).unwrap();
    c.seek_relative(5).unwrap();
    assert_eq!(c.elapsed_secs(), 5);

    c.advance_to_next().unwrap();
    assert_eq!(c.elapsed_secs(), 0);
}

#[test]
fn toggle_pause_while_idle_fails() {
    let (mut c, _audio) = controller_with(&["a.mp3"], FakeTags::default());
    let err = c.toggle_pause().unwrap_err();
    assert!(matches!(err, ControllerError::NotPlaying));
}

#[test]
fn toggle_pause_after_stop_fails() {
    let (mut c, _audio) = controller_with(&["a.mp3"], FakeTags::default());
    c.select_and_play(None).unwrap();
    c.stop();

    let err = c.toggle_pause().unwrap_err();
    assert!(matches!(err, ControllerError::NotPlaying));
    assert!(!c.is_paused());
}

#[test]
fn toggle_pause_twice_pauses_then_resumes() {
    let (mut c, audio) = controller_with(&["a.mp3"], FakeTags::default());
    c.select_and_play(None).unwrap();
    audio.clear_calls();

    assert_eq!(c.toggle_pause().unwrap(), PauseState::Paused);
    assert!(c.is_paused());

    assert_eq!(c.toggle_pause().unwrap(), PauseState::Resumed);
    assert!(!c.is_paused());

    assert_eq!(audio.calls(), vec![Call::Pause, Call::Resume]);
}

#[test]
fn stop_is_noop_safe_and_clears_pause_flag() {
    let (mut c, audio) = controller_with(&["a.mp3"], FakeTags::default());

    c.stop();
    assert_eq!(audio.calls(), vec![Call::Stop]);

    c.select_and_play(None).unwrap();
    c.toggle_pause().unwrap();
    c.stop();
    assert!(!c.is_paused());
}

#[test]
fn seek_while_idle_fails() {
    let (mut c, _audio) = controller_with(&["a.mp3"], FakeTags::default());
    let err = c.seek_relative(10).unwrap_err();
    assert!(matches!(err, ControllerError::NotPlaying));
}

#[test]
fn seek_while_paused_fails() {
    let (mut c, _audio) = controller_with(&["a.mp3"], duration_tags("a.mp3", 120));
    c.select_and_play(None).unwrap();
    c.toggle_pause().unwrap();

    let err = c.seek_relative(10).unwrap_err();
    assert!(matches!(err, ControllerError::NotPlaying));
    assert_eq!(c.elapsed_secs(), 0);
}

#[test]
fn seek_back_clamps_to_zero() {
    let (mut c, audio) = controller_with(&["a.mp3"], duration_tags("a.mp3", 120));
    c.select_and_play(None).unwrap();
    c.seek_relative(5).unwrap();
    assert_eq!(c.elapsed_secs(), 5);
    audio.clear_calls();

    c.seek_relative(-10).unwrap();
    assert_eq!(c.elapsed_secs(), 0);
    assert_eq!(audio.calls(), vec![Call::Stop, Call::Play(0)]);
}

#[test]
fn seek_forward_clamps_to_duration() {
    let (mut c, audio) = controller_with(&["a.mp3"], duration_tags("a.mp3", 120));
    c.select_and_play(None).unwrap();
    c.seek_relative(115).unwrap();
    assert_eq!(c.elapsed_secs(), 115);
    audio.clear_calls();

    c.seek_relative(10).unwrap();
    assert_eq!(c.elapsed_secs(), 120);
    assert_eq!(audio.calls(), vec![Call::Stop, Call::Play(120)]);
}

#[test]
fn seek_with_unknown_duration_pins_to_zero() {
    let (mut c, _audio) = controller_with(&["a.mp3"], FakeTags::default());
    c.select_and_play(None).unwrap();
    assert_eq!(c.duration_secs(), 0);

    c.seek_relative(30).unwrap();
    assert_eq!(c.elapsed_secs(), 0);
}

#[test]
fn search_is_case_insensitive_on_file_names() {
    let (mut c, _audio) = controller_with(&["a.mp3", "B.mp3", "c.mp3"], FakeTags::default());

    let view = c.search("b");
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].title, "B");
}

#[test]
fn search_with_no_matches_yields_empty_view_not_empty_playlist() {
    let (mut c, _audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());

    let view = c.search("xyz");
    assert!(view.is_empty());
    assert!(c.is_filtered());
    assert!(c.has_tracks());
}

#[test]
fn empty_query_clears_the_filter() {
    let (mut c, _audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());

    c.search("a");
    assert!(c.is_filtered());

    let view = c.search("");
    assert_eq!(view.len(), 2);
    assert!(!c.is_filtered());
    assert_eq!(c.query(), "");
}

#[test]
fn search_matches_the_extension_too() {
    // The match runs on the full file name, so the extension is findable.
    let (mut c, _audio) = controller_with(&["a.mp3", "b.mp3"], FakeTags::default());
    let view = c.search("mp3");
    assert_eq!(view.len(), 2);
}

#[test]
fn view_position_tracks_the_current_track() {
    let (mut c, _audio) = controller_with(&["alpha.mp3", "beta.mp3", "gamma.mp3"], FakeTags::default());

    c.select_and_play(Some(2)).unwrap();
    assert_eq!(c.view_position_of_current(), Some(2));

    c.search("gamma");
    assert_eq!(c.view_position_of_current(), Some(0));

    c.search("alpha");
    assert_eq!(c.view_position_of_current(), None);
}

#[test]
fn metadata_failure_falls_back_to_file_name_and_placeholders() {
    let (mut c, _audio) = controller_with(&["song.mp3"], FakeTags::default());

    let now = c.select_and_play(None).unwrap();
    assert_eq!(now.title, "song.mp3");
    assert_eq!(now.artist, "Unknown Artist");
    assert_eq!(now.album, "Unknown Album");
    assert_eq!(now.duration_secs, None);
    assert_eq!(
        now.to_string(),
        "Now Playing: song.mp3 | Artist: Unknown Artist | Album: Unknown Album | Duration: Unknown"
    );
}

#[test]
fn readable_tag_with_missing_fields_falls_back_per_field() {
    let mut tags = FakeTags::default();
    tags.tags.insert(
        t("song.mp3").path,
        Metadata {
            title: Some("The Song".into()),
            artist: None,
            album: Some("The Album".into()),
        },
    );
    let (mut c, _audio) = controller_with(&["song.mp3"], tags);

    let now = c.select_and_play(None).unwrap();
    assert_eq!(now.title, "The Song");
    assert_eq!(now.artist, "Unknown");
    assert_eq!(now.album, "The Album");
}

#[test]
fn now_playing_formats_duration_as_minutes_and_padded_seconds() {
    let mut tags = duration_tags("song.mp3", 185);
    tags.tags.insert(
        t("song.mp3").path,
        Metadata {
            title: Some("T".into()),
            artist: Some("A".into()),
            album: Some("L".into()),
        },
    );
    let (mut c, _audio) = controller_with(&["song.mp3"], tags);

    let now = c.select_and_play(None).unwrap();
    assert_eq!(now.duration_secs, Some(185));
    assert_eq!(
        now.to_string(),
        "Now Playing: T | Artist: A | Album: L | Duration: 3:05"
    );
    assert_eq!(c.duration_secs(), 185);
}

#[test]
fn set_volume_forwards_and_caches() {
    let (mut c, audio) = controller_with(&["a.mp3"], FakeTags::default());

    c.set_volume(0.8);
    assert_eq!(c.volume(), 0.8);
    assert_eq!(audio.calls(), vec![Call::SetVolume(0.8)]);
}

#[test]
fn initial_volume_reaches_the_backend() {
    let audio = FakeAudio::default();
    let handle = audio.clone();
    let c = PlaylistController::new(audio, FakeTags::default(), 0.5);
    assert_eq!(c.volume(), 0.5);
    assert_eq!(handle.calls(), vec![Call::SetVolume(0.5)]);
}

mod folders {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fresh() -> (PlaylistController<FakeAudio, FakeTags>, FakeAudio) {
        controller_with(&[], FakeTags::default())
    }

    #[test]
    fn load_root_rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");
        let (mut c, _audio) = fresh();

        let err = c
            .load_root(&missing, &LibrarySettings::default())
            .unwrap_err();
        assert!(matches!(err, ControllerError::RootNotFound(_)));
        assert!(!c.has_tracks());
    }

    #[test]
    fn load_root_accepts_empty_directory() {
        let dir = tempdir().unwrap();
        let (mut c, _audio) = fresh();

        let added = c.load_root(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(added, 0);
        assert!(!c.has_tracks());
    }

    #[test]
    fn load_root_appends_matching_files_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        fs::write(dir.path().join("two.mp3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let (mut c, _audio) = fresh();
        let added = c.load_root(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(c.tracks().len(), 2);
    }

    #[test]
    fn add_folder_rejects_empty_path() {
        let (mut c, _audio) = fresh();
        let err = c
            .add_folder(Path::new(""), &LibrarySettings::default())
            .unwrap_err();
        assert!(matches!(err, ControllerError::NoFolderSelected));
    }

    #[test]
    fn add_folder_with_no_matches_leaves_playlist_unchanged() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();

        let (mut c, _audio) = controller_with(&["existing.mp3"], FakeTags::default());
        let err = c
            .add_folder(dir.path(), &LibrarySettings::default())
            .unwrap_err();
        assert!(matches!(err, ControllerError::NoMatches(_)));
        assert_eq!(c.tracks().len(), 1);
    }

    #[test]
    fn add_folder_appends_without_clearing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("new.mp3"), b"x").unwrap();

        let (mut c, _audio) = controller_with(&["existing.mp3"], FakeTags::default());
        let added = c.add_folder(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(added, 1);
        assert_eq!(c.tracks().len(), 2);
        assert_eq!(c.tracks()[0].title, "existing");
    }

    #[test]
    fn adding_the_same_folder_twice_duplicates_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"x").unwrap();

        let (mut c, _audio) = fresh();
        c.add_folder(dir.path(), &LibrarySettings::default()).unwrap();
        c.add_folder(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(c.tracks().len(), 2);
    }

    #[test]
    fn successful_add_resets_the_active_view() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("new.mp3"), b"x").unwrap();

        let (mut c, _audio) = controller_with(&["existing.mp3"], FakeTags::default());
        c.search("existing");
        assert!(c.is_filtered());

        c.add_folder(dir.path(), &LibrarySettings::default()).unwrap();
        assert!(!c.is_filtered());
        assert_eq!(c.active_view().len(), 2);
    }

    #[test]
    fn scan_then_lowercase_search_matches_uppercase_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("B.mp3"), b"x").unwrap();
        fs::write(dir.path().join("c.mp3"), b"x").unwrap();

        let (mut c, _audio) = fresh();
        c.load_root(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(c.tracks().len(), 3);

        let view = c.search("b");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "B");
    }

    #[test]
    fn failed_add_keeps_the_active_view() {
        let dir = tempdir().unwrap();

        let (mut c, _audio) = controller_with(&["existing.mp3"], FakeTags::default());
        c.search("existing");

        let _ = c.add_folder(dir.path(), &LibrarySettings::default());
        assert!(c.is_filtered());
        assert_eq!(c.query(), "existing");
    }
}
