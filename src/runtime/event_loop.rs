use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioBackend;
use crate::config;
use crate::controller::{NowPlaying, PauseState, PlaylistController};
use crate::tags::TagReader;
use crate::ui;

/// Which prompt, if any, is capturing keystrokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    AddFolder,
}

/// View-layer state tracked by the event loop across iterations. All
/// playback truth lives in the controller; this is selection, prompts and
/// the modal error text.
pub struct ViewState {
    /// Cursor row within the active view.
    pub selected: usize,
    pub mode: InputMode,
    /// Prompt buffer for search and add-folder input.
    pub input: String,
    /// Modal error text; any key dismisses it.
    pub modal: Option<String>,
    /// Cached now-playing summary line.
    pub now_playing: Option<String>,
    pub playback_label: &'static str,
    pub current_dir: String,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

impl ViewState {
    pub fn new(current_dir: String) -> Self {
        Self {
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            modal: None,
            now_playing: None,
            playback_label: "Stopped",
            current_dir,
            pending_gg: false,
        }
    }
}

/// Main terminal event loop: draws the UI and dispatches one controller
/// command per key press. Returns `Ok(())` when the user quits.
pub fn run<A: AudioBackend, T: TagReader>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, controller, state, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the app should quit.
fn handle_key_event<A: AudioBackend, T: TagReader>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) -> bool {
    // A modal error blocks everything else; any key dismisses it.
    if state.modal.is_some() {
        state.modal = None;
        return false;
    }

    match state.mode {
        InputMode::Search => {
            handle_search_key(key, controller, state);
            false
        }
        InputMode::AddFolder => {
            handle_add_folder_key(key, settings, controller, state);
            false
        }
        InputMode::Normal => handle_normal_key(key, settings, controller, state),
    }
}

fn handle_search_key<A: AudioBackend, T: TagReader>(
    key: KeyEvent,
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) {
    match key.code {
        KeyCode::Esc => {
            state.input.clear();
            controller.search("");
            state.mode = InputMode::Normal;
            clamp_selection(controller, state);
        }
        KeyCode::Backspace => {
            state.input.pop();
            controller.search(&state.input);
            clamp_selection(controller, state);
        }
        KeyCode::Enter => {
            state.mode = InputMode::Normal;
            if !controller.active_view().is_empty() {
                play_selection(controller, state);
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            state.input.push(c);
            controller.search(&state.input);
            clamp_selection(controller, state);
        }
        _ => {}
    }
}

fn handle_add_folder_key<A: AudioBackend, T: TagReader>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) {
    match key.code {
        KeyCode::Esc => {
            state.input.clear();
            state.mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.input.pop();
        }
        KeyCode::Enter => {
            let path = state.input.trim().to_string();
            state.input.clear();
            state.mode = InputMode::Normal;
            match controller.add_folder(Path::new(&path), &settings.library) {
                Ok(_) => {
                    state.selected = 0;
                }
                Err(e) => state.modal = Some(e.to_string()),
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            state.input.push(c);
        }
        _ => {}
    }
}

/// Returns `true` when the app should quit.
fn handle_normal_key<A: AudioBackend, T: TagReader>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) -> bool {
    let was_pending_gg = state.pending_gg;
    state.pending_gg = false;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            state.mode = InputMode::Search;
            state.input = controller.query().to_string();
        }
        KeyCode::Char('a') => {
            state.mode = InputMode::AddFolder;
            state.input.clear();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = controller.active_view().len();
            if len > 0 && state.selected + 1 < len {
                state.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.selected = state.selected.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            if was_pending_gg {
                state.selected = 0;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            let len = controller.active_view().len();
            if len > 0 {
                state.selected = len - 1;
            }
        }
        KeyCode::Enter => {
            play_selection(controller, state);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => match controller.toggle_pause() {
            Ok(PauseState::Paused) => state.playback_label = "Paused",
            Ok(PauseState::Resumed) => state.playback_label = "Playing",
            Err(e) => state.modal = Some(e.to_string()),
        },
        KeyCode::Char('s') => {
            controller.stop();
            state.playback_label = "Stopped";
        }
        KeyCode::Char('n') | KeyCode::Char('l') => match controller.advance_to_next() {
            Ok(now) => apply_now_playing(now, controller, state),
            Err(e) => state.modal = Some(e.to_string()),
        },
        KeyCode::Char('L') | KeyCode::Right => {
            seek(controller, state, settings.controls.seek_seconds as i64);
        }
        KeyCode::Char('H') | KeyCode::Left => {
            seek(controller, state, -(settings.controls.seek_seconds as i64));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let level = (controller.volume() + settings.controls.volume_step).clamp(0.0, 1.0);
            controller.set_volume(level);
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            let level = (controller.volume() - settings.controls.volume_step).clamp(0.0, 1.0);
            controller.set_volume(level);
        }
        _ => {}
    }

    false
}

fn play_selection<A: AudioBackend, T: TagReader>(
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
) {
    let selection = if controller.active_view().is_empty() {
        None
    } else {
        Some(state.selected)
    };

    match controller.select_and_play(selection) {
        Ok(now) => apply_now_playing(now, controller, state),
        Err(e) => state.modal = Some(e.to_string()),
    }
}

fn seek<A: AudioBackend, T: TagReader>(
    controller: &mut PlaylistController<A, T>,
    state: &mut ViewState,
    delta_secs: i64,
) {
    if let Err(e) = controller.seek_relative(delta_secs) {
        state.modal = Some(e.to_string());
    }
}

fn apply_now_playing<A: AudioBackend, T: TagReader>(
    now: NowPlaying,
    controller: &PlaylistController<A, T>,
    state: &mut ViewState,
) {
    state.now_playing = Some(now.to_string());
    state.playback_label = "Playing";
    if let Some(pos) = controller.view_position_of_current() {
        state.selected = pos;
    }
}

fn clamp_selection<A: AudioBackend, T: TagReader>(
    controller: &PlaylistController<A, T>,
    state: &mut ViewState,
) {
    let len = controller.active_view().len();
    if len == 0 {
        state.selected = 0;
    } else if state.selected >= len {
        state.selected = len - 1;
    }
}
