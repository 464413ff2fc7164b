//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::audio::AudioBackend;
use crate::config::{ControlsSettings, UiSettings};
use crate::controller::PlaylistController;
use crate::runtime::{InputMode, ViewState};
use crate::tags::TagReader;

/// Render the controls help text; the pause entry mirrors the paused flag.
fn controls_text(seek_seconds: u64, paused: bool) -> String {
    let pause_label = if paused { "resume" } else { "pause" };
    format!(
        "[j/k] up/down | [enter] play | [space/p] {pause_label} | [s] stop | [n/l] next | \
         [H/L] seek -/+{seek_seconds}s | [+/-] volume | [/] search | [a] add folder | [q] quit"
    )
}

/// A popup rectangle of roughly `width` x `height`, centered inside `area`
/// and shrunk to fit when the terminal is small.
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2)).max(10);
    let h = height.min(area.height.saturating_sub(2)).max(5);
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    }
}

/// Slice of the track list to render, chosen so the selected row sits as
/// close to the middle as the list edges allow. Returns the first visible
/// index and the selection's offset within the window.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if height == 0 || total <= height {
        return (0, selected);
    }
    let first = selected
        .saturating_sub(height / 2)
        .min(total - height);
    (first, selected - first)
}

fn mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render the entire UI into the provided `frame`.
pub fn draw<A: AudioBackend, T: TagReader>(
    frame: &mut Frame,
    controller: &PlaylistController<A, T>,
    state: &ViewState,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], ui_settings);
    draw_status(frame, chunks[1], controller, state);
    draw_track_list(frame, chunks[2], controller, state);

    // Error popup overlays the list; any key closes it.
    if let Some(message) = &state.modal {
        let popup_area = popup_rect(chunks[2], 60, 7);
        frame.render_widget(Clear, popup_area);
        let error_paragraph = Paragraph::new(message.as_str())
            .block(
                Block::bordered()
                    .padding(Padding::left(1))
                    .title(" error (any key closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(error_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(
        controls_settings.seek_seconds,
        controller.is_paused(),
    ))
    .block(
        Block::bordered()
            .title(" controls ")
            .padding(Padding::left(1)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect, ui_settings: &UiSettings) {
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(" fermata ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_status<A: AudioBackend, T: TagReader>(
    frame: &mut Frame,
    area: Rect,
    controller: &PlaylistController<A, T>,
    state: &ViewState,
) {
    let mut parts: Vec<String> = Vec::new();

    match state.mode {
        InputMode::Search => parts.push(format!("Search: {}_", state.input)),
        InputMode::AddFolder => parts.push(format!("Add folder: {}_", state.input)),
        InputMode::Normal => {}
    }

    if let Some(now) = &state.now_playing {
        parts.push(now.clone());
    }
    parts.push(state.playback_label.to_string());

    // The position is the controller's model value, not read back from the
    // engine, so mark it as approximate.
    let duration = controller.duration_secs();
    if state.now_playing.is_some() && duration > 0 {
        parts.push(format!(
            "~{} / {}",
            mmss(controller.elapsed_secs()),
            mmss(duration)
        ));
    }

    parts.push(format!("Volume: {:.0}%", controller.volume() * 100.0));

    if controller.has_tracks() {
        if let Some(index) = controller.current_index() {
            parts.push(format!("Track {}/{}", index + 1, controller.tracks().len()));
        } else {
            parts.push(format!("Tracks: {}", controller.tracks().len()));
        }
    } else {
        parts.push("Playlist empty".to_string());
    }

    if controller.is_filtered() {
        parts.push(format!(
            "Filter: {} ({} match(es))",
            controller.query(),
            controller.active_view().len()
        ));
    }

    parts.push(format!("Dir: {}", state.current_dir));

    let status = Paragraph::new(parts.join(" • "))
        .block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_track_list<A: AudioBackend, T: TagReader>(
    frame: &mut Frame,
    area: Rect,
    controller: &PlaylistController<A, T>,
    state: &ViewState,
) {
    let view = controller.active_view();
    let total = view.len();
    let selected = state.selected.min(total.saturating_sub(1));
    let (first, highlight) = visible_window(total, area.height as usize, selected);

    // Only the visible slice becomes ListItems; huge playlists should not
    // allocate a widget row per track.
    let items: Vec<ListItem> = view
        .iter()
        .skip(first)
        .take(area.height as usize)
        .map(|track| ListItem::new(track.title.as_str()))
        .collect();

    let title = if controller.is_filtered() {
        " tracks (filtered) "
    } else {
        " tracks "
    };
    let list = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if total > 0 {
        list_state.select(Some(highlight));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
