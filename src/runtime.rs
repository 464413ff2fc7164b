//! Application runtime: settings loading, startup wiring and the
//! terminal event loop.

use std::env;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

mod event_loop;
mod settings;
mod startup;

pub use event_loop::{InputMode, ViewState};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let root = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.library.root.clone());

    let (mut controller, startup_error) = startup::build(&root, &settings)?;

    let mut state = ViewState::new(root);
    state.modal = startup_error;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut controller, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
