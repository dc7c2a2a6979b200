//! TKAN - Terminal Kanban
//!
//! A three-lane kanban board for the terminal. Tasks are added per lane,
//! moved by mouse drag or keyboard, and saved after every change.

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use tkan::application::{App, AppMode, BoardStore};
use tkan::infrastructure::{init_tracing, Config, FileStore};
use tkan::presentation::{render_ui, BoardLayout, InputHandler};

/// Entry point for the tkan terminal kanban board.
///
/// Loads configuration, opens the board store, sets up the terminal and
/// runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the config file is invalid, if terminal setup fails,
/// or if there are issues with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config);

    let data_dir = config.data_dir();
    tracing::info!(data_dir = %data_dir.display(), "starting");
    let board = BoardStore::load(Box::new(FileStore::new(data_dir)));
    let mut app = App::new(board);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal failure");
        println!("{err:?}");
    }

    tracing::info!("exiting");
    Ok(())
}

/// Main application event loop.
///
/// Redraws the board, then dispatches one keyboard or mouse event.
/// Continues running until the user presses 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut layout = BoardLayout::default();
    loop {
        terminal.draw(|f| layout = render_ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                _ => InputHandler::handle_key_event(app, key.code),
            },
            Event::Mouse(mouse) => InputHandler::handle_mouse_event(app, mouse, &layout),
            _ => {}
        }
    }
}
