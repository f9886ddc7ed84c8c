//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::session::Session;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
pub struct App {
    session: Session,
    state: AppState,
    should_quit: bool,
}

impl App {
    /// Creates a new App over an idle session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: AppState::new(),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create event handler
        let events = EventHandler::new(tick_rate);

        // Initial aggregation
        self.session.start();

        // Main loop
        loop {
            // Apply settled aggregations before drawing.
            self.session.poll();

            terminal.draw(|frame| render(frame, &mut self.state, &self.session))?;

            match events.next() {
                Ok(Event::Tick) => {
                    self.state.tick_spinner();
                }
                Ok(Event::Key(key)) => {
                    let action = handle_key(&mut self.state, &mut self.session, key);
                    if action == KeyAction::Quit {
                        self.should_quit = true;
                    }
                }
                Ok(Event::Resize(_, _)) => {}
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }
}
