pub mod app;
pub mod ui;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::error::Result;
use crate::session::Session;
use crate::storage::TableName;
use app::{App, InputField, InputMode};
use ui::ui;

/// Which screen the terminal UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive task table.
    Dashboard,
    /// Read-only wall display with a week strip.
    Tv,
}

pub fn run_tui(session: &Session, mode: Mode) -> Result<()> {
    let mut app = App::new(session, mode)?;

    let dirty = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dirty);
    let subscription = session.store.subscribe(TableName::Tasks, move |_| flag.store(true, Ordering::Relaxed));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, session, &dirty);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    session.store.unsubscribe(subscription);

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, session: &Session, dirty: &AtomicBool) -> Result<()> {
    let tick = Duration::from_secs(session.config.tick_seconds.max(1));
    let mut last_tick = Instant::now();

    loop {
        if dirty.swap(false, Ordering::Relaxed) {
            if let Err(e) = app.reload(session) {
                app.status = Some(e.to_string());
            }
        }
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        _ if app.mode == Mode::Tv => {}
                        KeyCode::Char(' ') => app.toggle_selected(session),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(session),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('e') => app.start_edit(InputField::Description),
                        KeyCode::Char('t') => app.start_edit(InputField::Date),
                        KeyCode::Char('D') => app.start_edit(InputField::Deadline),
                        KeyCode::Char('/') => app.start_edit(InputField::Search),
                        KeyCode::Char('c') => app.toggle_completed(session),
                        KeyCode::Char('p') => app.cycle_period(session),
                        KeyCode::Char('x') => app.clear_filters(session),
                        _ => {}
                    },
                    InputMode::Editing | InputMode::Adding => match key.code {
                        KeyCode::Enter => app.handle_input(session),
                        KeyCode::Esc => app.cancel_input(),
                        KeyCode::Char(c) => app.input_buffer.push(c),
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                        }
                        _ => {}
                    },
                }
            }
        }

        if last_tick.elapsed() >= tick {
            // Pick up writes from other processes too.
            dirty.store(true, Ordering::Relaxed);
            last_tick = Instant::now();
        }
    }
}
