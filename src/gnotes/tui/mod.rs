//! Full-screen view: ratatui drawing plus crossterm input around a
//! [`SessionController`]. All behaviour lives in the session; this module
//! only owns the terminal.

mod keys;
mod render;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use gnotes::config::AppPaths;
use gnotes::editor::{EditOutcome, ExternalEditor, SystemEditor};
use gnotes::error::Result;
use gnotes::session::{Flow, SessionController};
use gnotes::store::dir::open_store;
use gnotes::store::{LocalCache, RemoteStore};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::cell::Cell;
use std::io::{stdout, Stdout};
use std::rc::Rc;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run(paths: &AppPaths) -> Result<()> {
    let mut store = open_store(paths)?;
    log::info!("session started with {} notes", store.len());

    let redraw = Rc::new(Cell::new(false));
    let mut editor = SuspendingEditor {
        inner: SystemEditor::new(),
        redraw: Rc::clone(&redraw),
    };

    let mut terminal = setup_terminal()?;
    let result = {
        let mut session = SessionController::new(&mut store, &mut editor);
        event_loop(&mut terminal, &mut session, &redraw)
    };
    teardown_terminal(&mut terminal)?;

    if let Err(e) = &result {
        log::error!("session ended: {}", e);
    }
    result
}

fn event_loop<R: RemoteStore, C: LocalCache>(
    terminal: &mut Term,
    session: &mut SessionController<'_, R, C>,
    redraw: &Cell<bool>,
) -> Result<()> {
    loop {
        if redraw.replace(false) {
            terminal.clear()?;
        }
        terminal.draw(|f| render::draw(f, session))?;
        session.clear_status();

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(input) = keys::to_input(key) else {
                continue;
            };
            if session.handle(input)? == Flow::Quit {
                break;
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    Ok(Terminal::new(backend)?)
}

fn teardown_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Hands the terminal to the editor for the duration of an edit and takes
/// it back afterwards. The flag tells the loop the screen needs a full
/// repaint.
struct SuspendingEditor {
    inner: SystemEditor,
    redraw: Rc<Cell<bool>>,
}

impl ExternalEditor for SuspendingEditor {
    fn edit(&mut self, content: &str) -> Result<EditOutcome> {
        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        let outcome = self.inner.edit(content);

        execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        self.redraw.set(true);
        outcome
    }
}
