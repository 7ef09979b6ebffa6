pub mod dispatch;
pub mod events;
pub mod theme;
pub mod ui;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{self, Event as TermEvent, KeyEventKind},
};
use tokio::runtime::Handle;

use crate::session::{Effect, Event, Session};
use crate::store::ObjectStore;
use dispatch::Dispatcher;

const POLL: Duration = Duration::from_millis(50);
const SPINNER_FRAME: Duration = Duration::from_millis(250);

/// Runs the session until the user quits. Storage work is spawned on
/// `handle`; the terminal is restored on every exit path.
pub fn run_tui(session: Session, store: Arc<dyn ObjectStore>, handle: Handle) -> Result<()> {
    color_eyre::install().map_err(|e| anyhow!("installing error hooks: {e}"))?;

    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(handle, store, tx);

    let terminal = ratatui::init();
    let result = run(terminal, session, &dispatcher, rx);
    ratatui::restore();

    result
}

fn run(
    mut terminal: DefaultTerminal,
    mut session: Session,
    dispatcher: &Dispatcher,
    rx: Receiver<Event>,
) -> Result<()> {
    let size = terminal.size()?;
    session.update(Event::Resize {
        width: size.width,
        height: size.height,
    });
    let mut quit = apply(dispatcher, session.init());
    let started = Instant::now();

    while !quit {
        let spinner = (started.elapsed().as_millis() / SPINNER_FRAME.as_millis()) as usize;
        terminal.draw(|f| ui::draw(f, &session, spinner))?;

        while let Ok(event) = rx.try_recv() {
            quit |= apply(dispatcher, session.update(event));
        }

        if event::poll(POLL)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(input) = events::map_key(key, session.screen) {
                        quit |= apply(dispatcher, session.update(Event::Key(input)));
                    }
                }
                TermEvent::Resize(width, height) => {
                    session.update(Event::Resize { width, height });
                }
                _ => {}
            }
        }
    }

    log::info!("session closed");
    Ok(())
}

/// Hands effects to the dispatcher; true when one of them is a quit.
fn apply(dispatcher: &Dispatcher, effects: Vec<Effect>) -> bool {
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Quit => quit = true,
            other => dispatcher.dispatch(other),
        }
    }
    quit
}
