pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use log::info;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::api::MailApi;
use crate::app::{App, Completion};
use crate::dispatch::Dispatcher;
use crate::domain::email::Mailbox;
use crate::terminal::state::TuiState;

const TICK: Duration = Duration::from_millis(100);

pub fn run_tui(api: Arc<dyn MailApi>, app: App, start: Mailbox) -> Result<()> {
    let (dispatcher, rx) = Dispatcher::new(api);
    let mut state = TuiState::new(app);

    let jobs = state.app.show_mailbox(start);
    dispatcher.dispatch_all(jobs);

    let terminal = ratatui::init();
    let result = run(terminal, &mut state, &dispatcher, &rx);
    ratatui::restore();

    info!("terminal client closed");
    result
}

fn run(
    mut terminal: DefaultTerminal,
    state: &mut TuiState,
    dispatcher: &Dispatcher,
    rx: &Receiver<Completion>,
) -> Result<()> {
    while !state.should_quit {
        terminal.draw(|f| ui::render(f, state))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                let jobs = events::handle_key(key, state);
                dispatcher.dispatch_all(jobs);
            }
        }

        while let Ok(completion) = rx.try_recv() {
            let jobs = state.apply(completion);
            dispatcher.dispatch_all(jobs);
        }
    }
    Ok(())
}
