use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use linear_core::config::Config;
use linear_core::graphql::LinearGraphqlClient;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::source::{DataSource, LinearSource};
use crate::tui::app::{App, Command};
use crate::tui::dispatch::Dispatcher;
use crate::tui::event::AppEvent;
use crate::tui::view::render_app;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run(config: &Config) -> Result<()> {
    let client = LinearGraphqlClient::with_endpoint(&config.session, &config.endpoint)
        .context("failed to build GraphQL client")?;
    let (events, completions) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(Arc::new(LinearSource::new(client)), events);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(&mut stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(endpoint = %config.endpoint, "terminal ready");

    let result = run_app(&mut terminal, &dispatcher, completions).await;

    let restored = restore_terminal(&mut terminal);
    info!("terminal restored");
    result.and(restored)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<B: Backend, S: DataSource>(
    terminal: &mut Terminal<B>,
    dispatcher: &Dispatcher<S>,
    mut completions: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut app = App::new();
    let size = terminal.size()?;
    app.update(AppEvent::Resize {
        width: size.width,
        height: size.height,
    });
    let start = app.start();
    if apply_command(dispatcher, start).is_break() {
        return Ok(());
    }

    loop {
        terminal.draw(|frame| render_app(frame, &app))?;

        // Only the first poll waits; everything already queued is drained without blocking.
        let mut timeout = POLL_INTERVAL;
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            if let Some(event) = AppEvent::from_terminal(event::read()?) {
                if apply(&mut app, dispatcher, event).is_break() {
                    return Ok(());
                }
            }
        }

        while let Ok(event) = completions.try_recv() {
            if apply(&mut app, dispatcher, event).is_break() {
                return Ok(());
            }
        }

        if apply(&mut app, dispatcher, AppEvent::Tick).is_break() {
            return Ok(());
        }
    }
}

fn apply<S: DataSource>(
    app: &mut App,
    dispatcher: &Dispatcher<S>,
    event: AppEvent,
) -> ControlFlow<()> {
    let command = app.update(event);
    apply_command(dispatcher, command)
}

fn apply_command<S: DataSource>(
    dispatcher: &Dispatcher<S>,
    command: Command,
) -> ControlFlow<()> {
    match command {
        Command::None => ControlFlow::Continue(()),
        Command::Load(request) => {
            dispatcher.dispatch(request);
            ControlFlow::Continue(())
        }
        Command::Quit => {
            info!("quit requested");
            ControlFlow::Break(())
        }
    }
}
