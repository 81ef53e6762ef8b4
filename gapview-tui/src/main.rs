//! Terminal dashboard over the country/year panel: year slider, three chart
//! views, key-insight metrics, and in-session dataset upload.

mod app;
mod input;
mod ui;

use std::{env, fs::File, io, sync::Mutex, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gapview_core::{ports::DatasetSource, service::DashboardService};
use gapview_source_file::FileSource;
use gapview_source_gapminder as gapminder;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Mode};
use crate::input::Action;

fn main() -> Result<()> {
    init_tracing()?;

    // Dataset setup: optional upload path, otherwise the reference panel.
    // Format dispatch happens here, before any terminal state is touched.
    let source: Box<dyn DatasetSource> = match env::args().nth(1) {
        Some(path) => Box::new(FileSource::new(path)?),
        None => Box::new(gapminder::source()),
    };
    let service = DashboardService::open(source)?;
    tracing::info!(
        source = service.describe(),
        rows = service.table().len(),
        "dataset ready"
    );

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LoadFile => {
                    let path = app.path_input.trim().to_owned();
                    if path.is_empty() {
                        app.error_message =
                            Some("Type a path to a .csv or .xlsx file, then press Enter".into());
                        continue;
                    }

                    // The previous table stays active when the load fails.
                    let result = FileSource::new(path.as_str())
                        .and_then(|source| app.service.replace(Box::new(source)));

                    match result {
                        Ok(()) => {
                            app.mode = Mode::Dashboard;
                            app.path_input.clear();
                            app.error_message = None;
                            app.reset_years();
                            app.recompute();
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Load failed: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// File-backed logging, opt-in via `GAPVIEW_LOG` since the alternate screen
/// owns stdout. `RUST_LOG` filters as usual, defaulting to `debug`.
fn init_tracing() -> Result<()> {
    let Some(path) = env::var_os("GAPVIEW_LOG") else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_unset| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
