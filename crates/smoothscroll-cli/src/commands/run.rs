use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tracing::info;

use smoothscroll_core::AppConfig;
use smoothscroll_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    widgets::{PageViewWidget, StatusBarWidget},
};

pub fn run(config: AppConfig) -> Result<()> {
    // Build the page before touching the terminal so bad settings
    // are reported on a normal screen
    let (width, height) = terminal::size()?;
    let mut app = App::new(config.scroll.clone(), content_area(width, height))?;
    app.set_status(format!(
        "{} Hz, {} ms per scroll - tab switches focus",
        config.scroll.framerate, config.scroll.animation_time
    ));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("smoothscroll"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(config.general.tick_rate_ms);
    info!("Terminal host started");
    let result = main_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        // Write any frame that is due before drawing
        app.tick();

        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());
            PageViewWidget::render(frame, app);
            StatusBarWidget::render(frame, layout[1], app);
        })?;

        // Block until input arrives or the next frame is due
        match events.next(app.poll_timeout())? {
            Some(AppEvent::Key(key)) => {
                app.status_message = None;
                app.dispatch(handle_key_event(key));
            }
            Some(AppEvent::Mouse(mouse)) => {
                app.status_message = None;
                app.dispatch(handle_mouse_event(mouse));
            }
            Some(AppEvent::Resize(width, height)) => app.resize(content_area(width, height)),
            Some(AppEvent::Tick) | None => {}
        }

        if app.should_quit {
            info!("Terminal host quitting");
            return Ok(());
        }
    }
}

/// Screen area above the status bar
fn content_area(width: u16, height: u16) -> Rect {
    Rect::new(0, 0, width, height.saturating_sub(1))
}
