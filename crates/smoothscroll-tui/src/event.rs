use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll timeout while nothing animates
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for the next event, waiting at most `timeout`
    /// (the idle tick rate when `None`)
    pub fn next(&self, timeout: Option<Duration>) -> Result<Option<AppEvent>> {
        if event::poll(timeout.unwrap_or(self.tick_rate))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Wheel, click or movement
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Poll timed out: a frame may be due
    Tick,
}
