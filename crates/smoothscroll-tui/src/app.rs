use std::time::Duration;

use ratatui::layout::Rect;
use smoothscroll_core::dom::{Document, NodeId};
use smoothscroll_core::input::{KeyInput, WheelInput};
use smoothscroll_core::scroll::{Clock, SystemClock};
use smoothscroll_core::{EventOutcome, ScrollSettings, SmoothScroller};
use tracing::debug;

use crate::input::Action;
use crate::page::{article_scroll, pane_scroll, Page};

/// Current keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Article,
    Pane,
}

pub struct App<C: Clock = SystemClock> {
    pub engine: SmoothScroller<Document, C>,
    pub page: Page,
    pub focus: Focus,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Events the engine left to the host so far
    pub passed_through: u32,
}

impl App<SystemClock> {
    pub fn new(settings: ScrollSettings, area: Rect) -> smoothscroll_core::Result<Self> {
        Self::with_clock(settings, area, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(settings: ScrollSettings, area: Rect, clock: C) -> smoothscroll_core::Result<Self> {
        let (page, document) = Page::build(area);
        let mut engine = SmoothScroller::with_clock(document, clock);
        engine.configure(settings)?;
        Ok(Self {
            engine,
            page,
            focus: Focus::Article,
            status_message: None,
            should_quit: false,
            passed_through: 0,
        })
    }

    fn focused_node(&self) -> NodeId {
        match self.focus {
            Focus::Article => self.page.body(),
            Focus::Pane => self.page.pane(),
        }
    }

    /// Apply an input action
    pub fn dispatch(&mut self, action: Action) {
        let outcome = match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Article => Focus::Pane,
                    Focus::Pane => Focus::Article,
                };
                return;
            }
            Action::Click { column, row } => {
                self.focus = if self.page.hit_test(column, row) == self.page.pane() {
                    Focus::Pane
                } else {
                    Focus::Article
                };
                return;
            }
            Action::Key(key, modifiers) => {
                let input = KeyInput::new(self.focused_node(), key, modifiers);
                self.engine.handle_key(&input)
            }
            Action::Wheel {
                column,
                row,
                delta_x,
                delta_y,
            } => {
                let target = self.page.hit_test(column, row);
                self.engine.handle_wheel(&WheelInput::new(target, delta_x, delta_y))
            }
            Action::None => return,
        };

        if outcome == EventOutcome::PassThrough {
            debug!(?action, "Event left to the host");
            self.passed_through += 1;
        }
    }

    /// Step the engine; true when a frame was written
    pub fn tick(&mut self) -> bool {
        self.engine.tick() > 0
    }

    /// How long the event loop may block before the next frame is due
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.engine
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(self.engine.clock().now()))
    }

    pub fn resize(&mut self, area: Rect) {
        self.page.resize(self.engine.tree_mut(), area);
        self.engine.clear_overflow_cache();
    }

    /// First visible (row, column) of the article
    pub fn article_scroll(&self) -> (u16, u16) {
        article_scroll(self.engine.tree())
    }

    /// First visible row of the side pane
    pub fn pane_scroll(&self) -> u16 {
        pane_scroll(self.engine.tree(), self.page.pane())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}
