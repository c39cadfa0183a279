use std::future;
use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::ScrollSettings;
use crate::dom::ScrollTree;
use crate::engine::{EventOutcome, SmoothScroller};
use crate::input::{KeyInput, WheelInput};
use crate::scroll::Clock;

/// Events the host forwards to the frame driver
#[derive(Debug, Clone)]
pub enum HostEvent {
    Wheel(WheelInput),
    Key(KeyInput),
    /// The host navigated to another page
    Navigate(String),
    /// New settings arrived from the settings store
    Configure(ScrollSettings),
}

/// Events emitted by the frame driver to notify the host
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// An input event was left to the host's default action
    PassThrough,
    /// One frame was written
    Frame { stepped: usize },
    /// Every queue went idle
    Idle,
    /// Settings or a page address were rejected
    Error { message: String },
}

/// Sleep until `deadline`, or forever when there is nothing to animate
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => future::pending::<()>().await,
    }
}

/// Drive `engine` until every queue is idle. Returns the number of steps taken.
///
/// The engine's clock must follow tokio's time (see
/// [`TokioClock`](crate::scroll::TokioClock)) for paused-time tests.
pub async fn run_until_idle<T: ScrollTree, C: Clock>(engine: &mut SmoothScroller<T, C>) -> usize {
    let mut stepped = 0;
    while let Some(deadline) = engine.next_deadline() {
        sleep_until(Some(deadline)).await;
        stepped += engine.tick();
    }
    stepped
}

/// Owns an engine and feeds it host events and frame deadlines
pub struct FrameDriver<T: ScrollTree, C: Clock> {
    engine: SmoothScroller<T, C>,
    event_tx: Option<mpsc::UnboundedSender<DriverEvent>>,
}

impl<T: ScrollTree, C: Clock> FrameDriver<T, C> {
    pub fn new(engine: SmoothScroller<T, C>) -> Self {
        Self {
            engine,
            event_tx: None,
        }
    }

    /// Set the event sender for host notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<DriverEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn engine(&self) -> &SmoothScroller<T, C> {
        &self.engine
    }

    fn send_event(&self, event: DriverEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send driver event: receiver dropped");
            }
        }
    }

    fn dispatch(&mut self, event: HostEvent) {
        let outcome = match event {
            HostEvent::Wheel(wheel) => self.engine.handle_wheel(&wheel),
            HostEvent::Key(key) => self.engine.handle_key(&key),
            HostEvent::Navigate(url) => {
                if let Err(e) = self.engine.set_page_url(&url) {
                    warn!("Ignoring page address {:?}: {}", url, e);
                    self.send_event(DriverEvent::Error {
                        message: e.to_string(),
                    });
                }
                return;
            }
            HostEvent::Configure(settings) => {
                if let Err(e) = self.engine.configure(settings) {
                    self.send_event(DriverEvent::Error {
                        message: e.to_string(),
                    });
                }
                return;
            }
        };
        if outcome == EventOutcome::PassThrough {
            self.send_event(DriverEvent::PassThrough);
        }
    }

    fn frame(&mut self) {
        let stepped = self.engine.tick();
        if stepped > 0 {
            self.send_event(DriverEvent::Frame { stepped });
            if self.engine.is_idle() {
                debug!("All scroll queues idle");
                self.send_event(DriverEvent::Idle);
            }
        }
    }

    /// Run until shutdown, or until the host hangs up and the last animation
    /// finished. Hands the engine back.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<HostEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> SmoothScroller<T, C> {
        info!("Frame driver started");
        let mut host_open = true;

        loop {
            if !host_open && self.engine.is_idle() {
                break;
            }
            let deadline = self.engine.next_deadline();

            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Frame driver received shutdown signal");
                        break;
                    }
                }

                event = events.recv(), if host_open => {
                    match event {
                        Some(event) => self.dispatch(event),
                        None => {
                            debug!("Host event channel closed");
                            host_open = false;
                        }
                    }
                }

                _ = sleep_until(deadline) => self.frame(),
            }
        }

        info!("Frame driver stopped");
        self.engine
    }
}
