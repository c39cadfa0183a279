use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use smoothscroll_core::dom::{Axis, Document, Node, ScrollTree};
use smoothscroll_core::input::WheelInput;
use smoothscroll_core::scroll::{Clock, ManualClock};
use smoothscroll_core::{AppConfig, EventOutcome, ScrollSettings, SmoothScroller};

/// Viewport of the simulated page
const VIEWPORT: (i32, i32) = (800, 600);

/// Content of the simulated page; it starts scrolled to the middle
const CONTENT: (i32, i32) = (4000, 20_000);

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Vertical wheel delta per event (positive scrolls down)
    #[arg(long, default_value_t = 120.0, allow_hyphen_values = true)]
    pub delta_y: f64,
    /// Horizontal wheel delta per event (positive scrolls right)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub delta_x: f64,
    /// Number of wheel events
    #[arg(long, default_value_t = 1)]
    pub repeat: u32,
    /// Milliseconds between two wheel events
    #[arg(long, default_value_t = 50)]
    pub gap_ms: u64,
    /// Override the configured framerate [Hz]
    #[arg(long)]
    pub framerate: Option<u32>,
    /// Override the configured animation time [ms]
    #[arg(long)]
    pub animation_time: Option<u64>,
    /// Override the configured pixels per wheel notch
    #[arg(long)]
    pub step_size: Option<f64>,
    /// Animate with linear progress instead of the pulse curve
    #[arg(long)]
    pub linear: bool,
}

impl SimulateArgs {
    fn settings(&self, base: &ScrollSettings) -> ScrollSettings {
        let mut settings = base.clone();
        if let Some(framerate) = self.framerate {
            settings.framerate = framerate;
        }
        if let Some(animation_time) = self.animation_time {
            settings.animation_time = animation_time;
        }
        if let Some(step_size) = self.step_size {
            settings.step_size = step_size;
        }
        if self.linear {
            settings.pulse_algorithm = false;
        }
        settings
    }
}

/// What a simulation did in total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub frames: usize,
    pub moved_x: i32,
    pub moved_y: i32,
    pub elapsed: Duration,
}

pub fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let settings = args.settings(&config.scroll);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = simulate(settings, &args, &mut out)?;
    writeln!(
        out,
        "{} frames over {:.1} ms, moved x {:+} y {:+}",
        summary.frames,
        summary.elapsed.as_secs_f64() * 1000.0,
        summary.moved_x,
        summary.moved_y
    )?;
    Ok(())
}

/// Replay the wheel events on a manual clock, writing one line per event and frame
pub fn simulate<W: Write>(settings: ScrollSettings, args: &SimulateArgs, out: &mut W) -> Result<Summary> {
    let mut document = Document::new(VIEWPORT, CONTENT);
    let root = document.root();
    document.set_scroll_offset(root, Axis::X, (CONTENT.0 - VIEWPORT.0) / 2);
    document.set_scroll_offset(root, Axis::Y, (CONTENT.1 - VIEWPORT.1) / 2);
    let body = document.append(root, Node::element());

    let clock = ManualClock::new();
    let origin = clock.now();
    let mut engine = SmoothScroller::with_clock(document, clock.clone());
    engine.configure(settings)?;

    let start = (
        engine.tree().scroll_offset(root, Axis::X),
        engine.tree().scroll_offset(root, Axis::Y),
    );
    let gap = Duration::from_millis(args.gap_ms);
    let mut pending: VecDeque<Duration> = (0..args.repeat).map(|i| gap * i).collect();
    let mut frames = 0;

    loop {
        let next_event = pending.front().map(|offset| origin + *offset);
        let next_frame = engine.next_deadline();
        let event_due = match (next_event, next_frame) {
            (Some(event), Some(frame)) => event <= frame,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if event_due {
            if let Some(offset) = pending.pop_front() {
                clock.advance_to(origin + offset);
                let outcome = engine.handle_wheel(&WheelInput::new(body, args.delta_x, args.delta_y));
                let verb = match outcome {
                    EventOutcome::Handled => "handled",
                    EventOutcome::PassThrough => "passed through",
                };
                writeln!(
                    out,
                    "{:>8.2} ms  wheel dx {} dy {} {}",
                    clock.elapsed().as_secs_f64() * 1000.0,
                    args.delta_x,
                    args.delta_y,
                    verb
                )?;
            }
            continue;
        }

        if let Some(deadline) = next_frame {
            clock.advance_to(deadline);
        }
        let before = (
            engine.tree().scroll_offset(root, Axis::X),
            engine.tree().scroll_offset(root, Axis::Y),
        );
        frames += engine.tick();
        let after = (
            engine.tree().scroll_offset(root, Axis::X),
            engine.tree().scroll_offset(root, Axis::Y),
        );
        writeln!(
            out,
            "{:>8.2} ms  frame {:>4}  x {:>5} ({:+})  y {:>5} ({:+})",
            clock.elapsed().as_secs_f64() * 1000.0,
            frames,
            after.0,
            after.0 - before.0,
            after.1,
            after.1 - before.1
        )?;
    }

    let end = (
        engine.tree().scroll_offset(root, Axis::X),
        engine.tree().scroll_offset(root, Axis::Y),
    );
    Ok(Summary {
        frames,
        moved_x: end.0 - start.0,
        moved_y: end.1 - start.1,
        elapsed: clock.elapsed(),
    })
}
