//! Smooth scrolling engine
//!
//! Wires the pipeline together: typed input → overflow resolver → direction
//! guard → per-target scroll queue. The engine stays inactive (every event
//! passes through to the host) until a valid configuration arrives, and
//! deactivates entirely on excluded pages.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};
use url::Url;

use crate::config::ScrollSettings;
use crate::dom::ScrollTree;
use crate::exclusion::ExclusionList;
use crate::input::{key_delta, key_passes_through, normalize_wheel, KeyInput, TouchpadDetector, WheelInput};
use crate::overflow::{OverflowResolver, ScrollTarget};
use crate::scroll::{Clock, Easing, ScrollQueue, SystemClock};

/// What the host should do with an event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The engine owns the scroll; suppress the default action
    Handled,
    /// Let the host run its default action
    PassThrough,
}

impl EventOutcome {
    #[inline]
    pub fn prevent_default(self) -> bool {
        self == EventOutcome::Handled
    }
}

/// Why the engine is (not) animating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// No valid configuration yet
    Unconfigured,
    /// The current page is on the exclusion list
    Excluded,
    Active,
}

pub struct SmoothScroller<T: ScrollTree, C: Clock = SystemClock> {
    tree: T,
    clock: C,
    settings: Option<Arc<ScrollSettings>>,
    easing: Easing,
    exclusions: ExclusionList,
    page_url: Option<Url>,
    activation: Activation,
    resolver: OverflowResolver,
    touchpad: TouchpadDetector,
    queues: HashMap<ScrollTarget, ScrollQueue>,
}

impl<T: ScrollTree> SmoothScroller<T, SystemClock> {
    pub fn new(tree: T) -> Self {
        Self::with_clock(tree, SystemClock)
    }
}

impl<T: ScrollTree, C: Clock> SmoothScroller<T, C> {
    pub fn with_clock(tree: T, clock: C) -> Self {
        Self {
            tree,
            clock,
            settings: None,
            easing: Easing::Linear,
            exclusions: ExclusionList::default(),
            page_url: None,
            activation: Activation::Unconfigured,
            resolver: OverflowResolver::new(),
            touchpad: TouchpadDetector::new(),
            queues: HashMap::new(),
        }
    }

    #[inline]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn settings(&self) -> Option<&ScrollSettings> {
        self.settings.as_deref()
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.activation == Activation::Active
    }

    /// Install a new configuration snapshot.
    ///
    /// Invalid settings leave the engine inactive so the host keeps its
    /// native scrolling. Commands already in flight keep the duration and
    /// easing they were admitted with.
    pub fn configure(&mut self, settings: ScrollSettings) -> crate::Result<()> {
        if let Err(e) = settings.validate() {
            warn!("Rejected scroll settings, falling back to native scrolling: {}", e);
            self.settings = None;
            self.set_activation(Activation::Unconfigured);
            return Err(e);
        }

        self.easing = Easing::from_settings(&settings);
        self.exclusions = ExclusionList::new(&settings.excluded);
        self.resolver.clear_cache();
        self.tree.set_background_fixed(settings.fixed_background);
        debug!(
            framerate = settings.framerate,
            animation_time = settings.animation_time,
            step_size = settings.step_size,
            pulse = settings.pulse_algorithm,
            "Scroll settings installed"
        );
        self.settings = Some(Arc::new(settings));
        self.refresh_activation();
        Ok(())
    }

    /// Forget resolved scroll targets, e.g. after a layout change
    pub fn clear_overflow_cache(&mut self) {
        self.resolver.clear_cache();
    }

    /// Tell the engine which page it runs on; re-checks the exclusion list
    pub fn set_page_url(&mut self, page_url: &str) -> crate::Result<()> {
        let url = Url::parse(page_url)?;
        self.page_url = Some(url);
        self.refresh_activation();
        Ok(())
    }

    fn refresh_activation(&mut self) {
        if self.settings.is_none() {
            self.set_activation(Activation::Unconfigured);
            return;
        }
        let excluded = self
            .page_url
            .as_ref()
            .is_some_and(|url| self.exclusions.matches_url(url));
        if excluded {
            self.set_activation(Activation::Excluded);
        } else {
            self.set_activation(Activation::Active);
        }
    }

    fn set_activation(&mut self, activation: Activation) {
        if activation == self.activation {
            return;
        }
        match activation {
            Activation::Active => info!("Smooth scrolling active"),
            Activation::Excluded => info!(
                page = self.page_url.as_ref().map(Url::as_str).unwrap_or_default(),
                "Page excluded, smooth scrolling off"
            ),
            Activation::Unconfigured => info!("Smooth scrolling off until configured"),
        }
        if activation != Activation::Active {
            self.queues.clear();
        }
        self.activation = activation;
    }

    fn active_settings(&self) -> Option<Arc<ScrollSettings>> {
        if self.is_active() {
            self.settings.clone()
        } else {
            None
        }
    }

    /// Handle a wheel event
    pub fn handle_wheel(&mut self, input: &WheelInput) -> EventOutcome {
        let Some(settings) = self.active_settings() else {
            return EventOutcome::PassThrough;
        };
        let now = self.clock.now();

        let touchpad = self.touchpad.observe(input.delta_y, now);
        if touchpad && !settings.touchpad_support {
            trace!("Touchpad wheel event left to the host");
            return EventOutcome::PassThrough;
        }

        let Some(target) = self.resolver.resolve(&self.tree, input.target, now) else {
            return EventOutcome::PassThrough;
        };

        let (dx, dy) = normalize_wheel(input.delta_x, input.delta_y, settings.step_size);
        if dx == 0.0 && dy == 0.0 {
            return EventOutcome::PassThrough;
        }

        self.admit(target, dx, dy, now, &settings);
        EventOutcome::Handled
    }

    /// Handle a key-down event
    pub fn handle_key(&mut self, input: &KeyInput) -> EventOutcome {
        let Some(settings) = self.active_settings() else {
            return EventOutcome::PassThrough;
        };
        if !settings.keyboard_support {
            return EventOutcome::PassThrough;
        }

        let kind = self.tree.kind(input.target);
        let editable = self.tree.is_content_editable(input.target);
        if key_passes_through(input, kind, editable) {
            return EventOutcome::PassThrough;
        }

        let now = self.clock.now();
        let Some(target) = self.resolver.resolve(&self.tree, input.target, now) else {
            return EventOutcome::PassThrough;
        };

        let metrics = self.tree.metrics(target.node(&self.tree));
        let Some((dx, dy)) = key_delta(
            input.key,
            input.modifiers.shift,
            &metrics,
            metrics.client_height,
            &settings,
        ) else {
            return EventOutcome::PassThrough;
        };

        if dx != 0.0 || dy != 0.0 {
            self.admit(target, dx, dy, now, &settings);
        }
        EventOutcome::Handled
    }

    /// Animate a scroll of `(dx, dy)` pixels on a known target
    pub fn scroll_by(&mut self, target: ScrollTarget, dx: f64, dy: f64) -> EventOutcome {
        let Some(settings) = self.active_settings() else {
            return EventOutcome::PassThrough;
        };
        let now = self.clock.now();
        self.admit(target, dx, dy, now, &settings);
        EventOutcome::Handled
    }

    fn admit(&mut self, target: ScrollTarget, dx: f64, dy: f64, now: Instant, settings: &ScrollSettings) {
        debug!(scroll_target = ?target, dx, dy, "Scroll admitted");
        let easing = self.easing;
        self.queues
            .entry(target)
            .or_insert_with(|| ScrollQueue::new(target))
            .admit(dx, dy, now, settings, easing);
    }

    /// Earliest tick deadline of all running queues (None when idle)
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queues.values().filter_map(ScrollQueue::deadline).min()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.queues.values().all(ScrollQueue::is_idle)
    }

    /// Queue of a target, if one is running
    pub fn queue(&self, target: ScrollTarget) -> Option<&ScrollQueue> {
        self.queues.get(&target)
    }

    /// Step every queue whose deadline has passed. Returns how many stepped.
    pub fn tick(&mut self) -> usize {
        let Some(settings) = self.settings.clone() else {
            return 0;
        };
        let now = self.clock.now();
        let period = settings.frame_period();

        let mut stepped = 0;
        for queue in self.queues.values_mut() {
            match queue.deadline() {
                Some(deadline) if deadline <= now => {
                    let report = queue.step(&mut self.tree, now, period);
                    if report.idle {
                        debug!(scroll_target = ?queue.target(), "Scroll queue idle");
                    }
                    stepped += 1;
                }
                _ => {}
            }
        }
        self.queues.retain(|_, queue| !queue.is_idle());
        stepped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Axis, Document, Node, NodeId, NodeKind, Overflow};
    use crate::input::{Key, Modifiers};
    use crate::scroll::ManualClock;
    use std::time::Duration;

    fn engine(doc: Document) -> (SmoothScroller<Document, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut engine = SmoothScroller::with_clock(doc, clock.clone());
        engine.configure(ScrollSettings::default()).unwrap();
        (engine, clock)
    }

    /// Tall page scrolled to 1000, plus a scrollable pane
    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new((800, 600), (800, 4000));
        let root = doc.root();
        doc.set_scroll_offset(root, Axis::Y, 1000);
        let body = doc.append(root, Node::element());
        let pane = doc.append(
            body,
            Node::element()
                .overflow(Overflow::Auto)
                .client_size(300, 200)
                .scroll_size(300, 1000),
        );
        (doc, body, pane)
    }

    /// Drive ticks like a host timer until every queue is idle
    fn run_until_idle(engine: &mut SmoothScroller<Document, ManualClock>, clock: &ManualClock) -> usize {
        let mut ticks = 0;
        while let Some(deadline) = engine.next_deadline() {
            clock.advance_to(deadline);
            ticks += engine.tick();
            assert!(ticks < 10_000);
        }
        ticks
    }

    #[test]
    fn test_unconfigured_engine_passes_through() {
        let (doc, body, _) = page();
        let mut engine = SmoothScroller::with_clock(doc, ManualClock::new());
        assert_eq!(engine.activation(), Activation::Unconfigured);
        let outcome = engine.handle_wheel(&WheelInput::new(body, 0.0, 120.0));
        assert_eq!(outcome, EventOutcome::PassThrough);
        assert!(!outcome.prevent_default());
    }

    #[test]
    fn test_zero_framerate_keeps_native_scrolling() {
        let (doc, body, _) = page();
        let (mut engine, _) = engine(doc);
        let result = engine.configure(ScrollSettings {
            framerate: 0,
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!engine.is_active());
        assert_eq!(
            engine.handle_wheel(&WheelInput::new(body, 0.0, 120.0)),
            EventOutcome::PassThrough
        );
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn test_wheel_notch_end_to_end() {
        let (doc, body, _) = page();
        let clock = ManualClock::new();
        let mut engine = SmoothScroller::with_clock(doc, clock.clone());
        engine
            .configure(ScrollSettings {
                framerate: 150,
                animation_time: 400,
                step_size: 120.0,
                ..Default::default()
            })
            .unwrap();

        let outcome = engine.handle_wheel(&WheelInput::new(body, 0.0, -120.0));
        assert_eq!(outcome, EventOutcome::Handled);

        let ticks = run_until_idle(&mut engine, &clock);
        let root = engine.tree().root();
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), 880);
        // floor(150 * 400 / 1000) frames, plus the immediate first tick
        assert!((60..=62).contains(&ticks), "ticks = {}", ticks);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_wheel_in_pane_scrolls_pane_only() {
        let (doc, _, pane) = page();
        let (mut engine, clock) = engine(doc);
        let mut leaf = pane;
        for _ in 0..3 {
            leaf = engine.tree_mut().append(leaf, Node::element());
        }

        assert_eq!(
            engine.handle_wheel(&WheelInput::new(leaf, 0.0, 120.0)),
            EventOutcome::Handled
        );
        run_until_idle(&mut engine, &clock);

        let root = engine.tree().root();
        assert_eq!(engine.tree().scroll_offset(pane, Axis::Y), 120);
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), 1000);
    }

    #[test]
    fn test_nothing_scrollable_passes_through() {
        let mut doc = Document::new((800, 600), (800, 600));
        let div = doc.append(doc.root(), Node::element());
        let (mut engine, _) = engine(doc);
        assert_eq!(
            engine.handle_wheel(&WheelInput::new(div, 0.0, 120.0)),
            EventOutcome::PassThrough
        );
    }

    #[test]
    fn test_reversal_mid_flight() {
        let (doc, body, _) = page();
        let (mut engine, clock) = engine(doc);
        let root = engine.tree().root();

        engine.handle_wheel(&WheelInput::new(body, 0.0, 120.0));
        for _ in 0..10 {
            clock.advance(Duration::from_millis(7));
            engine.tick();
        }
        let at_reversal = engine.tree().scroll_offset(root, Axis::Y);
        assert!(at_reversal > 1000);

        engine.handle_wheel(&WheelInput::new(body, 0.0, -120.0));
        assert_eq!(engine.queue(ScrollTarget::Page).map(ScrollQueue::len), Some(1));
        run_until_idle(&mut engine, &clock);
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), at_reversal - 120);
    }

    #[test]
    fn test_excluded_page_deactivates() {
        let (doc, body, _) = page();
        let (mut engine, _) = engine(doc);
        engine
            .configure(ScrollSettings {
                excluded: vec!["example.com".to_string()],
                ..Default::default()
            })
            .unwrap();

        engine.set_page_url("https://docs.example.com/guide").unwrap();
        assert_eq!(engine.activation(), Activation::Excluded);
        assert_eq!(
            engine.handle_wheel(&WheelInput::new(body, 0.0, 120.0)),
            EventOutcome::PassThrough
        );
        assert_eq!(
            engine.handle_key(&KeyInput::new(body, Key::Down, Modifiers::NONE)),
            EventOutcome::PassThrough
        );

        engine.set_page_url("https://rust-lang.org/").unwrap();
        assert!(engine.is_active());
    }

    #[test]
    fn test_settings_arriving_late_recheck_exclusion() {
        let (doc, _, _) = page();
        let mut engine = SmoothScroller::with_clock(doc, ManualClock::new());
        engine.set_page_url("https://example.com/").unwrap();
        assert_eq!(engine.activation(), Activation::Unconfigured);

        engine
            .configure(ScrollSettings {
                excluded: vec!["example.com".to_string()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(engine.activation(), Activation::Excluded);
    }

    #[test]
    fn test_page_down_and_home_keys() {
        let (doc, body, _) = page();
        let (mut engine, clock) = engine(doc);
        let root = engine.tree().root();

        let outcome = engine.handle_key(&KeyInput::new(body, Key::PageDown, Modifiers::NONE));
        assert_eq!(outcome, EventOutcome::Handled);
        run_until_idle(&mut engine, &clock);
        // 0.9 * 600 viewport
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), 1540);

        engine.handle_key(&KeyInput::new(body, Key::Home, Modifiers::NONE));
        run_until_idle(&mut engine, &clock);
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), 0);
    }

    #[test]
    fn test_editable_targets_and_chords_pass_through() {
        let (mut doc, body, _) = page();
        let input = doc.append(body, Node::element().kind(NodeKind::Input));
        let (mut engine, _) = engine(doc);

        assert_eq!(
            engine.handle_key(&KeyInput::new(input, Key::Down, Modifiers::NONE)),
            EventOutcome::PassThrough
        );
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(
            engine.handle_key(&KeyInput::new(body, Key::Down, ctrl)),
            EventOutcome::PassThrough
        );
        assert_eq!(
            engine.handle_key(&KeyInput::new(body, Key::Other(13), Modifiers::NONE)),
            EventOutcome::PassThrough
        );
        assert!(engine.is_idle());
    }

    #[test]
    fn test_keyboard_support_off() {
        let (doc, body, _) = page();
        let (mut engine, _) = engine(doc);
        engine
            .configure(ScrollSettings {
                keyboard_support: false,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            engine.handle_key(&KeyInput::new(body, Key::Down, Modifiers::NONE)),
            EventOutcome::PassThrough
        );
    }

    #[test]
    fn test_touchpad_events_pass_through_when_unsupported() {
        let (doc, body, _) = page();
        let (mut engine, _) = engine(doc);
        engine
            .configure(ScrollSettings {
                touchpad_support: false,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            engine.handle_wheel(&WheelInput::new(body, 0.0, 120.0)),
            EventOutcome::Handled
        );
        assert_eq!(
            engine.handle_wheel(&WheelInput::new(body, 0.0, 4.0)),
            EventOutcome::PassThrough
        );
    }

    #[test]
    fn test_fixed_background_setting_reaches_tree() {
        let (doc, _, _) = page();
        let (mut engine, _) = engine(doc);
        assert!(engine.tree().background_fixed());
        engine
            .configure(ScrollSettings {
                fixed_background: false,
                ..Default::default()
            })
            .unwrap();
        assert!(!engine.tree().background_fixed());
    }

    #[test]
    fn test_scroll_by_known_target() {
        let (doc, _, pane) = page();
        let (mut engine, clock) = engine(doc);
        assert_eq!(
            engine.scroll_by(ScrollTarget::Element(pane), 0.0, 75.5),
            EventOutcome::Handled
        );
        run_until_idle(&mut engine, &clock);
        // fractional requests land on the next whole pixel
        assert_eq!(engine.tree().scroll_offset(pane, Axis::Y), 76);
        assert!(engine.queue(ScrollTarget::Element(pane)).is_none());
    }

    #[test]
    fn test_two_targets_animate_independently() {
        let (doc, body, pane) = page();
        let (mut engine, clock) = engine(doc);
        let root = engine.tree().root();

        engine.handle_wheel(&WheelInput::new(pane, 0.0, 120.0));
        engine.handle_wheel(&WheelInput::new(body, 0.0, -120.0));
        assert!(engine.queue(ScrollTarget::Element(pane)).is_some());
        assert!(engine.queue(ScrollTarget::Page).is_some());

        run_until_idle(&mut engine, &clock);
        assert_eq!(engine.tree().scroll_offset(pane, Axis::Y), 120);
        assert_eq!(engine.tree().scroll_offset(root, Axis::Y), 880);
    }
}
