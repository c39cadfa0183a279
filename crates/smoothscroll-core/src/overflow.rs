//! Overflow resolver
//!
//! Finds the element that should receive a scroll starting at some node: the
//! nearest ancestor with real scrollable overflow, or the page itself.
//! Results are cached per visited node; the cache is wiped wholesale once
//! its freshness window has passed, since layout can change underneath it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::dom::{NodeId, ScrollMetrics, ScrollTree};

/// Tolerance for layout rounding when deciding that content overflows
pub const OVERFLOW_SLOP: i32 = 10;

/// How long resolved ancestors stay cached
pub const CACHE_TTL: Duration = Duration::from_secs(10);

/// Where a scroll lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The whole page, scrolled through the tree's root
    Page,
    Element(NodeId),
}

impl ScrollTarget {
    /// Node whose offsets are written
    #[inline]
    pub fn node<T: ScrollTree + ?Sized>(&self, tree: &T) -> NodeId {
        match self {
            ScrollTarget::Page => tree.root(),
            ScrollTarget::Element(node) => *node,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverflowCache {
    entries: HashMap<NodeId, ScrollTarget>,
    ttl: Duration,
    cleared_at: Option<Instant>,
}

impl OverflowCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            cleared_at: None,
        }
    }

    /// Wipe everything once the freshness window has passed
    pub fn expire(&mut self, now: Instant) {
        match self.cleared_at {
            Some(cleared) if now.saturating_duration_since(cleared) < self.ttl => {}
            _ => {
                if !self.entries.is_empty() {
                    debug!(entries = self.entries.len(), "Clearing overflow cache");
                }
                self.entries.clear();
                self.cleared_at = Some(now);
            }
        }
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<ScrollTarget> {
        self.entries.get(&node).copied()
    }

    fn store(&mut self, nodes: &[NodeId], target: ScrollTarget) {
        for node in nodes {
            self.entries.insert(*node, target);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OverflowCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverflowResolver {
    cache: OverflowCache,
}

impl OverflowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: OverflowCache::new(ttl),
        }
    }

    #[inline]
    pub fn cache(&self) -> &OverflowCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolve the scroll target for an event that started at `node`.
    ///
    /// Returns `None` when nothing along the ancestor chain can scroll; the
    /// host's default action should run then.
    pub fn resolve<T: ScrollTree + ?Sized>(
        &mut self,
        tree: &T,
        node: NodeId,
        now: Instant,
    ) -> Option<ScrollTarget> {
        self.cache.expire(now);

        let root = tree.metrics(tree.root());
        let mut visited = Vec::new();
        let mut current = Some(node);

        while let Some(el) = current {
            if let Some(hit) = self.cache.get(el) {
                self.cache.store(&visited, hit);
                return Some(hit);
            }
            visited.push(el);

            let metrics = tree.metrics(el);
            if metrics.scroll_height == root.scroll_height {
                if !page_scrolls(&root, tree.is_embedded_frame()) {
                    return None;
                }
                self.cache.store(&visited, ScrollTarget::Page);
                return Some(ScrollTarget::Page);
            }
            if metrics.client_height + OVERFLOW_SLOP < metrics.scroll_height
                && tree.overflow(el).is_scrollable()
            {
                let target = ScrollTarget::Element(el);
                self.cache.store(&visited, target);
                return Some(target);
            }

            current = tree.parent(el);
        }

        None
    }
}

/// Whether the page has anything to scroll. Inside a frame only vertical
/// overflow counts.
fn page_scrolls(root: &ScrollMetrics, embedded: bool) -> bool {
    let vertical = root.client_height + OVERFLOW_SLOP < root.scroll_height;
    let horizontal = root.client_width + OVERFLOW_SLOP < root.scroll_width;
    if embedded {
        vertical
    } else {
        vertical || horizontal
    }
}
