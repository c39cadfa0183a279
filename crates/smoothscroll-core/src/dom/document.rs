//! Arena-backed in-memory document
//!
//! Used by the terminal host, the `simulate` command and the tests. Offset
//! writes are clamped to each element's scroll range.

use super::tree::{Axis, NodeId, NodeKind, Overflow, ScrollMetrics, ScrollTree};

/// Description of an element to insert into a [`Document`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Node {
    kind: NodeKind,
    overflow: Overflow,
    content_editable: bool,
    metrics: ScrollMetrics,
}

impl Node {
    pub fn element() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn content_editable(mut self) -> Self {
        self.content_editable = true;
        self
    }

    /// Visible box size
    pub fn client_size(mut self, width: i32, height: i32) -> Self {
        self.metrics.client_width = width;
        self.metrics.client_height = height;
        self
    }

    /// Content size
    pub fn scroll_size(mut self, width: i32, height: i32) -> Self {
        self.metrics.scroll_width = width;
        self.metrics.scroll_height = height;
        self
    }
}

#[derive(Debug, Clone)]
struct Entry {
    parent: Option<NodeId>,
    node: Node,
}

#[derive(Debug, Clone)]
pub struct Document {
    entries: Vec<Entry>,
    embedded: bool,
    background_fixed: bool,
}

impl Document {
    /// Create a document whose root scrolls `content` inside `viewport`
    pub fn new(viewport: (i32, i32), content: (i32, i32)) -> Self {
        let root = Node::element()
            .client_size(viewport.0, viewport.1)
            .scroll_size(content.0.max(viewport.0), content.1.max(viewport.1));
        Self {
            entries: vec![Entry {
                parent: None,
                node: root,
            }],
            embedded: false,
            background_fixed: true,
        }
    }

    /// Append a child element
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.entries.len());
        self.entries.push(Entry {
            parent: Some(parent),
            node,
        });
        id
    }

    /// Mark the document as living inside another page's frame
    pub fn set_embedded_frame(&mut self, embedded: bool) {
        self.embedded = embedded;
    }

    pub fn background_fixed(&self) -> bool {
        self.background_fixed
    }

    /// Change an element's box and content size, keeping offsets in range
    pub fn resize(&mut self, node: NodeId, client: (i32, i32), content: (i32, i32)) {
        if let Some(entry) = self.entries.get_mut(node.0) {
            let m = &mut entry.node.metrics;
            m.client_width = client.0;
            m.client_height = client.1;
            m.scroll_width = content.0.max(client.0);
            m.scroll_height = content.1.max(client.1);
            m.scroll_left = m.scroll_left.clamp(0, m.max_offset(Axis::X));
            m.scroll_top = m.scroll_top.clamp(0, m.max_offset(Axis::Y));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScrollTree for Document {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entries.get(node.0).and_then(|e| e.parent)
    }

    fn metrics(&self, node: NodeId) -> ScrollMetrics {
        self.entries
            .get(node.0)
            .map(|e| e.node.metrics)
            .unwrap_or_default()
    }

    fn overflow(&self, node: NodeId) -> Overflow {
        self.entries
            .get(node.0)
            .map(|e| e.node.overflow)
            .unwrap_or_default()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.entries
            .get(node.0)
            .map(|e| e.node.kind)
            .unwrap_or_default()
    }

    fn is_content_editable(&self, node: NodeId) -> bool {
        // contenteditable is inherited by descendants
        let mut current = Some(node);
        while let Some(id) = current {
            match self.entries.get(id.0) {
                Some(entry) if entry.node.content_editable => return true,
                Some(entry) => current = entry.parent,
                None => return false,
            }
        }
        false
    }

    fn is_embedded_frame(&self) -> bool {
        self.embedded
    }

    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, value: i32) {
        if let Some(entry) = self.entries.get_mut(node.0) {
            let m = &mut entry.node.metrics;
            let value = value.clamp(0, m.max_offset(axis));
            match axis {
                Axis::X => m.scroll_left = value,
                Axis::Y => m.scroll_top = value,
            }
        }
    }

    fn set_background_fixed(&mut self, fixed: bool) {
        self.background_fixed = fixed;
    }
}
