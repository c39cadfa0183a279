//! The view of a host document the engine needs: ancestry, layout metrics,
//! computed overflow and scroll offset writes.

/// Identity of a node inside a [`ScrollTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Computed `overflow` style of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    /// Only `scroll` and `auto` let the user scroll the element
    #[inline]
    pub fn is_scrollable(self) -> bool {
        matches!(self, Overflow::Scroll | Overflow::Auto)
    }
}

/// Element kinds the keyboard path has to tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Element,
    Input,
    TextArea,
    Select,
    Embed,
    Button,
}

impl NodeKind {
    /// Form controls and plugins keep their own key handling
    #[inline]
    pub fn captures_keys(self) -> bool {
        matches!(
            self,
            NodeKind::Input | NodeKind::TextArea | NodeKind::Select | NodeKind::Embed
        )
    }
}

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Layout metrics of one element, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_left: i32,
    pub scroll_top: i32,
    pub scroll_width: i32,
    pub scroll_height: i32,
    pub client_width: i32,
    pub client_height: i32,
}

impl ScrollMetrics {
    /// Current offset along an axis
    #[inline]
    pub fn offset(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.scroll_left,
            Axis::Y => self.scroll_top,
        }
    }

    /// Largest offset the element accepts along an axis
    #[inline]
    pub fn max_offset(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => (self.scroll_width - self.client_width).max(0),
            Axis::Y => (self.scroll_height - self.client_height).max(0),
        }
    }
}

/// A DOM-like tree the scroll engine reads from and writes to.
///
/// Offset writes go through [`ScrollTree::set_scroll_offset`]; implementations
/// clamp them to the element's scroll range the way a browser does, which is
/// what lets the engine notice that an element stopped moving.
pub trait ScrollTree {
    /// The element that scrolls the whole page
    fn root(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn metrics(&self, node: NodeId) -> ScrollMetrics;

    fn overflow(&self, node: NodeId) -> Overflow;

    fn kind(&self, node: NodeId) -> NodeKind;

    fn is_content_editable(&self, node: NodeId) -> bool;

    /// Whether the document is embedded in a frame of another page
    fn is_embedded_frame(&self) -> bool;

    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, value: i32);

    #[inline]
    fn scroll_offset(&self, node: NodeId, axis: Axis) -> i32 {
        self.metrics(node).offset(axis)
    }

    /// Switch fixed page backgrounds to scrolling ones
    fn set_background_fixed(&mut self, _fixed: bool) {}
}
