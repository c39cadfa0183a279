//! Demo page shown by the terminal host
//!
//! A long article scrolled by the page itself, next to a fixed side pane with
//! its own `overflow: auto` list. Terminal cells map to pixels through a
//! fixed cell size, so the engine animates in pixels and the view snaps to
//! whole rows and columns.

use ratatui::layout::Rect;
use smoothscroll_core::dom::{Axis, Document, Node, NodeId, Overflow, ScrollTree};

/// Pixel height of one terminal row
pub const LINE_HEIGHT: i32 = 20;

/// Pixel width of one terminal column
pub const COLUMN_WIDTH: i32 = 8;

/// Article width in columns; wider terminals get no horizontal scroll
const ARTICLE_COLUMNS: usize = 140;

const ARTICLE_LINES: usize = 400;

const PANE_LINES: usize = 120;

const WORDS: &[&str] = &[
    "wheel", "notch", "pulse", "frame", "deadline", "queue", "viewport", "offset", "overflow",
    "ancestor", "easing", "tick", "pixel", "scroll", "target", "edge", "delta", "command",
];

/// Screen areas of the two scrollable regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageAreas {
    pub article: Rect,
    pub pane: Rect,
}

impl PageAreas {
    /// Split the content area: article on the left, pane on the right third
    pub fn split(area: Rect) -> Self {
        let pane_width = area.width / 3;
        let article = Rect::new(area.x, area.y, area.width - pane_width, area.height);
        let pane = Rect::new(area.x + article.width, area.y, pane_width, area.height);
        Self { article, pane }
    }
}

/// Layout and text of the demo page. The engine owns the [`Document`].
pub struct Page {
    body: NodeId,
    pane: NodeId,
    article: Vec<String>,
    items: Vec<String>,
    areas: PageAreas,
}

impl Page {
    pub fn build(area: Rect) -> (Self, Document) {
        let article = article_lines();
        let items = pane_items();
        let areas = PageAreas::split(area);

        let mut document = Document::new(
            cells_to_px(areas.article.width, areas.article.height),
            content_px(ARTICLE_COLUMNS, article.len()),
        );
        let root = document.root();
        let body = document.append(root, Node::element());
        let (pane_width, pane_height) = cells_to_px(areas.pane.width, areas.pane.height);
        let pane = document.append(
            body,
            Node::element()
                .overflow(Overflow::Auto)
                .client_size(pane_width, pane_height)
                .scroll_size(pane_width, content_px(0, items.len()).1),
        );

        let page = Self {
            body,
            pane,
            article,
            items,
            areas,
        };
        (page, document)
    }

    #[inline]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[inline]
    pub fn pane(&self) -> NodeId {
        self.pane
    }

    #[inline]
    pub fn areas(&self) -> PageAreas {
        self.areas
    }

    pub fn article(&self) -> &[String] {
        &self.article
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Node under a terminal cell
    pub fn hit_test(&self, column: u16, row: u16) -> NodeId {
        let pane = self.areas.pane;
        if column >= pane.x && column < pane.x + pane.width && row >= pane.y && row < pane.y + pane.height {
            self.pane
        } else {
            self.body
        }
    }

    /// Lay the page out for a new content area, keeping offsets in range
    pub fn resize(&mut self, document: &mut Document, area: Rect) {
        self.areas = PageAreas::split(area);
        let root = document.root();
        document.resize(
            root,
            cells_to_px(self.areas.article.width, self.areas.article.height),
            content_px(ARTICLE_COLUMNS, self.article.len()),
        );
        let client = cells_to_px(self.areas.pane.width, self.areas.pane.height);
        document.resize(self.pane, client, (client.0, content_px(0, self.items.len()).1));
    }
}

/// First visible (row, column) of the article
pub fn article_scroll(document: &Document) -> (u16, u16) {
    let root = document.root();
    (
        px_to_cells(document.scroll_offset(root, Axis::Y), LINE_HEIGHT),
        px_to_cells(document.scroll_offset(root, Axis::X), COLUMN_WIDTH),
    )
}

/// First visible row of the side pane
pub fn pane_scroll(document: &Document, pane: NodeId) -> u16 {
    px_to_cells(document.scroll_offset(pane, Axis::Y), LINE_HEIGHT)
}

fn cells_to_px(columns: u16, rows: u16) -> (i32, i32) {
    (columns as i32 * COLUMN_WIDTH, rows as i32 * LINE_HEIGHT)
}

fn content_px(columns: usize, lines: usize) -> (i32, i32) {
    (columns as i32 * COLUMN_WIDTH, lines as i32 * LINE_HEIGHT)
}

fn px_to_cells(px: i32, cell: i32) -> u16 {
    (px.max(0) / cell).min(u16::MAX as i32) as u16
}

fn article_lines() -> Vec<String> {
    (0..ARTICLE_LINES)
        .map(|i| {
            let mut line = format!("{:>4}  ", i + 1);
            let mut word = i;
            while line.len() < ARTICLE_COLUMNS - 12 {
                line.push_str(WORDS[word % WORDS.len()]);
                line.push(' ');
                word = (word * 7 + 3) % WORDS.len();
            }
            line
        })
        .collect()
}

fn pane_items() -> Vec<String> {
    (0..PANE_LINES)
        .map(|i| format!("{:>3}. {}", i + 1, WORDS[i % WORDS.len()]))
        .collect()
}
