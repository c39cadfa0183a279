use ratatui::{
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use smoothscroll_core::scroll::Clock;

use crate::app::{App, Focus};
use crate::theme::GruvboxMaterial;

pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render<C: Clock>(frame: &mut Frame, app: &App<C>) {
        let areas = app.page.areas();

        let (row, column) = app.article_scroll();
        let article: Vec<Line> = app
            .page
            .article()
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let article = Paragraph::new(article)
            .style(Style::default().fg(GruvboxMaterial::FG0).bg(GruvboxMaterial::BG0))
            .scroll((row, column));
        frame.render_widget(article, areas.article);

        let border_style = if app.focus == Focus::Pane {
            Style::default().fg(GruvboxMaterial::ACCENT)
        } else {
            Style::default().fg(GruvboxMaterial::GREY0)
        };
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(border_style)
            .style(Style::default().bg(GruvboxMaterial::BG1));

        let items: Vec<Line> = app
            .page
            .items()
            .iter()
            .map(|item| Line::from(item.as_str()))
            .collect();
        let pane = Paragraph::new(items)
            .block(block)
            .style(Style::default().fg(GruvboxMaterial::GREY2))
            .scroll((app.pane_scroll(), 0));
        frame.render_widget(pane, areas.pane);
    }
}
