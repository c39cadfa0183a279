use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use smoothscroll_core::scroll::Clock;
use smoothscroll_core::Activation;

use crate::app::{App, Focus};
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let (mode_str, mode_color) = match app.engine.activation() {
            Activation::Active if app.engine.is_idle() => ("IDLE", GruvboxMaterial::FG0),
            Activation::Active => ("SCROLLING", GruvboxMaterial::ACCENT),
            Activation::Excluded => ("EXCLUDED", GruvboxMaterial::YELLOW),
            Activation::Unconfigured => ("OFF", GruvboxMaterial::RED),
        };

        let focus_str = match app.focus {
            Focus::Article => "Article",
            Focus::Pane => "Pane",
        };

        let (row, column) = app.article_scroll();
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | row {} col {} | pane row {} | passed through: {}",
                focus_str,
                row,
                column,
                app.pane_scroll(),
                app.passed_through
            )
        };

        let help_hint = " q:quit tab:focus wheel/arrows/space/pgup/pgdn/home/end:scroll ";
        let used = mode_str.len() + 2 + status_text.len() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", mode_str),
                Style::default().fg(GruvboxMaterial::BG0).bg(mode_color),
            ),
            Span::styled(
                status_text,
                Style::default()
                    .fg(GruvboxMaterial::FG0)
                    .bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
