use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::app::{App, Screen};

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(app.breadcrumb(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(key_hints(app), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &App) -> &'static str {
    let editing = match app.screen() {
        Screen::TeamsList => app.teams().is_editing_filter(),
        Screen::IssuesList => app.issues().is_editing_filter(),
        Screen::IssueDetail => false,
    };
    if editing {
        return "type to filter  enter accept  esc clear";
    }
    match app.screen() {
        Screen::TeamsList => "enter open  / filter  r refresh  q quit",
        Screen::IssuesList => "enter open  esc back  / filter  r refresh  q quit",
        Screen::IssueDetail => "j/k scroll  esc back  r refresh  q quit",
    }
}
