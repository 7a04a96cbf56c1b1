use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::panel::DetailLine;
use crate::tui::view::util::{border_style, error_style, muted_style, panel_title};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let panel = app.detail();
    let name = app
        .selected_issue()
        .map(|issue| issue.identifier.clone())
        .unwrap_or_else(|| "Issue".to_string());
    let busy = panel.is_loading().then(|| panel.busy().glyph());
    let block = Block::default()
        .title(panel_title(&name, None, false, busy))
        .borders(Borders::ALL)
        .border_style(border_style(true));

    let error = panel
        .error()
        .map(|message| Line::styled(format!("Error: {message}"), error_style()));
    if panel.issue().is_none() {
        let body = error.unwrap_or_else(|| {
            let text = if panel.is_loading() {
                "Loading issue..."
            } else {
                "No issue loaded"
            };
            Line::styled(text, muted_style())
        });
        frame.render_widget(Paragraph::new(body).block(block), area);
        return;
    }

    let mut content = block.inner(area);
    frame.render_widget(block, area);
    // The error row stays pinned above the scrolled content.
    if let Some(error) = error {
        let error_area = Rect {
            height: 1.min(content.height),
            ..content
        };
        frame.render_widget(Paragraph::new(error), error_area);
        content.y += error_area.height;
        content.height -= error_area.height;
    }

    let rule_width = usize::from(area.width.saturating_sub(3));
    let lines: Vec<Line> = panel
        .lines()
        .iter()
        .map(|line| styled(line, rule_width))
        .collect();
    let total = lines.len();
    frame.render_widget(Paragraph::new(lines).scroll((panel.scroll(), 0)), content);

    let mut state = ScrollbarState::new(total).position(usize::from(panel.scroll()));
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        Rect {
            x: area.x,
            width: area.width,
            ..content
        },
        &mut state,
    );
}

fn styled(line: &DetailLine, rule_width: usize) -> Line<'static> {
    match line {
        DetailLine::Heading(text) => Line::styled(
            text.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        DetailLine::Field { label, value } => Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
            Span::raw(value.clone()),
        ]),
        DetailLine::Text(text) => Line::raw(text.clone()),
        DetailLine::Rule => Line::styled("─".repeat(rule_width), muted_style()),
        DetailLine::Blank => Line::default(),
    }
}
