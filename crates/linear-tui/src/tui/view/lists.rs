use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use linear_core::graphql::{IssueSummary, TeamSummary};

use crate::tui::app::{App, Screen};
use crate::tui::panel::{Filterable, ListPanel};
use crate::tui::view::util::{
    border_style, error_style, highlight_spans, highlight_style, muted_style, panel_title,
    truncate,
};

pub fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let panel = app.teams();
    let focused = app.screen() == Screen::TeamsList;
    let block = panel_block("Teams", panel, focused);

    if let Some(placeholder) = placeholder(panel, "Loading teams...", "No teams") {
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let items = panel
        .visible_items()
        .map(|team| ListItem::new(team_line(team, panel.filter())))
        .collect();
    render_list(frame, area, panel, block, items, focused);
}

pub fn render_issues(frame: &mut Frame, area: Rect, app: &App) {
    let panel = app.issues();
    let focused = app.screen() == Screen::IssuesList;
    let name = app
        .selected_team()
        .map(|team| format!("Issues · {}", team.name))
        .unwrap_or_else(|| "Issues".to_string());
    if app.selected_team().is_none() {
        let block = Block::default()
            .title(panel_title(&name, None, false, None))
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let hint = Line::styled("Select a team to view issues", muted_style());
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }
    let block = panel_block(&name, panel, focused);
    if let Some(placeholder) = placeholder(panel, "Loading issues...", "No issues") {
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let description_width = usize::from(area.width.saturating_sub(5));
    let items = panel
        .visible_items()
        .map(|issue| ListItem::new(issue_lines(issue, panel.filter(), description_width)))
        .collect();
    render_list(frame, area, panel, block, items, focused);
}

fn panel_block<T: Filterable>(name: &str, panel: &ListPanel<T>, focused: bool) -> Block<'static> {
    let busy = panel.is_loading().then(|| panel.busy().glyph());
    Block::default()
        .title(panel_title(
            name,
            panel.filter(),
            panel.is_editing_filter(),
            busy,
        ))
        .borders(Borders::ALL)
        .border_style(border_style(focused))
}

/// Body to show instead of a list: loading, load failure with nothing to show, or an empty result.
fn placeholder<T: Filterable>(
    panel: &ListPanel<T>,
    loading: &'static str,
    empty: &'static str,
) -> Option<Vec<Line<'static>>> {
    if !panel.items().is_empty() {
        if panel.visible_len() == 0 {
            let mut lines = error_lines(panel);
            lines.push(Line::styled("No matches", muted_style()));
            return Some(lines);
        }
        return None;
    }
    let mut lines = error_lines(panel);
    if lines.is_empty() {
        let text = if panel.is_loading() { loading } else { empty };
        lines.push(Line::styled(text, muted_style()));
    }
    Some(lines)
}

fn error_lines<T: Filterable>(panel: &ListPanel<T>) -> Vec<Line<'static>> {
    panel
        .error()
        .map(|message| Line::styled(format!("Error: {message}"), error_style()))
        .into_iter()
        .collect()
}

fn render_list<T: Filterable>(
    frame: &mut Frame,
    area: Rect,
    panel: &ListPanel<T>,
    block: Block<'static>,
    items: Vec<ListItem<'static>>,
    focused: bool,
) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut list_area = inner;
    if let Some(error) = error_lines(panel).pop() {
        let error_area = Rect {
            height: 1.min(inner.height),
            ..inner
        };
        frame.render_widget(Paragraph::new(error), error_area);
        list_area.y += error_area.height;
        list_area.height -= error_area.height;
    }

    let mut state = ListState::default();
    state.select(panel.cursor());
    let list = List::new(items).highlight_style(highlight_style(focused));
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn team_line(team: &TeamSummary, filter: Option<&str>) -> Line<'static> {
    let mut spans = highlight_spans(&team.name, filter);
    let noun = if team.issue_count == 1 { "issue" } else { "issues" };
    spans.push(Span::styled(
        format!(" ({} {noun})", team.issue_count),
        muted_style(),
    ));
    Line::from(spans)
}

fn issue_lines(issue: &IssueSummary, filter: Option<&str>, width: usize) -> Vec<Line<'static>> {
    let mut title = highlight_spans(&issue.identifier, filter);
    title.push(Span::raw("  "));
    title.extend(highlight_spans(&issue.title, filter));

    let description = issue
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| truncate(text, width))
        .unwrap_or_else(|| "No description".to_string());

    vec![
        Line::from(title),
        Line::styled(format!("  {description}"), muted_style()),
    ]
}
