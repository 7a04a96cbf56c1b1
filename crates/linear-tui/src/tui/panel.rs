//! Stateful panel widgets owned by the navigation state machine.
//!
//! Each panel keeps its own cursor, filter, busy indicator, error and render
//! geometry. All mutation goes through explicit methods; rendering only reads.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use linear_core::graphql::{IssueDetail, IssueSummary, TeamSummary};
use textwrap::wrap;

pub const SPINNER_FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// Busy indicator advanced once per event-loop tick while active.
#[derive(Debug, Clone, Default)]
pub struct Busy {
    active: bool,
    frame: usize,
}

impl Busy {
    pub fn start(&mut self) {
        self.active = true;
        self.frame = 0;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn tick(&mut self) {
        if self.active {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn glyph(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }
}

/// Text an item is matched against when a list filter is applied.
pub trait Filterable {
    fn filter_text(&self) -> String;
}

impl Filterable for TeamSummary {
    fn filter_text(&self) -> String {
        format!("{} {}", self.key, self.name)
    }
}

impl Filterable for IssueSummary {
    fn filter_text(&self) -> String {
        format!("{} {}", self.identifier, self.title)
    }
}

/// Selectable, filterable list of items.
#[derive(Debug, Clone)]
pub struct ListPanel<T> {
    items: Vec<T>,
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
    editing_filter: bool,
    busy: Busy,
    error: Option<String>,
    width: u16,
    height: u16,
}

impl<T> Default for ListPanel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            editing_filter: false,
            busy: Busy::default(),
            error: None,
            width: 0,
            height: 0,
        }
    }
}

impl<T: Filterable> ListPanel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every item at once. Clears any error; the filter stays applied.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.error = None;
        self.refilter();
    }

    /// Drop items, filter and error. The busy indicator is left as is.
    pub fn clear(&mut self) {
        self.items.clear();
        self.visible.clear();
        self.cursor = 0;
        self.filter.clear();
        self.editing_filter = false;
        self.error = None;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(|&idx| &self.items[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Cursor position among the visible items, `None` when nothing is addressable.
    pub fn cursor(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.cursor)
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible
            .get(self.cursor)
            .and_then(|&idx| self.items.get(idx))
    }

    /// Apply a key press. Returns whether the panel consumed it.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing_filter {
            self.handle_filter_key(key);
            return true;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.step(1),
            KeyCode::Up | KeyCode::Char('k') => self.step(-1),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            KeyCode::PageDown => {
                let last = self.visible.len().saturating_sub(1);
                self.cursor = (self.cursor + self.page_step()).min(last);
            }
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(self.page_step()),
            KeyCode::Char('/') => self.editing_filter = true,
            KeyCode::Esc if !self.filter.is_empty() => {
                self.filter.clear();
                self.refilter();
            }
            _ => return false,
        }
        true
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing_filter = false;
                self.filter.clear();
                self.refilter();
            }
            KeyCode::Enter => self.editing_filter = false,
            KeyCode::Backspace => {
                self.filter.pop();
                self.refilter();
            }
            KeyCode::Down => self.step(1),
            KeyCode::Up => self.step(-1),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.refilter();
            }
            _ => {}
        }
    }

    /// Wrapping cursor movement.
    fn step(&mut self, delta: isize) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    fn page_step(&self) -> usize {
        usize::from(self.height.saturating_sub(2)).max(1)
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                needle.is_empty() || item.filter_text().to_lowercase().contains(&needle)
            })
            .map(|(idx, _)| idx)
            .collect();
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    /// Active filter text, if any.
    pub fn filter(&self) -> Option<&str> {
        (!self.filter.is_empty()).then_some(self.filter.as_str())
    }

    pub fn is_editing_filter(&self) -> bool {
        self.editing_filter
    }

    pub fn start_loading(&mut self) {
        self.busy.start();
    }

    pub fn stop_loading(&mut self) {
        self.busy.stop();
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_active()
    }

    pub fn busy(&self) -> &Busy {
        &self.busy
    }

    pub fn tick(&mut self) {
        self.busy.tick();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    #[cfg(test)]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

/// One pre-wrapped row of the issue detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailLine {
    Heading(String),
    Field { label: String, value: String },
    Text(String),
    Rule,
    Blank,
}

/// Scrollable view of a single issue and its comments.
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    issue: Option<IssueDetail>,
    lines: Vec<DetailLine>,
    scroll: u16,
    busy: Busy,
    error: Option<String>,
    width: u16,
    height: u16,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded issue, resetting the scroll position.
    pub fn set_issue(&mut self, issue: IssueDetail) {
        self.issue = Some(issue);
        self.error = None;
        self.scroll = 0;
        self.relayout();
    }

    /// Drop the record and error. The busy indicator is left as is.
    pub fn clear(&mut self) {
        self.issue = None;
        self.lines.clear();
        self.scroll = 0;
        self.error = None;
    }

    pub fn issue(&self) -> Option<&IssueDetail> {
        self.issue.as_ref()
    }

    pub fn lines(&self) -> &[DetailLine] {
        &self.lines
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let page = self.viewport_rows().max(1);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(page as i32),
            KeyCode::PageUp => self.scroll_by(-(page as i32)),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll = self.max_scroll(),
            _ => return false,
        }
        true
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = next as u16;
    }

    /// Rows left for content inside the borders, minus the pinned error row.
    fn viewport_rows(&self) -> u16 {
        let error_row = u16::from(self.error.is_some());
        self.height.saturating_sub(2).saturating_sub(error_row)
    }

    fn max_scroll(&self) -> u16 {
        let total = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        total.saturating_sub(self.viewport_rows())
    }

    fn content_width(&self) -> usize {
        usize::from(self.width.saturating_sub(3)).max(10)
    }

    fn relayout(&mut self) {
        self.lines = match self.issue.as_ref() {
            Some(issue) => detail_lines(issue, self.content_width()),
            None => Vec::new(),
        };
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn start_loading(&mut self) {
        self.busy.start();
    }

    pub fn stop_loading(&mut self) {
        self.busy.stop();
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_active()
    }

    pub fn busy(&self) -> &Busy {
        &self.busy
    }

    pub fn tick(&mut self) {
        self.busy.tick();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Resize re-wraps the content to the new width.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.relayout();
    }

    #[cfg(test)]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

fn detail_lines(issue: &IssueDetail, width: usize) -> Vec<DetailLine> {
    let mut lines = vec![DetailLine::Heading(format!(
        "{}  {}",
        issue.identifier, issue.title
    ))];
    if let Some(state) = issue.state.as_deref() {
        lines.push(DetailLine::Field {
            label: "State".into(),
            value: state.to_string(),
        });
    }
    if let Some(url) = issue.url.as_deref() {
        lines.push(DetailLine::Field {
            label: "URL".into(),
            value: url.to_string(),
        });
    }
    lines.push(DetailLine::Field {
        label: "Updated".into(),
        value: issue.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    });
    lines.push(DetailLine::Blank);

    lines.push(DetailLine::Heading("Description".into()));
    match issue.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => push_wrapped(&mut lines, description, width),
        None => lines.push(DetailLine::Text("(no description)".into())),
    }
    lines.push(DetailLine::Blank);

    lines.push(DetailLine::Heading(format!(
        "Comments ({})",
        issue.comments.len()
    )));
    if issue.comments.is_empty() {
        lines.push(DetailLine::Text("No comments".into()));
    }
    for comment in &issue.comments {
        lines.push(DetailLine::Rule);
        lines.push(DetailLine::Field {
            label: comment.author.clone().unwrap_or_else(|| "unknown".into()),
            value: comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        });
        push_wrapped(&mut lines, &comment.body, width);
    }
    lines
}

fn push_wrapped(lines: &mut Vec<DetailLine>, text: &str, width: usize) {
    lines.extend(
        wrap(text, width)
            .into_iter()
            .map(|line| DetailLine::Text(line.into_owned())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use linear_core::graphql::IssueComment;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn team(key: &str, name: &str) -> TeamSummary {
        TeamSummary {
            id: format!("team-{key}"),
            key: key.into(),
            name: name.into(),
            issue_count: 0,
        }
    }

    fn teams_panel() -> ListPanel<TeamSummary> {
        let mut panel = ListPanel::new();
        panel.set_items(vec![
            team("A", "Alpha"),
            team("B", "Beta"),
            team("C", "Gamma"),
        ]);
        panel
    }

    fn issue_with_comments(comments: &[&str]) -> IssueDetail {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        IssueDetail {
            id: "issue-1".into(),
            identifier: "A-1".into(),
            title: "Fix login".into(),
            description: Some("Users cannot log in".into()),
            url: None,
            state: Some("Todo".into()),
            created_at: at,
            updated_at: at,
            comments: comments
                .iter()
                .map(|body| IssueComment {
                    body: body.to_string(),
                    author: Some("ada".into()),
                    created_at: at,
                })
                .collect(),
        }
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut panel = teams_panel();
        assert!(panel.handle_key(key(KeyCode::Up)));
        assert_eq!(panel.selected().map(|t| t.key.as_str()), Some("C"));
        assert!(panel.handle_key(key(KeyCode::Char('j'))));
        assert_eq!(panel.selected().map(|t| t.key.as_str()), Some("A"));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut panel: ListPanel<TeamSummary> = ListPanel::new();
        panel.handle_key(key(KeyCode::Down));
        assert!(panel.selected().is_none());
        assert!(panel.cursor().is_none());
    }

    #[test]
    fn filter_narrows_and_captures_keys() {
        let mut panel = teams_panel();
        assert!(panel.handle_key(key(KeyCode::Char('/'))));
        assert!(panel.is_editing_filter());
        for c in "gam".chars() {
            assert!(panel.handle_key(key(KeyCode::Char(c))));
        }
        assert_eq!(panel.visible_len(), 1);
        assert_eq!(panel.selected().map(|t| t.name.as_str()), Some("Gamma"));

        // 'q' is filter text while editing, never quit.
        assert!(panel.handle_key(key(KeyCode::Char('q'))));
        assert_eq!(panel.visible_len(), 0);
        assert!(panel.selected().is_none());

        assert!(panel.handle_key(key(KeyCode::Backspace)));
        assert!(panel.handle_key(key(KeyCode::Enter)));
        assert!(!panel.is_editing_filter());
        assert_eq!(panel.filter(), Some("gam"));

        assert!(panel.handle_key(key(KeyCode::Esc)));
        assert_eq!(panel.filter(), None);
        assert_eq!(panel.visible_len(), 3);
    }

    #[test]
    fn unbound_keys_are_not_consumed() {
        let mut panel = teams_panel();
        assert!(!panel.handle_key(key(KeyCode::Enter)));
        assert!(!panel.handle_key(key(KeyCode::Esc)));
        assert!(!panel.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn set_items_keeps_filter_and_clears_error() {
        let mut panel = teams_panel();
        panel.set_error("boom");
        panel.handle_key(key(KeyCode::Char('/')));
        panel.handle_key(key(KeyCode::Char('b')));
        panel.set_items(vec![team("B", "Beta"), team("D", "Delta")]);
        assert!(panel.error().is_none());
        assert_eq!(panel.visible_len(), 1);
        assert_eq!(panel.items().len(), 2);
    }

    #[test]
    fn clear_keeps_busy_indicator() {
        let mut panel = teams_panel();
        panel.start_loading();
        panel.clear();
        assert!(panel.is_loading());
        assert!(panel.items().is_empty());
    }

    #[test]
    fn spinner_only_advances_while_active() {
        let mut busy = Busy::default();
        busy.tick();
        assert_eq!(busy.glyph(), '-');
        busy.start();
        busy.tick();
        assert_eq!(busy.glyph(), '\\');
        busy.stop();
        busy.tick();
        assert_eq!(busy.glyph(), '\\');
    }

    #[test]
    fn detail_lines_keep_comment_order() {
        let mut panel = DetailPanel::new();
        panel.set_size(80, 20);
        panel.set_issue(issue_with_comments(&["first", "second"]));
        let texts: Vec<_> = panel
            .lines()
            .iter()
            .filter_map(|line| match line {
                DetailLine::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["Users cannot log in", "first", "second"]);
    }

    #[test]
    fn resize_rewraps_content() {
        let mut panel = DetailPanel::new();
        panel.set_size(80, 20);
        let mut issue = issue_with_comments(&[]);
        issue.description = Some("one two three four five six seven eight nine ten".into());
        panel.set_issue(issue);
        let wide = panel.lines().len();
        panel.set_size(14, 20);
        assert!(panel.lines().len() > wide);
    }

    #[test]
    fn scroll_is_bounded_by_content() {
        let mut panel = DetailPanel::new();
        panel.set_size(40, 6);
        panel.set_issue(issue_with_comments(&["a", "b", "c", "d"]));
        for _ in 0..100 {
            panel.handle_key(key(KeyCode::Down));
        }
        let max = panel.scroll();
        assert_eq!(usize::from(max), panel.lines().len() - 4);
        panel.handle_key(key(KeyCode::Home));
        assert_eq!(panel.scroll(), 0);
        panel.handle_key(key(KeyCode::Up));
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn error_row_leaves_last_line_reachable() {
        let mut panel = DetailPanel::new();
        panel.set_size(60, 12);
        let comments: Vec<String> = (0..11).map(|n| format!("comment {n}")).collect();
        let comments: Vec<&str> = comments.iter().map(String::as_str).collect();
        panel.set_issue(issue_with_comments(&comments));
        panel.set_error("timeout");

        panel.handle_key(key(KeyCode::End));
        let visible_rows = 12 - 2 - 1;
        assert_eq!(
            usize::from(panel.scroll()) + visible_rows,
            panel.lines().len()
        );
        assert_eq!(
            panel.lines().last(),
            Some(&DetailLine::Text("comment 10".into()))
        );
    }
}
