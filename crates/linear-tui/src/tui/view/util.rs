use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn highlight_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
    }
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Panel title, with the filter and a spinner glyph appended when relevant.
pub fn panel_title(name: &str, filter: Option<&str>, editing: bool, busy: Option<char>) -> String {
    let mut title = format!(" {name} ");
    match (filter, editing) {
        (_, true) => title.push_str(&format!("[/{}_] ", filter.unwrap_or_default())),
        (Some(filter), false) => title.push_str(&format!("[/{filter}] ")),
        (None, false) => {}
    }
    if let Some(glyph) = busy {
        title.push(glyph);
        title.push(' ');
    }
    title
}

/// First line of `text`, cut to at most `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() <= max {
        return first.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = first.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Split `text` into spans, emphasising case-insensitive matches of `query`.
pub fn highlight_spans(text: &str, query: Option<&str>) -> Vec<Span<'static>> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return vec![Span::raw(text.to_string())];
    };
    // Byte offsets in the lowercased text only map back when every char keeps its width.
    if !text.chars().all(lowercase_keeps_width) {
        return vec![Span::raw(text.to_string())];
    }
    let needle = query.to_lowercase();
    let haystack = text.to_lowercase();

    let mut spans = Vec::new();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(&needle) {
        let match_start = start + pos;
        if match_start > start {
            spans.push(Span::raw(text[start..match_start].to_string()));
        }
        let match_end = match_start + needle.len();
        spans.push(Span::styled(
            text[match_start..match_end].to_string(),
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ));
        start = match_end;
    }
    if start < text.len() {
        spans.push(Span::raw(text[start..].to_string()));
    }
    spans
}

fn lowercase_keeps_width(c: char) -> bool {
    let mut lower = c.to_lowercase();
    matches!((lower.next(), lower.next()), (Some(l), None) if l.len_utf8() == c.len_utf8())
}
