use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::tui::app::Screen;

/// Screen regions for the panels visible in one state. Hidden panels get `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelAreas {
    pub teams: Option<Rect>,
    pub issues: Option<Rect>,
    pub detail: Option<Rect>,
    pub status: Rect,
}

pub fn split(screen: Screen, area: Rect) -> PanelAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match screen {
        Screen::TeamsList | Screen::IssuesList => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(rows[0]);
            PanelAreas {
                teams: Some(columns[0]),
                issues: Some(columns[1]),
                detail: None,
                status: rows[1],
            }
        }
        Screen::IssueDetail => PanelAreas {
            teams: None,
            issues: None,
            detail: Some(rows[0]),
            status: rows[1],
        },
    }
}
