use crossterm::event::{Event, KeyEvent, KeyEventKind};
use linear_core::graphql::{IssueDetail, IssueSummary, TeamSummary};

/// The three top-level panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Teams,
    Issues,
    IssueDetail,
}

/// A fetch emitted by the state machine, tagged with the panel's request generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Teams { generation: u64 },
    TeamIssues { team_id: String, generation: u64 },
    IssueDetail { issue_id: String, generation: u64 },
}

impl LoadRequest {
    /// Panel whose contents the request fills.
    pub fn panel(&self) -> PanelKind {
        match self {
            LoadRequest::Teams { .. } => PanelKind::Teams,
            LoadRequest::TeamIssues { .. } => PanelKind::Issues,
            LoadRequest::IssueDetail { .. } => PanelKind::IssueDetail,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            LoadRequest::Teams { generation }
            | LoadRequest::TeamIssues { generation, .. }
            | LoadRequest::IssueDetail { generation, .. } => *generation,
        }
    }
}

/// Everything the event loop reacts to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    Tick,
    TeamsLoaded {
        generation: u64,
        teams: Vec<TeamSummary>,
    },
    IssuesLoaded {
        generation: u64,
        issues: Vec<IssueSummary>,
    },
    IssueDetailLoaded {
        generation: u64,
        issue: Box<IssueDetail>,
    },
    LoadFailed {
        panel: PanelKind,
        generation: u64,
        message: String,
    },
}

impl AppEvent {
    /// Translate a raw terminal event; key releases and mouse/focus events are dropped.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
            _ => None,
        }
    }
}
