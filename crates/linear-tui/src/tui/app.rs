use crossterm::event::KeyEvent;
use linear_core::graphql::{IssueSummary, TeamSummary};
use ratatui::layout::Rect;
use tracing::debug;

use crate::tui::event::{AppEvent, LoadRequest, PanelKind};
use crate::tui::keymap::{self, Action};
use crate::tui::layout;
use crate::tui::panel::{DetailPanel, ListPanel};

/// Which panel currently owns the screen and the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TeamsList,
    IssuesList,
    IssueDetail,
}

/// What the event loop must do after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Load(LoadRequest),
    Quit,
}

/// Latest request generation issued per panel; results from older generations are dropped.
#[derive(Debug, Clone, Copy, Default)]
struct Generations {
    teams: u64,
    issues: u64,
    detail: u64,
}

impl Generations {
    fn bump(&mut self, panel: PanelKind) -> u64 {
        let slot = self.slot(panel);
        *slot += 1;
        *slot
    }

    fn is_current(&self, panel: PanelKind, generation: u64) -> bool {
        let latest = match panel {
            PanelKind::Teams => self.teams,
            PanelKind::Issues => self.issues,
            PanelKind::IssueDetail => self.detail,
        };
        latest == generation
    }

    fn slot(&mut self, panel: PanelKind) -> &mut u64 {
        match panel {
            PanelKind::Teams => &mut self.teams,
            PanelKind::Issues => &mut self.issues,
            PanelKind::IssueDetail => &mut self.detail,
        }
    }
}

/// Navigation state machine. Owns every panel and is only mutated from the event loop.
pub struct App {
    screen: Screen,
    teams: ListPanel<TeamSummary>,
    issues: ListPanel<IssueSummary>,
    detail: DetailPanel,
    selected_team: Option<TeamSummary>,
    selected_issue: Option<IssueSummary>,
    generations: Generations,
    viewport: Option<Rect>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::TeamsList,
            teams: ListPanel::new(),
            issues: ListPanel::new(),
            detail: DetailPanel::new(),
            selected_team: None,
            selected_issue: None,
            generations: Generations::default(),
            viewport: None,
        }
    }

    /// Kick off the initial team load.
    pub fn start(&mut self) -> Command {
        self.teams.start_loading();
        Command::Load(LoadRequest::Teams {
            generation: self.generations.bump(PanelKind::Teams),
        })
    }

    pub fn update(&mut self, event: AppEvent) -> Command {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize { width, height } => {
                self.resize(width, height);
                Command::None
            }
            AppEvent::Tick => {
                self.teams.tick();
                self.issues.tick();
                self.detail.tick();
                Command::None
            }
            AppEvent::TeamsLoaded { generation, teams } => {
                if self.accept(PanelKind::Teams, generation) {
                    self.teams.stop_loading();
                    self.teams.set_items(teams);
                }
                Command::None
            }
            AppEvent::IssuesLoaded { generation, issues } => {
                if self.accept(PanelKind::Issues, generation) {
                    self.issues.stop_loading();
                    self.issues.set_items(issues);
                }
                Command::None
            }
            AppEvent::IssueDetailLoaded { generation, issue } => {
                if self.accept(PanelKind::IssueDetail, generation) {
                    self.detail.stop_loading();
                    self.detail.set_issue(*issue);
                }
                Command::None
            }
            AppEvent::LoadFailed {
                panel,
                generation,
                message,
            } => {
                if self.accept(panel, generation) {
                    self.fail(panel, message);
                }
                Command::None
            }
        }
    }

    fn accept(&self, panel: PanelKind, generation: u64) -> bool {
        let current = self.generations.is_current(panel, generation);
        if !current {
            debug!(?panel, generation, "discarding superseded load result");
        }
        current
    }

    fn fail(&mut self, panel: PanelKind, message: String) {
        match panel {
            PanelKind::Teams => {
                self.teams.stop_loading();
                self.teams.set_error(message);
            }
            PanelKind::Issues => {
                self.issues.stop_loading();
                self.issues.set_error(message);
            }
            PanelKind::IssueDetail => {
                self.detail.stop_loading();
                self.detail.set_error(message);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command {
        if keymap::is_interrupt(&key) {
            return Command::Quit;
        }

        let consumed = match self.screen {
            Screen::TeamsList => self.teams.handle_key(key),
            Screen::IssuesList => self.issues.handle_key(key),
            Screen::IssueDetail => self.detail.handle_key(key),
        };
        if consumed {
            return Command::None;
        }

        match keymap::action_for(&key) {
            Some(Action::Select) => self.select(),
            Some(Action::Back) => {
                self.back();
                Command::None
            }
            Some(Action::Refresh) => self.refresh(),
            Some(Action::Quit) => Command::Quit,
            None => Command::None,
        }
    }

    /// Drill into the highlighted item of the active panel.
    pub fn select(&mut self) -> Command {
        match self.screen {
            Screen::TeamsList => {
                if self.teams.is_loading() {
                    return Command::None;
                }
                let Some(team) = self.teams.selected().cloned() else {
                    return Command::None;
                };
                let team_id = team.id.clone();
                self.selected_team = Some(team);
                self.issues.clear();
                self.issues.start_loading();
                self.enter(Screen::IssuesList);
                Command::Load(LoadRequest::TeamIssues {
                    team_id,
                    generation: self.generations.bump(PanelKind::Issues),
                })
            }
            Screen::IssuesList => {
                if self.issues.is_loading() {
                    return Command::None;
                }
                let Some(issue) = self.issues.selected().cloned() else {
                    return Command::None;
                };
                let issue_id = issue.id.clone();
                self.selected_issue = Some(issue);
                self.detail.clear();
                self.detail.start_loading();
                self.enter(Screen::IssueDetail);
                Command::Load(LoadRequest::IssueDetail {
                    issue_id,
                    generation: self.generations.bump(PanelKind::IssueDetail),
                })
            }
            Screen::IssueDetail => Command::None,
        }
    }

    /// Return to the parent panel. Never emits a request.
    pub fn back(&mut self) {
        match self.screen {
            Screen::IssueDetail => {
                self.detail.clear();
                self.selected_issue = None;
                self.enter(Screen::IssuesList);
            }
            Screen::IssuesList => {
                self.issues.clear();
                self.selected_team = None;
                self.enter(Screen::TeamsList);
            }
            Screen::TeamsList => {}
        }
    }

    /// Re-fetch the active panel's data, keeping its current contents until the result lands.
    pub fn refresh(&mut self) -> Command {
        match self.screen {
            Screen::TeamsList => {
                if self.teams.is_loading() {
                    return Command::None;
                }
                self.teams.start_loading();
                Command::Load(LoadRequest::Teams {
                    generation: self.generations.bump(PanelKind::Teams),
                })
            }
            Screen::IssuesList => {
                if self.issues.is_loading() {
                    return Command::None;
                }
                let Some(team_id) = self.selected_team.as_ref().map(|team| team.id.clone())
                else {
                    return Command::None;
                };
                self.issues.start_loading();
                Command::Load(LoadRequest::TeamIssues {
                    team_id,
                    generation: self.generations.bump(PanelKind::Issues),
                })
            }
            Screen::IssueDetail => {
                if self.detail.is_loading() {
                    return Command::None;
                }
                let Some(issue_id) = self.selected_issue.as_ref().map(|issue| issue.id.clone())
                else {
                    return Command::None;
                };
                self.detail.start_loading();
                Command::Load(LoadRequest::IssueDetail {
                    issue_id,
                    generation: self.generations.bump(PanelKind::IssueDetail),
                })
            }
        }
    }

    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.layout_visible();
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Some(Rect::new(0, 0, width, height));
        self.layout_visible();
    }

    /// Size only the panels on screen; hidden panels are sized when they become visible.
    fn layout_visible(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let areas = layout::split(self.screen, viewport);
        if let Some(area) = areas.teams {
            self.teams.set_size(area.width, area.height);
        }
        if let Some(area) = areas.issues {
            self.issues.set_size(area.width, area.height);
        }
        if let Some(area) = areas.detail {
            self.detail.set_size(area.width, area.height);
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn teams(&self) -> &ListPanel<TeamSummary> {
        &self.teams
    }

    pub fn issues(&self) -> &ListPanel<IssueSummary> {
        &self.issues
    }

    pub fn detail(&self) -> &DetailPanel {
        &self.detail
    }

    pub fn selected_team(&self) -> Option<&TeamSummary> {
        self.selected_team.as_ref()
    }

    pub fn selected_issue(&self) -> Option<&IssueSummary> {
        self.selected_issue.as_ref()
    }

    /// Path from the teams list to the active panel, e.g. `Teams › Alpha › A-1`.
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec!["Teams".to_string()];
        if self.screen != Screen::TeamsList {
            if let Some(team) = self.selected_team.as_ref() {
                parts.push(team.name.clone());
            }
        }
        if self.screen == Screen::IssueDetail {
            if let Some(issue) = self.selected_issue.as_ref() {
                parts.push(issue.identifier.clone());
            }
        }
        parts.join(" › ")
    }
}
